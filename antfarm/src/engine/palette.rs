use antgrid::EntityKind;
use macroquad::prelude::Color;

/// The display color of every kind.
pub fn color_of(kind: EntityKind) -> Color {
    match kind {
        EntityKind::Grass => Color::new(0.1, 0.6, 0.1, 1.0),
        EntityKind::Water => Color::new(0.1, 0.1, 0.5, 1.0),
        EntityKind::Food => Color::new(0.6, 0.6, 0.1, 1.0),
        EntityKind::Feedee => Color::new(0.8, 0.3, 0.1, 1.0),
        EntityKind::FedFeedee => Color::new(1.0, 0.6, 0.6, 1.0),
        EntityKind::GrassWithFoodMarker => Color::new(0.6, 0.8, 0.3, 1.0),
        EntityKind::GrassWithFeedeeMarker => Color::new(0.3, 0.6, 0.6, 1.0),
        EntityKind::Ant => Color::new(0.0, 0.0, 0.0, 1.0),
        EntityKind::AntCarryingFoodLayingTrail
        | EntityKind::AntCarryingFood
        | EntityKind::EmptyAntLayingFeedeeTrail => Color::new(0.3, 0.0, 0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_is_opaque() {
        for kind in EntityKind::ALL {
            assert_eq!(color_of(kind).a, 1.0, "{} is translucent", kind);
        }
    }

    #[test]
    fn test_terrain_colors_are_distinct() {
        let terrain: Vec<_> = EntityKind::ALL
            .into_iter()
            .filter(|k| !k.is_agent() || *k == EntityKind::Ant)
            .map(|k| {
                let c = color_of(k);
                [c.r, c.g, c.b].map(|v| (v * 255.0).round() as u8)
            })
            .collect();
        for (i, a) in terrain.iter().enumerate() {
            for b in &terrain[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
