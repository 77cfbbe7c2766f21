use antgrid::Grid;
use macroquad::prelude::{Color, Image};

use super::{BACKGROUND_COLOR, SUCCESS_BAR_COLOR, color_of};

/// Renders the grid into a new image, `scale` pixels per cell.
pub fn render_frame(grid: &Grid, feedings: u64, scale: u32) -> Image {
    let width = (grid.width() as u32 * scale) as u16;
    let height = (grid.height() as u32 * scale) as u16;
    let mut image = Image::gen_image_color(width, height, BACKGROUND_COLOR);
    paint_frame(&mut image, grid, feedings, scale);
    image
}

/// Paints every cell as a `scale`-sized square, then overlays the success
/// bar: `feedings * scale / 4` pixels wide and two cells tall.
pub fn paint_frame(image: &mut Image, grid: &Grid, feedings: u64, scale: u32) {
    let image_width = image.width() as u32;
    let image_height = image.height() as u32;
    let bar_width = (feedings.saturating_mul(scale as u64) / 4).min(image_width as u64) as u32;
    let bar_height = (2 * scale).min(image_height);

    for (x, y, kind) in grid.iter() {
        let color = color_of(kind);
        let (left, top) = (x as u32 * scale, y as u32 * scale);
        for py in top..(top + scale).min(image_height) {
            for px in left..(left + scale).min(image_width) {
                let pixel = if px < bar_width && py < bar_height {
                    blend(SUCCESS_BAR_COLOR, color)
                } else {
                    color
                };
                image.set_pixel(px, py, pixel);
            }
        }
    }
}

/// Source-over blend of a translucent color onto an opaque one.
fn blend(over: Color, under: Color) -> Color {
    let a = over.a;
    Color::new(
        over.r * a + under.r * (1.0 - a),
        over.g * a + under.g * (1.0 - a),
        over.b * a + under.b * (1.0 - a),
        1.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use antgrid::EntityKind;

    fn close(a: Color, b: Color) -> bool {
        [a.r - b.r, a.g - b.g, a.b - b.b]
            .iter()
            .all(|d| d.abs() < 2.0 / 255.0)
    }

    #[test]
    fn test_frame_size_follows_scale() {
        let grid = Grid::new(5, 3).unwrap();
        let image = render_frame(&grid, 0, 4);
        assert_eq!((image.width(), image.height()), (20, 12));
    }

    #[test]
    fn test_cells_fill_their_square() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.put(2, 1, EntityKind::Water);
        let image = render_frame(&grid, 0, 2);
        for (px, py) in [(4, 2), (5, 2), (4, 3), (5, 3)] {
            assert!(close(image.get_pixel(px, py), color_of(EntityKind::Water)));
        }
        assert!(close(image.get_pixel(3, 2), color_of(EntityKind::Grass)));
    }

    #[test]
    fn test_success_bar_grows_with_feedings() {
        let grid = Grid::filled(10, 10, EntityKind::Water).unwrap();
        let water = color_of(EntityKind::Water);

        let none = render_frame(&grid, 0, 2);
        assert!(close(none.get_pixel(0, 0), water));

        // 8 feedings at scale 2 light up the first 4 pixel columns.
        let some = render_frame(&grid, 8, 2);
        let lit = blend(SUCCESS_BAR_COLOR, water);
        assert!(close(some.get_pixel(3, 3), lit));
        assert!(close(some.get_pixel(4, 0), water));
        assert!(close(some.get_pixel(0, 4), water));
    }

    #[test]
    fn test_success_bar_is_clamped_to_frame() {
        let grid = Grid::new(2, 2).unwrap();
        let image = render_frame(&grid, u64::MAX, 3);
        let lit = blend(SUCCESS_BAR_COLOR, color_of(EntityKind::Grass));
        assert!(close(image.get_pixel(5, 5), lit));
    }
}
