use bincode_derive::{Decode, Encode};

/// Everything a cell can hold. Cells store a kind, never an individual;
/// an agent "moves" by overwriting two cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Encode, Decode)]
pub enum EntityKind {
    #[default]
    Grass,
    Water,
    Food,
    Feedee,
    FedFeedee,
    GrassWithFoodMarker,
    GrassWithFeedeeMarker,
    Ant,
    AntCarryingFoodLayingTrail,
    AntCarryingFood,
    EmptyAntLayingFeedeeTrail,
}

impl EntityKind {
    /// Every kind, in declaration order. Index with [`EntityKind::index`].
    pub const ALL: [EntityKind; 11] = [
        EntityKind::Grass,
        EntityKind::Water,
        EntityKind::Food,
        EntityKind::Feedee,
        EntityKind::FedFeedee,
        EntityKind::GrassWithFoodMarker,
        EntityKind::GrassWithFeedeeMarker,
        EntityKind::Ant,
        EntityKind::AntCarryingFoodLayingTrail,
        EntityKind::AntCarryingFood,
        EntityKind::EmptyAntLayingFeedeeTrail,
    ];

    pub const COUNT: usize = Self::ALL.len();

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_agent(self) -> bool {
        matches!(
            self,
            EntityKind::Ant
                | EntityKind::AntCarryingFoodLayingTrail
                | EntityKind::AntCarryingFood
                | EntityKind::EmptyAntLayingFeedeeTrail
        )
    }

    pub fn is_carrying_food(self) -> bool {
        matches!(
            self,
            EntityKind::AntCarryingFoodLayingTrail | EntityKind::AntCarryingFood
        )
    }

    pub fn is_marker(self) -> bool {
        matches!(
            self,
            EntityKind::GrassWithFoodMarker | EntityKind::GrassWithFeedeeMarker
        )
    }

    /// Terrain an agent may step onto.
    pub fn is_walkable(self) -> bool {
        matches!(
            self,
            EntityKind::Grass | EntityKind::GrassWithFoodMarker | EntityKind::GrassWithFeedeeMarker
        )
    }

    /// Kinds whose rule is the identity.
    pub fn is_inert(self) -> bool {
        matches!(
            self,
            EntityKind::Grass | EntityKind::Water | EntityKind::Food | EntityKind::Feedee
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Grass => "grass",
            EntityKind::Water => "water",
            EntityKind::Food => "food",
            EntityKind::Feedee => "feedee",
            EntityKind::FedFeedee => "fed feedee",
            EntityKind::GrassWithFoodMarker => "food marker",
            EntityKind::GrassWithFeedeeMarker => "feedee marker",
            EntityKind::Ant => "ant",
            EntityKind::AntCarryingFoodLayingTrail => "ant with food (trail)",
            EntityKind::AntCarryingFood => "ant with food",
            EntityKind::EmptyAntLayingFeedeeTrail => "empty ant (trail)",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What a neighbor search is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    UnmarkedGrass,
    Food,
    NearFood,
    NearFeedee,
    Feedee,
    Walkable,
}

impl Probe {
    #[inline(always)]
    pub fn accepts(self, kind: EntityKind) -> bool {
        match self {
            Probe::UnmarkedGrass => kind == EntityKind::Grass,
            Probe::Food => kind == EntityKind::Food,
            Probe::NearFood => kind == EntityKind::GrassWithFoodMarker,
            Probe::NearFeedee => kind == EntityKind::GrassWithFeedeeMarker,
            Probe::Feedee => kind == EntityKind::Feedee,
            Probe::Walkable => kind.is_walkable(),
        }
    }
}
