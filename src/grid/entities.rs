use bevy::prelude::*;
use hexx::Hex;

use crate::quest::MissionId;

/// Index of a tile inside its [`QuestGrid`](super::QuestGrid).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub usize);

/// Index of a region inside its [`QuestGrid`](super::QuestGrid).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub usize);

/// What a tile is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileContent {
    /// No mission maps onto this tile.
    Empty,
    /// Bound to a mission the hero has not reached yet.
    Locked {
        /// Bound mission.
        mission: MissionId,
    },
    /// Bound to a reached mission; its name is visible.
    Unlocked {
        /// Bound mission.
        mission: MissionId,
    },
}

impl TileContent {
    /// The bound mission, locked or not.
    pub fn mission(&self) -> Option<MissionId> {
        match *self {
            Self::Empty => None,
            Self::Locked { mission } | Self::Unlocked { mission } => Some(mission),
        }
    }

    /// The bound mission only when it has been unlocked.
    pub fn unlocked_mission(&self) -> Option<MissionId> {
        match *self {
            Self::Unlocked { mission } => Some(mission),
            _ => None,
        }
    }
}

/// Visibility/progress state driving a tile's look.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum UnlockState {
    /// Not reached yet.
    #[default]
    Locked,
    /// Reached, but no mission sits here.
    UnlockedEmpty,
    /// Reached mission without a completion date.
    MissionIncomplete,
    /// Completed mission.
    MissionComplete,
}

/// One hex cell of the quest map.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    /// Axial coordinate.
    pub hex: Hex,
    /// World position derived from `hex`; never changes after the build.
    pub world: Vec3,
    /// Owning region.
    pub region: RegionId,
    /// Mission binding.
    pub content: TileContent,
    /// Derived unlock state.
    pub state: UnlockState,
}

/// A named cluster of tiles; the camera frames the map one region at a time.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    /// Display name.
    pub name: String,
    /// Member tiles, center first.
    pub members: Vec<TileId>,
    /// Whether the camera currently frames this region.
    pub selected: bool,
    /// Member nearest to the viewer (greatest z); anchors region framing.
    pub lowest_tile: TileId,
}

/// A ray-cast hit against a tile mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileHit {
    /// Tile behind the hit mesh.
    pub tile: TileId,
    /// Distance along the ray.
    pub distance: f32,
}

/// Parent of every spawned map entity.
#[derive(Component, Debug)]
pub struct MapRoot;

/// Links a spawned hex mesh to its tile.
#[derive(Component, Clone, Copy, Debug)]
pub struct TileMesh(pub TileId);

/// Marker on the ground plane under the grid (also the minimap backdrop).
#[derive(Component)]
pub struct MinimapPlane;

/// Marker on the three boundary walls.
#[derive(Component)]
pub struct BoundaryWall;

/// Material handles per tile look.
#[derive(Resource)]
pub struct TileMaterials {
    /// [`UnlockState::Locked`].
    pub locked: Handle<StandardMaterial>,
    /// [`UnlockState::UnlockedEmpty`].
    pub unlocked_empty: Handle<StandardMaterial>,
    /// [`UnlockState::MissionIncomplete`].
    pub incomplete: Handle<StandardMaterial>,
    /// [`UnlockState::MissionComplete`].
    pub complete: Handle<StandardMaterial>,
    /// Hover overlay.
    pub highlighted: Handle<StandardMaterial>,
    /// Selection overlay.
    pub selected: Handle<StandardMaterial>,
}

impl TileMaterials {
    /// Picks the material for a tile; selection wins over highlight.
    pub fn for_tile(&self, state: UnlockState, highlighted: bool, selected: bool) -> Handle<StandardMaterial> {
        if selected {
            return self.selected.clone();
        }
        if highlighted {
            return self.highlighted.clone();
        }
        match state {
            UnlockState::Locked => self.locked.clone(),
            UnlockState::UnlockedEmpty => self.unlocked_empty.clone(),
            UnlockState::MissionIncomplete => self.incomplete.clone(),
            UnlockState::MissionComplete => self.complete.clone(),
        }
    }
}
