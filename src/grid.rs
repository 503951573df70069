//! Quest grid: tile/region model, mission binding, scene props.
//!
//! [`QuestGrid`] is plain data and unit-tested on its own. The systems in
//! this module spawn the hex meshes and keep their materials in sync with it.

mod entities;
mod quest_grid;
mod quest_hex_layout;
mod systems;

pub use entities::{
    BoundaryWall, MapRoot, MinimapPlane, Region, RegionId, Tile, TileContent, TileHit, TileId, TileMaterials,
    TileMesh, UnlockState,
};
pub use quest_grid::QuestGrid;
pub use quest_hex_layout::{QuestHexLayout, RegionSlot};

use bevy::prelude::*;

use crate::quest::QuestData;
use crate::view_state::MapViewState;

/// Static layout and look of the quest map.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct GridConfig {
    /// Region names in journey order; one hexagonal cluster each.
    pub regions: Vec<String>,
    /// Rings per region cluster (radius 1 gives 7 tiles).
    pub region_radius: u32,
    /// Distance in world-units from a hex center to its corners.
    pub tile_spacing: f32,
    /// Visual tile size relative to `tile_spacing`; below 1 leaves gaps.
    pub tile_scale: f32,
    /// Height of the three boundary walls.
    pub wall_height: f32,
    /// Height of the selected-region outline above the tiles.
    pub outline_lift: f32,
    /// Colors per tile state and for scene props.
    pub palette: TilePalette,
}

/// Colors for tile states and scene props.
#[derive(Clone, Debug, Reflect)]
pub struct TilePalette {
    /// Tiles not reached yet.
    pub locked: Color,
    /// Reached tiles without a mission.
    pub unlocked_empty: Color,
    /// Reached, unfinished missions.
    pub incomplete: Color,
    /// Completed missions.
    pub complete: Color,
    /// Hovered tile.
    pub highlighted: Color,
    /// Clicked tile.
    pub selected: Color,
    /// Gizmo outline around the selected region.
    pub region_outline: Color,
    /// Ground/minimap plane.
    pub ground: Color,
    /// Boundary walls.
    pub wall: Color,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            regions: ["Foundations", "Practice", "Collaboration", "Leadership", "Mastery"]
                .into_iter()
                .map(String::from)
                .collect(),
            region_radius: 1,
            tile_spacing: 2.0,
            tile_scale: 0.92,
            wall_height: 6.0,
            outline_lift: 0.05,
            palette: TilePalette {
                locked: Color::srgb(0.06, 0.06, 0.09),
                unlocked_empty: Color::srgb(0.12, 0.16, 0.22),
                incomplete: Color::srgb(0.95, 0.65, 0.1),
                complete: Color::srgb(0.1, 0.8, 0.45),
                highlighted: Color::srgb(0.3, 0.75, 1.0),
                selected: Color::srgb(1.0, 0.3, 0.6),
                region_outline: Color::srgb(0.0, 0.9, 1.0),
                ground: Color::srgb(0.02, 0.03, 0.05),
                wall: Color::srgb(0.04, 0.05, 0.09),
            },
        }
    }
}

/// Grid plugin: scene spawning once the map is ready, material and mission sync.
pub struct GridPlugin(pub GridConfig);

impl Plugin for GridPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<GridConfig>()
            .insert_resource(self.0.clone())
            .add_systems(
                Update,
                systems::spawn_map_scene.run_if(resource_added::<MapViewState>),
            )
            .add_systems(
                Update,
                (
                    systems::sync_missions.run_if(resource_exists_and_changed::<QuestData>),
                    systems::paint_tiles,
                    systems::draw_region_outline,
                )
                    .chain()
                    .run_if(resource_exists::<MapViewState>),
            );
    }
}
