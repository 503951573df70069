//! Scene cameras: animated main perspective view and static minimap.
//!
//! The main camera is driven by a [`CameraRig`] owned by
//! [`MapViewState`](crate::view_state::MapViewState); the render loop applies
//! the rig to the entity every tick.

mod entities;
mod systems;

pub use entities::{CameraMotion, CameraRig, MainCamera, MinimapCamera};

use std::time::Duration;

use bevy::prelude::*;

use crate::grid::QuestGrid;
use crate::view_state::MapViewState;

/// Per-plugin configuration for camera framing and flights.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct CameraConfig {
    /// Direction from a framed tile toward the camera (normalized on use).
    pub view_direction: Vec3,
    /// Distance of the starting ("zoomed out") pose from the anchor tile.
    pub home_distance: f32,
    /// Distance of the camera from a region's anchor tile when framing it.
    pub region_distance: f32,
    /// Duration of a camera flight (seconds).
    pub move_duration: f32,
    /// Vertical field of view of the main camera (degrees).
    pub fov_degrees: f32,
    /// Bloom post-processing intensity.
    pub bloom_intensity: f32,
    /// Height of the overhead minimap camera above the ground.
    pub minimap_height: f32,
    /// Background of the minimap inset.
    pub minimap_clear_color: Color,
    /// Background of the main view.
    pub clear_color: Color,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            view_direction: Vec3::new(0.0, 1.0, 0.8),
            home_distance: 30.0,
            region_distance: 12.0,
            move_duration: 1.0,
            fov_degrees: 45.0,
            bloom_intensity: 0.2,
            minimap_height: 60.0,
            minimap_clear_color: Color::srgb(0.0, 0.0, 0.0),
            clear_color: Color::srgb(0.01, 0.01, 0.02),
        }
    }
}

impl CameraConfig {
    fn direction(&self) -> Vec3 {
        self.view_direction.try_normalize().unwrap_or(Vec3::Y)
    }

    /// Starting ("zoomed out") pose over the grid's anchor tile.
    pub fn home_for(&self, grid: &QuestGrid) -> Vec3 {
        let anchor = grid
            .anchor()
            .and_then(|id| grid.tile(id))
            .map_or(Vec3::ZERO, |t| t.world);
        anchor + self.direction() * self.home_distance
    }

    /// Builds the main camera rig framing the grid's anchor tile.
    pub fn rig_for(&self, grid: &QuestGrid) -> CameraRig {
        let dir = self.direction();
        CameraRig::new(
            self.home_for(grid),
            -dir * self.region_distance,
            dir * self.region_distance,
            Duration::from_secs_f32(self.move_duration.max(0.0)),
        )
    }
}

/// Camera plugin: spawns both cameras once the map is ready.
pub struct CameraPlugin(pub CameraConfig);

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CameraConfig>()
            .register_type::<MainCamera>()
            .register_type::<MinimapCamera>()
            .insert_resource(self.0.clone())
            .insert_resource(ClearColor(self.0.clear_color))
            .add_systems(
                Update,
                systems::spawn_cameras.run_if(resource_added::<MapViewState>),
            );
    }
}
