//! Fixed-rate tick driving camera flights and viewport tracking.

mod entities;
mod systems;

pub use entities::{RenderLoop, ViewportResized, ViewportTracker};

use bevy::prelude::*;

use crate::view_state::MapViewState;

/// Tick rate and minimap placement.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct RenderLoopConfig {
    /// Ticks per second of the fixed schedule.
    pub tick_hz: f64,
    /// Minimap side as a fraction of the shorter window side.
    pub minimap_fraction: f32,
    /// Upper bound of the minimap side (physical pixels).
    pub minimap_max_px: u32,
    /// Minimap inset from the bottom-right corner (physical pixels).
    pub minimap_padding: u32,
    /// Measured heights below this are clamped up to it.
    pub min_height: u32,
}

impl Default for RenderLoopConfig {
    fn default() -> Self {
        Self {
            tick_hz: 30.0,
            minimap_fraction: 0.25,
            minimap_max_px: 1000,
            minimap_padding: 16,
            min_height: 240,
        }
    }
}

/// Render-loop plugin: ticks in `FixedUpdate` while the loop is running.
pub struct RenderLoopPlugin(pub RenderLoopConfig);

impl Plugin for RenderLoopPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<RenderLoopConfig>()
            .insert_resource(self.0.clone())
            .insert_resource(Time::<Fixed>::from_hz(self.0.tick_hz))
            .init_resource::<RenderLoop>()
            .add_message::<ViewportResized>()
            .add_systems(
                FixedUpdate,
                systems::tick
                    .run_if(systems::loop_running)
                    .run_if(resource_exists::<MapViewState>),
            )
            .add_systems(Last, systems::stop_on_exit);
    }
}
