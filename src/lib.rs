#![warn(missing_docs)]
//! Interactive 3D quest map.
//!
//! Missions of a learning quest are laid out on hexagonal region clusters.
//! Hovering a tile highlights it and shows a popup; clicking selects it,
//! flies the camera to its region and announces the mission to the host
//! application.

pub mod camera;
pub mod grid;
pub mod interaction;
pub mod math;
pub mod quest;
pub mod render_loop;
pub mod services;
pub mod view_state;

use bevy::prelude::*;

/// Map lifecycle, used for system scheduling.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
pub enum MapState {
    /// Waiting for the primary window and quest data.
    #[default]
    Loading,
    /// Map is interactive.
    Running,
    /// World inspector open (Tab to toggle); map input paused.
    Inspecting,
}
