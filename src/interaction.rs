//! Pointer and keyboard input: hover highlight, popup, selection, details panel.

mod popup;
mod systems;

pub use popup::{PopupAnchor, PopupChange, PopupState, PopupTiming};
pub use systems::{DetailsPanelLayout, PointerOverUi};

use std::time::Duration;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::MapState;
use crate::view_state::MapViewState;

/// Popup timing, labels and panel layout.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct InteractionConfig {
    /// Hover time before the popup appears (ms).
    pub show_delay_ms: u64,
    /// Time before the popup disappears after the pointer leaves a tile (ms).
    pub hide_delay_ms: u64,
    /// Pointer travel that repositions a visible popup (logical px).
    pub reposition_threshold_px: f32,
    /// Popup text for tiles whose mission is still locked.
    pub locked_label: String,
    /// Popup offset from the pointer.
    pub popup_offset: Vec2,
    /// Details panel width relative to the window width.
    pub details_width_fraction: f32,
    /// Details panel inset from the top-left corner.
    pub details_margin: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            show_delay_ms: 100,
            hide_delay_ms: 250,
            reposition_threshold_px: 20.0,
            locked_label: "Locked mission".into(),
            popup_offset: Vec2::new(14.0, 14.0),
            details_width_fraction: 0.28,
            details_margin: 12.0,
        }
    }
}

impl InteractionConfig {
    /// Popup debounce settings as durations.
    pub fn popup_timing(&self) -> PopupTiming {
        PopupTiming {
            show_delay: Duration::from_millis(self.show_delay_ms),
            hide_delay: Duration::from_millis(self.hide_delay_ms),
            reposition_threshold: self.reposition_threshold_px,
        }
    }
}

/// Interaction plugin: input handling while running, egui overlays always.
pub struct InteractionPlugin(pub InteractionConfig);

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<InteractionConfig>()
            .insert_resource(self.0.clone())
            .init_resource::<DetailsPanelLayout>()
            .init_resource::<PointerOverUi>()
            .add_systems(
                Update,
                (
                    systems::track_pointer,
                    systems::handle_click,
                    systems::handle_escape,
                    systems::tick_popup,
                )
                    .chain()
                    .run_if(in_state(MapState::Running))
                    .run_if(resource_exists::<MapViewState>),
            )
            .add_systems(Update, systems::follow_viewport)
            .add_systems(
                EguiPrimaryContextPass,
                (
                    (systems::draw_popup, systems::draw_details_panel)
                        .run_if(resource_exists::<MapViewState>),
                    systems::record_pointer_over_ui,
                )
                    .chain(),
            );
    }
}
