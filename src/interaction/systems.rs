use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{EguiContext, PrimaryEguiContext, egui};

use super::InteractionConfig;
use crate::camera::MainCamera;
use crate::grid::{TileHit, TileMesh, UnlockState};
use crate::render_loop::ViewportResized;
use crate::services::Outbound;
use crate::view_state::MapViewState;

/// Placement of the details panel; follows the viewport size.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct DetailsPanelLayout {
    /// Top-left corner (logical px).
    pub position: Vec2,
    /// Width and height (logical px).
    pub size: Vec2,
}

impl DetailsPanelLayout {
    /// Panel anchored top-left, `width_fraction` of the window wide and as
    /// tall as the window allows.
    pub fn for_window(logical: Vec2, width_fraction: f32, margin: f32) -> Self {
        Self {
            position: Vec2::splat(margin),
            size: Vec2::new(
                (logical.x * width_fraction).max(120.0),
                (logical.y - 2.0 * margin).max(80.0),
            ),
        }
    }
}

/// Whether egui owns the pointer (it hovers a panel or drags a widget).
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerOverUi(pub bool);

/// Records whether the last egui pass claimed the pointer.
pub fn record_pointer_over_ui(
    mut egui_ctx: Query<&mut EguiContext, With<PrimaryEguiContext>>,
    mut over_ui: ResMut<PointerOverUi>,
) {
    let Ok(mut ctx) = egui_ctx.single_mut() else {
        return;
    };
    let ctx = ctx.get_mut();
    let claimed = ctx.is_pointer_over_area() || ctx.wants_pointer_input();
    if over_ui.0 != claimed {
        over_ui.0 = claimed;
    }
}

/// Ray-casts the cursor against tile meshes and updates the hover state.
///
/// A pointer over egui counts as over nothing.
pub fn track_pointer(
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_q: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    tiles: Query<&TileMesh>,
    over_ui: Res<PointerOverUi>,
    mut ray_cast: MeshRayCast,
    mut view: ResMut<MapViewState>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position().filter(|_| !over_ui.0) else {
        view.on_pointer_move(&[], None);
        return;
    };
    let Ok((camera, cam_gt)) = camera_q.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(cam_gt, cursor) else {
        return;
    };

    let filter = |entity: Entity| tiles.contains(entity);
    let settings = MeshRayCastSettings::default().with_filter(&filter);
    let hits: Vec<TileHit> = ray_cast
        .cast_ray(ray, &settings)
        .iter()
        .filter_map(|(entity, hit)| {
            tiles.get(*entity).ok().map(|mesh| TileHit {
                tile: mesh.0,
                distance: hit.distance,
            })
        })
        .collect();
    view.on_pointer_move(&hits, Some(cursor));
}

/// Selects the highlighted tile on left click. Clicks on egui are ignored.
pub fn handle_click(
    buttons: Res<ButtonInput<MouseButton>>,
    over_ui: Res<PointerOverUi>,
    mut view: ResMut<MapViewState>,
    mut outbound: Outbound,
) {
    if over_ui.0 || !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let effects = view.on_click();
    outbound.dispatch(&effects);
}

/// Zooms out on Escape.
pub fn handle_escape(
    keys: Res<ButtonInput<KeyCode>>,
    mut view: ResMut<MapViewState>,
    mut outbound: Outbound,
) {
    if !keys.just_pressed(KeyCode::Escape) {
        return;
    }
    let effects = view.on_escape();
    outbound.dispatch(&effects);
}

/// Fires due popup timers.
pub fn tick_popup(time: Res<Time>, mut view: ResMut<MapViewState>) {
    if let Some(change) = view.popup.tick(time.delta()) {
        debug!("popup {change:?}");
    }
}

/// Re-lays out the details panel after a resize.
pub fn follow_viewport(
    mut resized: MessageReader<ViewportResized>,
    cfg: Res<InteractionConfig>,
    mut layout: ResMut<DetailsPanelLayout>,
) {
    if let Some(last) = resized.read().last() {
        *layout = DetailsPanelLayout::for_window(last.logical, cfg.details_width_fraction, cfg.details_margin);
    }
}

/// Draws the hover popup next to the pointer.
pub fn draw_popup(
    mut egui_ctx: Query<&mut EguiContext, With<PrimaryEguiContext>>,
    view: Res<MapViewState>,
    cfg: Res<InteractionConfig>,
) {
    let Some(anchor) = view.popup.visible() else {
        return;
    };
    let Ok(mut ctx) = egui_ctx.single_mut() else {
        return;
    };
    let label = view
        .grid
        .display_name(anchor.tile)
        .unwrap_or(cfg.locked_label.as_str());
    let pos = anchor.position + cfg.popup_offset;

    egui::Area::new(egui::Id::new("tile_popup"))
        .fixed_pos(egui::pos2(pos.x, pos.y))
        .interactable(false)
        .show(ctx.get_mut(), |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(label);
            });
        });
}

/// Draws the details panel for the selected tile.
pub fn draw_details_panel(
    mut egui_ctx: Query<&mut EguiContext, With<PrimaryEguiContext>>,
    view: Res<MapViewState>,
    layout: Res<DetailsPanelLayout>,
    cfg: Res<InteractionConfig>,
) {
    let Some(tile_id) = view.details() else {
        return;
    };
    let Some(tile) = view.grid.tile(tile_id) else {
        return;
    };
    let Ok(mut ctx) = egui_ctx.single_mut() else {
        return;
    };
    let region = view.grid.find_region(tile_id).map_or("", |r| r.name.as_str());
    let title = view
        .grid
        .display_name(tile_id)
        .unwrap_or(cfg.locked_label.as_str());
    let mission = tile
        .content
        .unlocked_mission()
        .and_then(|_| view.grid.mission(tile_id));

    egui::Window::new("Mission")
        .id(egui::Id::new("mission_details"))
        .collapsible(false)
        .resizable(false)
        .fixed_pos(egui::pos2(layout.position.x, layout.position.y))
        .fixed_size(egui::vec2(layout.size.x, layout.size.y))
        .show(ctx.get_mut(), |ui| {
            ui.heading(title);
            ui.label(format!("Region: {region}"));
            ui.label(state_label(tile.state));
            let Some(mission) = mission else {
                return;
            };
            ui.separator();
            ui.label(format!("Kind: {:?}", mission.kind));
            if let Some(date) = mission.completed_on {
                ui.label(format!("Completed on {date}"));
            }
            if let Some(progress) = mission.course_progress {
                ui.add(egui::ProgressBar::new(progress.fraction()).show_percentage());
            }
        });
}

fn state_label(state: UnlockState) -> &'static str {
    match state {
        UnlockState::Locked => "Locked",
        UnlockState::UnlockedEmpty => "Open ground",
        UnlockState::MissionIncomplete => "In progress",
        UnlockState::MissionComplete => "Complete",
    }
}
