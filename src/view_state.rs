//! The single owned map view: grid, camera rig, popup and viewport tracking.
//!
//! Input systems translate raw events into calls on [`MapViewState`] and
//! forward the returned [`MapEffect`]s to the outbound services.

use std::time::Duration;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::MapState;
use crate::camera::{CameraConfig, CameraRig, MainCamera, MinimapCamera};
use crate::grid::{GridConfig, MapRoot, QuestGrid, TileHit, TileId, TileMaterials};
use crate::interaction::{InteractionConfig, PopupState};
use crate::quest::{MissionId, QuestData};
use crate::render_loop::{RenderLoop, RenderLoopConfig, ViewportTracker};

/// Side effects of an input event, dispatched by the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum MapEffect {
    /// The camera started a flight to this position.
    CameraMoved(Vec3),
    /// The selected mission changed (`None` for a tile without an unlocked mission).
    SelectMission(Option<MissionId>),
    /// Fetch the history of an unlocked mission.
    LoadMessageHistory(MissionId),
    /// Open the details panel on this tile.
    ShowDetails(TileId),
    /// Close the details panel.
    HideDetails,
}

/// What one render tick changed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickReport {
    /// The camera flight landed during this tick.
    pub camera_landed: bool,
    /// New (clamped, physical) viewport size, when it changed.
    pub resized: Option<UVec2>,
}

/// Owns every piece of mutable map state.
#[derive(Resource, Debug)]
pub struct MapViewState {
    /// Tiles, regions, highlight and selection.
    pub grid: QuestGrid,
    /// Main camera pose and flight.
    pub camera: CameraRig,
    /// Hover popup.
    pub popup: PopupState,
    /// Last applied viewport size.
    pub viewport: ViewportTracker,
    details: Option<TileId>,
}

impl MapViewState {
    /// View with the details panel closed.
    pub fn new(grid: QuestGrid, camera: CameraRig, popup: PopupState, viewport: ViewportTracker) -> Self {
        Self {
            grid,
            camera,
            popup,
            viewport,
            details: None,
        }
    }

    /// Tile shown in the details panel.
    pub fn details(&self) -> Option<TileId> {
        self.details
    }

    /// Updates the hover highlight and the popup.
    ///
    /// `pointer` is `None` when the cursor left the window.
    pub fn on_pointer_move(&mut self, hits: &[TileHit], pointer: Option<Vec2>) -> Option<TileId> {
        let hovered = match pointer {
            Some(_) => self.grid.do_highlight(hits),
            None => {
                self.grid.clear_highlight();
                None
            }
        };
        if let Some(change) = self.popup.hover(hovered.zip(pointer)) {
            debug!("popup {change:?}");
        }
        hovered
    }

    /// Selects the highlighted tile, framing its region when it was not
    /// already selected. Clicking empty space clears the selection.
    pub fn on_click(&mut self) -> Vec<MapEffect> {
        let Some(tile_id) = self.grid.highlighted() else {
            let mut effects = Vec::new();
            if self.grid.selected().is_some() {
                self.grid.clear_selection();
                effects.push(MapEffect::SelectMission(None));
            }
            if self.details.take().is_some() {
                effects.push(MapEffect::HideDetails);
            }
            return effects;
        };

        if !self.grid.select_tile(tile_id) {
            return Vec::new();
        }
        let mut effects = Vec::new();

        if let Some(tile) = self.grid.tile(tile_id)
            && let Some(region) = self.grid.region(tile.region)
            && !region.selected
        {
            let region_id = tile.region;
            let anchor = self.grid.tile(region.lowest_tile).map_or(tile.world, |t| t.world);
            let end = anchor + self.camera.frame_offset();
            self.grid.select_region(region_id);
            self.camera.move_to(end);
            effects.push(MapEffect::CameraMoved(end));
        }

        let mission = self.grid.tile(tile_id).and_then(|t| t.content.unlocked_mission());
        effects.push(MapEffect::SelectMission(mission));
        if let Some(mission) = mission {
            effects.push(MapEffect::LoadMessageHistory(mission));
        }
        self.details = Some(tile_id);
        effects.push(MapEffect::ShowDetails(tile_id));

        info!("selected tile {} ({:?})", tile_id.0, mission);
        effects
    }

    /// Flies back to the starting pose and releases the framed region.
    pub fn on_escape(&mut self) -> Vec<MapEffect> {
        self.grid.deselect_region();
        self.camera.zoom_out();
        if let Some(change) = self.popup.dismiss() {
            debug!("popup {change:?}");
        }
        vec![MapEffect::CameraMoved(self.camera.home())]
    }

    /// Rebinds a new quest snapshot and re-anchors the camera's home pose
    /// on the new current mission.
    pub fn apply_quest(&mut self, quest: &QuestData, camera_cfg: &CameraConfig) {
        self.grid
            .apply_missions(&quest.missions, quest.current_mission);
        self.camera.set_home(camera_cfg.home_for(&self.grid));
    }

    /// Advances the camera flight and re-measures the viewport.
    pub fn tick(&mut self, dt: Duration, measured: UVec2) -> TickReport {
        TickReport {
            camera_landed: self.camera.advance(dt),
            resized: self.viewport.measure(measured),
        }
    }
}

/// Plugin configs the map view is assembled from.
#[derive(SystemParam)]
pub struct MapConfigs<'w> {
    /// Region layout.
    pub grid: Res<'w, GridConfig>,
    /// Camera framing.
    pub camera: Res<'w, CameraConfig>,
    /// Popup timing.
    pub interaction: Res<'w, InteractionConfig>,
    /// Viewport clamping.
    pub render_loop: Res<'w, RenderLoopConfig>,
}

/// Builds the map once a primary window and quest data both exist.
pub fn await_readiness(
    mut commands: Commands,
    windows: Query<(), With<PrimaryWindow>>,
    quest: Option<Res<QuestData>>,
    cfg: MapConfigs,
    mut render_loop: ResMut<RenderLoop>,
    mut next_state: ResMut<NextState<MapState>>,
) {
    if windows.is_empty() {
        return;
    }
    let Some(quest) = quest else {
        return;
    };

    let grid = QuestGrid::build(&cfg.grid, &quest.missions, quest.current_mission);
    let camera = cfg.camera.rig_for(&grid);
    let view = MapViewState::new(
        grid,
        camera,
        PopupState::new(cfg.interaction.popup_timing()),
        ViewportTracker::new(cfg.render_loop.min_height),
    );
    info!(
        "map ready: {} tiles, {} missions for hero {}",
        view.grid.tiles().len(),
        quest.missions.len(),
        quest.hero_id
    );
    commands.insert_resource(view);
    render_loop.start();
    next_state.set(MapState::Running);
}

/// Entities the map spawns once it is ready.
type MapEntities = Or<(With<MapRoot>, With<MainCamera>, With<MinimapCamera>)>;

/// Stops the render loop and releases the map when the app returns to
/// [`MapState::Loading`].
pub fn teardown_map(
    mut commands: Commands,
    view: Option<Res<MapViewState>>,
    mut render_loop: ResMut<RenderLoop>,
    spawned: Query<Entity, MapEntities>,
) {
    if view.is_none() {
        return;
    }
    render_loop.stop();
    for entity in &spawned {
        commands.entity(entity).despawn();
    }
    commands.remove_resource::<MapViewState>();
    commands.remove_resource::<TileMaterials>();
    info!("map torn down");
}

/// The quest snapshot was withdrawn; wait for a new one.
pub fn unload_without_quest(mut next_state: ResMut<NextState<MapState>>) {
    warn!("quest data removed; unloading map");
    next_state.set(MapState::Loading);
}

/// Readiness gate: builds [`MapViewState`] while in [`MapState::Loading`]
/// and tears it down when the app falls back to it.
pub struct ViewStatePlugin;

impl Plugin for ViewStatePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, await_readiness.run_if(in_state(MapState::Loading)))
            .add_systems(OnEnter(MapState::Loading), teardown_map)
            .add_systems(
                Update,
                unload_without_quest
                    .run_if(not(in_state(MapState::Loading)))
                    .run_if(not(resource_exists::<QuestData>)),
            );
    }
}
