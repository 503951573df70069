use bevy::prelude::*;
#[cfg(feature = "native")]
use bevy::remote::{RemotePlugin, http::RemoteHttpPlugin};
use bevy_inspector_egui::quick::WorldInspectorPlugin;

use quest_map::MapState;
use quest_map::camera::{CameraConfig, CameraPlugin};
use quest_map::grid::{GridConfig, GridPlugin};
use quest_map::interaction::{InteractionConfig, InteractionPlugin};
use quest_map::quest::{QuestData, QuestLoadError};
use quest_map::render_loop::{RenderLoopConfig, RenderLoopPlugin};
use quest_map::services::ServicesPlugin;
use quest_map::view_state::ViewStatePlugin;

#[cfg(feature = "native")]
#[derive(clap::Parser, Debug)]
#[command(about = "Interactive 3D quest map")]
struct Cli {
    /// Quest snapshot (JSON). The demo quest is shown when omitted.
    #[arg(long)]
    missions: Option<std::path::PathBuf>,
    /// Overrides the hero the snapshot belongs to.
    #[arg(long)]
    hero: Option<String>,
}

#[cfg(feature = "native")]
fn initial_quest() -> Result<QuestData, QuestLoadError> {
    use clap::Parser;

    let cli = Cli::parse();
    let mut quest = match &cli.missions {
        Some(path) => QuestData::load(path)?,
        None => QuestData::demo(),
    };
    if let Some(hero) = cli.hero {
        quest.hero_id = hero;
    }
    Ok(quest)
}

#[cfg(not(feature = "native"))]
fn initial_quest() -> Result<QuestData, QuestLoadError> {
    Ok(QuestData::demo())
}

fn main() -> Result<(), QuestLoadError> {
    let quest = initial_quest()?;
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Quest Map".into(),
            ..default()
        }),
        ..default()
    }))
    .register_type::<MapState>()
    .init_state::<MapState>()
    .insert_resource(quest)
    .add_plugins(bevy_egui::EguiPlugin::default())
    .add_plugins(ServicesPlugin)
    .add_plugins(GridPlugin(GridConfig::default()))
    .add_plugins(CameraPlugin(CameraConfig::default()))
    .add_plugins(InteractionPlugin(InteractionConfig::default()))
    .add_plugins(RenderLoopPlugin(RenderLoopConfig::default()))
    .add_plugins(ViewStatePlugin)
    .add_systems(Update, toggle_inspector)
    .add_plugins(WorldInspectorPlugin::new().run_if(in_state(MapState::Inspecting)));

    #[cfg(feature = "native")]
    app.add_plugins(RemotePlugin::default())
        .add_plugins(RemoteHttpPlugin::default());

    app.run();
    Ok(())
}

fn toggle_inspector(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<MapState>>,
    mut next: ResMut<NextState<MapState>>,
) {
    if keys.just_pressed(KeyCode::Tab) {
        let new_state = match state.get() {
            MapState::Running => MapState::Inspecting,
            MapState::Inspecting => MapState::Running,
            MapState::Loading => return,
        };
        next.set(new_state);
    }
}
