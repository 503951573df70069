use bevy::camera::Viewport;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::RenderLoopConfig;
use super::entities::{RenderLoop, ViewportResized};
use crate::camera::{MainCamera, MinimapCamera};
use crate::math;
use crate::view_state::MapViewState;

/// Run condition: the render loop is started.
pub fn loop_running(render_loop: Res<RenderLoop>) -> bool {
    render_loop.is_running()
}

/// Both scene cameras, updated together on every tick.
#[derive(SystemParam)]
pub struct MapCameras<'w, 's> {
    main: Query<'w, 's, (&'static mut Transform, &'static mut Projection), With<MainCamera>>,
    minimap: Query<'w, 's, &'static mut Camera, With<MinimapCamera>>,
}

/// One fixed tick: advance the camera flight, then re-measure the window and
/// re-layout the cameras when its size changed.
pub fn tick(
    time: Res<Time>,
    cfg: Res<RenderLoopConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut render_loop: ResMut<RenderLoop>,
    mut view: ResMut<MapViewState>,
    mut cameras: MapCameras,
    mut resized: MessageWriter<ViewportResized>,
) {
    render_loop.record_tick();

    // cameras spawn one frame after the view state
    let Ok((mut transform, mut projection)) = cameras.main.single_mut() else {
        return;
    };
    let Ok(mut minimap) = cameras.minimap.single_mut() else {
        return;
    };

    let logical = windows.single().map_or(Vec2::ZERO, |w| w.size());
    let scale = windows.single().map_or(1.0, |w| w.scale_factor());
    let measured = math::physical_size(logical, scale);

    let report = view.tick(time.delta(), measured);

    if view.camera.is_animating() || report.camera_landed {
        *transform = view.camera.transform();
    }
    if report.camera_landed {
        debug!("camera landed at {}", view.camera.position());
    }

    let Some(size) = report.resized else {
        return;
    };
    if let Projection::Perspective(perspective) = &mut *projection {
        perspective.aspect_ratio = math::aspect_ratio(size);
    }
    match math::minimap_viewport(size, cfg.minimap_fraction, cfg.minimap_max_px, cfg.minimap_padding) {
        Some((position, side)) => {
            minimap.viewport = Some(Viewport {
                physical_position: position,
                physical_size: side,
                ..default()
            });
            minimap.is_active = true;
        }
        None => minimap.is_active = false,
    }
    resized.write(ViewportResized {
        physical: size,
        logical,
    });
    debug!("viewport resized to {size}");
}

/// Stops the loop when the app exits.
pub fn stop_on_exit(mut exits: MessageReader<AppExit>, mut render_loop: ResMut<RenderLoop>) {
    if exits.read().count() > 0 {
        render_loop.stop();
    }
}
