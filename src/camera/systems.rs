use bevy::camera::{ClearColorConfig, ScalingMode};
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::post_process::bloom::{Bloom, BloomCompositeMode};
use bevy::prelude::*;
use bevy::render::view::Hdr;

use super::CameraConfig;
use super::entities::{MainCamera, MinimapCamera};
use crate::view_state::MapViewState;

/// Spawns the main perspective camera and the overhead minimap camera.
///
/// The minimap starts inactive; the render loop activates it once the first
/// viewport measurement gives it a sub-viewport.
pub fn spawn_cameras(mut commands: Commands, cfg: Res<CameraConfig>, view: Res<MapViewState>) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera3d::default(),
        Camera {
            order: 0,
            ..default()
        },
        Hdr,
        Tonemapping::TonyMcMapface,
        Bloom {
            intensity: cfg.bloom_intensity,
            composite_mode: BloomCompositeMode::Additive,
            ..Bloom::NATURAL
        },
        Projection::from(PerspectiveProjection {
            fov: cfg.fov_degrees.to_radians(),
            ..default()
        }),
        view.camera.transform(),
        MainCamera,
    ));

    let (center, extent) = view
        .grid
        .bounds()
        .map_or((Vec2::ZERO, 10.0), |(min, max)| {
            let size = max - min;
            ((min + max) / 2.0, size.x.max(size.y))
        });

    commands.spawn((
        Name::new("MinimapCamera"),
        Camera3d::default(),
        Camera {
            order: 1,
            is_active: false,
            clear_color: ClearColorConfig::Custom(cfg.minimap_clear_color),
            ..default()
        },
        Projection::from(OrthographicProjection {
            scaling_mode: ScalingMode::Fixed {
                width: extent,
                height: extent,
            },
            near: -1000.0,
            far: 1000.0,
            ..OrthographicProjection::default_3d()
        }),
        Transform::from_xyz(center.x, cfg.minimap_height, center.y)
            .looking_at(Vec3::new(center.x, 0.0, center.y), Vec3::NEG_Z),
        MinimapCamera,
    ));

    debug!("cameras spawned; minimap extent {extent:.1}");
}
