use bevy::asset::RenderAssetUsages;
use bevy::mesh::Indices;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use hexx::{HexLayout, PlaneMeshBuilder};

use super::GridConfig;
use super::entities::{BoundaryWall, MapRoot, MinimapPlane, TileMaterials, TileMesh};
use crate::camera::CameraConfig;
use crate::quest::QuestData;
use crate::view_state::MapViewState;

// ── Startup ─────────────────────────────────────────────────────────

/// Spawns tile meshes, the ground/minimap plane, and the boundary walls.
pub fn spawn_map_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<GridConfig>,
    view: Res<MapViewState>,
) {
    let p = &cfg.palette;
    let mut glow = |color: Color| {
        materials.add(StandardMaterial {
            base_color: color,
            emissive: LinearRgba::from(color) * 2.0,
            unlit: true,
            ..default()
        })
    };
    let tile_materials = TileMaterials {
        locked: glow(p.locked),
        unlocked_empty: glow(p.unlocked_empty),
        incomplete: glow(p.incomplete),
        complete: glow(p.complete),
        highlighted: glow(p.highlighted),
        selected: glow(p.selected),
    };

    let unit_layout = HexLayout {
        scale: Vec2::splat(1.0),
        ..default()
    };
    let hex_mesh_info = PlaneMeshBuilder::new(&unit_layout).build();
    let hex_mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, hex_mesh_info.vertices)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, hex_mesh_info.normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, hex_mesh_info.uvs)
    .with_inserted_indices(Indices::U16(hex_mesh_info.indices));
    let hex_mesh_handle = meshes.add(hex_mesh);

    let grid = &view.grid;
    let map_entity = commands
        .spawn((
            MapRoot,
            Name::new("QuestMap"),
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    let tile_size = cfg.tile_spacing * cfg.tile_scale;
    for (i, tile) in grid.tiles().iter().enumerate() {
        let id = super::TileId(i);
        let material = tile_materials.for_tile(
            tile.state,
            grid.highlighted() == Some(id),
            grid.selected() == Some(id),
        );
        let entity = commands
            .spawn((
                TileMesh(id),
                Name::new(format!("Tile({},{})", tile.hex.x, tile.hex.y)),
                Mesh3d(hex_mesh_handle.clone()),
                MeshMaterial3d(material),
                Transform::from_translation(tile.world)
                    .with_scale(Vec3::new(tile_size, 1.0, tile_size)),
            ))
            .id();
        commands.entity(map_entity).add_child(entity);
    }

    if let Some((min, max)) = grid.bounds() {
        let size = max - min;
        let center = (min + max) / 2.0;
        let ground_material = materials.add(StandardMaterial {
            base_color: p.ground,
            unlit: true,
            ..default()
        });
        let wall_material = materials.add(StandardMaterial {
            base_color: p.wall,
            emissive: LinearRgba::from(p.wall),
            unlit: true,
            cull_mode: None,
            ..default()
        });

        let ground = commands
            .spawn((
                MinimapPlane,
                Name::new("MinimapPlane"),
                Mesh3d(meshes.add(Plane3d::default().mesh().size(size.x, size.y))),
                MeshMaterial3d(ground_material),
                Transform::from_xyz(center.x, -0.02, center.y),
            ))
            .id();
        commands.entity(map_entity).add_child(ground);

        let half_h = cfg.wall_height / 2.0;
        let walls = [
            (
                "BackWall",
                Plane3d::new(Vec3::Z, Vec2::new(size.x / 2.0, half_h)),
                Vec3::new(center.x, half_h, min.y),
            ),
            (
                "LeftWall",
                Plane3d::new(Vec3::X, Vec2::new(half_h, size.y / 2.0)),
                Vec3::new(min.x, half_h, center.y),
            ),
            (
                "RightWall",
                Plane3d::new(Vec3::NEG_X, Vec2::new(half_h, size.y / 2.0)),
                Vec3::new(max.x, half_h, center.y),
            ),
        ];
        for (name, plane, pos) in walls {
            let wall = commands
                .spawn((
                    BoundaryWall,
                    Name::new(name),
                    Mesh3d(meshes.add(plane)),
                    MeshMaterial3d(wall_material.clone()),
                    Transform::from_translation(pos),
                ))
                .id();
            commands.entity(map_entity).add_child(wall);
        }
    }

    commands.insert_resource(tile_materials);
    info!("spawned quest map with {} tiles", grid.tiles().len());
}

// ── Update ──────────────────────────────────────────────────────────

/// Rebinds missions when the hosting application replaces the quest snapshot.
pub fn sync_missions(
    quest: Res<QuestData>,
    camera_cfg: Res<CameraConfig>,
    mut view: ResMut<MapViewState>,
) {
    view.apply_quest(&quest, &camera_cfg);
}

/// Reassigns tile materials whenever the grid revision moves.
pub fn paint_tiles(
    view: Res<MapViewState>,
    materials: Option<Res<TileMaterials>>,
    mut tiles: Query<(&TileMesh, &mut MeshMaterial3d<StandardMaterial>)>,
    mut painted: Local<Option<u64>>,
) {
    let Some(materials) = materials else { return };
    let grid = &view.grid;
    if *painted == Some(grid.revision()) {
        return;
    }
    for (mesh, mut material) in &mut tiles {
        let Some(tile) = grid.tile(mesh.0) else {
            continue;
        };
        material.0 = materials.for_tile(
            tile.state,
            grid.highlighted() == Some(mesh.0),
            grid.selected() == Some(mesh.0),
        );
    }
    *painted = Some(grid.revision());
}

/// Outlines every tile of the selected region.
pub fn draw_region_outline(view: Res<MapViewState>, cfg: Res<GridConfig>, mut gizmos: Gizmos) {
    let grid = &view.grid;
    let Some(region) = grid.selected_region().and_then(|r| grid.region(r)) else {
        return;
    };
    for &id in &region.members {
        let Some(tile) = grid.tile(id) else { continue };
        let corners = grid.layout().corners(tile.hex, cfg.outline_lift);
        gizmos.linestrip(
            corners.iter().chain(corners.first()).copied(),
            cfg.palette.region_outline,
        );
    }
}
