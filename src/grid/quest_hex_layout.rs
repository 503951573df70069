use bevy::prelude::*;
use hexx::{Hex, HexLayout, shapes};

use crate::grid::GridConfig;

/// One region slot of the static journey layout.
#[derive(Clone, Debug)]
pub struct RegionSlot {
    /// Display name of the journey zone.
    pub name: String,
    /// Center hex of the region cluster.
    pub center: Hex,
    /// Member hexes in `shapes::hexagon` order.
    pub members: Vec<Hex>,
}

/// Static journey layout: hex layout plus region clusters along a zig-zag path.
///
/// Region clusters are hexagons of `region_radius` rings. Consecutive centers
/// sit exactly `2r + 1` apart so clusters touch without overlapping.
#[derive(Clone, Debug)]
pub struct QuestHexLayout {
    layout: HexLayout,
    unit_corners: [Vec2; 6],
    spacing: f32,
    regions: Vec<RegionSlot>,
}

impl QuestHexLayout {
    /// Builds the layout from grid settings.
    pub fn from_config(cfg: &GridConfig) -> Self {
        let layout = HexLayout {
            scale: Vec2::splat(cfg.tile_spacing),
            ..default()
        };
        let unit_layout = HexLayout {
            scale: Vec2::splat(1.0),
            ..default()
        };
        let unit_corners: [Vec2; 6] =
            std::array::from_fn(|i| unit_layout.center_aligned_hex_corners()[i]);

        let regions = cfg
            .regions
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let center = region_center(i, cfg.region_radius);
                RegionSlot {
                    name: name.clone(),
                    center,
                    members: shapes::hexagon(center, cfg.region_radius).collect(),
                }
            })
            .collect();

        Self {
            layout,
            unit_corners,
            spacing: cfg.tile_spacing,
            regions,
        }
    }

    /// Region slots in journey order.
    pub fn regions(&self) -> &[RegionSlot] {
        &self.regions
    }

    /// World-space position of a hex center on the ground plane (y = 0).
    pub fn hex_to_world(&self, hex: Hex) -> Vec3 {
        let p = self.layout.hex_to_world_pos(hex);
        Vec3::new(p.x, 0.0, p.y)
    }

    /// Hex coordinate under a ground-plane position.
    pub fn world_to_hex(&self, pos: Vec3) -> Hex {
        self.layout.world_pos_to_hex(Vec2::new(pos.x, pos.z))
    }

    /// Corner positions of a hex outline, lifted by `lift` above the ground.
    pub fn corners(&self, hex: Hex, lift: f32) -> [Vec3; 6] {
        let center = self.hex_to_world(hex);
        std::array::from_fn(|i| {
            let c = self.unit_corners[i] * self.spacing;
            Vec3::new(center.x + c.x, lift, center.z + c.y)
        })
    }

    /// Distance between adjacent hex centers.
    pub fn spacing(&self) -> f32 {
        self.spacing
    }
}

/// Center of the `index`-th region: alternating steps `(2r+1, -r)` and `(r+1, r)`.
fn region_center(index: usize, radius: u32) -> Hex {
    let r = radius as i32;
    let a = (index as i32 + 1) / 2;
    let b = index as i32 / 2;
    Hex::new(a * (2 * r + 1) + b * (r + 1), -a * r + b * r)
}
