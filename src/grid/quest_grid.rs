use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use hexx::Hex;

use super::GridConfig;
use super::entities::{Region, RegionId, Tile, TileContent, TileHit, TileId, UnlockState};
use super::quest_hex_layout::QuestHexLayout;
use crate::quest::{Mission, MissionId};

/// Tile/region graph of the quest map plus its interaction state.
///
/// Tiles are laid out once in [`QuestGrid::build`]; later mission updates only
/// rebind missions and recompute unlock states.
#[derive(Clone, Debug)]
pub struct QuestGrid {
    layout: QuestHexLayout,
    tiles: Vec<Tile>,
    index: HashMap<Hex, TileId>,
    regions: Vec<Region>,
    missions: HashMap<MissionId, Mission>,
    anchor: Option<TileId>,
    highlighted: Option<TileId>,
    selected: Option<TileId>,
    selected_region: Option<RegionId>,
    revision: u64,
}

impl QuestGrid {
    /// Lays out every region from `cfg` and binds `missions` in journey order.
    ///
    /// Never fails: an empty mission list yields a grid of empty tiles.
    pub fn build(cfg: &GridConfig, missions: &[Mission], current: Option<MissionId>) -> Self {
        let layout = QuestHexLayout::from_config(cfg);

        let mut tiles = Vec::new();
        let mut index = HashMap::new();
        let mut regions = Vec::new();

        for (r, slot) in layout.regions().iter().enumerate() {
            let region_id = RegionId(r);
            let mut members = Vec::with_capacity(slot.members.len());
            for &hex in &slot.members {
                let id = TileId(tiles.len());
                tiles.push(Tile {
                    hex,
                    world: layout.hex_to_world(hex),
                    region: region_id,
                    content: TileContent::Empty,
                    state: UnlockState::Locked,
                });
                index.insert(hex, id);
                members.push(id);
            }
            let lowest_tile = lowest_member(&tiles, &members);
            regions.push(Region {
                name: slot.name.clone(),
                members,
                selected: false,
                lowest_tile,
            });
        }

        let mut grid = Self {
            layout,
            tiles,
            index,
            regions,
            missions: HashMap::new(),
            anchor: None,
            highlighted: None,
            selected: None,
            selected_region: None,
            revision: 0,
        };
        grid.apply_missions(missions, current);
        grid
    }

    /// Rebinds missions to tiles and recomputes unlock states.
    ///
    /// Tile positions, highlight, and selection are left untouched.
    pub fn apply_missions(&mut self, missions: &[Mission], current: Option<MissionId>) {
        let mut ordered: Vec<&Mission> = missions.iter().collect();
        ordered.sort_by_key(|m| (m.sort_order, m.id));

        if ordered.len() > self.tiles.len() {
            warn!(
                "quest has {} missions but the map only has {} tiles; dropping the rest",
                ordered.len(),
                self.tiles.len()
            );
            ordered.truncate(self.tiles.len());
        }

        let current_index = current.and_then(|id| ordered.iter().position(|m| m.id == id));

        let mut reached = vec![false; self.regions.len()];
        if let Some(first) = reached.first_mut() {
            *first = true;
        }

        for (i, tile) in self.tiles.iter_mut().enumerate() {
            let Some(mission) = ordered.get(i) else {
                tile.content = TileContent::Empty;
                continue;
            };
            let unlocked = mission.is_complete() || current_index.is_some_and(|c| i <= c);
            if unlocked {
                tile.content = TileContent::Unlocked { mission: mission.id };
                tile.state = if mission.is_complete() {
                    UnlockState::MissionComplete
                } else {
                    UnlockState::MissionIncomplete
                };
                reached[tile.region.0] = true;
            } else {
                tile.content = TileContent::Locked { mission: mission.id };
                tile.state = UnlockState::Locked;
            }
        }

        for tile in &mut self.tiles {
            if tile.content == TileContent::Empty {
                tile.state = if reached[tile.region.0] {
                    UnlockState::UnlockedEmpty
                } else {
                    UnlockState::Locked
                };
            }
        }

        self.anchor = current_index
            .map(TileId)
            .or_else(|| (!self.tiles.is_empty()).then_some(TileId(0)));
        self.missions = ordered.into_iter().map(|m| (m.id, m.clone())).collect();
        self.revision += 1;

        debug!(
            "quest grid: {} tiles, {} missions bound, anchor {:?}",
            self.tiles.len(),
            self.missions.len(),
            self.anchor
        );
    }

    // ── Lookup ─────────────────────────────────────────────────────

    /// All tiles in journey order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// All regions in journey order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Tile by id.
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.0)
    }

    /// Region by id.
    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.0)
    }

    /// Tile at an axial coordinate, if the map covers it.
    pub fn tile_at(&self, hex: Hex) -> Option<TileId> {
        self.index.get(&hex).copied()
    }

    /// The region owning `tile`, in O(1).
    pub fn find_region(&self, tile: TileId) -> Option<&Region> {
        let region = self.tiles.get(tile.0)?.region;
        self.regions.get(region.0)
    }

    /// Mission bound to a tile (locked or not).
    pub fn mission(&self, tile: TileId) -> Option<&Mission> {
        let id = self.tile(tile)?.content.mission()?;
        self.missions.get(&id)
    }

    /// Mission name once the tile is unlocked; `None` for locked or empty tiles.
    pub fn display_name(&self, tile: TileId) -> Option<&str> {
        let id = self.tile(tile)?.content.unlocked_mission()?;
        self.missions.get(&id).map(|m| m.name.as_str())
    }

    /// Tile framing the default camera view (current mission, else the first tile).
    pub fn anchor(&self) -> Option<TileId> {
        self.anchor
    }

    /// Hovered tile.
    pub fn highlighted(&self) -> Option<TileId> {
        self.highlighted
    }

    /// Clicked tile.
    pub fn selected(&self) -> Option<TileId> {
        self.selected
    }

    /// Region the camera frames, if any.
    pub fn selected_region(&self) -> Option<RegionId> {
        self.selected_region
    }

    /// Bumped on every change that affects how tiles are drawn.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Underlying hex layout.
    pub fn layout(&self) -> &QuestHexLayout {
        &self.layout
    }

    /// Ground-plane extents `(min, max)` covering every tile plus one spacing margin.
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let first = self.tiles.first()?;
        let start = Vec2::new(first.world.x, first.world.z);
        let (min, max) = self.tiles.iter().fold((start, start), |(lo, hi), t| {
            let p = Vec2::new(t.world.x, t.world.z);
            (lo.min(p), hi.max(p))
        });
        let margin = Vec2::splat(self.layout.spacing());
        Some((min - margin, max + margin))
    }

    // ── Highlight / selection ──────────────────────────────────────

    /// Highlights the nearest hit tile, or clears the highlight when nothing was hit.
    pub fn do_highlight(&mut self, hits: &[TileHit]) -> Option<TileId> {
        let nearest = hits
            .iter()
            .filter(|h| h.tile.0 < self.tiles.len())
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
            .map(|h| h.tile);
        if self.highlighted != nearest {
            self.highlighted = nearest;
            self.revision += 1;
        }
        nearest
    }

    /// Drops the hover highlight; no-op when nothing is highlighted.
    pub fn clear_highlight(&mut self) {
        if self.highlighted.take().is_some() {
            self.revision += 1;
        }
    }

    /// Marks `tile` selected. Returns `false` for unknown tiles.
    pub fn select_tile(&mut self, tile: TileId) -> bool {
        if tile.0 >= self.tiles.len() {
            return false;
        }
        if self.selected != Some(tile) {
            self.selected = Some(tile);
            self.revision += 1;
        }
        true
    }

    /// Drops the tile selection; no-op when nothing is selected.
    pub fn clear_selection(&mut self) {
        if self.selected.take().is_some() {
            self.revision += 1;
        }
    }

    /// Selects `region`, deselecting the previously selected one.
    pub fn select_region(&mut self, region: RegionId) {
        if region.0 >= self.regions.len() {
            return;
        }
        self.deselect_region();
        self.regions[region.0].selected = true;
        self.selected_region = Some(region);
        self.revision += 1;
    }

    /// Releases the selected region, if any.
    pub fn deselect_region(&mut self) {
        if let Some(prev) = self.selected_region.take() {
            self.regions[prev.0].selected = false;
            self.revision += 1;
        }
    }

    /// Camera position framing `tile` from `offset`.
    pub fn camera_position_for_tile(tile: &Tile, offset: Vec3) -> Vec3 {
        tile.world + offset
    }
}

/// Member with the greatest world z; ties go to the smallest x.
fn lowest_member(tiles: &[Tile], members: &[TileId]) -> TileId {
    members
        .iter()
        .copied()
        .max_by(|a, b| {
            let (ta, tb) = (&tiles[a.0].world, &tiles[b.0].world);
            ta.z.total_cmp(&tb.z).then(tb.x.total_cmp(&ta.x))
        })
        .unwrap_or(TileId(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn mission(id: u32, completed: bool) -> Mission {
        Mission {
            id: MissionId(id),
            name: format!("Mission {id}"),
            kind: Default::default(),
            sort_order: id as i32,
            completed_on: completed.then(|| NaiveDate::from_ymd_opt(2026, 1, id).unwrap()),
            course_progress: None,
        }
    }

    fn five_missions() -> Vec<Mission> {
        (1..=5).map(|i| mission(i, i <= 3)).collect()
    }

    fn grid(missions: &[Mission], current: Option<u32>) -> QuestGrid {
        QuestGrid::build(&GridConfig::default(), missions, current.map(MissionId))
    }

    fn count(grid: &QuestGrid, state: UnlockState) -> usize {
        grid.tiles().iter().filter(|t| t.state == state).count()
    }

    // ── build ──────────────────────────────────────────────────────

    #[test]
    fn build_is_deterministic() {
        let missions = five_missions();
        let a = grid(&missions, Some(3));
        let b = grid(&missions, Some(3));
        assert_eq!(a.tiles(), b.tiles());
        assert_eq!(a.anchor(), b.anchor());
    }

    #[test]
    fn five_missions_three_completed() {
        let g = grid(&five_missions(), Some(3));
        assert_eq!(count(&g, UnlockState::MissionComplete), 3);
        let anchor = g.anchor().unwrap();
        assert_eq!(g.tile(anchor).unwrap().content.mission(), Some(MissionId(3)));
    }

    #[test]
    fn missions_after_current_stay_locked() {
        let missions: Vec<_> = (1..=5).map(|i| mission(i, i == 1)).collect();
        let g = grid(&missions, Some(2));
        let states: Vec<_> = g.tiles()[..5].iter().map(|t| t.state).collect();
        assert_eq!(
            states,
            vec![
                UnlockState::MissionComplete,
                UnlockState::MissionIncomplete,
                UnlockState::Locked,
                UnlockState::Locked,
                UnlockState::Locked,
            ]
        );
        assert_eq!(g.display_name(TileId(1)), Some("Mission 2"));
        assert_eq!(g.display_name(TileId(2)), None);
        assert_eq!(g.mission(TileId(2)).map(|m| m.id), Some(MissionId(3)));
    }

    #[test]
    fn missions_are_bound_in_sort_order() {
        let mut missions = five_missions();
        missions.reverse();
        let g = grid(&missions, Some(3));
        let bound: Vec<_> = g.tiles()[..5].iter().filter_map(|t| t.content.mission()).collect();
        assert_eq!(bound, (1..=5).map(MissionId).collect::<Vec<_>>());
    }

    #[test]
    fn empty_missions_build_navigable_grid() {
        let g = grid(&[], None);
        assert!(!g.tiles().is_empty());
        assert!(g.tiles().iter().all(|t| t.content == TileContent::Empty));
        assert_eq!(g.anchor(), Some(TileId(0)));
        // first region is always reached
        let first = &g.regions()[0];
        assert!(first
            .members
            .iter()
            .all(|&id| g.tile(id).unwrap().state == UnlockState::UnlockedEmpty));
    }

    #[test]
    fn empty_tiles_in_unreached_regions_are_locked() {
        let g = grid(&[mission(1, true)], None);
        let last = g.regions().last().unwrap();
        assert!(last
            .members
            .iter()
            .all(|&id| g.tile(id).unwrap().state == UnlockState::Locked));
    }

    #[test]
    fn missions_beyond_capacity_are_dropped() {
        let cfg = GridConfig::default();
        let capacity = grid(&[], None).tiles().len();
        let missions: Vec<_> = (1..=capacity as u32 + 4).map(|i| mission(i, false)).collect();
        let g = QuestGrid::build(&cfg, &missions, None);
        assert_eq!(g.tiles().len(), capacity);
        assert!(g.tiles().iter().all(|t| t.content.mission().is_some()));
    }

    #[test]
    fn unknown_current_mission_falls_back_to_first_tile() {
        let g = grid(&five_missions(), Some(99));
        assert_eq!(g.anchor(), Some(TileId(0)));
    }

    #[test]
    fn apply_missions_keeps_positions() {
        let mut g = grid(&five_missions(), Some(3));
        let before: Vec<Vec3> = g.tiles().iter().map(|t| t.world).collect();
        let rev = g.revision();
        g.apply_missions(&[mission(1, false)], Some(MissionId(1)));
        let after: Vec<Vec3> = g.tiles().iter().map(|t| t.world).collect();
        assert_eq!(before, after);
        assert!(g.revision() > rev);
        assert_eq!(count(&g, UnlockState::MissionComplete), 0);
        assert_eq!(g.tiles()[0].state, UnlockState::MissionIncomplete);
    }

    #[test]
    fn world_position_is_function_of_coordinate() {
        let g = grid(&five_missions(), Some(3));
        for t in g.tiles() {
            assert_eq!(t.world, g.layout().hex_to_world(t.hex));
            assert_eq!(g.tile_at(t.hex).and_then(|id| g.tile(id)), Some(t));
        }
    }

    // ── regions ────────────────────────────────────────────────────

    #[test]
    fn every_tile_belongs_to_exactly_one_region() {
        let g = grid(&five_missions(), Some(3));
        for (i, _) in g.tiles().iter().enumerate() {
            let id = TileId(i);
            let owner = g.find_region(id).unwrap();
            assert!(owner.members.contains(&id));
            let owners = g.regions().iter().filter(|r| r.members.contains(&id)).count();
            assert_eq!(owners, 1);
        }
    }

    #[test]
    fn lowest_tile_has_greatest_z() {
        let g = grid(&[], None);
        for region in g.regions() {
            let lowest = g.tile(region.lowest_tile).unwrap().world.z;
            for &m in &region.members {
                assert!(g.tile(m).unwrap().world.z <= lowest + 1e-5);
            }
        }
    }

    #[test]
    fn region_selection_is_exclusive() {
        let mut g = grid(&[], None);
        g.select_region(RegionId(0));
        g.select_region(RegionId(1));
        assert!(!g.regions()[0].selected);
        assert!(g.regions()[1].selected);
        assert_eq!(g.selected_region(), Some(RegionId(1)));
        assert_eq!(g.regions().iter().filter(|r| r.selected).count(), 1);
    }

    #[test]
    fn deselect_region_is_idempotent() {
        let mut g = grid(&[], None);
        g.deselect_region();
        g.select_region(RegionId(2));
        g.deselect_region();
        g.deselect_region();
        assert!(g.regions().iter().all(|r| !r.selected));
        assert_eq!(g.selected_region(), None);
    }

    // ── highlight ──────────────────────────────────────────────────

    #[test]
    fn nearest_hit_wins() {
        let mut g = grid(&[], None);
        let hits = [
            TileHit { tile: TileId(4), distance: 2.0 },
            TileHit { tile: TileId(7), distance: 5.0 },
        ];
        assert_eq!(g.do_highlight(&hits), Some(TileId(4)));
        assert_eq!(g.highlighted(), Some(TileId(4)));

        let reversed = [hits[1], hits[0]];
        assert_eq!(g.do_highlight(&reversed), Some(TileId(4)));
    }

    #[test]
    fn highlight_is_idempotent() {
        let mut g = grid(&[], None);
        let hits = [TileHit { tile: TileId(2), distance: 1.0 }];
        g.do_highlight(&hits);
        let rev = g.revision();
        g.do_highlight(&hits);
        g.do_highlight(&hits);
        assert_eq!(g.revision(), rev);
        assert_eq!(g.highlighted(), Some(TileId(2)));
    }

    #[test]
    fn miss_clears_highlight() {
        let mut g = grid(&[], None);
        g.do_highlight(&[TileHit { tile: TileId(1), distance: 1.0 }]);
        assert_eq!(g.do_highlight(&[]), None);
        assert_eq!(g.highlighted(), None);
    }

    #[test]
    fn unknown_tiles_are_ignored() {
        let mut g = grid(&[], None);
        let hits = [
            TileHit { tile: TileId(100_000), distance: 0.5 },
            TileHit { tile: TileId(3), distance: 4.0 },
        ];
        assert_eq!(g.do_highlight(&hits), Some(TileId(3)));
    }

    #[test]
    fn clears_are_idempotent() {
        let mut g = grid(&[], None);
        g.clear_highlight();
        g.clear_selection();
        let rev = g.revision();
        g.clear_highlight();
        g.clear_selection();
        assert_eq!(g.revision(), rev);

        assert!(g.select_tile(TileId(1)));
        g.clear_selection();
        g.clear_selection();
        assert_eq!(g.selected(), None);
        assert!(!g.select_tile(TileId(100_000)));
    }

    // ── camera anchor ──────────────────────────────────────────────

    #[test]
    fn camera_position_offsets_tile() {
        let g = grid(&[], None);
        let tile = g.tile(TileId(3)).unwrap();
        let offset = Vec3::new(0.0, 10.0, 8.0);
        assert_eq!(QuestGrid::camera_position_for_tile(tile, offset), tile.world + offset);
    }

    #[test]
    fn bounds_cover_all_tiles() {
        let g = grid(&[], None);
        let (min, max) = g.bounds().unwrap();
        for t in g.tiles() {
            assert!(t.world.x > min.x && t.world.x < max.x);
            assert!(t.world.z > min.y && t.world.z < max.y);
        }
    }
}
