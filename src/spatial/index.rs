//! Sparse hash grid tracking cell occupancy
//!
//! Maps occupied cells to occupant identifiers for O(1)-ish point queries.
//! Each identifier claims exactly one cell; re-inserting moves it.

use ahash::AHashMap;
use glam::Vec2;

use crate::core::types::{GridPos, PlaceableId};

/// Occupancy index over the placement grid
pub struct SpatialIndex {
    cell: Vec2,
    cells: AHashMap<(i32, i32), Vec<PlaceableId>>,
    claims: AHashMap<PlaceableId, (i32, i32)>,
}

impl SpatialIndex {
    pub fn new(cell_size: Vec2) -> Self {
        Self {
            cell: cell_size,
            cells: AHashMap::new(),
            claims: AHashMap::new(),
        }
    }

    #[inline]
    fn cell_coord(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell.x).floor() as i32,
            (pos.y / self.cell.y).floor() as i32,
        )
    }

    /// Record that `id` occupies the cell containing `pos`
    ///
    /// A second insert for the same id overwrites its previous cell.
    pub fn insert(&mut self, id: PlaceableId, pos: Vec2) {
        self.remove(id);
        let coord = self.cell_coord(pos);
        self.cells.entry(coord).or_default().push(id);
        self.claims.insert(id, coord);
    }

    /// Erase any occupancy record for `id`; unknown ids are a no-op
    pub fn remove(&mut self, id: PlaceableId) {
        let Some(coord) = self.claims.remove(&id) else {
            return;
        };
        if let Some(bucket) = self.cells.get_mut(&coord) {
            bucket.retain(|&o| o != id);
            if bucket.is_empty() {
                self.cells.remove(&coord);
            }
        }
    }

    /// Identifiers occupying the cell containing `pos`
    pub fn query_point(&self, pos: Vec2) -> Vec<PlaceableId> {
        let coord = self.cell_coord(pos);
        self.cells.get(&coord).cloned().unwrap_or_default()
    }

    /// Identifiers occupying any cell overlapped by the world-unit rect
    pub fn query_region(&self, x: f32, y: f32, width: f32, height: f32) -> Vec<PlaceableId> {
        let start_x = (x / self.cell.x).floor() as i32;
        let start_y = (y / self.cell.y).floor() as i32;
        let end_x = ((x + width) / self.cell.x).ceil() as i32;
        let end_y = ((y + height) / self.cell.y).ceil() as i32;

        let mut found = Vec::new();
        for cy in start_y..end_y {
            for cx in start_x..end_x {
                if let Some(bucket) = self.cells.get(&(cx, cy)) {
                    found.extend_from_slice(bucket);
                }
            }
        }
        found
    }

    /// Cell currently claimed by `id`, if any
    pub fn cell_of(&self, id: PlaceableId) -> Option<GridPos> {
        self.claims.get(&id).map(|&(x, y)| GridPos::new(x, y))
    }

    /// Empty all occupancy state
    pub fn clear(&mut self) {
        self.cells.clear();
        self.claims.clear();
    }

    /// Number of identifiers currently indexed
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SpatialIndex {
        SpatialIndex::new(Vec2::splat(10.0))
    }

    #[test]
    fn test_insert_and_query_point() {
        let mut idx = index();
        idx.insert(PlaceableId(1), Vec2::new(15.0, 25.0));

        assert_eq!(idx.query_point(Vec2::new(12.0, 22.0)), vec![PlaceableId(1)]);
        assert!(idx.query_point(Vec2::new(5.0, 25.0)).is_empty());
    }

    #[test]
    fn test_reinsert_moves_claim() {
        let mut idx = index();
        idx.insert(PlaceableId(1), Vec2::new(5.0, 5.0));
        idx.insert(PlaceableId(1), Vec2::new(35.0, 5.0));

        assert!(idx.query_point(Vec2::new(5.0, 5.0)).is_empty());
        assert_eq!(idx.query_point(Vec2::new(35.0, 5.0)), vec![PlaceableId(1)]);
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.cell_of(PlaceableId(1)), Some(GridPos::new(3, 0)));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut idx = index();
        idx.remove(PlaceableId(99)); // unknown id is a no-op

        idx.insert(PlaceableId(1), Vec2::new(5.0, 5.0));
        idx.remove(PlaceableId(1));
        idx.remove(PlaceableId(1));

        assert!(idx.query_point(Vec2::new(5.0, 5.0)).is_empty());
        assert!(idx.is_empty());
    }

    #[test]
    fn test_query_region_spans_cells() {
        let mut idx = index();
        idx.insert(PlaceableId(1), Vec2::new(5.0, 5.0)); // cell (0,0)
        idx.insert(PlaceableId(2), Vec2::new(25.0, 5.0)); // cell (2,0)
        idx.insert(PlaceableId(3), Vec2::new(55.0, 55.0)); // cell (5,5)

        let found = idx.query_region(0.0, 0.0, 30.0, 10.0);
        assert_eq!(found.len(), 2);
        assert!(found.contains(&PlaceableId(1)));
        assert!(found.contains(&PlaceableId(2)));
        assert!(!found.contains(&PlaceableId(3)));
    }

    #[test]
    fn test_query_region_within_single_cell() {
        let mut idx = index();
        idx.insert(PlaceableId(1), Vec2::new(5.0, 5.0));

        let found = idx.query_region(4.0, 4.0, 2.0, 2.0);
        assert_eq!(found, vec![PlaceableId(1)]);
    }

    #[test]
    fn test_clear() {
        let mut idx = index();
        idx.insert(PlaceableId(1), Vec2::new(5.0, 5.0));
        idx.insert(PlaceableId(2), Vec2::new(15.0, 5.0));

        idx.clear();
        assert!(idx.is_empty());
        assert!(idx.query_point(Vec2::new(5.0, 5.0)).is_empty());
    }

    #[test]
    fn test_shared_cell_occupants() {
        let mut idx = index();
        idx.insert(PlaceableId(1), Vec2::new(2.0, 2.0));
        idx.insert(PlaceableId(2), Vec2::new(8.0, 8.0)); // same cell (0,0)

        let found = idx.query_point(Vec2::new(5.0, 5.0));
        assert_eq!(found, vec![PlaceableId(1), PlaceableId(2)]);
    }
}
