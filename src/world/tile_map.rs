//! Hash-set blocked tile map
//!
//! A bounded grid where every cell is walkable unless explicitly blocked.
//! Uses a HashSet-based approach for O(1) lookup of blocked cells. Blocking
//! methods take `&self` so hosts can edit terrain through the same shared
//! handle the placement controller reads from.

use ahash::AHashSet;
use glam::Vec2;
use std::cell::RefCell;

use super::WorldModel;

/// Bounded tile map with blockable cells
#[derive(Debug)]
pub struct TileMap {
    width: i32,
    height: i32,
    tile: Vec2,
    blocked: RefCell<AHashSet<(i32, i32)>>,
}

impl TileMap {
    /// Create a map of `width` x `height` cells, each `tile` world units
    pub fn new(width: i32, height: i32, tile: Vec2) -> Self {
        Self {
            width,
            height,
            tile,
            blocked: RefCell::new(AHashSet::new()),
        }
    }

    /// Width in cells
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Block a cell at grid coordinates
    pub fn block(&self, x: i32, y: i32) {
        self.blocked.borrow_mut().insert((x, y));
    }

    /// Unblock a cell at grid coordinates
    pub fn unblock(&self, x: i32, y: i32) {
        self.blocked.borrow_mut().remove(&(x, y));
    }

    /// Check if a cell is blocked
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        self.blocked.borrow().contains(&(x, y))
    }

    /// Block a rectangle of cells, `w` x `h` from `(x, y)`
    pub fn block_rect(&self, x: i32, y: i32, w: i32, h: i32) {
        for cy in y..y + h {
            for cx in x..x + w {
                self.block(cx, cy);
            }
        }
    }

    /// Block the outermost ring of cells
    pub fn block_border(&self) {
        for x in 0..self.width {
            self.block(x, 0);
            self.block(x, self.height - 1);
        }
        for y in 0..self.height {
            self.block(0, y);
            self.block(self.width - 1, y);
        }
    }

    /// Remove all blocked cells
    pub fn clear_blocked(&self) {
        self.blocked.borrow_mut().clear();
    }
}

impl WorldModel for TileMap {
    fn is_walkable(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        !self.is_blocked(x, y)
    }

    fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32 * self.tile.x, self.height as f32 * self.tile.y)
    }

    fn tile_size(&self) -> Vec2 {
        self.tile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_unblock() {
        let map = TileMap::new(8, 8, Vec2::splat(1.0));

        map.block(3, 4);
        assert!(map.is_blocked(3, 4));
        assert!(!map.is_walkable(3, 4));

        map.unblock(3, 4);
        assert!(map.is_walkable(3, 4));
    }

    #[test]
    fn test_out_of_bounds_never_walkable() {
        let map = TileMap::new(4, 4, Vec2::splat(1.0));
        assert!(!map.is_walkable(-1, 0));
        assert!(!map.is_walkable(0, -1));
        assert!(!map.is_walkable(4, 0));
        assert!(!map.is_walkable(0, 4));
        assert!(map.is_walkable(3, 3));
    }

    #[test]
    fn test_block_rect() {
        let map = TileMap::new(10, 10, Vec2::splat(1.0));
        map.block_rect(2, 2, 3, 2);

        assert!(map.is_blocked(2, 2));
        assert!(map.is_blocked(4, 3));
        assert!(!map.is_blocked(5, 2));
        assert!(!map.is_blocked(2, 4));
    }

    #[test]
    fn test_block_border() {
        let map = TileMap::new(5, 5, Vec2::splat(1.0));
        map.block_border();

        assert!(map.is_blocked(0, 0));
        assert!(map.is_blocked(4, 2));
        assert!(map.is_blocked(2, 4));
        assert!(!map.is_blocked(2, 2));
    }

    #[test]
    fn test_world_size() {
        let map = TileMap::new(10, 6, Vec2::new(32.0, 16.0));
        assert_eq!(map.size(), Vec2::new(320.0, 96.0));
        assert_eq!(map.tile_size(), Vec2::new(32.0, 16.0));
    }
}
