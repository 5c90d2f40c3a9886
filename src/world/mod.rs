//! World model interface and a concrete tile map

mod tile_map;

pub use tile_map::TileMap;

use glam::Vec2;

/// Read-only view of the tile/world model
///
/// The placement system never mutates the world; it only asks which cells
/// can be stood on and how big the world is. Hosts implement this over
/// whatever terrain representation they already have.
pub trait WorldModel {
    /// Whether the cell at grid coordinates can be occupied
    fn is_walkable(&self, x: i32, y: i32) -> bool;

    /// World size in world units
    fn size(&self) -> Vec2;

    /// Fixed tile dimensions in world units
    fn tile_size(&self) -> Vec2;
}
