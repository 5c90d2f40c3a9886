//! Spatial grid conversion and occupancy indexing

mod grid;
mod index;

pub use grid::GridSystem;
pub use index::SpatialIndex;
