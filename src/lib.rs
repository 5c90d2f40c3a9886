//! Tile-grid object placement
//!
//! Positions discrete entities ("placeables") onto a walkable tile grid:
//! coordinate conversion, a spatial occupancy index, composable validity
//! constraints, pluggable search strategies with bounded retry, and
//! serialization of placement state for save/restore. The tile/world model
//! itself is an external collaborator behind the read-only
//! [`world::WorldModel`] trait.

pub mod core;
pub mod placement;
pub mod spatial;
pub mod world;
