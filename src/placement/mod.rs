//! Object placement onto the walkable tile grid
//!
//! The [`PlacementController`] is the only entry point for callers; it
//! composes the grid, the occupancy index, constraint assembly, search
//! strategies, the retry queue, and snapshot save/restore.

mod constraint;
mod controller;
mod placeable;
mod snapshot;
mod strategy;

pub use constraint::{all_satisfied, Constraint, NotOccupied, PlacementContext, Walkable};
pub use controller::PlacementController;
pub use placeable::{Placeable, PlaceableHandle, SimplePlaceable};
pub use snapshot::PlacementSnapshot;
pub use strategy::{PlacementStrategy, RandomPlacement};
