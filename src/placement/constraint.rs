//! Validity constraints over candidate cells

use crate::core::types::{GridPos, PlaceableId};
use crate::spatial::{GridSystem, SpatialIndex};

/// Read-only placement state handed to constraints and strategies
pub struct PlacementContext<'a> {
    pub grid: &'a GridSystem,
    pub index: &'a SpatialIndex,
}

/// Pure predicate a candidate cell must satisfy
pub trait Constraint {
    fn is_satisfied(&self, cell: GridPos, ctx: &PlacementContext<'_>) -> bool;
}

/// Evaluate a constraint set in order with short-circuit AND
pub fn all_satisfied(cell: GridPos, constraints: &[&dyn Constraint], ctx: &PlacementContext<'_>) -> bool {
    constraints.iter().all(|c| c.is_satisfied(cell, ctx))
}

/// Satisfied iff the cell is inside world bounds and walkable
pub struct Walkable;

impl Constraint for Walkable {
    fn is_satisfied(&self, cell: GridPos, ctx: &PlacementContext<'_>) -> bool {
        ctx.grid.is_valid_position(cell)
    }
}

/// Satisfied iff the cell has no occupant other than the excluded ids
///
/// An entity excludes its own id so its prior occupancy doesn't block
/// re-validating its current cell.
pub struct NotOccupied {
    excluded: Vec<PlaceableId>,
}

impl NotOccupied {
    pub fn new() -> Self {
        Self { excluded: Vec::new() }
    }

    pub fn excluding(ids: impl IntoIterator<Item = PlaceableId>) -> Self {
        Self {
            excluded: ids.into_iter().collect(),
        }
    }
}

impl Default for NotOccupied {
    fn default() -> Self {
        Self::new()
    }
}

impl Constraint for NotOccupied {
    fn is_satisfied(&self, cell: GridPos, ctx: &PlacementContext<'_>) -> bool {
        let center = ctx.grid.grid_to_world(cell);
        ctx.index
            .query_point(center)
            .iter()
            .all(|id| self.excluded.contains(id))
    }
}
