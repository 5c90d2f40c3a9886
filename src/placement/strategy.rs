//! Search strategies proposing candidate positions

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::constraint::{all_satisfied, Constraint, PlacementContext};
use super::placeable::Placeable;
use crate::core::types::GridPos;

/// Search algorithm that proposes a world position for an entity
///
/// Returning `None` is an ordinary outcome (crowded or fully-walled
/// world), not an error; the controller queues the entity for retry.
pub trait PlacementStrategy {
    fn find_position(
        &mut self,
        ctx: &PlacementContext<'_>,
        object: &dyn Placeable,
        constraints: &[&dyn Constraint],
    ) -> Option<Vec2>;
}

/// Bounded uniform random sampling over world cells
///
/// Expected O(1) amortized when most cells are free, degrading gracefully
/// to the retry queue when the world is nearly full, instead of paying for
/// a full scan on every placement.
pub struct RandomPlacement {
    max_attempts: u32,
    rng: ChaCha8Rng,
}

impl RandomPlacement {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Deterministic variant for replays and tests
    pub fn seeded(max_attempts: u32, seed: u64) -> Self {
        Self {
            max_attempts,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl PlacementStrategy for RandomPlacement {
    fn find_position(
        &mut self,
        ctx: &PlacementContext<'_>,
        object: &dyn Placeable,
        constraints: &[&dyn Constraint],
    ) -> Option<Vec2> {
        // Preferred position wins as-is when valid; it is not re-centered.
        if let Some(preferred) = object.preferred_position() {
            let cell = ctx.grid.world_to_grid(preferred);
            if all_satisfied(cell, constraints, ctx) {
                return Some(preferred);
            }
        }

        let (width, height) = ctx.grid.dimensions();
        if width <= 0 || height <= 0 {
            return None;
        }

        for _ in 0..self.max_attempts {
            let cell = GridPos::new(self.rng.gen_range(0..width), self.rng.gen_range(0..height));
            if all_satisfied(cell, constraints, ctx) {
                return Some(ctx.grid.grid_to_world(cell));
            }
            tracing::trace!(x = cell.x, y = cell.y, "candidate cell rejected");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::constraint::{NotOccupied, Walkable};
    use crate::placement::placeable::SimplePlaceable;
    use crate::spatial::{GridSystem, SpatialIndex};
    use crate::world::TileMap;
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup(map: TileMap) -> (GridSystem, SpatialIndex) {
        let grid = GridSystem::new(Rc::new(map));
        let index = SpatialIndex::new(grid.cell_size());
        (grid, index)
    }

    #[test]
    fn test_preferred_position_returned_unchanged() {
        let (grid, index) = setup(TileMap::new(10, 10, Vec2::splat(32.0)));
        let ctx = PlacementContext {
            grid: &grid,
            index: &index,
        };

        // Off-center within its cell; must come back exactly as given.
        let preferred = Vec2::new(100.0, 70.0);
        let object = SimplePlaceable::new().with_preferred(preferred);
        let walkable = Walkable;
        let set: [&dyn Constraint; 1] = [&walkable];

        let mut strategy = RandomPlacement::seeded(10, 1);
        assert_eq!(strategy.find_position(&ctx, &object, &set), Some(preferred));
    }

    #[test]
    fn test_invalid_preferred_falls_back_to_sampling() {
        let map = TileMap::new(10, 10, Vec2::splat(1.0));
        map.block(3, 3);
        let (grid, index) = setup(map);
        let ctx = PlacementContext {
            grid: &grid,
            index: &index,
        };

        let object = SimplePlaceable::new().with_preferred(Vec2::new(3.5, 3.5));
        let walkable = Walkable;
        let free = NotOccupied::new();
        let set: [&dyn Constraint; 2] = [&walkable, &free];

        let mut strategy = RandomPlacement::seeded(50, 7);
        let found = strategy.find_position(&ctx, &object, &set).unwrap();
        let cell = grid.world_to_grid(found);
        assert_ne!(cell, GridPos::new(3, 3));
        assert!(grid.is_valid_position(cell));
        // Sampled results land on cell centers.
        assert_eq!(grid.grid_to_world(cell), found);
    }

    #[test]
    fn test_attempts_are_bounded() {
        struct Reject<'a>(&'a Cell<u32>);
        impl Constraint for Reject<'_> {
            fn is_satisfied(&self, _cell: GridPos, _ctx: &PlacementContext<'_>) -> bool {
                self.0.set(self.0.get() + 1);
                false
            }
        }

        let (grid, index) = setup(TileMap::new(10, 10, Vec2::splat(1.0)));
        let ctx = PlacementContext {
            grid: &grid,
            index: &index,
        };

        let evaluations = Cell::new(0);
        let reject = Reject(&evaluations);
        let set: [&dyn Constraint; 1] = [&reject];
        let object = SimplePlaceable::new();

        let mut strategy = RandomPlacement::seeded(17, 3);
        assert_eq!(strategy.find_position(&ctx, &object, &set), None);
        assert_eq!(evaluations.get(), 17);
    }

    #[test]
    fn test_zero_attempts_fail_immediately() {
        let (grid, index) = setup(TileMap::new(10, 10, Vec2::splat(1.0)));
        let ctx = PlacementContext {
            grid: &grid,
            index: &index,
        };

        let walkable = Walkable;
        let set: [&dyn Constraint; 1] = [&walkable];
        let object = SimplePlaceable::new();

        let mut strategy = RandomPlacement::seeded(0, 3);
        assert_eq!(strategy.find_position(&ctx, &object, &set), None);
    }

    #[test]
    fn test_fully_blocked_world_returns_none() {
        let map = TileMap::new(4, 4, Vec2::splat(1.0));
        map.block_rect(0, 0, 4, 4);
        let (grid, index) = setup(map);
        let ctx = PlacementContext {
            grid: &grid,
            index: &index,
        };

        let walkable = Walkable;
        let set: [&dyn Constraint; 1] = [&walkable];
        let object = SimplePlaceable::new();

        let mut strategy = RandomPlacement::seeded(64, 11);
        assert_eq!(strategy.find_position(&ctx, &object, &set), None);
    }
}
