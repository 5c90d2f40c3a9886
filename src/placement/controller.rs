//! Placement orchestration
//!
//! Owns identifier assignment, constraint assembly, strategy invocation,
//! the retry queue, area invalidation, and snapshot save/restore. Designed
//! for single-threaded frame/turn-based invocation; the validate-then-commit
//! sequence in `place_object` is not atomic across threads.

use ahash::AHashMap;
use glam::Vec2;
use std::collections::VecDeque;
use std::rc::Rc;

use super::constraint::{all_satisfied, Constraint, NotOccupied, PlacementContext, Walkable};
use super::placeable::{handle_key, PlaceableHandle, SimplePlaceable};
use super::snapshot::PlacementSnapshot;
use super::strategy::{PlacementStrategy, RandomPlacement};
use crate::core::config::PlacementConfig;
use crate::core::error::{PlacementError, Result};
use crate::core::types::{GridPos, PlaceableId};
use crate::spatial::{GridSystem, SpatialIndex};
use crate::world::WorldModel;

/// Orchestrates placement of registered objects onto the grid
pub struct PlacementController {
    grid: GridSystem,
    index: SpatialIndex,
    objects: AHashMap<PlaceableId, PlaceableHandle>,
    ids: AHashMap<usize, PlaceableId>,
    order: Vec<PlaceableId>,
    pending: VecDeque<PlaceableId>,
    default_strategy: Box<dyn PlacementStrategy>,
    next_id: u64,
}

impl PlacementController {
    pub fn new(world: Rc<dyn WorldModel>) -> Self {
        Self::with_config(world, &PlacementConfig::default())
    }

    pub fn with_config(world: Rc<dyn WorldModel>, config: &PlacementConfig) -> Self {
        let grid = GridSystem::new(world);
        let index = SpatialIndex::new(grid.cell_size());
        let default_strategy: Box<dyn PlacementStrategy> = match config.seed {
            Some(seed) => Box::new(RandomPlacement::seeded(config.random_attempts, seed)),
            None => Box::new(RandomPlacement::new(config.random_attempts)),
        };
        Self {
            grid,
            index,
            objects: AHashMap::new(),
            ids: AHashMap::new(),
            order: Vec::new(),
            pending: VecDeque::new(),
            default_strategy,
            next_id: 0,
        }
    }

    /// Replace the strategy used by `place_object` and its callers
    pub fn set_default_strategy(&mut self, strategy: Box<dyn PlacementStrategy>) {
        self.default_strategy = strategy;
    }

    pub fn grid(&self) -> &GridSystem {
        &self.grid
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn registered_count(&self) -> usize {
        self.objects.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Identifier for a registered handle, if any
    pub fn id_of(&self, object: &PlaceableHandle) -> Option<PlaceableId> {
        self.ids.get(&handle_key(object)).copied()
    }

    fn require_id(&self, object: &PlaceableHandle) -> Result<PlaceableId> {
        self.id_of(object).ok_or(PlacementError::NotRegistered)
    }

    /// Register an object and assign it a stable identifier
    ///
    /// Idempotent: re-registering the same handle returns the existing id.
    pub fn register_object(&mut self, object: &PlaceableHandle) -> PlaceableId {
        let key = handle_key(object);
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = PlaceableId(self.next_id);
        self.next_id += 1;
        self.ids.insert(key, id);
        self.objects.insert(id, Rc::clone(object));
        self.order.push(id);
        tracing::debug!(id = id.0, "registered placeable");
        id
    }

    /// Drop an object's registration, index entry, and pending membership
    pub fn unregister_object(&mut self, object: &PlaceableHandle) {
        let key = handle_key(object);
        let Some(id) = self.ids.remove(&key) else {
            return;
        };
        self.objects.remove(&id);
        self.order.retain(|&o| o != id);
        self.index.remove(id);
        self.pending.retain(|&o| o != id);
        tracing::debug!(id = id.0, "unregistered placeable");
    }

    /// Place a single registered object
    ///
    /// Commits the current position when it already satisfies the
    /// assembled constraints; otherwise asks the default strategy for a
    /// new one. `Ok(false)` means no valid cell was found, an ordinary
    /// outcome the caller may queue for retry.
    pub fn place_object(&mut self, object: &PlaceableHandle) -> Result<bool> {
        let id = self.require_id(object)?;
        self.place_with(object, id, None)
    }

    /// Place with a one-call strategy override
    pub fn use_placement_strategy(
        &mut self,
        object: &PlaceableHandle,
        strategy: &mut dyn PlacementStrategy,
    ) -> Result<bool> {
        let id = self.require_id(object)?;
        self.place_with(object, id, Some(strategy))
    }

    fn place_with(
        &mut self,
        object: &PlaceableHandle,
        id: PlaceableId,
        strategy: Option<&mut dyn PlacementStrategy>,
    ) -> Result<bool> {
        let custom = object.borrow().constraints();
        let walkable = Walkable;
        let unoccupied = NotOccupied::excluding([id]);
        let mut set: Vec<&dyn Constraint> = vec![&walkable, &unoccupied];
        set.extend(custom.iter().map(|c| c.as_ref()));

        let current = object.borrow().position();
        let current_cell = self.grid.world_to_grid(current);
        let current_valid = {
            let ctx = PlacementContext {
                grid: &self.grid,
                index: &self.index,
            };
            all_satisfied(current_cell, &set, &ctx)
        };
        if current_valid {
            self.index.insert(id, current);
            tracing::debug!(id = id.0, "current position valid, committed in place");
            return Ok(true);
        }

        let found = {
            let ctx = PlacementContext {
                grid: &self.grid,
                index: &self.index,
            };
            let obj = object.borrow();
            match strategy {
                Some(s) => s.find_position(&ctx, &*obj, &set),
                None => self.default_strategy.find_position(&ctx, &*obj, &set),
            }
        };

        match found {
            Some(position) => {
                object.borrow_mut().set_position(position);
                self.index.insert(id, position);
                tracing::debug!(id = id.0, x = position.x, y = position.y, "placed");
                Ok(true)
            }
            None => {
                tracing::debug!(id = id.0, "no valid position found");
                Ok(false)
            }
        }
    }

    /// Place a batch in descending priority order (stable for ties)
    ///
    /// Objects that fail to place are queued for retry.
    pub fn place_objects(&mut self, objects: &[PlaceableHandle]) -> Result<()> {
        let mut ordered: Vec<&PlaceableHandle> = objects.iter().collect();
        ordered.sort_by_key(|o| std::cmp::Reverse(o.borrow().priority()));

        for object in ordered {
            if !self.place_object(object)? {
                self.queue_placement(object)?;
            }
        }
        Ok(())
    }

    /// Queue an object for a later retry; already-queued ids are kept once
    pub fn queue_placement(&mut self, object: &PlaceableHandle) -> Result<()> {
        let id = self.require_id(object)?;
        self.queue_id(id);
        Ok(())
    }

    fn queue_id(&mut self, id: PlaceableId) {
        if !self.pending.contains(&id) {
            self.pending.push_back(id);
            tracing::debug!(id = id.0, "queued for retry");
        }
    }

    /// Drain the current queue once, re-attempting each placement
    ///
    /// Objects that still fail are re-queued; nothing is dropped silently.
    /// Returns the number successfully placed.
    pub fn process_pending_placements(&mut self) -> Result<usize> {
        let batch: Vec<PlaceableId> = self.pending.drain(..).collect();
        let mut placed = 0;
        for id in batch {
            if let Some(object) = self.objects.get(&id).cloned() {
                if self.place_object(&object)? {
                    placed += 1;
                } else {
                    self.pending.push_back(id);
                }
            }
        }
        tracing::debug!(placed, still_pending = self.pending.len(), "processed pending queue");
        Ok(placed)
    }

    fn cell_valid(&self, cell: GridPos, extra: &[Rc<dyn Constraint>]) -> bool {
        let walkable = Walkable;
        let unoccupied = NotOccupied::new();
        let mut set: Vec<&dyn Constraint> = vec![&walkable, &unoccupied];
        set.extend(extra.iter().map(|c| c.as_ref()));
        let ctx = PlacementContext {
            grid: &self.grid,
            index: &self.index,
        };
        all_satisfied(cell, &set, &ctx)
    }

    /// Whether a world position passes the default constraints plus `constraints`
    pub fn is_position_valid(&self, position: Vec2, constraints: &[Rc<dyn Constraint>]) -> bool {
        self.cell_valid(self.grid.world_to_grid(position), constraints)
    }

    /// Whether any identifier occupies the cell containing `position`
    pub fn is_position_occupied(&self, position: Vec2) -> bool {
        !self.index.query_point(position).is_empty()
    }

    /// Find a valid position, trying `preferred` first
    ///
    /// A valid preferred position is returned unchanged; otherwise the
    /// default strategy searches on behalf of a throwaway placeable
    /// carrying only the given constraints.
    pub fn find_valid_position(
        &mut self,
        constraints: &[Rc<dyn Constraint>],
        preferred: Option<Vec2>,
    ) -> Option<Vec2> {
        if let Some(position) = preferred {
            if self.cell_valid(self.grid.world_to_grid(position), constraints) {
                return Some(position);
            }
        }

        let walkable = Walkable;
        let unoccupied = NotOccupied::new();
        let mut set: Vec<&dyn Constraint> = vec![&walkable, &unoccupied];
        set.extend(constraints.iter().map(|c| c.as_ref()));
        let probe = SimplePlaceable::new();
        let ctx = PlacementContext {
            grid: &self.grid,
            index: &self.index,
        };
        self.default_strategy.find_position(&ctx, &probe, &set)
    }

    /// Nearest valid cell within `radius` world units of `center`
    ///
    /// Expanding concentric-ring search: ring 0 is the center cell itself,
    /// then only cells exactly on each Chebyshev ring boundary outward.
    /// Guarantees the nearest valid cell by ring distance; scan order
    /// within a ring is fixed for determinism. Negative radius finds
    /// nothing.
    pub fn find_valid_position_near(
        &self,
        center: Vec2,
        radius: f32,
        constraints: &[Rc<dyn Constraint>],
    ) -> Option<Vec2> {
        if radius < 0.0 {
            return None;
        }
        let max_ring = (radius / self.grid.cell_size().x).floor() as i32;
        self.ring_search(center, max_ring, constraints)
    }

    /// Nearest valid cell to `near`, searching the whole world
    pub fn get_next_best_position(
        &self,
        near: Vec2,
        constraints: &[Rc<dyn Constraint>],
    ) -> Option<Vec2> {
        let (width, height) = self.grid.dimensions();
        self.ring_search(near, width.max(height), constraints)
    }

    fn ring_search(
        &self,
        center: Vec2,
        max_ring: i32,
        constraints: &[Rc<dyn Constraint>],
    ) -> Option<Vec2> {
        let origin = self.grid.world_to_grid(center);
        for r in 0..=max_ring {
            for dy in -r..=r {
                for dx in -r..=r {
                    if dx.abs().max(dy.abs()) != r {
                        continue;
                    }
                    let cell = GridPos::new(origin.x + dx, origin.y + dy);
                    if self.cell_valid(cell, constraints) {
                        return Some(self.grid.grid_to_world(cell));
                    }
                }
            }
        }
        None
    }

    /// Re-queue every occupant of a world-unit region for re-placement
    ///
    /// Registration and index entries are kept; on retry the cheap path
    /// re-validates the current cell, so occupants whose cells are still
    /// legal stay put.
    pub fn invalidate_area(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let occupants = self.index.query_region(x, y, width, height);
        tracing::debug!(count = occupants.len(), "invalidated area occupants");
        for id in occupants {
            self.queue_id(id);
        }
    }

    /// Re-place everything, or just the given `[x, y, width, height]` area
    ///
    /// Without an area: clears the index and re-runs batch placement over
    /// every registered object. With one: invalidates the area and
    /// processes the pending queue.
    pub fn recalculate_positions(&mut self, area: Option<[f32; 4]>) -> Result<()> {
        match area {
            Some([x, y, width, height]) => {
                self.invalidate_area(x, y, width, height);
                self.process_pending_placements()?;
                Ok(())
            }
            None => {
                self.index.clear();
                let all: Vec<PlaceableHandle> = self
                    .order
                    .iter()
                    .filter_map(|id| self.objects.get(id).cloned())
                    .collect();
                self.place_objects(&all)
            }
        }
    }

    /// Snapshot of every currently-placed identifier's world position
    pub fn serialize(&self) -> PlacementSnapshot {
        let mut snapshot = PlacementSnapshot::default();
        for &id in &self.order {
            if self.index.cell_of(id).is_none() {
                continue;
            }
            if let Some(object) = self.objects.get(&id) {
                let position = object.borrow().position();
                snapshot.positions.insert(id, [position.x, position.y]);
            }
        }
        snapshot
    }

    /// Re-apply snapshot positions to their placeables and the index
    ///
    /// Identifier assignment and registration are untouched. Ids in the
    /// snapshot that are not registered here are an error.
    pub fn deserialize(&mut self, snapshot: &PlacementSnapshot) -> Result<()> {
        for (&id, &[x, y]) in &snapshot.positions {
            let object = self
                .objects
                .get(&id)
                .cloned()
                .ok_or(PlacementError::UnknownId(id))?;
            let position = Vec2::new(x, y);
            object.borrow_mut().set_position(position);
            self.index.insert(id, position);
        }
        Ok(())
    }

    /// Clear the index and pending queue without unregistering anything
    pub fn reset(&mut self) {
        self.index.clear();
        self.pending.clear();
    }
}
