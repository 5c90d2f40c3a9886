//! Placeable entity trait and handle type

use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;

use super::constraint::Constraint;

/// Any entity that can report and accept a world position
///
/// The controller never owns a placeable's lifetime; it holds shared
/// handles and an identifier mapping for index bookkeeping.
pub trait Placeable {
    /// Current world position
    fn position(&self) -> Vec2;

    /// Accept a new world position chosen by the placement system
    fn set_position(&mut self, position: Vec2);

    /// Position this entity would like to occupy, if it has one
    fn preferred_position(&self) -> Option<Vec2> {
        None
    }

    /// Batch-placement priority; higher values are placed first
    fn priority(&self) -> i32 {
        0
    }

    /// Extra constraints combined (AND) with the controller defaults
    fn constraints(&self) -> Vec<Rc<dyn Constraint>> {
        Vec::new()
    }
}

/// Shared, non-owning handle to a placeable
pub type PlaceableHandle = Rc<RefCell<dyn Placeable>>;

/// Stable key for handle identity (the source-language reference-equality
/// map, expressed as pointer identity)
pub(crate) fn handle_key(handle: &PlaceableHandle) -> usize {
    Rc::as_ptr(handle) as *const () as usize
}

/// Minimal placeable for hosts and tests that only need a position
#[derive(Clone, Default)]
pub struct SimplePlaceable {
    position: Vec2,
    preferred: Option<Vec2>,
    priority: i32,
    constraints: Vec<Rc<dyn Constraint>>,
}

impl SimplePlaceable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_preferred(mut self, preferred: Vec2) -> Self {
        self.preferred = Some(preferred);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_constraint(mut self, constraint: Rc<dyn Constraint>) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn into_handle(self) -> PlaceableHandle {
        Rc::new(RefCell::new(self))
    }
}

impl Placeable for SimplePlaceable {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn preferred_position(&self) -> Option<Vec2> {
        self.preferred
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn constraints(&self) -> Vec<Rc<dyn Constraint>> {
        self.constraints.clone()
    }
}
