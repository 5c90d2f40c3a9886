//! World/grid coordinate conversion

use glam::Vec2;
use std::rc::Rc;

use crate::core::types::GridPos;
use crate::world::WorldModel;

/// Converts between continuous world coordinates and discrete grid cells
///
/// Cell size is fixed at construction from the world model's tile size.
pub struct GridSystem {
    world: Rc<dyn WorldModel>,
    cell: Vec2,
    cells_x: i32,
    cells_y: i32,
}

impl GridSystem {
    pub fn new(world: Rc<dyn WorldModel>) -> Self {
        let cell = world.tile_size();
        let size = world.size();
        let cells_x = (size.x / cell.x).ceil() as i32;
        let cells_y = (size.y / cell.y).ceil() as i32;
        Self {
            world,
            cell,
            cells_x,
            cells_y,
        }
    }

    /// Convert a world position to the cell containing it
    ///
    /// Total function: positions outside the world map to out-of-bounds
    /// cells, which simply fail [`GridSystem::is_valid_position`].
    #[inline]
    pub fn world_to_grid(&self, pos: Vec2) -> GridPos {
        GridPos::new(
            (pos.x / self.cell.x).floor() as i32,
            (pos.y / self.cell.y).floor() as i32,
        )
    }

    /// World position of the **center** of a cell
    ///
    /// Centered rather than cell-origin so placed entities render centered.
    #[inline]
    pub fn grid_to_world(&self, cell: GridPos) -> Vec2 {
        Vec2::new(
            (cell.x as f32 + 0.5) * self.cell.x,
            (cell.y as f32 + 0.5) * self.cell.y,
        )
    }

    /// Whether a cell is inside world bounds and walkable
    pub fn is_valid_position(&self, cell: GridPos) -> bool {
        if cell.x < 0 || cell.y < 0 || cell.x >= self.cells_x || cell.y >= self.cells_y {
            return false;
        }
        self.world.is_walkable(cell.x, cell.y)
    }

    /// Fixed tile dimensions in world units
    pub fn cell_size(&self) -> Vec2 {
        self.cell
    }

    /// World extent in cells
    pub fn dimensions(&self) -> (i32, i32) {
        (self.cells_x, self.cells_y)
    }

    /// The four axis-aligned neighbors (up, right, down, left), filtered
    /// to valid cells
    ///
    /// y-down convention: up is y - 1.
    pub fn neighbors(&self, cell: GridPos) -> Vec<GridPos> {
        const OFFSETS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
        OFFSETS
            .iter()
            .map(|&(dx, dy)| GridPos::new(cell.x + dx, cell.y + dy))
            .filter(|&n| self.is_valid_position(n))
            .collect()
    }
}
