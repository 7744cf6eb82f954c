//! Dense 2D world grid: occupancy and food.

use natsel_core::{Error, Position, Result, WorldConfig};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// The world grid. Occupancy and food are independent maps over the same
/// cells: a cell can hold food while no organism stands on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub width: i32,
    pub height: i32,
    occupied: Vec<bool>,
    food: Vec<f64>,
    food_max: f64,
    replenish_rate: f64,
}

impl World {
    pub fn new(width: i32, height: i32, food_max: f64, replenish_rate: f64) -> Self {
        let size = (width * height) as usize;
        Self {
            width,
            height,
            occupied: vec![false; size],
            food: vec![0.0; size],
            food_max,
            replenish_rate,
        }
    }

    /// Create a world from configuration, scattering the configured number
    /// of food drops across random cells.
    pub fn from_config(config: &WorldConfig, rng: &mut ChaCha8Rng) -> Self {
        let mut world = Self::new(
            config.width,
            config.height,
            config.food_max,
            config.food_replenish_rate,
        );
        for _ in 0..config.food_number {
            let x = rng.gen_range(0..config.width);
            let y = rng.gen_range(0..config.height);
            let index = world.index(Position::new(x, y));
            world.food[index] = config.food_max;
        }
        world
    }

    fn index(&self, pos: Position) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.in_bounds(self.width, self.height)
    }

    /// True iff no organism occupies the cell. Coordinates are assumed
    /// pre-clamped by the caller.
    pub fn is_empty(&self, pos: Position) -> bool {
        !self.occupied[self.index(pos)]
    }

    /// Mark the cell occupied. Placing onto an occupied cell is an
    /// invariant violation and is rejected.
    pub fn place(&mut self, pos: Position) -> Result<()> {
        let index = self.index(pos);
        if self.occupied[index] {
            return Err(Error::CellOccupied { x: pos.x, y: pos.y });
        }
        self.occupied[index] = true;
        Ok(())
    }

    /// Mark the cell empty. Idempotent.
    pub fn clear(&mut self, pos: Position) {
        let index = self.index(pos);
        self.occupied[index] = false;
    }

    /// Empty every cell. Used when the population is re-initialized.
    pub fn clear_occupancy(&mut self) {
        self.occupied.fill(false);
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.iter().filter(|&&o| o).count()
    }

    pub fn food_at(&self, pos: Position) -> f64 {
        self.food[self.index(pos)]
    }

    /// Remove and return all food at the cell.
    pub fn take_food(&mut self, pos: Position) -> f64 {
        let index = self.index(pos);
        std::mem::take(&mut self.food[index])
    }

    /// Grow food on every cell by the replenish rate, clamped to the
    /// configured maximum. Called once per tick after organism actions.
    pub fn replenish_food(&mut self) {
        for amount in &mut self.food {
            *amount = (*amount + self.replenish_rate).min(self.food_max);
        }
    }

    pub fn food_max(&self) -> f64 {
        self.food_max
    }

    /// Row-major iterator over all cell positions.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width;
        (0..self.occupied.len()).map(move |i| Position::new(i as i32 % width, i as i32 / width))
    }
}
