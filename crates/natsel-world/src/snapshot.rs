//! Read-only state views for the external API layer.
//!
//! The snapshot is plain serde data so the collaborator can serialize it
//! however it likes; no wire format is imposed here.

use crate::simulation::Simulation;
use serde::{Deserialize, Serialize};

/// A dead organism's cell, trait, and animation progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpseView {
    pub x: i32,
    pub y: i32,
    pub trait_value: u32,
    /// In `[0, 1)`, increasing as the animation plays out.
    pub progress: f64,
}

/// Combined view of the simulation state at one instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub width: i32,
    pub height: i32,
    /// Occupant's active-trait value per cell, row by row; `None` is empty.
    pub grid: Vec<Vec<Option<u32>>>,
    /// Food per cell, rounded to one decimal place.
    pub food: Vec<Vec<f64>>,
    /// Whether any organism is alive.
    pub alive: bool,
    pub trait_name: String,
    pub trait_labels: Vec<String>,
    /// Fraction of the population at each possible trait value.
    pub trait_distribution: Vec<f64>,
    pub dead: Vec<CorpseView>,
}

impl Simulation {
    /// Build a snapshot of the current state.
    pub fn snapshot(&self) -> Snapshot {
        let world = self.world();
        let kind = self.config().trait_kind;

        let mut grid = vec![vec![None; world.width as usize]; world.height as usize];
        for org in self.organisms() {
            grid[org.position.y as usize][org.position.x as usize] =
                Some(org.traits.discrete(kind));
        }

        let food = (0..world.height)
            .map(|y| {
                (0..world.width)
                    .map(|x| {
                        let amount = world.food_at(natsel_core::Position::new(x, y));
                        (amount * 10.0).round() / 10.0
                    })
                    .collect()
            })
            .collect();

        let dead = self
            .corpses()
            .iter()
            .map(|corpse| CorpseView {
                x: corpse.position.x,
                y: corpse.position.y,
                trait_value: corpse.trait_value,
                progress: corpse.progress(),
            })
            .collect();

        Snapshot {
            width: world.width,
            height: world.height,
            grid,
            food,
            alive: self.is_alive(),
            trait_name: kind.name().to_string(),
            trait_labels: kind.labels().iter().map(|s| s.to_string()).collect(),
            trait_distribution: self.trait_distribution(kind, kind.possible_values()),
            dead,
        }
    }
}
