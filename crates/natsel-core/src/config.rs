//! Configuration types for the simulation.

use crate::types::TraitKind;
use serde::{Deserialize, Serialize};

/// World configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Width of the world grid
    pub width: i32,
    /// Height of the world grid
    pub height: i32,
    /// Number of food drops scattered at world creation
    pub food_number: u32,
    /// Maximum food per cell
    pub food_max: f64,
    /// Food added to every cell per tick, clamped to `food_max`
    pub food_replenish_rate: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 25,
            height: 25,
            food_number: 300,
            food_max: 5.0,
            food_replenish_rate: 0.2,
        }
    }
}

/// Simulation configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// World configuration
    pub world: WorldConfig,
    /// The trait under selection
    pub trait_kind: TraitKind,
    /// Number of organisms placed at initialization
    pub num_organisms: usize,
    /// Energy each initial organism starts with
    pub starting_energy: f64,
    /// Starting value for the active trait
    pub starting_trait_value: f64,
    /// Energy at or above which reproduction is guaranteed
    pub reproduction_energy_threshold: f64,
    /// Lower bound of the chance-reproduction band
    pub chance_reproduction_threshold: f64,
    /// Probability of reproducing inside the chance band
    pub reproduction_chance: f64,
    /// Probability an offspring's active trait mutates
    pub mutation_chance: f64,
    /// Ticks a corpse stays visible for the death animation
    pub death_animation_frames: u32,
    /// Default number of steps for `run`
    pub simulation_steps: u64,
    /// Seed for the random source; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            trait_kind: TraitKind::Speed,
            num_organisms: 20,
            starting_energy: 20.0,
            starting_trait_value: 1.0,
            reproduction_energy_threshold: 25.0,
            chance_reproduction_threshold: 15.0,
            reproduction_chance: 0.25,
            mutation_chance: 0.05,
            death_animation_frames: 6,
            simulation_steps: 50,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Check structural constraints that would make a world unbuildable.
    pub fn validate(&self) -> crate::Result<()> {
        if self.world.width <= 0 || self.world.height <= 0 {
            return Err(crate::Error::InvalidConfig(format!(
                "grid dimensions must be positive, got {}x{}",
                self.world.width, self.world.height
            )));
        }
        let cells = self.world.width as usize * self.world.height as usize;
        if self.num_organisms > cells {
            return Err(crate::Error::InvalidConfig(format!(
                "{} organisms cannot fit on {} cells",
                self.num_organisms, cells
            )));
        }
        if self.death_animation_frames == 0 {
            return Err(crate::Error::InvalidConfig(
                "death_animation_frames must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
