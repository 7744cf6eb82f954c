//! Organism behavior: movement, feeding, reproduction, survival.

use crate::grid::World;
use natsel_core::{Position, SimulationConfig, TraitSet, NEIGHBOR_OFFSETS};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Floor for the step-cost divisor, guarding against non-positive efficiency.
const MIN_EFFICIENCY: f64 = 0.01;

/// An agent on the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organism {
    pub position: Position,
    pub traits: TraitSet,
    pub energy: f64,
}

impl Organism {
    pub fn new(position: Position, traits: TraitSet, energy: f64) -> Self {
        Self {
            position,
            traits,
            energy,
        }
    }

    /// Energy charged per tick of movement. Higher efficiency means a
    /// lower cost.
    pub fn step_cost(&self) -> f64 {
        1.0 / self.traits.efficiency.max(MIN_EFFICIENCY)
    }

    /// Whether the organism has enough energy left to live through
    /// another step.
    pub fn survives(&self) -> bool {
        self.energy > self.step_cost()
    }

    /// Wander up to `speed` sub-steps, eating on each arrival. One step
    /// cost is charged per tick regardless of distance covered.
    ///
    /// The organism's cell is cleared on entry and the caller places it
    /// back at the final position (or records the death), so occupancy
    /// stays authoritative for every other organism throughout.
    pub fn act(&mut self, world: &mut World, rng: &mut ChaCha8Rng) {
        world.clear(self.position);

        let step_cost = self.step_cost();
        let mut steps_taken = 0;

        while steps_taken < self.traits.speed && self.energy >= step_cost {
            let mut offsets = NEIGHBOR_OFFSETS;
            offsets.shuffle(rng);

            // Take the first empty candidate; outward moves clamp to the edge
            let mut moved = false;
            for (dx, dy) in offsets {
                let candidate = self.position.add(dx, dy).clamp(world.width, world.height);
                if world.is_empty(candidate) {
                    self.position = candidate;
                    moved = true;
                    self.eat(world);
                    break;
                }
            }

            steps_taken += 1;

            if !moved {
                break;
            }
        }

        self.energy -= step_cost;
    }

    /// Consume all food at the current cell.
    fn eat(&mut self, world: &mut World) {
        let food = world.take_food(self.position);
        if food > 0.0 {
            self.energy += food;
            trace!(
                x = self.position.x,
                y = self.position.y,
                amount = food,
                energy = self.energy,
                "organism ate"
            );
        }
    }

    /// Attempt asexual reproduction into a random empty neighbor cell.
    ///
    /// Guaranteed at or above the reproduction threshold; a random draw
    /// inside the chance band below it. The parent's energy is split with
    /// the offspring, and the offspring's active trait may mutate one step
    /// toward its maximum. At most one offspring per tick; if no empty
    /// neighbor exists nothing happens and no energy is spent.
    pub fn reproduce(
        &mut self,
        world: &World,
        config: &SimulationConfig,
        rng: &mut ChaCha8Rng,
    ) -> Option<Organism> {
        let guaranteed = self.energy >= config.reproduction_energy_threshold;
        let conditional = self.energy >= config.chance_reproduction_threshold
            && self.energy < config.reproduction_energy_threshold
            && rng.gen::<f64>() < config.reproduction_chance;

        if !(guaranteed || conditional) {
            return None;
        }

        let mut offsets = NEIGHBOR_OFFSETS;
        offsets.shuffle(rng);

        for (dx, dy) in offsets {
            let candidate = self.position.add(dx, dy);
            if !world.in_bounds(candidate) || !world.is_empty(candidate) {
                continue;
            }

            let offspring_energy = (self.energy / 2.0).floor().max(1.0);
            self.energy -= offspring_energy;

            let mut traits = self.traits;
            if rng.gen::<f64>() < config.mutation_chance {
                traits = traits.mutated(config.trait_kind);
                debug!(
                    trait_kind = %config.trait_kind,
                    parent_value = self.traits.value(config.trait_kind),
                    offspring_value = traits.value(config.trait_kind),
                    "offspring mutated"
                );
            }

            return Some(Organism::new(candidate, traits, offspring_energy));
        }

        None
    }
}
