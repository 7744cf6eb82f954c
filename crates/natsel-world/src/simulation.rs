//! Simulation orchestrator: owns the world, the population, and the
//! per-tick control flow.

use crate::grid::World;
use crate::organism::Organism;
use natsel_core::{Position, Result, SimulationConfig, TraitKind, TraitSet};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Rejection-sampling attempts before falling back to scanning for an
/// empty cell.
const SPAWN_ATTEMPTS: usize = 64;

/// A dead organism kept around for its death animation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpse {
    pub position: Position,
    pub trait_value: u32,
    pub frames_left: u32,
    total_frames: u32,
}

impl Corpse {
    fn new(position: Position, trait_value: u32, total_frames: u32) -> Self {
        Self {
            position,
            trait_value,
            frames_left: total_frames,
            total_frames,
        }
    }

    /// Animation progress in `[0, 1)`, increasing as the corpse ages.
    pub fn progress(&self) -> f64 {
        1.0 - self.frames_left as f64 / self.total_frames as f64
    }
}

/// The simulation context. Owns the world, the living population, the
/// corpse list, and the random source; all state flows through it.
pub struct Simulation {
    world: World,
    organisms: Vec<Organism>,
    corpses: Vec<Corpse>,
    config: SimulationConfig,
    pending_config: Option<SimulationConfig>,
    rng: ChaCha8Rng,
    ticks: u64,
}

impl Simulation {
    /// Build a world from the configuration and place the initial
    /// population.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let world = World::from_config(&config.world, &mut rng);

        let mut sim = Self {
            world,
            organisms: Vec::new(),
            corpses: Vec::new(),
            config,
            pending_config: None,
            rng,
            ticks: 0,
        };
        sim.initialize_population()?;
        Ok(sim)
    }

    /// Clear population, corpses, and occupancy, then place the configured
    /// number of organisms at distinct random empty cells.
    pub fn initialize_population(&mut self) -> Result<()> {
        self.organisms.clear();
        self.corpses.clear();
        self.world.clear_occupancy();

        let traits = TraitSet::with_value(self.config.trait_kind, self.config.starting_trait_value);
        for _ in 0..self.config.num_organisms {
            let position = self.random_empty_cell()?;
            self.world.place(position)?;
            self.organisms
                .push(Organism::new(position, traits, self.config.starting_energy));
        }

        info!(
            population = self.organisms.len(),
            trait_kind = %self.config.trait_kind,
            "population initialized"
        );
        Ok(())
    }

    /// Hard reset: promote any staged configuration, rebuild the world,
    /// and re-initialize the population.
    pub fn reset(&mut self) -> Result<()> {
        if let Some(pending) = self.pending_config.take() {
            pending.validate()?;
            self.config = pending;
        }
        if let Some(seed) = self.config.seed {
            self.rng = ChaCha8Rng::seed_from_u64(seed);
        }
        self.world = World::from_config(&self.config.world, &mut self.rng);
        self.ticks = 0;
        self.initialize_population()
    }

    /// Stage a configuration change. It takes effect on the next `reset`,
    /// never on the live population.
    pub fn stage_config(&mut self, config: SimulationConfig) {
        self.pending_config = Some(config);
    }

    /// Advance the simulation one step. Returns `Ok(false)` without doing
    /// anything if the population was already empty; `Ok(true)` means a
    /// tick was processed, even if it drove the population extinct.
    pub fn tick(&mut self) -> Result<bool> {
        if self.organisms.is_empty() {
            return Ok(false);
        }

        let population = std::mem::take(&mut self.organisms);
        let mut survivors = Vec::with_capacity(population.len());
        let mut offspring_born = Vec::new();

        for mut organism in population {
            organism.act(&mut self.world, &mut self.rng);

            if !organism.survives() {
                debug!(
                    x = organism.position.x,
                    y = organism.position.y,
                    energy = organism.energy,
                    "organism died"
                );
                self.world.clear(organism.position);
                self.corpses.push(Corpse::new(
                    organism.position,
                    organism.traits.discrete(self.config.trait_kind),
                    self.config.death_animation_frames,
                ));
                continue;
            }

            self.place_checked(organism.position)?;

            if let Some(offspring) = organism.reproduce(&self.world, &self.config, &mut self.rng) {
                self.place_checked(offspring.position)?;
                debug!(
                    x = offspring.position.x,
                    y = offspring.position.y,
                    trait_value = offspring.traits.discrete(self.config.trait_kind),
                    energy = offspring.energy,
                    "offspring born"
                );
                offspring_born.push(offspring);
            }

            survivors.push(organism);
        }

        self.organisms = survivors;
        self.organisms.append(&mut offspring_born);

        // Corpses recorded this tick age along with the rest, so a fresh
        // death is first observable one frame in.
        for corpse in &mut self.corpses {
            corpse.frames_left -= 1;
        }
        self.corpses.retain(|corpse| corpse.frames_left > 0);

        self.world.replenish_food();
        self.ticks += 1;
        Ok(true)
    }

    /// Advance up to `max_steps` ticks, stopping early on extinction.
    /// Returns the number of ticks processed.
    pub fn run(&mut self, max_steps: u64) -> Result<u64> {
        for step in 0..max_steps {
            if !self.tick()? {
                info!(step, "population extinct, stopping");
                return Ok(step);
            }
            if step % 10 == 0 {
                info!(
                    step,
                    population = self.organisms.len(),
                    corpses = self.corpses.len(),
                    "tick complete"
                );
            }
        }
        Ok(max_steps)
    }

    /// Fraction of the living population holding each of
    /// `possible_values`, in order. All zeros when the population is empty.
    pub fn trait_distribution(&self, kind: TraitKind, possible_values: &[u32]) -> Vec<f64> {
        let total = self.organisms.len();
        if total == 0 {
            return vec![0.0; possible_values.len()];
        }
        possible_values
            .iter()
            .map(|&value| {
                let count = self
                    .organisms
                    .iter()
                    .filter(|org| org.traits.discrete(kind) == value)
                    .count();
                count as f64 / total as f64
            })
            .collect()
    }

    pub fn is_alive(&self) -> bool {
        !self.organisms.is_empty()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn organisms(&self) -> &[Organism] {
        &self.organisms
    }

    pub fn corpses(&self) -> &[Corpse] {
        &self.corpses
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn place_checked(&mut self, position: Position) -> Result<()> {
        self.world.place(position).map_err(|err| {
            warn!(
                x = position.x,
                y = position.y,
                "organism resolved to an occupied cell"
            );
            err
        })
    }

    /// Uniformly random empty cell: rejection sampling first, then a scan
    /// over the remaining empty cells once the grid is nearly full.
    fn random_empty_cell(&mut self) -> Result<Position> {
        for _ in 0..SPAWN_ATTEMPTS {
            let x = self.rng.gen_range(0..self.world.width);
            let y = self.rng.gen_range(0..self.world.height);
            let pos = Position::new(x, y);
            if self.world.is_empty(pos) {
                return Ok(pos);
            }
        }

        let empty: Vec<Position> = self
            .world
            .positions()
            .filter(|&pos| self.world.is_empty(pos))
            .collect();
        empty
            .choose(&mut self.rng)
            .copied()
            .ok_or(natsel_core::Error::NoSpawnPosition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use natsel_core::WorldConfig;
    use std::collections::HashSet;

    fn seeded_config(seed: u64) -> SimulationConfig {
        SimulationConfig {
            seed: Some(seed),
            ..SimulationConfig::default()
        }
    }

    fn assert_occupancy_consistent(sim: &Simulation) {
        let mut seen = HashSet::new();
        for org in sim.organisms() {
            assert!(org.position.in_bounds(sim.world().width, sim.world().height));
            assert!(
                seen.insert(org.position),
                "two organisms at {}",
                org.position
            );
            assert!(!sim.world().is_empty(org.position));
        }
        assert_eq!(sim.world().occupied_count(), seen.len());
    }

    #[test]
    fn test_initialization_places_distinct_organisms() {
        let sim = Simulation::new(seeded_config(42)).unwrap();
        assert_eq!(sim.organisms().len(), 20);
        assert!(sim.is_alive());
        assert_occupancy_consistent(&sim);

        for org in sim.organisms() {
            assert_eq!(org.energy, 20.0);
            assert_eq!(org.traits.speed, 1);
        }
    }

    #[test]
    fn test_initialization_fills_a_full_grid() {
        let config = SimulationConfig {
            world: WorldConfig {
                width: 4,
                height: 4,
                ..WorldConfig::default()
            },
            num_organisms: 16,
            ..seeded_config(1)
        };
        let sim = Simulation::new(config).unwrap();
        assert_eq!(sim.organisms().len(), 16);
        assert_occupancy_consistent(&sim);
    }

    #[test]
    fn test_tick_on_empty_population_is_noop() {
        let config = SimulationConfig {
            num_organisms: 0,
            ..seeded_config(1)
        };
        let mut sim = Simulation::new(config).unwrap();
        assert!(!sim.is_alive());
        assert!(!sim.tick().unwrap());
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn test_occupancy_invariant_over_many_ticks() {
        let mut sim = Simulation::new(seeded_config(123)).unwrap();
        for _ in 0..30 {
            if !sim.tick().unwrap() {
                break;
            }
            assert_occupancy_consistent(&sim);
        }
    }

    #[test]
    fn test_starving_organism_dies_and_leaves_a_corpse() {
        // 3x3, one organism, no food: step cost 1 drains energy 1.0 to 0,
        // which is at most the step cost, so the organism dies this tick.
        let config = SimulationConfig {
            world: WorldConfig {
                width: 3,
                height: 3,
                food_number: 0,
                food_replenish_rate: 0.0,
                ..WorldConfig::default()
            },
            num_organisms: 1,
            starting_energy: 1.0,
            ..seeded_config(9)
        };
        let mut sim = Simulation::new(config).unwrap();

        assert!(sim.tick().unwrap());
        assert!(!sim.is_alive());
        assert_eq!(sim.world().occupied_count(), 0);

        // Recorded with the full frame count, then aged once this tick
        assert_eq!(sim.corpses().len(), 1);
        let corpse = &sim.corpses()[0];
        assert_eq!(corpse.frames_left, 5);
        assert_eq!(corpse.trait_value, 1);
        assert!((corpse.progress() - 1.0 / 6.0).abs() < 1e-9);

        // A tick was still processed even though it emptied the population
        assert_eq!(sim.ticks(), 1);
        // The next tick is a no-op
        assert!(!sim.tick().unwrap());
    }

    #[test]
    fn test_corpse_progress_increases_until_removal() {
        // One long-lived organism keeps ticks flowing while an injected
        // corpse counts down.
        let config = SimulationConfig {
            world: WorldConfig {
                width: 3,
                height: 3,
                ..WorldConfig::default()
            },
            num_organisms: 1,
            starting_energy: 1000.0,
            reproduction_energy_threshold: f64::INFINITY,
            chance_reproduction_threshold: f64::INFINITY,
            ..seeded_config(5)
        };
        let mut sim = Simulation::new(config).unwrap();
        sim.corpses.push(Corpse::new(Position::new(0, 0), 2, 4));

        let mut last_progress = sim.corpses()[0].progress();
        assert_eq!(last_progress, 0.0);

        for frames_left in (1..4).rev() {
            assert!(sim.tick().unwrap());
            let corpse = &sim.corpses()[0];
            assert_eq!(corpse.frames_left, frames_left);
            assert!(corpse.progress() > last_progress);
            assert!(corpse.progress() < 1.0);
            last_progress = corpse.progress();
        }

        // Removed exactly when the countdown hits zero
        assert!(sim.tick().unwrap());
        assert!(sim.corpses().is_empty());
    }

    #[test]
    fn test_reproduction_grows_population() {
        // One well-fed organism on an open grid reproduces every tick:
        // after moving it still holds energy above the guaranteed
        // threshold and always has an empty neighbor.
        let config = SimulationConfig {
            world: WorldConfig {
                width: 5,
                height: 5,
                food_number: 0,
                food_replenish_rate: 0.0,
                ..WorldConfig::default()
            },
            num_organisms: 1,
            starting_energy: 60.0,
            mutation_chance: 0.0,
            ..seeded_config(21)
        };
        let mut sim = Simulation::new(config).unwrap();

        let energy_before = sim.organisms()[0].energy;
        sim.tick().unwrap();
        assert_eq!(sim.organisms().len(), 2);
        assert_occupancy_consistent(&sim);

        // Split conserves energy apart from the one step cost
        let total: f64 = sim.organisms().iter().map(|o| o.energy).sum();
        assert_eq!(total, energy_before - 1.0);
        // Survivors come first, offspring appended
        assert!(sim.organisms()[0].energy >= sim.organisms()[1].energy);
    }

    #[test]
    fn test_trait_distribution() {
        let mut sim = Simulation::new(seeded_config(2)).unwrap();
        let values = TraitKind::Speed.possible_values();

        let dist = sim.trait_distribution(TraitKind::Speed, values);
        assert_eq!(dist, vec![1.0, 0.0, 0.0]);
        assert!((dist.iter().sum::<f64>() - 1.0).abs() < 1e-9);

        // Empty population guards the division
        sim.organisms.clear();
        let dist = sim.trait_distribution(TraitKind::Speed, values);
        assert_eq!(dist, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_reset_promotes_staged_config() {
        let mut sim = Simulation::new(seeded_config(3)).unwrap();
        sim.tick().unwrap();

        let staged = SimulationConfig {
            world: WorldConfig {
                width: 10,
                height: 10,
                ..WorldConfig::default()
            },
            num_organisms: 5,
            trait_kind: TraitKind::Efficiency,
            ..seeded_config(4)
        };
        sim.stage_config(staged);

        // Staging alone changes nothing
        assert_eq!(sim.world().width, 25);
        assert_eq!(sim.organisms().len(), 20);

        sim.reset().unwrap();
        assert_eq!(sim.world().width, 10);
        assert_eq!(sim.organisms().len(), 5);
        assert_eq!(sim.config().trait_kind, TraitKind::Efficiency);
        assert_eq!(sim.ticks(), 0);
        assert!(sim.corpses().is_empty());
        assert_occupancy_consistent(&sim);
    }

    #[test]
    fn test_reset_without_staged_config_rebuilds_world() {
        let mut sim = Simulation::new(seeded_config(8)).unwrap();
        sim.run(10).unwrap();
        sim.reset().unwrap();
        assert_eq!(sim.ticks(), 0);
        assert_eq!(sim.organisms().len(), 20);
        assert_occupancy_consistent(&sim);
    }

    #[test]
    fn test_run_stops_on_extinction() {
        let config = SimulationConfig {
            world: WorldConfig {
                width: 3,
                height: 3,
                food_number: 0,
                food_replenish_rate: 0.0,
                ..WorldConfig::default()
            },
            num_organisms: 1,
            starting_energy: 1.0,
            ..seeded_config(9)
        };
        let mut sim = Simulation::new(config).unwrap();
        let steps = sim.run(50).unwrap();
        assert_eq!(steps, 1);
    }

    #[test]
    fn test_food_never_exceeds_cap() {
        let mut sim = Simulation::new(seeded_config(14)).unwrap();
        let food_max = sim.world().food_max();
        for _ in 0..40 {
            if !sim.tick().unwrap() {
                break;
            }
            let world = sim.world();
            assert!(world.positions().all(|pos| world.food_at(pos) <= food_max));
        }
    }
}
