//! Natural-selection simulation engine.
//!
//! This crate implements the 2D grid world where organisms compete for food,
//! reproduce, and evolve a single selectable trait.

pub mod grid;
pub mod organism;
pub mod simulation;
pub mod snapshot;

pub use grid::World;
pub use organism::Organism;
pub use simulation::{Corpse, Simulation};
pub use snapshot::{CorpseView, Snapshot};
