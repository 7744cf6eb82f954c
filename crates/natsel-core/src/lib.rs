//! Core types and utilities for the natural-selection grid simulation.

pub mod config;
pub mod error;
pub mod types;

pub use config::{SimulationConfig, WorldConfig};
pub use error::{Error, Result};
pub use types::*;
