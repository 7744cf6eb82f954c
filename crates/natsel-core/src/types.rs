//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The eight neighboring cell offsets, in reading order.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// 2D position on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Clamp into `[0, width) x [0, height)`. The boundary is a wall:
    /// outward moves resolve to the nearest edge cell rather than wrapping.
    pub fn clamp(&self, width: i32, height: i32) -> Self {
        Self {
            x: self.x.clamp(0, width - 1),
            y: self.y.clamp(0, height - 1),
        }
    }

    pub fn in_bounds(&self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.x < width && self.y >= 0 && self.y < height
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The selectable evolvable trait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitKind {
    Speed,
    Efficiency,
    Vision,
    Strength,
}

impl TraitKind {
    pub fn name(&self) -> &'static str {
        match self {
            TraitKind::Speed => "speed",
            TraitKind::Efficiency => "efficiency",
            TraitKind::Vision => "vision",
            TraitKind::Strength => "strength",
        }
    }

    /// Values a trait can take on, from starting value to maximum.
    pub fn possible_values(&self) -> &'static [u32] {
        match self {
            TraitKind::Speed => &[1, 2, 3],
            TraitKind::Efficiency => &[1, 2, 3, 4],
            TraitKind::Vision => &[1, 2],
            TraitKind::Strength => &[1, 2, 3, 4, 5],
        }
    }

    /// Display labels, parallel to `possible_values`.
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            TraitKind::Speed => &["Slow", "Medium", "Fast"],
            TraitKind::Efficiency => &["Wasteful", "Normal", "Efficient", "Optimal"],
            TraitKind::Vision => &["Nearsighted", "Keen"],
            TraitKind::Strength => &["Weak", "Average", "Strong", "Powerful", "Titanic"],
        }
    }

    /// Upper bound mutation saturates at.
    pub fn max_value(&self) -> f64 {
        match self {
            TraitKind::Speed => 3.0,
            TraitKind::Efficiency => 4.0,
            TraitKind::Vision => 2.0,
            TraitKind::Strength => 5.0,
        }
    }

    /// Increment applied by a single mutation.
    pub fn mutation_step(&self) -> f64 {
        1.0
    }
}

impl fmt::Display for TraitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-organism trait values. Only the configured active trait evolves;
/// the rest are carried at their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitSet {
    pub speed: u32,
    pub efficiency: f64,
    pub vision: u32,
    pub strength: u32,
}

impl Default for TraitSet {
    fn default() -> Self {
        Self {
            speed: 1,
            efficiency: 1.0,
            vision: 1,
            strength: 1,
        }
    }
}

impl TraitSet {
    /// Default traits with `kind` set to `value`.
    pub fn with_value(kind: TraitKind, value: f64) -> Self {
        let mut traits = Self::default();
        traits.set(kind, value);
        traits
    }

    pub fn value(&self, kind: TraitKind) -> f64 {
        match kind {
            TraitKind::Speed => self.speed as f64,
            TraitKind::Efficiency => self.efficiency,
            TraitKind::Vision => self.vision as f64,
            TraitKind::Strength => self.strength as f64,
        }
    }

    pub fn set(&mut self, kind: TraitKind, value: f64) {
        match kind {
            TraitKind::Speed => self.speed = value as u32,
            TraitKind::Efficiency => self.efficiency = value,
            TraitKind::Vision => self.vision = value as u32,
            TraitKind::Strength => self.strength = value as u32,
        }
    }

    /// Trait value truncated to an integer, as reported in distributions
    /// and snapshots.
    pub fn discrete(&self, kind: TraitKind) -> u32 {
        self.value(kind) as u32
    }

    /// Copy of this set with `kind` nudged one step toward its maximum,
    /// saturating. Mutation never decreases a trait.
    pub fn mutated(&self, kind: TraitKind) -> Self {
        let stepped = (self.value(kind) + kind.mutation_step()).min(kind.max_value());
        let mut next = *self;
        next.set(kind, stepped);
        next
    }
}
