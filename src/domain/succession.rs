//! Choice of the successor when an employee with a team is fired.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::domain::entities::Employee;

/// Chooses which direct subordinate replaces a fired employee.
pub trait SuccessorPicker {
    /// Return the position of the successor within `candidates`.
    ///
    /// `candidates` is never empty. Positions past the end are clamped to
    /// the last candidate.
    fn pick(&mut self, candidates: &[&Employee]) -> usize;
}

/// Uniformly random successor.
#[derive(Debug, Clone)]
pub struct RandomSuccession {
    rng: StdRng,
}

impl RandomSuccession {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence of choices.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSuccession {
    fn default() -> Self {
        Self::new()
    }
}

impl SuccessorPicker for RandomSuccession {
    fn pick(&mut self, candidates: &[&Employee]) -> usize {
        self.rng.gen_range(0..candidates.len().max(1))
    }
}

/// Always the longest-serving direct report (the first in hiring order).
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstInLine;

impl SuccessorPicker for FirstInLine {
    fn pick(&mut self, _candidates: &[&Employee]) -> usize {
        0
    }
}

/// Configurable succession policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuccessionPolicy {
    #[default]
    Random,
    FirstInLine,
}

impl SuccessionPolicy {
    /// Build the picker for this policy; `seed` pins random choices.
    pub fn picker(self, seed: Option<u64>) -> Box<dyn SuccessorPicker> {
        match self {
            SuccessionPolicy::Random => Box::new(
                seed.map(RandomSuccession::seeded)
                    .unwrap_or_default(),
            ),
            SuccessionPolicy::FirstInLine => Box::new(FirstInLine),
        }
    }
}

impl std::str::FromStr for SuccessionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(SuccessionPolicy::Random),
            "first-in-line" | "first_in_line" | "first" => Ok(SuccessionPolicy::FirstInLine),
            other => Err(format!("unknown succession policy: {other}")),
        }
    }
}
