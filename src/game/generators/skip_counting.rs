use rand::seq::IndexedRandom;
use rand::Rng;

use crate::model::{Difficulty, SkipCountProblem};

pub const SEQUENCE_LENGTH: usize = 6;

#[derive(Debug, Clone)]
struct SkipCountConfig {
    steps: &'static [u32],
    /// Start is `by` times a multiplier drawn from `0..start_multipliers`.
    start_multipliers: u32,
    max_hidden_index: usize,
}

impl SkipCountConfig {
    fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                steps: &[2, 5, 10],
                start_multipliers: 3,
                max_hidden_index: 3,
            },
            Difficulty::Medium => Self {
                steps: &[3, 4, 6],
                start_multipliers: 4,
                max_hidden_index: 3,
            },
            Difficulty::Hard => Self {
                steps: &[7, 8, 9, 11, 12],
                start_multipliers: 4,
                max_hidden_index: 4,
            },
        }
    }
}

pub fn generate_skip_count<R: Rng>(difficulty: Difficulty, rng: &mut R) -> SkipCountProblem {
    let config = SkipCountConfig::for_difficulty(difficulty);
    let by = config.steps.choose(rng).copied().unwrap_or(1);
    let start = rng.random_range(0..config.start_multipliers) * by;
    let missing = rng.random_range(1..=config.max_hidden_index);
    SkipCountProblem::new(by, start, SEQUENCE_LENGTH, missing, difficulty)
}
