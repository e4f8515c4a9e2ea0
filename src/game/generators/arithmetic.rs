use std::ops::RangeInclusive;

use log::trace;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::model::{ArithmeticProblem, Difficulty, Operation};

#[derive(Debug, Clone)]
struct AdditionConfig {
    a: RangeInclusive<u32>,
    b: RangeInclusive<u32>,
    max_sum: u32,
}

impl AdditionConfig {
    fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                a: 1..=10,
                b: 1..=10,
                max_sum: 10,
            },
            Difficulty::Medium => Self {
                a: 1..=15,
                b: 1..=15,
                max_sum: 20,
            },
            Difficulty::Hard => Self {
                a: 5..=30,
                b: 5..=30,
                max_sum: 50,
            },
        }
    }
}

#[derive(Debug, Clone)]
struct SubtractionConfig {
    a: RangeInclusive<u32>,
    min_result: u32,
}

impl SubtractionConfig {
    fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                a: 5..=10,
                min_result: 0,
            },
            Difficulty::Medium => Self {
                a: 10..=20,
                min_result: 0,
            },
            Difficulty::Hard => Self {
                a: 15..=50,
                min_result: 0,
            },
        }
    }
}

/// Sums stay within the tier's maximum. Operands are rejection sampled; every
/// tier accepts at least 45% of draws, so the loop ends quickly.
pub fn generate_addition<R: Rng>(difficulty: Difficulty, rng: &mut R) -> ArithmeticProblem {
    let config = AdditionConfig::for_difficulty(difficulty);
    debug_assert!(config.a.start() + config.b.start() <= config.max_sum);

    let mut draws = 0;
    loop {
        draws += 1;
        let a = rng.random_range(config.a.clone());
        let b = rng.random_range(config.b.clone());
        if a + b <= config.max_sum {
            trace!(target: "generator", "addition {} + {} after {} draws", a, b, draws);
            return ArithmeticProblem::new(Operation::Add, a, b, difficulty);
        }
    }
}

/// Results are never below the tier's minimum result (zero for every tier).
pub fn generate_subtraction<R: Rng>(difficulty: Difficulty, rng: &mut R) -> ArithmeticProblem {
    let config = SubtractionConfig::for_difficulty(difficulty);
    let a = rng.random_range(config.a.clone());
    let max_b = (a - config.min_result).max(1);
    let b = rng.random_range(1..=max_b);
    ArithmeticProblem::new(Operation::Subtract, a, b, difficulty)
}

const EASY_MULTIPLIERS: [u32; 6] = [1, 2, 2, 5, 5, 10];

/// Easy leans on the 2, 5 and 10 tables; hard covers the full 2 to 12 tables.
pub fn generate_multiplication<R: Rng>(difficulty: Difficulty, rng: &mut R) -> ArithmeticProblem {
    let (a, b) = match difficulty {
        Difficulty::Easy => {
            let a = EASY_MULTIPLIERS.choose(rng).copied().unwrap_or(1);
            (a, rng.random_range(1..=5))
        }
        Difficulty::Medium => (rng.random_range(2..=6), rng.random_range(2..=6)),
        Difficulty::Hard => (rng.random_range(2..=12), rng.random_range(2..=12)),
    };
    ArithmeticProblem::new(Operation::Multiply, a, b, difficulty)
}
