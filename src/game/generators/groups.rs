use std::ops::RangeInclusive;

use rand::Rng;

use crate::model::{Difficulty, GroupsProblem};

fn ranges(difficulty: Difficulty) -> (RangeInclusive<u32>, RangeInclusive<u32>) {
    match difficulty {
        Difficulty::Easy => (2..=3, 2..=4),
        Difficulty::Medium => (2..=4, 2..=5),
        Difficulty::Hard => (2..=6, 2..=6),
    }
}

/// Equal groups of items to count, the picture form of multiplication.
pub fn generate_groups<R: Rng>(difficulty: Difficulty, rng: &mut R) -> GroupsProblem {
    let (groups, per_group) = ranges(difficulty);
    GroupsProblem::new(
        rng.random_range(groups),
        rng.random_range(per_group),
        difficulty,
    )
}
