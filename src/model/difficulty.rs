use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Stars a mode needs before problems are drawn from the medium tier.
pub const MEDIUM_STAR_THRESHOLD: u32 = 10;
/// Stars a mode needs before problems are drawn from the hard tier.
pub const HARD_STAR_THRESHOLD: u32 = 25;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn all() -> [Difficulty; 3] {
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }

    pub fn index(&self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    /// Out of range indices fall back to easy.
    pub fn from_index(index: usize) -> Difficulty {
        match index {
            1 => Difficulty::Medium,
            2 => Difficulty::Hard,
            _ => Difficulty::Easy,
        }
    }

    /// Unrecognized tier names fall back to easy.
    pub fn from_name(name: &str) -> Difficulty {
        match name.trim().to_ascii_lowercase().as_str() {
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Easy,
        }
    }

    /// Tier unlocked by the stars earned in a single mode.
    pub fn for_stars(stars: u32) -> Difficulty {
        if stars >= HARD_STAR_THRESHOLD {
            Difficulty::Hard
        } else if stars >= MEDIUM_STAR_THRESHOLD {
            Difficulty::Medium
        } else {
            Difficulty::Easy
        }
    }

    /// The next tier and the star count that unlocks it, if any.
    pub fn next_unlock(&self) -> Option<(Difficulty, u32)> {
        match self {
            Difficulty::Easy => Some((Difficulty::Medium, MEDIUM_STAR_THRESHOLD)),
            Difficulty::Medium => Some((Difficulty::Hard, HARD_STAR_THRESHOLD)),
            Difficulty::Hard => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How far a mode is from its next tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockProgress {
    pub stars: u32,
    pub difficulty: Difficulty,
    pub next: Option<(Difficulty, u32)>,
}

impl UnlockProgress {
    pub fn for_stars(stars: u32) -> Self {
        let difficulty = Difficulty::for_stars(stars);
        Self {
            stars,
            difficulty,
            next: difficulty.next_unlock(),
        }
    }

    pub fn stars_remaining(&self) -> Option<u32> {
        self.next
            .map(|(_, threshold)| threshold.saturating_sub(self.stars))
    }

    /// Fraction of the way to the hard tier, clamped to 100.
    pub fn percent_to_hard(&self) -> u32 {
        (self.stars.min(HARD_STAR_THRESHOLD) * 100) / HARD_STAR_THRESHOLD
    }
}
