use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownMode;

/// Skill domain a problem belongs to. The serialized names double as the keys
/// of the persisted mode stats record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Addition,
    Subtraction,
    #[serde(rename = "skipcount")]
    SkipCount,
    Patterns,
    Groups,
    Multiplication,
}

impl Mode {
    pub fn all() -> [Mode; 6] {
        [
            Mode::Addition,
            Mode::Subtraction,
            Mode::SkipCount,
            Mode::Patterns,
            Mode::Groups,
            Mode::Multiplication,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Addition => "addition",
            Mode::Subtraction => "subtraction",
            Mode::SkipCount => "skipcount",
            Mode::Patterns => "patterns",
            Mode::Groups => "groups",
            Mode::Multiplication => "multiplication",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Addition => "Addition",
            Mode::Subtraction => "Subtraction",
            Mode::SkipCount => "Skip Count",
            Mode::Patterns => "Patterns",
            Mode::Groups => "Counting Groups",
            Mode::Multiplication => "Multiplication",
        }
    }

    pub fn from_name(name: &str) -> Option<Mode> {
        let name = name.trim().to_ascii_lowercase();
        Mode::all().into_iter().find(|mode| mode.name() == name)
    }

    /// Multiple-choice modes present a fixed set of options instead of a number pad.
    pub fn is_multiple_choice(&self) -> bool {
        matches!(self, Mode::Patterns)
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::from_name(s).ok_or_else(|| UnknownMode(s.to_string()))
    }
}
