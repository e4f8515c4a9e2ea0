use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownCharacter;

/// Hero chosen on the home screen; `All` shows the whole team.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Character {
    #[default]
    All,
    Leo,
    Raph,
    Donnie,
    Mikey,
}

impl Character {
    pub fn all() -> [Character; 5] {
        [
            Character::All,
            Character::Leo,
            Character::Raph,
            Character::Donnie,
            Character::Mikey,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Character::All => "all",
            Character::Leo => "leo",
            Character::Raph => "raph",
            Character::Donnie => "donnie",
            Character::Mikey => "mikey",
        }
    }
}

impl Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Character {
    type Err = UnknownCharacter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Character::all()
            .into_iter()
            .find(|character| character.name() == name)
            .ok_or_else(|| UnknownCharacter(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roster() {
        assert_eq!("Mikey".parse::<Character>().unwrap(), Character::Mikey);
        assert!("shredder".parse::<Character>().is_err());
        assert_eq!(Character::default(), Character::All);
    }
}
