use std::fmt::Display;

use itertools::Itertools;

use crate::model::{Difficulty, Mode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
}

impl Operation {
    pub fn symbol(&self) -> char {
        match self {
            Operation::Add => '+',
            Operation::Subtract => '-',
            Operation::Multiply => '×',
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Operation::Add => Mode::Addition,
            Operation::Subtract => Mode::Subtraction,
            Operation::Multiply => Mode::Multiplication,
        }
    }

    fn apply(&self, a: u32, b: u32) -> u32 {
        match self {
            Operation::Add => a + b,
            Operation::Subtract => a.saturating_sub(b),
            Operation::Multiply => a * b,
        }
    }
}

/// `a <op> b = ?`
#[derive(Debug, Clone, PartialEq, Eq)]
#[readonly::make]
pub struct ArithmeticProblem {
    pub operation: Operation,
    pub a: u32,
    pub b: u32,
    pub answer: u32,
    pub difficulty: Difficulty,
}

impl ArithmeticProblem {
    pub fn new(operation: Operation, a: u32, b: u32, difficulty: Difficulty) -> Self {
        Self {
            operation,
            a,
            b,
            answer: operation.apply(a, b),
            difficulty,
        }
    }
}

/// An evenly stepped run of numbers with one position hidden.
#[derive(Debug, Clone, PartialEq, Eq)]
#[readonly::make]
pub struct SkipCountProblem {
    pub by: u32,
    pub sequence: Vec<u32>,
    /// Index of the hidden value; never 0.
    pub missing: usize,
    pub answer: u32,
    pub hint: String,
    pub difficulty: Difficulty,
}

impl SkipCountProblem {
    pub fn new(by: u32, start: u32, length: usize, missing: usize, difficulty: Difficulty) -> Self {
        let sequence: Vec<u32> = (0..length as u32).map(|i| start + by * i).collect();
        let answer = start + by * missing as u32;
        Self {
            by,
            sequence,
            missing,
            answer,
            hint: format!("Counting by {}s", by),
            difficulty,
        }
    }
}

/// "What comes next?" with three answer buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
#[readonly::make]
pub struct PatternProblem {
    pub pattern: Vec<u32>,
    pub answer: u32,
    pub options: Vec<u32>,
    pub rule: String,
    pub hint: String,
    pub difficulty: Difficulty,
}

impl PatternProblem {
    pub fn new(
        pattern: Vec<u32>,
        answer: u32,
        options: Vec<u32>,
        rule: String,
        hint: String,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            pattern,
            answer,
            options,
            rule,
            hint,
            difficulty,
        }
    }
}

/// `groups` groups of `per_group` items each.
#[derive(Debug, Clone, PartialEq, Eq)]
#[readonly::make]
pub struct GroupsProblem {
    pub groups: u32,
    pub per_group: u32,
    pub total: u32,
    pub difficulty: Difficulty,
}

impl GroupsProblem {
    pub fn new(groups: u32, per_group: u32, difficulty: Difficulty) -> Self {
        Self {
            groups,
            per_group,
            total: groups * per_group,
            difficulty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    Arithmetic(ArithmeticProblem),
    SkipCount(SkipCountProblem),
    Pattern(PatternProblem),
    Groups(GroupsProblem),
}

impl Problem {
    pub fn mode(&self) -> Mode {
        match self {
            Problem::Arithmetic(problem) => problem.operation.mode(),
            Problem::SkipCount(_) => Mode::SkipCount,
            Problem::Pattern(_) => Mode::Patterns,
            Problem::Groups(_) => Mode::Groups,
        }
    }

    pub fn answer(&self) -> u32 {
        match self {
            Problem::Arithmetic(problem) => problem.answer,
            Problem::SkipCount(problem) => problem.answer,
            Problem::Pattern(problem) => problem.answer,
            Problem::Groups(problem) => problem.total,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        match self {
            Problem::Arithmetic(problem) => problem.difficulty,
            Problem::SkipCount(problem) => problem.difficulty,
            Problem::Pattern(problem) => problem.difficulty,
            Problem::Groups(problem) => problem.difficulty,
        }
    }

    /// Answer buttons for multiple-choice problems.
    pub fn options(&self) -> Option<&[u32]> {
        match self {
            Problem::Pattern(problem) => Some(&problem.options),
            _ => None,
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            Problem::SkipCount(problem) => Some(&problem.hint),
            Problem::Pattern(problem) => Some(&problem.hint),
            _ => None,
        }
    }

    pub fn check(&self, given: u32) -> bool {
        given == self.answer()
    }
}

impl Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Problem::Arithmetic(problem) => write!(
                f,
                "{} {} {} = ?",
                problem.a,
                problem.operation.symbol(),
                problem.b
            ),
            Problem::SkipCount(problem) => {
                let cells = problem
                    .sequence
                    .iter()
                    .enumerate()
                    .map(|(i, value)| {
                        if i == problem.missing {
                            "?".to_string()
                        } else {
                            value.to_string()
                        }
                    })
                    .join(", ");
                write!(f, "Count by {}s: {}", problem.by, cells)
            }
            Problem::Pattern(problem) => {
                write!(f, "{} → ?", problem.pattern.iter().join(" → "))
            }
            Problem::Groups(problem) => write!(
                f,
                "{} groups of {}. How many in all?",
                problem.groups, problem.per_group
            ),
        }
    }
}
