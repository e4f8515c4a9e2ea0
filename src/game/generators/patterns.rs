//! "What comes next?" sequences drawn from a fixed catalog.

use std::sync::OnceLock;

use log::trace;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use crate::model::{Difficulty, PatternProblem};

pub const PATTERN_LENGTH: usize = 4;
const DISTRACTOR_COUNT: usize = 2;
/// Distractors are drawn from `answer - DISTRACTOR_WINDOW ..= answer + DISTRACTOR_WINDOW`.
const DISTRACTOR_WINDOW: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternRule {
    /// Count up by one.
    Counting,
    Odd,
    Even,
    Step(u32),
    Doubling,
    Squares,
}

impl PatternRule {
    pub fn label(&self) -> String {
        match self {
            PatternRule::Counting => "+1".to_string(),
            PatternRule::Odd => "odd".to_string(),
            PatternRule::Even => "even".to_string(),
            PatternRule::Step(step) => format!("+{}", step),
            PatternRule::Doubling => "x2".to_string(),
            PatternRule::Squares => "n²".to_string(),
        }
    }

    pub fn hint(&self) -> String {
        match self {
            PatternRule::Counting => "Count up by 1".to_string(),
            PatternRule::Odd => "Odd numbers".to_string(),
            PatternRule::Even => "Even numbers".to_string(),
            PatternRule::Step(step) => format!("Add {} each time", step),
            PatternRule::Doubling => "Double each time".to_string(),
            PatternRule::Squares => "1x1, 2x2, 3x3, 4x4...".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub pattern: [u32; PATTERN_LENGTH],
    pub next: u32,
    pub rule: PatternRule,
    pub difficulty: Difficulty,
}

/// Every tier can play the easy entries, so this only stands in for an empty draw.
static FIRST_COUNTING: CatalogEntry = CatalogEntry {
    pattern: [1, 2, 3, 4],
    next: 5,
    rule: PatternRule::Counting,
    difficulty: Difficulty::Easy,
};

impl CatalogEntry {
    fn stepped(start: u32, step: u32, rule: PatternRule, difficulty: Difficulty) -> Self {
        Self {
            pattern: [start, start + step, start + 2 * step, start + 3 * step],
            next: start + 4 * step,
            rule,
            difficulty,
        }
    }

    fn fixed(
        pattern: [u32; PATTERN_LENGTH],
        next: u32,
        rule: PatternRule,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            pattern,
            next,
            rule,
            difficulty,
        }
    }
}

fn counting_patterns() -> Vec<CatalogEntry> {
    (1..=10)
        .map(|start| CatalogEntry::stepped(start, 1, PatternRule::Counting, Difficulty::Easy))
        .collect()
}

fn odd_even_patterns() -> Vec<CatalogEntry> {
    use Difficulty::{Easy, Medium};
    use PatternRule::{Even, Odd};

    vec![
        CatalogEntry::fixed([1, 3, 5, 7], 9, Odd, Easy),
        CatalogEntry::fixed([3, 5, 7, 9], 11, Odd, Easy),
        CatalogEntry::fixed([5, 7, 9, 11], 13, Odd, Easy),
        CatalogEntry::fixed([11, 13, 15, 17], 19, Odd, Medium),
        CatalogEntry::fixed([2, 4, 6, 8], 10, Even, Easy),
        CatalogEntry::fixed([4, 6, 8, 10], 12, Even, Easy),
        CatalogEntry::fixed([10, 12, 14, 16], 18, Even, Medium),
        CatalogEntry::fixed([20, 22, 24, 26], 28, Even, Medium),
    ]
}

fn step_patterns() -> Vec<CatalogEntry> {
    let mut entries = Vec::new();

    let mut add = |start, step, difficulty| {
        let entry = CatalogEntry::stepped(start, step, PatternRule::Step(step), difficulty);
        entries.push(entry);
    };

    // Easy steps start at 0, step and 2 * step.
    for step in [1, 2, 5, 10] {
        for start in (0..=step * 2).step_by(step as usize) {
            add(start, step, Difficulty::Easy);
        }
    }
    for step in [3, 4, 6] {
        for start in 0..=step {
            add(start, step, Difficulty::Medium);
        }
    }
    for step in [7, 8, 9, 11, 12] {
        for start in 0..=2 {
            add(start, step, Difficulty::Hard);
        }
    }

    entries.retain(|entry| match entry.difficulty {
        Difficulty::Medium => entry.next <= 50,
        _ => entry.next <= 60,
    });
    entries
}

fn doubling_and_square_patterns() -> Vec<CatalogEntry> {
    use Difficulty::{Hard, Medium};
    use PatternRule::{Doubling, Squares};

    vec![
        CatalogEntry::fixed([1, 2, 4, 8], 16, Doubling, Medium),
        CatalogEntry::fixed([2, 4, 8, 16], 32, Doubling, Hard),
        CatalogEntry::fixed([3, 6, 12, 24], 48, Doubling, Hard),
        CatalogEntry::fixed([1, 4, 9, 16], 25, Squares, Hard),
    ]
}

pub fn catalog() -> &'static [CatalogEntry] {
    static CATALOG: OnceLock<Vec<CatalogEntry>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        let mut entries = counting_patterns();
        entries.extend(odd_even_patterns());
        entries.extend(step_patterns());
        entries.extend(doubling_and_square_patterns());
        entries
    })
}

/// Catalog entries playable at `difficulty`: its own tier and every easier one.
pub fn available(difficulty: Difficulty) -> Vec<&'static CatalogEntry> {
    catalog()
        .iter()
        .filter(|entry| entry.difficulty <= difficulty)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatternCounts {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
    pub total: usize,
}

pub fn pattern_counts() -> PatternCounts {
    let count = |difficulty| {
        catalog()
            .iter()
            .filter(|entry| entry.difficulty == difficulty)
            .count()
    };
    PatternCounts {
        easy: count(Difficulty::Easy),
        medium: count(Difficulty::Medium),
        hard: count(Difficulty::Hard),
        total: catalog().len(),
    }
}

/// Two distinct positive values near `answer`, never the answer itself.
fn distractors<R: Rng>(answer: u32, rng: &mut R) -> Vec<u32> {
    let candidates: Vec<u32> = (-DISTRACTOR_WINDOW..=DISTRACTOR_WINDOW)
        .map(|offset| answer as i64 + offset)
        .filter(|&value| value > 0 && value != answer as i64)
        .map(|value| value as u32)
        .collect();
    candidates
        .choose_multiple(rng, DISTRACTOR_COUNT)
        .copied()
        .collect()
}

pub fn generate_pattern<R: Rng>(difficulty: Difficulty, rng: &mut R) -> PatternProblem {
    let entries = available(difficulty);
    let entry = entries.choose(rng).copied().unwrap_or(&FIRST_COUNTING);
    trace!(target: "generator", "pattern {:?} from {} candidates", entry, entries.len());

    let mut options = distractors(entry.next, rng);
    options.push(entry.next);
    options.shuffle(rng);

    PatternProblem::new(
        entry.pattern.to_vec(),
        entry.next,
        options,
        entry.rule.label(),
        entry.rule.hint(),
        entry.difficulty,
    )
}
