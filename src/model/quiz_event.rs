use crate::model::{Difficulty, Mode, Session};

/// Notifications a quiz session sends to whatever is rendering it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    AnswerChecked {
        mode: Mode,
        correct: bool,
        answer: u32,
        streak: u32,
    },
    StarEarned {
        mode: Mode,
        mode_stars: u32,
        total_stars: u32,
    },
    DifficultyUnlocked {
        mode: Mode,
        difficulty: Difficulty,
    },
    SessionSaved(Session),
}
