mod character;
mod difficulty;
mod game_stats;
mod mode;
mod play_timer;
mod problem;
mod quiz_event;
mod session;

pub use character::Character;
pub use difficulty::{Difficulty, UnlockProgress, HARD_STAR_THRESHOLD, MEDIUM_STAR_THRESHOLD};
pub use game_stats::{ModeStats, ModeStatsTable, Stats};
pub use mode::Mode;
pub use play_timer::PlayTimer;
pub use problem::{
    ArithmeticProblem, GroupsProblem, Operation, PatternProblem, Problem, SkipCountProblem,
};
pub use quiz_event::QuizEvent;
pub use session::{Session, SessionLog, SessionSummary, MAX_SESSIONS};
