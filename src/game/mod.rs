pub mod generators;
pub mod quiz_session;
pub mod report;
pub mod settings;
pub mod stats_manager;
pub mod store;
pub mod streak;

pub use generators::generate;
pub use quiz_session::{AnswerFeedback, QuizSession};
pub use settings::Settings;
pub use stats_manager::StatsManager;
pub use streak::{AnswerStreak, StreakUpdate};
