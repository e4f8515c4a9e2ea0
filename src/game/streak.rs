/// A star is awarded for every this-many consecutive correct answers.
pub const STAR_INTERVAL: u32 = 5;
pub const POINTS_PER_CORRECT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub streak: u32,
    pub star_earned: bool,
    pub score_delta: u32,
}

/// Run of consecutive correct answers, shared by every mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnswerStreak {
    current: u32,
}

impl AnswerStreak {
    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn register(&mut self, is_correct: bool) -> StreakUpdate {
        if !is_correct {
            self.current = 0;
            return StreakUpdate {
                streak: 0,
                star_earned: false,
                score_delta: 0,
            };
        }

        self.current = self.current.saturating_add(1);
        StreakUpdate {
            streak: self.current,
            star_earned: self.current % STAR_INTERVAL == 0,
            score_delta: POINTS_PER_CORRECT,
        }
    }
}
