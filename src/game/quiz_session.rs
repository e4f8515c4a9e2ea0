use std::time::SystemTime;

use chrono::{DateTime, Local};
use log::{debug, info, warn};
use rand::Rng;

use crate::error::Result;
use crate::events::EventEmitter;
use crate::game::generators;
use crate::game::stats_manager::StatsManager;
use crate::game::streak::AnswerStreak;
use crate::model::{
    Character, Difficulty, Mode, PlayTimer, Problem, QuizEvent, Session, SessionSummary,
};

/// What the player sees after answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub answer: u32,
    pub streak: u32,
    pub star_earned: bool,
    pub score_delta: u32,
    /// Set when this answer's star moved the mode into a new tier.
    pub unlocked: Option<Difficulty>,
}

/// The problem on screen while in a gameplay mode.
#[derive(Debug)]
struct Round {
    mode: Mode,
    problem: Problem,
    answered: bool,
}

/// Drives play for a front end: pick a mode, fetch problems, submit answers,
/// go home. Owns the global run of correct answers and the session in progress.
#[derive(Debug)]
pub struct QuizSession<R: Rng> {
    stats: StatsManager,
    rng: R,
    streak: AnswerStreak,
    round: Option<Round>,
    summary: SessionSummary,
    timer: PlayTimer,
    events: EventEmitter<QuizEvent>,
}

impl<R: Rng> QuizSession<R> {
    pub fn new(stats: StatsManager, rng: R, events: EventEmitter<QuizEvent>) -> Self {
        Self {
            stats,
            rng,
            streak: AnswerStreak::default(),
            round: None,
            summary: SessionSummary::default(),
            timer: PlayTimer::default(),
            events,
        }
    }

    pub fn stats(&self) -> &StatsManager {
        &self.stats
    }

    pub fn select_character(&mut self, character: Character) -> Result<()> {
        self.stats.select_character(character)
    }

    /// Clears saved progress along with everything tracked for the session in
    /// progress: the answer streak, the unsaved session counts, the play timer
    /// and the problem on screen.
    pub fn reset_progress(&mut self) -> Result<()> {
        self.streak = AnswerStreak::default();
        self.summary = SessionSummary::default();
        self.timer = PlayTimer::default();
        self.round = None;
        self.stats.reset()
    }

    pub fn streak(&self) -> u32 {
        self.streak.current()
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    pub fn current_mode(&self) -> Option<Mode> {
        self.round.as_ref().map(|round| round.mode)
    }

    pub fn current_problem(&self) -> Option<&Problem> {
        self.round.as_ref().map(|round| &round.problem)
    }

    pub fn enter_mode(&mut self, mode: Mode) -> &Problem {
        self.enter_mode_at(mode, SystemTime::now())
    }

    /// Switches to a gameplay screen. Play time accrues from the first mode
    /// entered until the player goes home.
    pub fn enter_mode_at(&mut self, mode: Mode, now: SystemTime) -> &Problem {
        self.timer.start(now);
        let problem = self.generate(mode);
        info!(target: "quiz", "Entering {} at {} difficulty", mode, problem.difficulty());
        &self
            .round
            .insert(Round {
                mode,
                problem,
                answered: false,
            })
            .problem
    }

    /// Replaces the current problem with a fresh one at the mode's current tier.
    pub fn next_problem(&mut self) -> Option<&Problem> {
        let mode = self.current_mode()?;
        let problem = self.generate(mode);
        let round = self.round.as_mut()?;
        round.problem = problem;
        round.answered = false;
        Some(&round.problem)
    }

    pub fn submit_answer(&mut self, given: u32) -> Option<AnswerFeedback> {
        self.check_answer(Some(given), Local::now())
    }

    pub fn submit_answer_at(&mut self, given: u32, now: DateTime<Local>) -> Option<AnswerFeedback> {
        self.check_answer(Some(given), now)
    }

    /// Number-pad input; anything that is not a whole number counts as wrong.
    pub fn submit_text(&mut self, input: &str) -> Option<AnswerFeedback> {
        self.check_answer(input.trim().parse().ok(), Local::now())
    }

    /// Returns home, saving the session and the play time accrued since
    /// entering gameplay. Returns the saved session, if any problems were tried.
    pub fn go_home(&mut self) -> Option<Session> {
        self.go_home_at(SystemTime::now())
    }

    pub fn go_home_at(&mut self, now: SystemTime) -> Option<Session> {
        self.round = None;

        let elapsed = self.timer.stop(now);
        log_failure(self.stats.add_session_time(elapsed), "play time");

        let summary = std::mem::take(&mut self.summary);
        match self.stats.save_session_at(summary, now.into()) {
            Ok(Some(session)) => {
                info!(
                    target: "quiz",
                    "Saved session: {}/{} correct in {}s",
                    session.correct,
                    session.problems,
                    elapsed.as_secs()
                );
                self.events.emit(&QuizEvent::SessionSaved(session.clone()));
                Some(session)
            }
            Ok(None) => None,
            Err(err) => {
                warn!(target: "quiz", "Failed to save session: {}", err);
                None
            }
        }
    }

    fn generate(&mut self, mode: Mode) -> Problem {
        let difficulty = self.stats.difficulty(mode);
        generators::generate(mode, difficulty, &mut self.rng)
    }

    fn check_answer(&mut self, given: Option<u32>, now: DateTime<Local>) -> Option<AnswerFeedback> {
        let round = self.round.as_mut()?;
        if round.answered {
            debug!(target: "quiz", "Ignoring repeat answer for the same problem");
            return None;
        }
        round.answered = true;
        let (mode, answer) = (round.mode, round.problem.answer());
        let correct = given.is_some_and(|given| round.problem.check(given));

        let update = self.streak.register(correct);
        let before = self.stats.difficulty(mode);

        self.summary.record(mode, correct);
        log_failure(
            self.stats
                .record_attempt_at(mode, correct, update.score_delta, update.star_earned, now),
            "attempt",
        );
        log_failure(self.stats.update_best_streak(update.streak), "best streak");

        let after = self.stats.difficulty(mode);
        let unlocked = (after > before).then_some(after);

        self.events.emit(&QuizEvent::AnswerChecked {
            mode,
            correct,
            answer,
            streak: update.streak,
        });
        if update.star_earned {
            self.events.emit(&QuizEvent::StarEarned {
                mode,
                mode_stars: self.stats.mode(mode).stars,
                total_stars: self.stats.stats().total_stars,
            });
        }
        if let Some(difficulty) = unlocked {
            info!(target: "quiz", "{} unlocked {}", mode, difficulty);
            self.events
                .emit(&QuizEvent::DifficultyUnlocked { mode, difficulty });
        }

        Some(AnswerFeedback {
            correct,
            answer,
            streak: update.streak,
            star_earned: update.star_earned,
            score_delta: update.score_delta,
            unlocked,
        })
    }
}

fn log_failure(result: Result<()>, what: &str) {
    if let Err(err) = result {
        warn!(target: "quiz", "Failed to save {}: {}", what, err);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use test_context::test_context;

    use super::*;
    use crate::events::{Channel, EventObserver};
    use crate::game::store::MemoryBackend;
    use crate::tests::UsingLogger;

    fn quiz() -> (QuizSession<StdRng>, EventObserver<QuizEvent>) {
        let (emitter, observer) = Channel::new();
        let stats = StatsManager::with_backend(MemoryBackend::new());
        (
            QuizSession::new(stats, StdRng::seed_from_u64(7), emitter),
            observer,
        )
    }

    fn answer_correctly<R: Rng>(quiz: &mut QuizSession<R>) -> AnswerFeedback {
        let answer = quiz.current_problem().unwrap().answer();
        let feedback = quiz.submit_answer(answer).unwrap();
        quiz.next_problem();
        feedback
    }

    fn collect_events(observer: &EventObserver<QuizEvent>) -> Rc<RefCell<Vec<QuizEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        observer.subscribe(move |event: &QuizEvent| {
            sink.borrow_mut().push(event.clone())
        });
        events
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_fifth_correct_in_a_row_earns_one_star(_: &mut UsingLogger) {
        let (mut quiz, observer) = quiz();
        let events = collect_events(&observer);
        quiz.enter_mode(Mode::Addition);

        let stars: Vec<bool> = (0..6)
            .map(|_| answer_correctly(&mut quiz).star_earned)
            .collect();
        assert_eq!(stars, vec![false, false, false, false, true, false]);
        assert_eq!(quiz.stats().mode(Mode::Addition).stars, 1);
        assert_eq!(quiz.stats().stats().total_score, 60);

        let star_events = events
            .borrow()
            .iter()
            .filter(|event| matches!(event, QuizEvent::StarEarned { .. }))
            .count();
        assert_eq!(star_events, 1);

        for _ in 0..4 {
            answer_correctly(&mut quiz);
        }
        assert_eq!(quiz.stats().mode(Mode::Addition).stars, 2);
        assert_eq!(quiz.stats().stats().best_streak, 10);
    }

    #[test]
    fn test_streak_is_shared_across_modes() {
        let (mut quiz, _observer) = quiz();
        quiz.enter_mode(Mode::Addition);
        for _ in 0..3 {
            answer_correctly(&mut quiz);
        }
        quiz.enter_mode(Mode::Groups);
        answer_correctly(&mut quiz);
        let fifth = answer_correctly(&mut quiz);

        assert!(fifth.star_earned);
        assert_eq!(quiz.stats().mode(Mode::Groups).stars, 1);
        assert_eq!(quiz.stats().mode(Mode::Addition).stars, 0);
    }

    #[test]
    fn test_wrong_and_garbled_answers() {
        let (mut quiz, _observer) = quiz();
        quiz.enter_mode(Mode::Subtraction);
        answer_correctly(&mut quiz);

        let feedback = quiz.submit_text("seven").unwrap();
        assert!(!feedback.correct);
        assert_eq!(feedback.streak, 0);
        assert_eq!(quiz.streak(), 0);
        assert_eq!(quiz.stats().stats().best_streak, 1);

        // Answering the same problem twice is ignored.
        assert_eq!(quiz.submit_answer(feedback.answer), None);
        assert_eq!(quiz.stats().mode(Mode::Subtraction).attempted, 2);
    }

    #[test]
    fn test_no_answers_outside_gameplay() {
        let (mut quiz, _observer) = quiz();
        assert_eq!(quiz.submit_answer(3), None);
        assert_eq!(quiz.next_problem(), None);
        assert_eq!(quiz.go_home(), None);
        assert!(quiz.stats().sessions().is_empty());
    }

    #[test]
    fn test_go_home_flushes_session_and_time() {
        let (mut quiz, observer) = quiz();
        let events = collect_events(&observer);
        let start = SystemTime::now();

        quiz.enter_mode_at(Mode::Patterns, start);
        answer_correctly(&mut quiz);
        quiz.submit_answer(0).unwrap();
        quiz.enter_mode_at(Mode::SkipCount, start + Duration::from_secs(40));
        answer_correctly(&mut quiz);

        let session = quiz.go_home_at(start + Duration::from_secs(95)).unwrap();
        assert_eq!(session.problems, 3);
        assert_eq!(session.correct, 2);
        assert!(session.modes.contains(&Mode::Patterns));
        assert!(session.modes.contains(&Mode::SkipCount));
        assert_eq!(quiz.stats().stats().total_time, Duration::from_secs(95));
        assert!(quiz.summary().is_empty());
        assert_eq!(quiz.current_mode(), None);
        assert!(matches!(
            events.borrow().last(),
            Some(QuizEvent::SessionSaved(saved)) if saved.problems == 3
        ));

        // Home screen time does not count toward play time.
        assert_eq!(quiz.go_home_at(start + Duration::from_secs(500)), None);
        assert_eq!(quiz.stats().stats().total_time, Duration::from_secs(95));
    }

    #[test]
    fn test_tenth_star_unlocks_medium() {
        let (mut quiz, observer) = quiz();
        let events = collect_events(&observer);
        quiz.enter_mode(Mode::Multiplication);

        let unlocks: Vec<Difficulty> = (0..50)
            .filter_map(|_| answer_correctly(&mut quiz).unlocked)
            .collect();
        assert_eq!(unlocks, vec![Difficulty::Medium]);
        assert_eq!(
            quiz.stats().difficulty(Mode::Multiplication),
            Difficulty::Medium
        );
        assert_eq!(
            quiz.current_problem().unwrap().difficulty(),
            Difficulty::Medium
        );
        assert!(events.borrow().contains(&QuizEvent::DifficultyUnlocked {
            mode: Mode::Multiplication,
            difficulty: Difficulty::Medium,
        }));
    }

    #[test]
    fn test_reset_progress_starts_the_session_over() {
        let (mut quiz, _observer) = quiz();
        quiz.select_character(Character::Mikey).unwrap();
        quiz.enter_mode(Mode::Addition);
        for _ in 0..4 {
            answer_correctly(&mut quiz);
        }

        quiz.reset_progress().unwrap();
        assert_eq!(quiz.streak(), 0);
        assert!(quiz.summary().is_empty());
        assert_eq!(quiz.current_mode(), None);
        assert_eq!(quiz.stats().stats().total_problems, 0);
        assert_eq!(quiz.stats().character(), Character::Mikey);

        quiz.enter_mode(Mode::Addition);
        let first = answer_correctly(&mut quiz);
        assert_eq!(first.streak, 1);
        assert!(!first.star_earned);
        assert_eq!(quiz.stats().mode(Mode::Addition).stars, 0);
        assert!(quiz.stats().stats().best_streak >= quiz.streak());

        let session = quiz.go_home().unwrap();
        assert_eq!(session.problems, 1);
        assert!(quiz.stats().stats().total_problems >= session.problems);
    }

    #[test]
    fn test_persistence_failure_does_not_stop_play() {
        let (emitter, _observer) = Channel::new();
        let stats = StatsManager::with_backend(MemoryBackend::read_only());
        let mut quiz = QuizSession::new(stats, StdRng::seed_from_u64(3), emitter);

        quiz.enter_mode(Mode::Groups);
        let feedback = answer_correctly(&mut quiz);
        assert!(feedback.correct);
        assert_eq!(quiz.stats().mode(Mode::Groups).correct, 1);
        assert_eq!(quiz.go_home(), None);
    }
}
