use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use log::{debug, info, warn};

use crate::error::Result;
use crate::game::report;
use crate::game::settings::Settings;
use crate::game::store::{DirectoryBackend, MemoryBackend, ProgressStore, Record, StorageBackend};
use crate::model::{
    Character, Difficulty, Mode, ModeStats, ModeStatsTable, Session, SessionLog, SessionSummary,
    Stats, UnlockProgress,
};

/// Owns the persisted progress records and is the only thing that mutates them.
///
/// Records are loaded once when the manager is built. Every mutating call
/// applies its whole update in memory first and then writes the affected
/// records; a write failure is returned to the caller while the in-memory
/// state stays updated, so play continues and at worst the latest update is
/// missing after a restart.
#[derive(Debug)]
pub struct StatsManager {
    store: ProgressStore,
    stats: Stats,
    mode_stats: ModeStatsTable,
    sessions: SessionLog,
    character: Character,
}

impl StatsManager {
    /// Opens the records under the configured data directory, or keeps them in
    /// memory when no directory can be resolved.
    pub fn open(settings: &Settings) -> Self {
        match settings.resolved_data_dir() {
            Some(dir) => {
                info!(target: "stats", "Loading progress from {}", dir.display());
                Self::with_backend(DirectoryBackend::new(dir))
            }
            None => {
                warn!(target: "stats", "No data directory available, progress will not be saved");
                Self::with_backend(MemoryBackend::new())
            }
        }
    }

    pub fn with_backend(backend: impl StorageBackend + 'static) -> Self {
        let store = ProgressStore::new(backend);
        Self {
            stats: store.load(Record::Stats),
            mode_stats: store.load(Record::ModeStats),
            sessions: store.load(Record::Sessions),
            character: store.load(Record::Character),
            store,
        }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn mode_stats(&self) -> &ModeStatsTable {
        &self.mode_stats
    }

    pub fn mode(&self, mode: Mode) -> ModeStats {
        self.mode_stats.get(mode)
    }

    pub fn sessions(&self) -> &SessionLog {
        &self.sessions
    }

    pub fn character(&self) -> Character {
        self.character
    }

    /// Tier for the next problem in `mode`.
    pub fn difficulty(&self, mode: Mode) -> Difficulty {
        self.mode_stats.difficulty(mode)
    }

    pub fn unlock_progress(&self, mode: Mode) -> UnlockProgress {
        self.mode_stats.unlock_progress(mode)
    }

    pub fn mode_accuracy(&self, mode: Mode) -> u32 {
        self.mode_stats.get(mode).accuracy()
    }

    pub fn overall_accuracy(&self) -> u32 {
        self.stats.overall_accuracy()
    }

    pub fn is_returning_player(&self) -> bool {
        self.stats.is_returning_player()
    }

    pub fn time_since_last_play(&self) -> Option<String> {
        self.stats.time_since_last_play(Utc::now())
    }

    pub fn formatted_total_time(&self) -> String {
        self.stats.formatted_total_time()
    }

    pub fn record_attempt(
        &mut self,
        mode: Mode,
        is_correct: bool,
        score_delta: u32,
        star_earned: bool,
    ) -> Result<()> {
        self.record_attempt_at(mode, is_correct, score_delta, star_earned, Local::now())
    }

    /// Records one answer made at `now`: mode counters, lifetime totals and the
    /// daily streak move together.
    pub fn record_attempt_at(
        &mut self,
        mode: Mode,
        is_correct: bool,
        score_delta: u32,
        star_earned: bool,
        now: DateTime<Local>,
    ) -> Result<()> {
        self.mode_stats.record(mode, is_correct, star_earned);
        self.stats.record(is_correct, score_delta, star_earned);
        self.stats.mark_played(now);

        debug!(
            target: "stats",
            "{} attempt correct={} star={} -> {:?}, daily streak {}",
            mode,
            is_correct,
            star_earned,
            self.mode_stats.get(mode),
            self.stats.daily_streak
        );

        let mode_saved = self.store.save(Record::ModeStats, &self.mode_stats);
        let stats_saved = self.store.save(Record::Stats, &self.stats);
        mode_saved.and(stats_saved)
    }

    pub fn update_best_streak(&mut self, current_streak: u32) -> Result<()> {
        if current_streak <= self.stats.best_streak {
            return Ok(());
        }
        self.stats.update_best_streak(current_streak);
        self.store.save(Record::Stats, &self.stats)
    }

    pub fn add_session_time(&mut self, elapsed: Duration) -> Result<()> {
        if elapsed.is_zero() {
            return Ok(());
        }
        self.stats.add_time(elapsed);
        self.store.save(Record::Stats, &self.stats)
    }

    pub fn save_session(&mut self, summary: SessionSummary) -> Result<Option<Session>> {
        self.save_session_at(summary, Utc::now())
    }

    /// Appends a session record unless nothing was attempted.
    pub fn save_session_at(
        &mut self,
        summary: SessionSummary,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>> {
        if summary.is_empty() {
            return Ok(None);
        }
        let session = summary.into_session(now);
        self.sessions.push(session.clone());
        self.store.save(Record::Sessions, &self.sessions)?;
        Ok(Some(session))
    }

    pub fn select_character(&mut self, character: Character) -> Result<()> {
        self.character = character;
        self.store.save(Record::Character, &self.character)
    }

    /// Clears stats, mode stats and session history. The character choice is kept.
    pub fn reset(&mut self) -> Result<()> {
        info!(target: "stats", "Resetting all progress");
        self.stats = Stats::default();
        self.mode_stats = ModeStatsTable::default();
        self.sessions = SessionLog::default();

        let results = [
            self.store.remove(Record::Stats),
            self.store.remove(Record::ModeStats),
            self.store.remove(Record::Sessions),
        ];
        results.into_iter().collect()
    }

    pub fn export_report(&self) -> String {
        report::progress_report(
            &self.stats,
            &self.mode_stats,
            &self.sessions,
            Local::now().date_naive(),
        )
    }
}
