use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};

use crate::helpers::percentage;
use crate::model::{Difficulty, Mode, UnlockProgress};

/// Lifetime totals for the installation.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub total_stars: u32,
    pub total_score: u32,
    pub best_streak: u32,
    pub last_played: Option<DateTime<Utc>>,
    pub total_problems: u32,
    pub total_correct: u32,
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(rename = "totalTimeSeconds")]
    pub total_time: Duration,
    pub daily_streak: u32,
    /// Device-local calendar date of the last attempt.
    pub last_play_date: Option<NaiveDate>,
}

impl Stats {
    pub fn record(&mut self, is_correct: bool, score_delta: u32, star_earned: bool) {
        self.total_problems = self.total_problems.saturating_add(1);
        if is_correct {
            self.total_correct = self.total_correct.saturating_add(1);
            self.total_score = self.total_score.saturating_add(score_delta);
        }
        if star_earned {
            self.total_stars = self.total_stars.saturating_add(1);
        }
    }

    /// Advances the daily streak for an attempt made at `now`.
    ///
    /// Playing again on the same day keeps the streak, playing on the next
    /// calendar day extends it, and a first play or a gap of two or more days
    /// starts over at 1. A date earlier than the stored one (clock moved
    /// backwards) leaves the streak as it is.
    pub fn mark_played(&mut self, now: DateTime<Local>) {
        let today = now.date_naive();
        self.daily_streak = match self.last_play_date {
            None => 1,
            Some(last) => match (today - last).num_days() {
                1 => self.daily_streak.saturating_add(1),
                gap if gap > 1 => 1,
                _ => self.daily_streak,
            },
        };
        self.last_play_date = Some(today);
        self.last_played = Some(now.with_timezone(&Utc));
    }

    pub fn update_best_streak(&mut self, current_streak: u32) {
        self.best_streak = self.best_streak.max(current_streak);
    }

    pub fn add_time(&mut self, elapsed: Duration) {
        self.total_time = self.total_time.saturating_add(elapsed);
    }

    pub fn overall_accuracy(&self) -> u32 {
        percentage(self.total_correct, self.total_problems)
    }

    pub fn is_returning_player(&self) -> bool {
        self.last_played.is_some()
    }

    pub fn time_since_last_play(&self, now: DateTime<Utc>) -> Option<String> {
        let last_played = self.last_played?;
        let days = (now - last_played).num_days().max(0);
        Some(match days {
            0 => "today".to_string(),
            1 => "yesterday".to_string(),
            n => format!("{} days ago", n),
        })
    }

    pub fn formatted_total_time(&self) -> String {
        let total_secs = self.total_time.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        if hours > 0 {
            format!("{}h {}m", hours, minutes)
        } else {
            format!("{}m", minutes)
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ModeStats {
    pub attempted: u32,
    pub correct: u32,
    pub stars: u32,
}

impl ModeStats {
    pub fn record(&mut self, is_correct: bool, star_earned: bool) {
        self.attempted = self.attempted.saturating_add(1);
        if is_correct {
            self.correct = self.correct.saturating_add(1);
        }
        if star_earned {
            self.stars = self.stars.saturating_add(1);
        }
    }

    pub fn accuracy(&self) -> u32 {
        percentage(self.correct, self.attempted)
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::for_stars(self.stars)
    }
}

/// Per-mode stats, always holding an entry for every mode.
///
/// Persisted as a map keyed by mode name. Keys that do not name a known mode
/// are dropped on load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(
    from = "BTreeMap<String, ModeStats>",
    into = "BTreeMap<String, ModeStats>"
)]
pub struct ModeStatsTable {
    entries: BTreeMap<Mode, ModeStats>,
}

impl Default for ModeStatsTable {
    fn default() -> Self {
        Self {
            entries: Mode::all()
                .into_iter()
                .map(|mode| (mode, ModeStats::default()))
                .collect(),
        }
    }
}

impl ModeStatsTable {
    pub fn get(&self, mode: Mode) -> ModeStats {
        self.entries.get(&mode).copied().unwrap_or_default()
    }

    /// Looks a mode up by its persisted name; unknown names read as zeroes.
    pub fn get_by_name(&self, name: &str) -> ModeStats {
        Mode::from_name(name)
            .map(|mode| self.get(mode))
            .unwrap_or_default()
    }

    pub fn record(&mut self, mode: Mode, is_correct: bool, star_earned: bool) {
        self.entries
            .entry(mode)
            .or_default()
            .record(is_correct, star_earned);
    }

    pub fn difficulty(&self, mode: Mode) -> Difficulty {
        self.get(mode).difficulty()
    }

    pub fn unlock_progress(&self, mode: Mode) -> UnlockProgress {
        UnlockProgress::for_stars(self.get(mode).stars)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Mode, ModeStats)> + '_ {
        self.entries.iter().map(|(mode, stats)| (*mode, *stats))
    }
}

impl From<BTreeMap<String, ModeStats>> for ModeStatsTable {
    fn from(raw: BTreeMap<String, ModeStats>) -> Self {
        let mut table = ModeStatsTable::default();
        for (name, stats) in raw {
            match Mode::from_name(&name) {
                Some(mode) => {
                    table.entries.insert(mode, stats);
                }
                None => warn!(target: "stats", "Dropping stats for unknown mode {:?}", name),
            }
        }
        table
    }
}

impl From<ModeStatsTable> for BTreeMap<String, ModeStats> {
    fn from(table: ModeStatsTable) -> Self {
        table
            .entries
            .into_iter()
            .map(|(mode, stats)| (mode.name().to_string(), stats))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(year, month, day, hour, 0, 0)
            .single()
            .unwrap()
    }

    #[test]
    fn test_daily_streak_progression() {
        let mut stats = Stats::default();

        stats.mark_played(local(2024, 3, 1, 9));
        assert_eq!(stats.daily_streak, 1);

        stats.mark_played(local(2024, 3, 1, 18));
        assert_eq!(stats.daily_streak, 1);

        stats.mark_played(local(2024, 3, 2, 8));
        assert_eq!(stats.daily_streak, 2);

        stats.mark_played(local(2024, 3, 4, 8));
        assert_eq!(stats.daily_streak, 1);
        assert_eq!(
            stats.last_play_date,
            Some(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap())
        );
    }

    #[test]
    fn test_counters_saturate_at_max() {
        let mut stats = Stats {
            total_stars: u32::MAX,
            total_score: u32::MAX,
            total_problems: u32::MAX,
            total_correct: u32::MAX,
            ..Stats::default()
        };
        stats.record(true, 10, true);
        assert_eq!(stats.total_problems, u32::MAX);
        assert_eq!(stats.total_correct, u32::MAX);
        assert_eq!(stats.total_stars, u32::MAX);
        assert_eq!(stats.total_score, u32::MAX);

        let full = ModeStats {
            attempted: u32::MAX,
            correct: u32::MAX,
            stars: u32::MAX,
        };
        let mut mode = full;
        mode.record(true, true);
        assert_eq!(mode, full);
    }

    #[test]
    fn test_daily_streak_crosses_month_boundary() {
        let mut stats = Stats::default();
        stats.mark_played(local(2024, 2, 28, 12));
        stats.mark_played(local(2024, 2, 29, 12));
        stats.mark_played(local(2024, 3, 1, 12));
        assert_eq!(stats.daily_streak, 3);
    }

    #[test]
    fn test_clock_moving_backwards_keeps_streak() {
        let mut stats = Stats::default();
        stats.mark_played(local(2024, 3, 1, 12));
        stats.mark_played(local(2024, 3, 2, 12));
        stats.mark_played(local(2024, 3, 1, 12));
        assert_eq!(stats.daily_streak, 2);
    }

    #[test]
    fn test_best_streak_never_decreases() {
        let mut stats = Stats::default();
        stats.update_best_streak(7);
        stats.update_best_streak(3);
        stats.update_best_streak(0);
        assert_eq!(stats.best_streak, 7);
    }

    #[test]
    fn test_formatted_total_time() {
        let mut stats = Stats::default();
        stats.add_time(Duration::from_secs(59));
        assert_eq!(stats.formatted_total_time(), "0m");
        stats.add_time(Duration::from_secs(25 * 60));
        assert_eq!(stats.formatted_total_time(), "25m");
        stats.add_time(Duration::from_secs(2 * 3600));
        assert_eq!(stats.formatted_total_time(), "2h 25m");
    }

    #[test]
    fn test_time_since_last_play() {
        let mut stats = Stats::default();
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        assert_eq!(stats.time_since_last_play(now), None);

        stats.last_played = Some(now - chrono::Duration::hours(3));
        assert_eq!(stats.time_since_last_play(now).as_deref(), Some("today"));

        stats.last_played = Some(now - chrono::Duration::hours(30));
        assert_eq!(
            stats.time_since_last_play(now).as_deref(),
            Some("yesterday")
        );

        stats.last_played = Some(now - chrono::Duration::days(6));
        assert_eq!(
            stats.time_since_last_play(now).as_deref(),
            Some("6 days ago")
        );
    }

    #[test]
    fn test_stats_json_shape() {
        let mut stats = Stats::default();
        stats.add_time(Duration::from_secs(90));
        stats.last_play_date = NaiveDate::from_ymd_opt(2024, 1, 2);

        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["totalTimeSeconds"], 90);
        assert_eq!(value["lastPlayDate"], "2024-01-02");
        assert!(value["lastPlayed"].is_null());
        assert_eq!(value["totalStars"], 0);
    }

    #[test]
    fn test_stats_missing_fields_use_defaults() {
        let stats: Stats = serde_json::from_str(r#"{"totalStars": 4}"#).unwrap();
        assert_eq!(stats.total_stars, 4);
        assert_eq!(stats.daily_streak, 0);
        assert_eq!(stats.total_time, Duration::ZERO);
    }

    #[test]
    fn test_mode_table_defaults_every_mode() {
        let table = ModeStatsTable::default();
        assert_eq!(table.iter().count(), 6);
        assert_eq!(table.get(Mode::Groups), ModeStats::default());
        assert_eq!(table.get_by_name("division"), ModeStats::default());
    }

    #[test]
    fn test_mode_table_load_drops_unknown_and_fills_missing() {
        let json = r#"{
            "addition": {"attempted": 4, "correct": 3, "stars": 1},
            "division": {"attempted": 9}
        }"#;
        let table: ModeStatsTable = serde_json::from_str(json).unwrap();

        assert_eq!(
            table.get(Mode::Addition),
            ModeStats {
                attempted: 4,
                correct: 3,
                stars: 1,
            }
        );
        assert_eq!(table.get(Mode::Multiplication), ModeStats::default());
        assert_eq!(table.iter().count(), 6);
    }

    #[test]
    fn test_mode_record_keeps_correct_within_attempted() {
        let mut table = ModeStatsTable::default();
        table.record(Mode::Patterns, true, false);
        table.record(Mode::Patterns, false, false);
        table.record(Mode::Patterns, true, true);

        let stats = table.get(Mode::Patterns);
        assert_eq!(stats.attempted, 3);
        assert_eq!(stats.correct, 2);
        assert_eq!(stats.stars, 1);
        assert_eq!(stats.accuracy(), 67);
    }
}
