//! Plain-text progress report for parents, written out on demand.

use chrono::{Local, NaiveDate};
use itertools::Itertools;

use crate::helpers::Capitalize;
use crate::model::{ModeStatsTable, SessionLog, Stats};

pub const REPORT_SESSION_LIMIT: usize = 10;

pub fn progress_report(
    stats: &Stats,
    mode_stats: &ModeStatsTable,
    sessions: &SessionLog,
    generated: NaiveDate,
) -> String {
    let modes = mode_stats
        .iter()
        .map(|(mode, data)| {
            format!(
                "{}: {}/{} ({}%) - {} stars",
                mode.name().capitalize(),
                data.correct,
                data.attempted,
                data.accuracy(),
                data.stars
            )
        })
        .join("\n");

    let recent = sessions
        .recent(REPORT_SESSION_LIMIT)
        .map(|session| {
            format!(
                "{}: {}/{} ({}%)",
                session.date.with_timezone(&Local).format("%Y-%m-%d"),
                session.correct,
                session.problems,
                session.accuracy()
            )
        })
        .join("\n");

    let last_played = stats
        .last_played
        .map(|at| {
            at.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|| "never".to_string());

    format!(
        "\
Math Heroes Progress Report
Generated: {generated}

OVERALL STATS
-------------
Total Stars: {stars}
Total Score: {score}
Best Streak: {best}
Daily Streak: {daily} days
Total Time Played: {time}
Problems Answered: {correct}/{problems}
Overall Accuracy: {accuracy}%
Last Played: {last_played}

BY GAME MODE
------------
{modes}

RECENT SESSIONS
---------------
{recent}",
        generated = generated.format("%Y-%m-%d"),
        stars = stats.total_stars,
        score = stats.total_score,
        best = stats.best_streak,
        daily = stats.daily_streak,
        time = stats.formatted_total_time(),
        correct = stats.total_correct,
        problems = stats.total_problems,
        accuracy = stats.overall_accuracy(),
    )
    .trim_end()
    .to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::model::{Mode, SessionSummary};

    #[test]
    fn test_report_surfaces_every_mode_and_recent_sessions() {
        let mut stats = Stats::default();
        stats.total_stars = 3;
        stats.total_score = 150;
        stats.best_streak = 12;
        stats.daily_streak = 4;
        stats.total_problems = 20;
        stats.total_correct = 15;

        let mut table = ModeStatsTable::default();
        for _ in 0..3 {
            table.record(Mode::SkipCount, true, false);
        }
        table.record(Mode::SkipCount, false, false);

        let mut sessions = SessionLog::default();
        for n in 1..=12 {
            let summary = SessionSummary {
                problems: 10,
                correct: n % 10,
                modes: BTreeSet::from([Mode::Addition]),
            };
            let date = Utc.with_ymd_and_hms(2024, 4, n, 12, 0, 0).unwrap();
            sessions.push(summary.into_session(date));
        }

        let report = progress_report(
            &stats,
            &table,
            &sessions,
            NaiveDate::from_ymd_opt(2024, 4, 20).unwrap(),
        );

        let header = "Math Heroes Progress Report\nGenerated: 2024-04-20";
        assert!(report.starts_with(header));
        assert!(report.contains("Total Stars: 3"));
        assert!(report.contains("Best Streak: 12"));
        assert!(report.contains("Daily Streak: 4 days"));
        assert!(report.contains("Overall Accuracy: 75%"));
        assert!(report.contains("Last Played: never"));
        assert!(report.contains("Skipcount: 3/4 (75%) - 0 stars"));
        assert!(report.contains("Multiplication: 0/0 (0%) - 0 stars"));

        let session_lines: Vec<&str> = report
            .split("---------------\n")
            .last()
            .unwrap()
            .lines()
            .collect();
        assert_eq!(session_lines.len(), REPORT_SESSION_LIMIT);
        assert!(session_lines[0].ends_with(": 2/10 (20%)"));
    }
}
