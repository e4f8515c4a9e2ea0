use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::helpers::percentage;
use crate::model::Mode;

pub const MAX_SESSIONS: usize = 30;

/// One block of play between leaving and returning to the home screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub problems: u32,
    pub correct: u32,
    #[serde(default)]
    pub modes: BTreeSet<Mode>,
}

impl Session {
    pub fn accuracy(&self) -> u32 {
        percentage(self.correct, self.problems)
    }
}

/// Counters for the session in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub problems: u32,
    pub correct: u32,
    pub modes: BTreeSet<Mode>,
}

impl SessionSummary {
    pub fn record(&mut self, mode: Mode, is_correct: bool) {
        self.problems = self.problems.saturating_add(1);
        if is_correct {
            self.correct = self.correct.saturating_add(1);
        }
        self.modes.insert(mode);
    }

    pub fn is_empty(&self) -> bool {
        self.problems == 0
    }

    pub fn into_session(self, date: DateTime<Utc>) -> Session {
        Session {
            id: Uuid::new_v4(),
            date,
            problems: self.problems,
            correct: self.correct,
            modes: self.modes,
        }
    }
}

/// Session history, newest first, holding at most [`MAX_SESSIONS`] entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SessionLog {
    sessions: Vec<Session>,
}

impl SessionLog {
    pub fn push(&mut self, session: Session) {
        self.sessions.insert(0, session);
        self.sessions.truncate(MAX_SESSIONS);
    }

    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &Session> {
        self.sessions.iter().take(limit)
    }

    pub fn latest(&self) -> Option<&Session> {
        self.sessions.first()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter()
    }
}
