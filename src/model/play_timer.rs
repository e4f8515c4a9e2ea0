use std::time::{Duration, SystemTime};

/// Wall-clock sampling of active gameplay. Started when a gameplay screen is
/// entered and read when the player returns home; nothing ticks in between.
#[derive(Clone, Debug, Default)]
pub struct PlayTimer {
    started_timestamp: Option<SystemTime>,
}

impl PlayTimer {
    pub fn is_running(&self) -> bool {
        self.started_timestamp.is_some()
    }

    /// Starts the clock unless it is already running.
    pub fn start(&mut self, now: SystemTime) {
        if self.started_timestamp.is_none() {
            self.started_timestamp = Some(now);
        }
    }

    /// Stops the clock and returns the time since it started, in whole seconds.
    pub fn stop(&mut self, now: SystemTime) -> Duration {
        self.started_timestamp
            .take()
            .map(|started| now.duration_since(started).unwrap_or_default())
            .map(|elapsed| Duration::from_secs(elapsed.as_secs()))
            .unwrap_or_default()
    }
}
