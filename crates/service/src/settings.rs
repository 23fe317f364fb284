//! Tuning for the job tracker and its poll loop.

use std::str::FromStr;
use std::time::Duration;

use liftlog_core::constants::{DEFAULT_OPTIMISTIC_GRACE_SECS, DEFAULT_POLL_INTERVAL_MS};
use liftlog_core::{CoreError, env_parse_with_default};

/// How a refresh combines server results with locally added jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcileMode {
    /// The view becomes exactly what the server returned.
    #[default]
    Replace,
    /// Server results, followed by optimistic jobs the server has not
    /// confirmed yet (until their grace period runs out).
    Merge,
}

impl ReconcileMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Replace => "replace",
            Self::Merge => "merge",
        }
    }
}

impl std::fmt::Display for ReconcileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReconcileMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "replace" => Ok(Self::Replace),
            "merge" => Ok(Self::Merge),
            _ => Err(CoreError::UnknownVariant { kind: "reconcile mode", value: s.to_owned() }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerSettings {
    pub mode: ReconcileMode,
    /// Delay between the end of one refresh and the start of the next.
    pub poll_interval: Duration,
    /// Merge mode only: how long an unconfirmed optimistic job is kept.
    pub optimistic_grace: Duration,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            mode: ReconcileMode::Replace,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            optimistic_grace: Duration::from_secs(DEFAULT_OPTIMISTIC_GRACE_SECS),
        }
    }
}

impl TrackerSettings {
    /// Reads `LIFTLOG_RECONCILE_MODE`, `LIFTLOG_POLL_INTERVAL_MS` and
    /// `LIFTLOG_OPTIMISTIC_GRACE_SECS`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            mode: env_parse_with_default("LIFTLOG_RECONCILE_MODE", ReconcileMode::Replace),
            poll_interval: Duration::from_millis(env_parse_with_default(
                "LIFTLOG_POLL_INTERVAL_MS",
                DEFAULT_POLL_INTERVAL_MS,
            )),
            optimistic_grace: Duration::from_secs(env_parse_with_default(
                "LIFTLOG_OPTIMISTIC_GRACE_SECS",
                DEFAULT_OPTIMISTIC_GRACE_SECS,
            )),
        }
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: ReconcileMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub const fn with_optimistic_grace(mut self, grace: Duration) -> Self {
        self.optimistic_grace = grace;
        self
    }
}
