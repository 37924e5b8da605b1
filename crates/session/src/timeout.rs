use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use shopfloor_core::{ConfigError, ConfigResult};

/// Idle thresholds for a session.
///
/// # Invariants
/// - Both durations are positive.
/// - The warning threshold is strictly shorter than the expiry threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TimeoutConfigMillis", into = "TimeoutConfigMillis")]
pub struct TimeoutConfig {
    warn_after: Duration,
    expire_after: Duration,
}

/// Wire shape: thresholds as milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct TimeoutConfigMillis {
    warn_after_ms: i64,
    expire_after_ms: i64,
}

impl TimeoutConfig {
    pub fn new(warn_after: Duration, expire_after: Duration) -> ConfigResult<Self> {
        if warn_after <= Duration::zero() || warn_after >= expire_after {
            let err = ConfigError::InvalidThresholds {
                warn_after_ms: warn_after.num_milliseconds(),
                expire_after_ms: expire_after.num_milliseconds(),
            };
            error!(%err, "session thresholds rejected");
            return Err(err);
        }
        Ok(Self {
            warn_after,
            expire_after,
        })
    }

    /// The application default: warn after 25 minutes idle, expire at 30.
    pub fn standard() -> Self {
        Self {
            warn_after: Duration::minutes(25),
            expire_after: Duration::minutes(30),
        }
    }

    pub fn warn_after(&self) -> Duration {
        self.warn_after
    }

    pub fn expire_after(&self) -> Duration {
        self.expire_after
    }
}

impl TryFrom<TimeoutConfigMillis> for TimeoutConfig {
    type Error = ConfigError;

    fn try_from(value: TimeoutConfigMillis) -> ConfigResult<Self> {
        Self::new(
            Duration::milliseconds(value.warn_after_ms),
            Duration::milliseconds(value.expire_after_ms),
        )
    }
}

impl From<TimeoutConfig> for TimeoutConfigMillis {
    fn from(value: TimeoutConfig) -> Self {
        Self {
            warn_after_ms: value.warn_after.num_milliseconds(),
            expire_after_ms: value.expire_after.num_milliseconds(),
        }
    }
}

/// Where a session currently sits in its idle lifecycle.
///
/// Derived from `(now, last_activity_at)` on every query; never stored as
/// the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// Idle time is below the warning threshold.
    Active,
    /// Idle time has reached the warning threshold but not expiry.
    Warning,
    /// Idle time has reached the expiry threshold. Terminal: leaving this
    /// phase requires re-authentication, not a reset.
    Expired,
}

/// Transition observed by a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    WarningEntered,
    Expired,
}

/// Reset attempted on an already-expired session.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("session already expired; re-authentication required")]
pub struct ResetExpiredSession;

/// Idle-time tracker for one session.
///
/// Holds the last-activity timestamp and the thresholds. The phase is
/// recomputed from `now` on every call; `observed` below is bookkeeping for
/// [`poll`](Self::poll) edge detection only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdleTimeout {
    config: TimeoutConfig,
    last_activity_at: DateTime<Utc>,
    observed: SessionPhase,
}

impl IdleTimeout {
    pub fn new(config: TimeoutConfig, now: DateTime<Utc>) -> Self {
        Self {
            config,
            last_activity_at: now,
            observed: SessionPhase::Active,
        }
    }

    pub fn config(&self) -> TimeoutConfig {
        self.config
    }

    pub fn last_activity_at(&self) -> DateTime<Utc> {
        self.last_activity_at
    }

    pub fn phase(&self, now: DateTime<Utc>) -> SessionPhase {
        let idle = now - self.last_activity_at;
        if idle >= self.config.expire_after {
            SessionPhase::Expired
        } else if idle >= self.config.warn_after {
            SessionPhase::Warning
        } else {
            SessionPhase::Active
        }
    }

    /// Time left until the warning threshold; zero once reached.
    pub fn time_until_warning(&self, now: DateTime<Utc>) -> Duration {
        remaining(self.config.warn_after, now - self.last_activity_at)
    }

    /// Time left until expiry; zero once reached, never negative.
    pub fn time_until_expiry(&self, now: DateTime<Utc>) -> Duration {
        remaining(self.config.expire_after, now - self.last_activity_at)
    }

    /// Record user activity, restarting the idle countdown.
    ///
    /// Fails once the session is expired: expiry forces re-authentication
    /// and is never undone by a late activity signal.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Result<(), ResetExpiredSession> {
        if self.phase(now) == SessionPhase::Expired {
            return Err(ResetExpiredSession);
        }
        self.last_activity_at = now;
        self.observed = SessionPhase::Active;
        Ok(())
    }

    /// Observe the current phase, reporting a transition at most once per
    /// entry into it. A reset re-arms the warning edge.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<SessionEvent> {
        let phase = self.phase(now);
        let event = match (self.observed, phase) {
            (SessionPhase::Active, SessionPhase::Warning) => Some(SessionEvent::WarningEntered),
            // A slow poller can skip straight past the warning window.
            (SessionPhase::Active | SessionPhase::Warning, SessionPhase::Expired) => {
                Some(SessionEvent::Expired)
            }
            _ => None,
        };
        match event {
            Some(SessionEvent::WarningEntered) => {
                info!(idle_ms = (now - self.last_activity_at).num_milliseconds(), "session entered idle warning");
            }
            Some(SessionEvent::Expired) => {
                info!(idle_ms = (now - self.last_activity_at).num_milliseconds(), "session expired");
            }
            None => {}
        }
        self.observed = phase;
        event
    }
}

fn remaining(threshold: Duration, idle: Duration) -> Duration {
    let left = threshold - idle;
    if left < Duration::zero() {
        Duration::zero()
    } else {
        left
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
