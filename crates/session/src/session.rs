use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timeout::{IdleTimeout, TimeoutConfig};

/// Identifier of one login session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new identifier.
    ///
    /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
    /// for determinism.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for SessionId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<SessionId> for Uuid {
    fn from(value: SessionId) -> Self {
        value.0
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// One logged-in session: identity plus its idle tracker.
///
/// Created at login, destroyed at logout or forced expiry. Not shared across
/// tabs or processes; if that is ever needed it must be layered externally
/// over a shared last-activity timestamp, with this same machine recomputing
/// from the shared value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    started_at: DateTime<Utc>,
    timeout: IdleTimeout,
}

impl Session {
    pub fn begin(config: TimeoutConfig, now: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::new(),
            started_at: now,
            timeout: IdleTimeout::new(config, now),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn timeout(&self) -> &IdleTimeout {
        &self.timeout
    }

    pub fn timeout_mut(&mut self) -> &mut IdleTimeout {
        &mut self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeout::SessionPhase;
    use chrono::{Duration, TimeZone};

    #[test]
    fn begin_starts_active_with_fresh_activity() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let session = Session::begin(TimeoutConfig::standard(), now);

        assert_eq!(session.started_at(), now);
        assert_eq!(session.timeout().last_activity_at(), now);
        assert_eq!(session.timeout().phase(now), SessionPhase::Active);
    }

    #[test]
    fn sessions_get_distinct_ids() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let a = Session::begin(TimeoutConfig::standard(), now);
        let b = Session::begin(TimeoutConfig::standard(), now);

        assert_ne!(a.id(), b.id());
        assert!(a.timeout().phase(now + Duration::minutes(1)) == SessionPhase::Active);
    }
}
