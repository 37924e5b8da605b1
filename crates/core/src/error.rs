//! Configuration error model.
//!
//! Everything here is fatal at load time: a policy table or timeout threshold
//! that fails validation aborts startup. Per-call authorization outcomes are
//! ordinary return values and never appear in this taxonomy.

use thiserror::Error;

use crate::role::Role;

/// Result type used by policy constructors and loaders.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Fatal configuration error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A role has no default landing route.
    #[error("no default route configured for role '{0}'")]
    MissingDefaultRoute(Role),

    /// Two route rules share a prefix but disagree on the allowed roles.
    #[error("conflicting route rules for prefix '{0}'")]
    ConflictingRule(String),

    /// Session thresholds are unordered or non-positive.
    #[error("invalid session thresholds: warning at {warn_after_ms}ms, expiry at {expire_after_ms}ms")]
    InvalidThresholds {
        warn_after_ms: i64,
        expire_after_ms: i64,
    },

    /// Configuration input could not be parsed.
    #[error("malformed policy configuration: {0}")]
    Malformed(String),
}

impl ConfigError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    pub fn conflicting_rule(prefix: impl Into<String>) -> Self {
        Self::ConflictingRule(prefix.into())
    }
}
