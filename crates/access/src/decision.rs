use serde::{Deserialize, Serialize};

use shopfloor_core::RoutePath;

/// Outcome of a single access resolution.
///
/// Produced fresh on every call and never cached: role and permissions may
/// change between navigations. `Deny` is rare — it is only returned when the
/// redirect target would equal the denied path itself, which would otherwise
/// loop; the consumer renders nothing in that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    Allow,
    Redirect(RoutePath),
    Deny,
}

impl AccessDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}
