//! Policy configuration loading.
//!
//! Tables can be supplied as JSON at startup instead of the built-in
//! [`AccessPolicy::standard`] set. Loading validates everything up front:
//! a malformed document, a partial default-route map, or conflicting route
//! rules abort startup with a [`ConfigError`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::error;

use shopfloor_core::{ConfigError, ConfigResult, Role, RoutePath};

use crate::policy::AccessPolicy;
use crate::rules::{DefaultRoutes, PermissionRequirement, RouteRule};

/// Serialized shape of the policy tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub routes: Vec<RouteRule>,

    #[serde(default)]
    pub requirements: Vec<PermissionRequirement>,

    /// Must name every role exactly once.
    pub defaults: HashMap<Role, RoutePath>,
}

impl PolicyConfig {
    pub fn from_json(raw: &str) -> ConfigResult<Self> {
        serde_json::from_str(raw).map_err(|err| {
            let err = ConfigError::malformed(err.to_string());
            error!(%err, "policy configuration rejected");
            err
        })
    }

    pub fn build(self) -> ConfigResult<AccessPolicy> {
        let defaults = match DefaultRoutes::try_from(self.defaults) {
            Ok(defaults) => defaults,
            Err(err) => {
                error!(%err, "default route table rejected");
                return Err(err);
            }
        };
        AccessPolicy::new(self.routes, self.requirements, defaults)
    }
}

impl AccessPolicy {
    /// Load and validate tables from a JSON document.
    pub fn from_json(raw: &str) -> ConfigResult<Self> {
        PolicyConfig::from_json(raw)?.build()
    }
}
