use core::str::FromStr;
use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Fine-grained `(module, action)` capability, e.g. `inventory.reports`.
///
/// Permissions are independent of roles: the identity layer grants them per
/// user, and the policy tables can require one to refine a coarse route rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission {
    module: Cow<'static, str>,
    action: Cow<'static, str>,
}

impl Permission {
    pub fn new(module: impl Into<Cow<'static, str>>, action: impl Into<Cow<'static, str>>) -> Self {
        Self {
            module: module.into(),
            action: action.into(),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn action(&self) -> &str {
        &self.action
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}", self.module, self.action)
    }
}

impl FromStr for Permission {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((module, action)) if !module.is_empty() && !action.is_empty() => {
                Ok(Self::new(module.to_owned(), action.to_owned()))
            }
            _ => Err(ConfigError::malformed(format!(
                "permission '{s}' is not of the form 'module.action'"
            ))),
        }
    }
}

impl TryFrom<String> for Permission {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.to_string()
    }
}
