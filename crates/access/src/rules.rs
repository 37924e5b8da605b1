use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use shopfloor_core::{ConfigError, ConfigResult, Permission, Role, RoutePath};

/// Coarse route rule: which roles may enter a path prefix.
///
/// Rules form a priority-ordered list. Matching selects the longest covering
/// prefix; equal-length candidates resolve to the earliest-declared rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRule {
    pub prefix: RoutePath,
    pub allowed_roles: Vec<Role>,
}

impl RouteRule {
    pub fn new(prefix: impl Into<RoutePath>, allowed_roles: impl Into<Vec<Role>>) -> Self {
        Self {
            prefix: prefix.into(),
            allowed_roles: allowed_roles.into(),
        }
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles.contains(&role)
    }
}

/// Fine-grained override for a path pattern.
///
/// When present for a matched path, the requirement is authoritative in both
/// directions: it can rescue a navigation the coarse rule denied, and it can
/// tighten one the coarse rule allowed. `roles` is consulted before
/// `permission`; whichever gates are present must all pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRequirement {
    pub pattern: RoutePath,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Role>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<Permission>,
}

/// Which gate of a [`PermissionRequirement`] failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementFailure {
    RoleExcluded,
    PermissionMissing,
}

impl PermissionRequirement {
    pub fn role_gate(pattern: impl Into<RoutePath>, roles: impl Into<Vec<Role>>) -> Self {
        Self {
            pattern: pattern.into(),
            roles: Some(roles.into()),
            permission: None,
        }
    }

    pub fn permission_gate(pattern: impl Into<RoutePath>, permission: Permission) -> Self {
        Self {
            pattern: pattern.into(),
            roles: None,
            permission: Some(permission),
        }
    }

    /// Check the gates in documented order: roles first, then permission.
    pub fn check(&self, role: Role, permissions: &[Permission]) -> Result<(), RequirementFailure> {
        if let Some(roles) = &self.roles {
            if !roles.contains(&role) {
                return Err(RequirementFailure::RoleExcluded);
            }
        }
        if let Some(required) = &self.permission {
            if !permissions.contains(required) {
                return Err(RequirementFailure::PermissionMissing);
            }
        }
        Ok(())
    }
}

/// Per-role default landing route, total over the closed role set.
///
/// Totality is enforced at construction, so lookups are infallible and the
/// resolver always has a redirect target for a denied navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultRoutes {
    routes: [RoutePath; Role::ALL.len()],
}

impl DefaultRoutes {
    /// Build from a total mapping. The closure is exhaustive by construction.
    pub fn new(route_for: impl Fn(Role) -> RoutePath) -> Self {
        Self {
            routes: Role::ALL.map(route_for),
        }
    }

    pub fn route_for(&self, role: Role) -> &RoutePath {
        &self.routes[role.index()]
    }
}

impl TryFrom<HashMap<Role, RoutePath>> for DefaultRoutes {
    type Error = ConfigError;

    fn try_from(map: HashMap<Role, RoutePath>) -> ConfigResult<Self> {
        for role in Role::ALL {
            if !map.contains_key(&role) {
                return Err(ConfigError::MissingDefaultRoute(role));
            }
        }
        // Total by the check above.
        Ok(Self::new(|role| map[&role].clone()))
    }
}

impl From<DefaultRoutes> for HashMap<Role, RoutePath> {
    fn from(value: DefaultRoutes) -> Self {
        Role::ALL.into_iter().zip(value.routes).collect()
    }
}

/// Longest covering prefix wins; declaration order breaks length ties.
pub(crate) fn longest_match<'a, T>(
    items: &'a [T],
    path: &RoutePath,
    prefix_of: impl Fn(&T) -> &RoutePath,
) -> Option<&'a T> {
    let mut best: Option<&'a T> = None;
    for item in items {
        let prefix = prefix_of(item);
        if !prefix.covers(path) {
            continue;
        }
        let better = match best {
            Some(current) => prefix.as_str().len() > prefix_of(current).as_str().len(),
            None => true,
        };
        if better {
            best = Some(item);
        }
    }
    best
}
