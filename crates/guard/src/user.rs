use shopfloor_core::{Permission, Role, UserId};

/// Snapshot of the authenticated user, supplied by the identity layer.
///
/// The guard never caches this across navigations: the identity layer hands
/// over a fresh snapshot on every attempt so role or permission changes
/// propagate before the next resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub role: Role,
    pub permissions: Vec<Permission>,
    pub is_authenticated: bool,
}

impl CurrentUser {
    pub fn authenticated(user_id: UserId, role: Role, permissions: Vec<Permission>) -> Self {
        Self {
            user_id,
            role,
            permissions,
            is_authenticated: true,
        }
    }

    /// A visitor who has not signed in. Role and permissions are
    /// placeholders; the guard redirects to the login page before the
    /// resolver ever sees them.
    pub fn anonymous() -> Self {
        Self {
            user_id: UserId::new(),
            role: Role::Customer,
            permissions: Vec::new(),
            is_authenticated: false,
        }
    }
}
