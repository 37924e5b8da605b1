use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Role of an authenticated user.
///
/// The set is closed: the application ships with exactly these roles, and the
/// policy tables are validated against all of them at load time. Denial
/// decisions never depend on a role that the tables do not know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    SalesPerson,
    WorkshopEmployee,
    WarehouseManager,
    WarehouseEmployee,
    Customer,
}

impl Role {
    /// Every role, in declaration order. Used to check table totality.
    pub const ALL: [Role; 7] = [
        Role::Admin,
        Role::Manager,
        Role::SalesPerson,
        Role::WorkshopEmployee,
        Role::WarehouseManager,
        Role::WarehouseEmployee,
        Role::Customer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::SalesPerson => "sales_person",
            Role::WorkshopEmployee => "workshop_employee",
            Role::WarehouseManager => "warehouse_manager",
            Role::WarehouseEmployee => "warehouse_employee",
            Role::Customer => "customer",
        }
    }

    /// Stable index into per-role tables (declaration order).
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ConfigError::malformed(format!("unknown role '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_roles_round_trip_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn indices_follow_declaration_order() {
        for (position, role) in Role::ALL.iter().enumerate() {
            assert_eq!(role.index(), position);
        }
    }
}
