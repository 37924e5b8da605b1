use std::collections::HashSet;

use tracing::{debug, error};

use shopfloor_core::{ConfigError, ConfigResult, Permission, Role, RoutePath};

use crate::decision::AccessDecision;
use crate::rules::{
    DefaultRoutes, PermissionRequirement, RequirementFailure, RouteRule, longest_match,
};

/// Process-wide immutable authorization tables.
///
/// Loaded once at startup (either the built-in [`standard`](Self::standard)
/// tables or JSON configuration via [`PolicyConfig`](crate::PolicyConfig))
/// and then only read. Resolution is a pure function over these tables and
/// the caller-supplied user state.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<RouteRule>,
    requirements: Vec<PermissionRequirement>,
    defaults: DefaultRoutes,
}

/// Ingredients of one resolution, shared by `resolve` and `explain`.
pub(crate) struct Evaluation<'a> {
    pub rule: Option<&'a RouteRule>,
    pub requirement: Option<&'a PermissionRequirement>,
    pub coarse_allowed: bool,
    pub requirement_failure: Option<RequirementFailure>,
    pub granted: bool,
}

impl AccessPolicy {
    /// Assemble and lint a policy.
    ///
    /// Rejects duplicate prefixes whose role sets disagree; such tables have
    /// no well-defined winner beyond declaration order and are treated as an
    /// authoring mistake.
    pub fn new(
        rules: Vec<RouteRule>,
        requirements: Vec<PermissionRequirement>,
        defaults: DefaultRoutes,
    ) -> ConfigResult<Self> {
        if let Err(err) = lint_rules(&rules) {
            error!(%err, "route table failed validation");
            return Err(err);
        }
        Ok(Self {
            rules,
            requirements,
            defaults,
        })
    }

    /// The application's built-in tables.
    pub fn standard() -> Self {
        let rules = vec![
            RouteRule::new("/admin", [Role::Admin]),
            RouteRule::new("/manager", [Role::Admin, Role::Manager]),
            RouteRule::new("/pos", [Role::Admin, Role::Manager, Role::SalesPerson]),
            RouteRule::new(
                "/inventory",
                [
                    Role::Admin,
                    Role::Manager,
                    Role::WarehouseManager,
                    Role::WarehouseEmployee,
                ],
            ),
            RouteRule::new(
                "/inventory/reports",
                [Role::Admin, Role::Manager, Role::WarehouseManager],
            ),
            RouteRule::new(
                "/workshop",
                [Role::Admin, Role::Manager, Role::WorkshopEmployee],
            ),
            RouteRule::new("/customer", [Role::Customer]),
        ];

        let requirements = vec![
            PermissionRequirement::permission_gate("/admin/users", Permission::new("admin", "users")),
            PermissionRequirement::permission_gate(
                "/inventory/reports",
                Permission::new("inventory", "reports"),
            ),
            PermissionRequirement::role_gate("/customer/invoices", [Role::Customer]),
        ];

        let defaults = DefaultRoutes::new(|role| match role {
            Role::Admin => RoutePath::new("/admin"),
            Role::Manager => RoutePath::new("/manager"),
            Role::SalesPerson => RoutePath::new("/pos"),
            Role::WorkshopEmployee => RoutePath::new("/workshop"),
            Role::WarehouseManager | Role::WarehouseEmployee => RoutePath::new("/inventory"),
            Role::Customer => RoutePath::new("/customer"),
        });

        Self {
            rules,
            requirements,
            defaults,
        }
    }

    pub fn default_route(&self, role: Role) -> &RoutePath {
        self.defaults.route_for(role)
    }

    /// Resolve one navigation attempt.
    ///
    /// Pure and deterministic; assumes the caller is authenticated. Precedence:
    ///
    /// 1. The longest-prefix route rule decides coarsely; no match is a
    ///    coarse deny (secure by default).
    /// 2. A matching [`PermissionRequirement`] is authoritative both ways: it
    ///    must also pass when the coarse rule allowed, and it may rescue when
    ///    the coarse rule denied.
    /// 3. Denied navigation redirects to the role's default route — unless
    ///    that target is the denied path itself, which becomes `Deny`.
    pub fn resolve(
        &self,
        role: Role,
        permissions: &[Permission],
        path: &RoutePath,
    ) -> AccessDecision {
        let evaluation = self.evaluate(role, permissions, path);
        let decision = self.decide(role, path, &evaluation);
        debug!(role = %role, path = %path, decision = ?decision, "access resolved");
        decision
    }

    pub(crate) fn evaluate<'a>(
        &'a self,
        role: Role,
        permissions: &[Permission],
        path: &RoutePath,
    ) -> Evaluation<'a> {
        let rule = longest_match(&self.rules, path, |rule| &rule.prefix);
        let requirement = longest_match(&self.requirements, path, |req| &req.pattern);

        let coarse_allowed = rule.is_some_and(|rule| rule.allows(role));

        let (requirement_failure, granted) = match requirement {
            Some(req) => match req.check(role, permissions) {
                Ok(()) => (None, true),
                Err(failure) => (Some(failure), false),
            },
            None => (None, coarse_allowed),
        };

        Evaluation {
            rule,
            requirement,
            coarse_allowed,
            requirement_failure,
            granted,
        }
    }

    pub(crate) fn decide(
        &self,
        role: Role,
        path: &RoutePath,
        evaluation: &Evaluation<'_>,
    ) -> AccessDecision {
        if evaluation.granted {
            return AccessDecision::Allow;
        }

        let target = self.defaults.route_for(role);
        if target == path {
            AccessDecision::Deny
        } else {
            AccessDecision::Redirect(target.clone())
        }
    }
}

fn lint_rules(rules: &[RouteRule]) -> ConfigResult<()> {
    for (position, rule) in rules.iter().enumerate() {
        let roles: HashSet<Role> = rule.allowed_roles.iter().copied().collect();
        for other in &rules[position + 1..] {
            if other.prefix != rule.prefix {
                continue;
            }
            let other_roles: HashSet<Role> = other.allowed_roles.iter().copied().collect();
            if other_roles != roles {
                return Err(ConfigError::conflicting_rule(rule.prefix.as_str()));
            }
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(policy: &AccessPolicy, role: Role, permissions: &[Permission], path: &str) -> AccessDecision {
        policy.resolve(role, permissions, &RoutePath::new(path.to_owned()))
    }

    fn redirect(path: &str) -> AccessDecision {
        AccessDecision::Redirect(RoutePath::new(path.to_owned()))
    }

    #[test]
    fn every_default_route_is_reachable_by_its_role() {
        let policy = AccessPolicy::standard();
        for role in Role::ALL {
            let target = policy.default_route(role).clone();
            assert_eq!(
                policy.resolve(role, &[], &target),
                AccessDecision::Allow,
                "role {role} cannot reach its own default route {target}"
            );
        }
    }

    #[test]
    fn unknown_path_redirects_to_default_route() {
        let policy = AccessPolicy::standard();
        for role in Role::ALL {
            let decision = resolve(&policy, role, &[], "/reports/quarterly");
            assert_eq!(
                decision,
                AccessDecision::Redirect(policy.default_route(role).clone())
            );
        }
    }

    #[test]
    fn sales_person_is_bounced_from_inventory_to_pos() {
        let policy = AccessPolicy::standard();
        assert_eq!(
            resolve(&policy, Role::SalesPerson, &[], "/inventory"),
            redirect("/pos")
        );
    }

    #[test]
    fn customer_reaches_invoices_by_role_alone() {
        let policy = AccessPolicy::standard();
        assert_eq!(
            resolve(&policy, Role::Customer, &[], "/customer/invoices"),
            AccessDecision::Allow
        );
    }

    #[test]
    fn longest_prefix_overrides_shorter_allow() {
        let rules = vec![
            RouteRule::new("/inventory", [Role::WarehouseEmployee]),
            RouteRule::new("/inventory/reports", [Role::WarehouseManager]),
        ];
        let defaults = DefaultRoutes::new(|_| RoutePath::new("/home"));
        let policy = AccessPolicy::new(rules, vec![], defaults).unwrap();

        // Allowed under /inventory, but /inventory/reports is the match and
        // excludes warehouse employees.
        assert_eq!(
            resolve(&policy, Role::WarehouseEmployee, &[], "/inventory/reports/weekly"),
            redirect("/home")
        );
        assert_eq!(
            resolve(&policy, Role::WarehouseManager, &[], "/inventory/reports/weekly"),
            AccessDecision::Allow
        );
    }

    #[test]
    fn reports_gate_governs_the_standard_reports_section() {
        let policy = AccessPolicy::standard();
        let reports = [Permission::new("inventory", "reports")];

        // The /inventory/reports override binds everyone, including roles the
        // coarse rule admits.
        assert_eq!(
            resolve(&policy, Role::WarehouseManager, &[], "/inventory/reports/weekly"),
            redirect("/inventory")
        );
        assert_eq!(
            resolve(&policy, Role::WarehouseManager, &reports, "/inventory/reports/weekly"),
            AccessDecision::Allow
        );
    }

    #[test]
    fn reports_permission_rescues_a_warehouse_employee() {
        let policy = AccessPolicy::standard();

        // /inventory/reports excludes warehouse employees, but the override
        // admits any holder of the inventory.reports permission.
        assert_eq!(
            resolve(
                &policy,
                Role::WarehouseEmployee,
                &[Permission::new("inventory", "reports")],
                "/inventory/reports"
            ),
            AccessDecision::Allow
        );
        assert_eq!(
            resolve(&policy, Role::WarehouseEmployee, &[], "/inventory/reports"),
            redirect("/inventory")
        );
    }

    #[test]
    fn permission_gate_tightens_a_coarse_allow() {
        let policy = AccessPolicy::standard();

        assert_eq!(
            resolve(&policy, Role::Admin, &[], "/admin/users"),
            redirect("/admin")
        );
        assert_eq!(
            resolve(&policy, Role::Admin, &[Permission::new("admin", "users")], "/admin/users"),
            AccessDecision::Allow
        );
    }

    #[test]
    fn permission_gate_rescues_a_coarse_deny() {
        let policy = AccessPolicy::standard();

        // /admin excludes managers, but the /admin/users override admits any
        // holder of the admin.users permission.
        assert_eq!(
            resolve(&policy, Role::Manager, &[Permission::new("admin", "users")], "/admin/users"),
            AccessDecision::Allow
        );
        assert_eq!(
            resolve(&policy, Role::Manager, &[], "/admin/users"),
            redirect("/manager")
        );
    }

    #[test]
    fn denied_default_route_becomes_deny_not_a_redirect_loop() {
        let rules = vec![RouteRule::new("/ops", [Role::Admin])];
        let requirements = vec![PermissionRequirement::permission_gate(
            "/ops",
            Permission::new("ops", "access"),
        )];
        let defaults = DefaultRoutes::new(|_| RoutePath::new("/ops"));
        let policy = AccessPolicy::new(rules, requirements, defaults).unwrap();

        assert_eq!(resolve(&policy, Role::Admin, &[], "/ops"), AccessDecision::Deny);
    }

    #[test]
    fn conflicting_duplicate_prefixes_fail_the_lint() {
        let rules = vec![
            RouteRule::new("/pos", [Role::SalesPerson]),
            RouteRule::new("/pos", [Role::Manager]),
        ];
        let defaults = DefaultRoutes::new(|_| RoutePath::new("/pos"));

        let err = AccessPolicy::new(rules, vec![], defaults).unwrap_err();
        assert_eq!(err, ConfigError::conflicting_rule("/pos"));
    }

    #[test]
    fn duplicate_prefixes_with_identical_role_sets_pass_the_lint() {
        let rules = vec![
            RouteRule::new("/pos", [Role::SalesPerson, Role::Manager]),
            RouteRule::new("/pos", [Role::Manager, Role::SalesPerson]),
        ];
        let defaults = DefaultRoutes::new(|_| RoutePath::new("/pos"));

        assert!(AccessPolicy::new(rules, vec![], defaults).is_ok());
    }

    #[test]
    fn standard_tables_pass_the_lint() {
        let standard = AccessPolicy::standard();
        assert!(AccessPolicy::new(
            standard.rules.clone(),
            standard.requirements.clone(),
            standard.defaults.clone()
        )
        .is_ok());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn any_role() -> impl Strategy<Value = Role> {
            prop::sample::select(Role::ALL.to_vec())
        }

        fn unmapped_path() -> impl Strategy<Value = String> {
            // Segments that cannot collide with any configured prefix.
            prop::collection::vec("[a-z]{1,8}", 1..4)
                .prop_map(|segments| format!("/zz-{}", segments.join("/")))
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: paths with no matching rule and no requirement always
            /// redirect to the role's default route, never allow.
            #[test]
            fn secure_by_default(role in any_role(), path in unmapped_path()) {
                let policy = AccessPolicy::standard();
                let decision = policy.resolve(role, &[], &RoutePath::new(path));
                prop_assert_eq!(
                    decision,
                    AccessDecision::Redirect(policy.default_route(role).clone())
                );
            }

            /// Property: resolution is idempotent — identical inputs yield
            /// identical decisions.
            #[test]
            fn resolution_is_idempotent(role in any_role(), path in "(/[a-z]{1,10}){1,4}") {
                let policy = AccessPolicy::standard();
                let path = RoutePath::new(path);
                let first = policy.resolve(role, &[], &path);
                let second = policy.resolve(role, &[], &path);
                prop_assert_eq!(first, second);
            }
        }
    }
}
