//! Authorization decision explanations (audit trail).
//!
//! `resolve` answers *whether*; `explain` answers *why*. The output is
//! serializable so the consumer can attach it to structured logs or an
//! admin-facing diagnostics view.

use serde::Serialize;

use shopfloor_core::{Permission, Role, RoutePath};

use crate::decision::AccessDecision;
use crate::policy::AccessPolicy;
use crate::rules::RequirementFailure;

/// Detailed explanation of an access decision.
#[derive(Debug, Clone, Serialize)]
pub struct AccessExplanation {
    pub decision: AccessDecision,
    pub role: Role,
    pub path: RoutePath,

    /// Prefix of the coarse rule that matched, if any.
    pub matched_prefix: Option<RoutePath>,

    /// Pattern of the permission requirement that matched, if any.
    pub matched_requirement: Option<RoutePath>,

    /// Human-readable reason for the decision.
    pub reason: String,

    /// Present when the navigation was not granted.
    pub denial: Option<DenialReason>,
}

/// Why a navigation was denied, with remediation hints.
#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    NoMatchingRule,
    RoleNotAllowed,
    MissingPermission,
}

impl AccessPolicy {
    /// Explain why a navigation would be allowed or denied.
    ///
    /// Same inputs and precedence as [`resolve`](Self::resolve); the decision
    /// embedded in the explanation is always identical to what `resolve`
    /// returns for the same arguments.
    pub fn explain(
        &self,
        role: Role,
        permissions: &[Permission],
        path: &RoutePath,
    ) -> AccessExplanation {
        let evaluation = self.evaluate(role, permissions, path);
        let decision = self.decide(role, path, &evaluation);

        let matched_prefix = evaluation.rule.map(|rule| rule.prefix.clone());
        let matched_requirement = evaluation.requirement.map(|req| req.pattern.clone());

        let (reason, denial) = if evaluation.granted {
            let reason = match (evaluation.coarse_allowed, &matched_requirement) {
                (true, None) => format!(
                    "role '{role}' is allowed under '{}'",
                    display_prefix(&matched_prefix)
                ),
                (true, Some(pattern)) => format!(
                    "role '{role}' is allowed under '{}' and satisfies the override for '{pattern}'",
                    display_prefix(&matched_prefix)
                ),
                (false, Some(pattern)) => {
                    format!("the override for '{pattern}' admits this user despite the route rule")
                }
                // granted implies a passing requirement or a coarse allow
                (false, None) => String::from("granted"),
            };
            (reason, None)
        } else {
            let denial = self.denial_for(role, &evaluation);
            (denial.message.clone(), Some(denial))
        };

        AccessExplanation {
            decision,
            role,
            path: path.clone(),
            matched_prefix,
            matched_requirement,
            reason,
            denial,
        }
    }

    fn denial_for(
        &self,
        role: Role,
        evaluation: &crate::policy::Evaluation<'_>,
    ) -> DenialReason {
        match evaluation.requirement_failure {
            Some(RequirementFailure::PermissionMissing) => {
                let required = evaluation
                    .requirement
                    .and_then(|req| req.permission.as_ref());
                DenialReason {
                    kind: DenialKind::MissingPermission,
                    message: match required {
                        Some(permission) => {
                            format!("missing required permission '{permission}'")
                        }
                        None => String::from("missing required permission"),
                    },
                    suggestions: match required {
                        Some(permission) => {
                            vec![format!("grant the '{permission}' permission to this user")]
                        }
                        None => Vec::new(),
                    },
                }
            }
            Some(RequirementFailure::RoleExcluded) => {
                let admitted = evaluation
                    .requirement
                    .and_then(|req| req.roles.as_deref())
                    .unwrap_or(&[]);
                DenialReason {
                    kind: DenialKind::RoleNotAllowed,
                    message: format!("role '{role}' is excluded by the override for this path"),
                    suggestions: vec![format!("admitted roles: {}", role_list(admitted))],
                }
            }
            None => match evaluation.rule {
                Some(rule) => DenialReason {
                    kind: DenialKind::RoleNotAllowed,
                    message: format!(
                        "role '{role}' is not allowed under '{}'",
                        rule.prefix
                    ),
                    suggestions: vec![format!("admitted roles: {}", role_list(&rule.allowed_roles))],
                },
                None => DenialReason {
                    kind: DenialKind::NoMatchingRule,
                    message: String::from("no route rule covers this path"),
                    suggestions: vec![String::from(
                        "add a route rule or permission requirement covering the path",
                    )],
                },
            },
        }
    }
}

fn display_prefix(prefix: &Option<RoutePath>) -> &str {
    prefix.as_ref().map(RoutePath::as_str).unwrap_or("/")
}

fn role_list(roles: &[Role]) -> String {
    let names: Vec<&str> = roles.iter().map(Role::as_str).collect();
    names.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explain(role: Role, permissions: &[Permission], path: &str) -> AccessExplanation {
        AccessPolicy::standard().explain(role, permissions, &RoutePath::new(path.to_owned()))
    }

    #[test]
    fn explanation_decision_matches_resolve() {
        let policy = AccessPolicy::standard();
        let cases = [
            (Role::SalesPerson, "/inventory"),
            (Role::Customer, "/customer/invoices"),
            (Role::Admin, "/admin/users"),
            (Role::Manager, "/nowhere"),
        ];

        for (role, path) in cases {
            let path = RoutePath::new(path);
            assert_eq!(
                policy.explain(role, &[], &path).decision,
                policy.resolve(role, &[], &path)
            );
        }
    }

    #[test]
    fn denied_role_names_the_blocking_rule() {
        let explanation = explain(Role::SalesPerson, &[], "/inventory");

        assert!(matches!(explanation.decision, AccessDecision::Redirect(_)));
        let denial = explanation.denial.unwrap();
        assert_eq!(denial.kind, DenialKind::RoleNotAllowed);
        assert!(denial.message.contains("/inventory"));
        assert!(denial.suggestions[0].contains("warehouse_manager"));
    }

    #[test]
    fn missing_permission_is_named_in_the_denial() {
        let explanation = explain(Role::Admin, &[], "/admin/users");

        let denial = explanation.denial.unwrap();
        assert_eq!(denial.kind, DenialKind::MissingPermission);
        assert!(denial.message.contains("admin.users"));
        assert!(denial.suggestions[0].contains("admin.users"));
    }

    #[test]
    fn unmatched_path_reports_no_matching_rule() {
        let explanation = explain(Role::Manager, &[], "/reports");

        assert!(explanation.matched_prefix.is_none());
        let denial = explanation.denial.unwrap();
        assert_eq!(denial.kind, DenialKind::NoMatchingRule);
    }

    #[test]
    fn granted_navigation_carries_no_denial() {
        let explanation = explain(Role::Customer, &[], "/customer/invoices");

        assert!(explanation.decision.is_allow());
        assert!(explanation.denial.is_none());
        assert!(explanation.reason.contains("customer"));
    }
}
