//! `shopfloor-access` — route authorization tables and resolver.
//!
//! This crate is intentionally decoupled from routing frameworks and UI.
//! It answers one question, purely and deterministically: given a role, the
//! user's granted permissions, and a navigation path, is access permitted,
//! and if not, where should the user land instead?
//!
//! The resolver assumes the caller has already checked authentication;
//! unauthenticated navigation is the guard layer's concern.

pub mod config;
pub mod decision;
pub mod explain;
pub mod policy;
pub mod rules;

pub use config::PolicyConfig;
pub use decision::AccessDecision;
pub use explain::{AccessExplanation, DenialKind, DenialReason};
pub use policy::AccessPolicy;
pub use rules::{DefaultRoutes, PermissionRequirement, RequirementFailure, RouteRule};
