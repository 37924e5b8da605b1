//! `shopfloor-guard` — the consumer glue around the policy core.
//!
//! Wires the pure pieces together for a UI shell: on every navigation
//! attempt it runs the public-page and authentication pre-checks and then
//! the access resolver; on every timer tick it polls the idle-timeout
//! engine and tears the session down on expiry. The guard owns the only
//! mutable state in the system (the active session and the intended-path
//! capture); everything it calls into is pure.

pub mod guard;
pub mod store;
pub mod user;

pub use guard::{GuardOutcome, LOGIN_ROUTE, RouteGuard};
pub use store::{InMemoryIntendedPath, IntendedPathStore};
pub use user::CurrentUser;
