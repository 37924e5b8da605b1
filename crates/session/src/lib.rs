//! `shopfloor-session` — idle-time tracking and the warning/expiry machine.
//!
//! Nothing in this crate reads the wall clock. Every query takes `now` as an
//! argument and recomputes the session phase from it, so a consumer polling
//! on a coarse interval can never drift: ticks only affect how quickly a
//! transition is *observed*, not when it *happens*.

pub mod session;
pub mod timeout;

pub use session::{Session, SessionId};
pub use timeout::{IdleTimeout, ResetExpiredSession, SessionEvent, SessionPhase, TimeoutConfig};
