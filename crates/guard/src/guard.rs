use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use shopfloor_access::{AccessDecision, AccessPolicy};
use shopfloor_core::RoutePath;
use shopfloor_session::{Session, SessionEvent, SessionId, TimeoutConfig};

use crate::store::{InMemoryIntendedPath, IntendedPathStore};
use crate::user::CurrentUser;

/// Where unauthenticated visitors are sent.
pub const LOGIN_ROUTE: &str = "/login";

/// Pages reachable without authentication. Checked before the resolver,
/// which assumes an authenticated caller.
const PUBLIC_PREFIXES: [&str; 3] = ["/login", "/forgot-password", "/reset-password"];

/// What the shell should do with a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Render the requested page.
    Proceed,
    /// Navigate to the given path instead.
    Redirect(RoutePath),
    /// Render nothing. Only produced when redirecting would loop.
    Forbidden,
}

/// Orchestrates the access resolver and the idle-timeout engine for a UI
/// shell.
///
/// The guard owns the process's only mutable policy state: the active
/// session and the intended-path capture. It is driven by two discrete
/// inputs — "the user attempts a navigation" and "a timer tick elapsed" —
/// and never re-evaluates anything outside those calls.
#[derive(Debug)]
pub struct RouteGuard<S: IntendedPathStore = InMemoryIntendedPath> {
    policy: AccessPolicy,
    timeouts: TimeoutConfig,
    session: Option<Session>,
    intended: S,
}

impl RouteGuard<InMemoryIntendedPath> {
    pub fn new(policy: AccessPolicy, timeouts: TimeoutConfig) -> Self {
        Self::with_store(policy, timeouts, InMemoryIntendedPath::new())
    }
}

impl<S: IntendedPathStore> RouteGuard<S> {
    pub fn with_store(policy: AccessPolicy, timeouts: TimeoutConfig, store: S) -> Self {
        Self {
            policy,
            timeouts,
            session: None,
            intended: store,
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(Session::id)
    }

    /// Start tracking idle time for a freshly authenticated user.
    /// Replaces any session left over from a previous login.
    pub fn begin_session(&mut self, now: DateTime<Utc>) -> SessionId {
        let session = Session::begin(self.timeouts, now);
        let id = session.id();
        info!(session_id = %id, "session started");
        self.session = Some(session);
        id
    }

    /// Tear down the active session immediately (logout). No pending tick
    /// may observe it afterwards.
    pub fn end_session(&mut self) {
        if let Some(session) = self.session.take() {
            info!(session_id = %session.id(), "session ended");
        }
    }

    /// Handle one navigation attempt.
    ///
    /// Public pages short-circuit; unauthenticated users are captured and
    /// sent to the login page; everything else is the resolver's decision.
    /// An authenticated navigation also counts as user activity.
    pub fn on_navigate(
        &mut self,
        user: &CurrentUser,
        path: &str,
        now: DateTime<Utc>,
    ) -> GuardOutcome {
        let path = RoutePath::new(path.to_owned());

        if is_public(&path) {
            return GuardOutcome::Proceed;
        }

        if !user.is_authenticated {
            self.intended.save(path);
            return GuardOutcome::Redirect(RoutePath::new(LOGIN_ROUTE));
        }

        if let Some(session) = &mut self.session {
            let id = session.id();
            if session.timeout_mut().reset(now).is_err() {
                info!(session_id = %id, "navigation on expired session, forcing sign-out");
                self.session = None;
                self.intended.save(path);
                return GuardOutcome::Redirect(RoutePath::new(LOGIN_ROUTE));
            }
        }

        match self.policy.resolve(user.role, &user.permissions, &path) {
            AccessDecision::Allow => GuardOutcome::Proceed,
            AccessDecision::Redirect(target) => {
                debug!(role = %user.role, path = %path, target = %target, "navigation denied, redirecting");
                GuardOutcome::Redirect(target)
            }
            AccessDecision::Deny => {
                debug!(role = %user.role, path = %path, "navigation denied with no redirect target");
                GuardOutcome::Forbidden
            }
        }
    }

    /// Poll the idle-timeout engine. Call on a fixed interval; cadence only
    /// affects how quickly the UI observes a transition.
    ///
    /// On expiry the session is torn down before the event is returned, so
    /// the caller always sees a signed-out guard when told to force
    /// re-authentication.
    pub fn on_tick(&mut self, now: DateTime<Utc>) -> Option<SessionEvent> {
        let session = self.session.as_mut()?;
        let id = session.id();
        let event = session.timeout_mut().poll(now);

        // The engine reports the transition itself; this layer only logs the
        // action it takes in response.
        if let Some(SessionEvent::Expired) = event {
            info!(session_id = %id, "idle session expired, forcing sign-out");
            self.session = None;
        }
        event
    }

    /// Record user activity (keystroke, click, "extend session" button).
    /// On an already-expired session this forces sign-out instead.
    pub fn record_activity(&mut self, now: DateTime<Utc>) {
        if let Some(session) = &mut self.session {
            let id = session.id();
            if session.timeout_mut().reset(now).is_err() {
                info!(session_id = %id, "activity on expired session, forcing sign-out");
                self.session = None;
            }
        }
    }

    pub fn time_until_warning(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.session
            .as_ref()
            .map(|session| session.timeout().time_until_warning(now))
    }

    pub fn time_until_expiry(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.session
            .as_ref()
            .map(|session| session.timeout().time_until_expiry(now))
    }

    /// The path captured by the last redirect-to-login, for the post-login
    /// hop back. Taking it clears the capture.
    pub fn take_intended_path(&mut self) -> Option<RoutePath> {
        self.intended.take()
    }
}

fn is_public(path: &RoutePath) -> bool {
    PUBLIC_PREFIXES
        .iter()
        .any(|prefix| RoutePath::new(*prefix).covers(path))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
