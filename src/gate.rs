//! Session Gate
//!
//! Decides, per route, whether a visitor sees the page, is redirected, or waits
//! for the auth provider. The decision is a pure function of the session and the
//! route's policy; navigation is a separate effect applied after the decision.
//!
//! Two variants exist:
//! - **public-only** pages (e.g. `/login`) are hidden from signed-in visitors,
//!   who are sent to their role's landing page;
//! - **protected** pages require a signed-in visitor whose role the route's
//!   `RoutePolicy` accepts.

use std::sync::Arc;

use crate::session::{Role, Session, SessionSubscription};

pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_LANDING: &str = "/admin";
pub const SELLER_LANDING: &str = "/seller";
pub const BUYER_LANDING: &str = "/browse";

/// GuardDecision
///
/// Outcome of evaluating a session against a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect(&'static str),
    ShowLoader,
}

/// Default landing page for a role.
pub fn landing_for(role: Role) -> &'static str {
    match role {
        Role::Admin => ADMIN_LANDING,
        Role::Seller => SELLER_LANDING,
        Role::Buyer => BUYER_LANDING,
    }
}

/// RoutePolicy
///
/// The required-role predicate of a protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePolicy {
    /// Any signed-in visitor.
    AnyAuthenticated,
    /// Only the listed roles.
    Only(Vec<Role>),
}

impl RoutePolicy {
    pub fn any_authenticated() -> Self {
        RoutePolicy::AnyAuthenticated
    }

    pub fn only(roles: &[Role]) -> Self {
        RoutePolicy::Only(roles.to_vec())
    }

    pub fn permits(&self, role: Role) -> bool {
        match self {
            RoutePolicy::AnyAuthenticated => true,
            RoutePolicy::Only(roles) => roles.contains(&role),
        }
    }
}

/// Public-only variant: signed-in visitors are sent to their landing page.
pub fn decide_public_only(session: &Session) -> GuardDecision {
    if session.loading {
        return GuardDecision::ShowLoader;
    }
    match session.role() {
        Some(role) => GuardDecision::Redirect(landing_for(role)),
        None => GuardDecision::Render,
    }
}

/// Protected variant: anonymous visitors go to the login page, visitors with a
/// role the policy rejects go to their own landing page.
pub fn decide_protected(session: &Session, policy: &RoutePolicy) -> GuardDecision {
    if session.loading {
        return GuardDecision::ShowLoader;
    }
    match session.role() {
        None => GuardDecision::Redirect(LOGIN_PATH),
        Some(role) if !policy.permits(role) => GuardDecision::Redirect(landing_for(role)),
        Some(_) => GuardDecision::Render,
    }
}

/// GateKind
///
/// Which variant a `Gate` enforces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateKind {
    PublicOnly,
    Protected(RoutePolicy),
}

impl GateKind {
    pub fn decide(&self, session: &Session) -> GuardDecision {
        match self {
            GateKind::PublicOnly => decide_public_only(session),
            GateKind::Protected(policy) => decide_protected(session, policy),
        }
    }
}

/// Imperative navigation capability. Calls are fire-and-forget.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// What the guarded route shows for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Loader,
    Children,
    /// A redirect is pending; nothing is shown.
    Nothing,
}

impl From<GuardDecision> for View {
    fn from(decision: GuardDecision) -> Self {
        match decision {
            GuardDecision::Render => View::Children,
            GuardDecision::Redirect(_) => View::Nothing,
            GuardDecision::ShowLoader => View::Loader,
        }
    }
}

/// Gate
///
/// Reactive wrapper around the decision functions. `view` is side-effect free;
/// `run` reacts to every session change and issues navigation when the decision
/// is a redirect. The gate holds no state of its own beyond its subscription.
pub struct Gate {
    kind: GateKind,
    session: SessionSubscription,
    navigator: Arc<dyn Navigator>,
}

impl Gate {
    pub fn new(kind: GateKind, session: SessionSubscription, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            kind,
            session,
            navigator,
        }
    }

    pub fn public_only(session: SessionSubscription, navigator: Arc<dyn Navigator>) -> Self {
        Self::new(GateKind::PublicOnly, session, navigator)
    }

    pub fn protected(
        policy: RoutePolicy,
        session: SessionSubscription,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self::new(GateKind::Protected(policy), session, navigator)
    }

    pub fn decision(&self) -> GuardDecision {
        self.kind.decide(&self.session.current())
    }

    pub fn view(&self) -> View {
        self.decision().into()
    }

    /// Applies the navigation effect for the current session and then for every
    /// change, until the session provider goes away.
    pub async fn run(mut self) {
        let initial = self.session.mark_seen();
        self.apply(&initial);

        while let Some(session) = self.session.changed().await {
            self.apply(&session);
        }
        tracing::debug!("session provider dropped, gate stopped");
    }

    fn apply(&self, session: &Session) {
        if let GuardDecision::Redirect(target) = self.kind.decide(session) {
            tracing::debug!(path = target, "gate redirect");
            self.navigator.navigate(target);
        }
    }
}
