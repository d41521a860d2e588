use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use ts_rs::TS;
use utoipa::ToSchema;

/// Role
///
/// The access tier attached to an authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    Seller,
    Buyer,
}

impl Role {
    /// Maps a role claim to a `Role`.
    ///
    /// Unrecognised values resolve to `Buyer`, the least privileged tier.
    pub fn from_claim(claim: &str) -> Self {
        match claim.trim().to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "seller" => Role::Seller,
            "buyer" => Role::Buyer,
            other => {
                tracing::debug!(role = other, "unknown role claim, treating as buyer");
                Role::Buyer
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Seller => "seller",
            Role::Buyer => "buyer",
        }
    }
}

/// Identity
///
/// The authenticated visitor as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Identity {
    /// Provider-assigned user id.
    pub id: String,
    pub role: Role,
}

impl Identity {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

/// Session
///
/// The current visitor's authentication state as known to the client.
///
/// `loading` stays `true` until the provider reports its initial state. Once it
/// has, `user` is either the signed-in identity or absent; absence is a normal
/// state, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Session {
    pub user: Option<Identity>,
    pub loading: bool,
}

impl Session {
    /// Initial state before the provider has resolved anything.
    pub fn loading() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            user: None,
            loading: false,
        }
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            user: Some(identity),
            loading: false,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }
}

/// SessionProvider
///
/// Owns the authoritative session state and broadcasts every change to its
/// subscribers. Consumers never mutate the state; they receive read-only
/// snapshots through a `SessionSubscription`.
#[derive(Debug)]
pub struct SessionProvider {
    tx: watch::Sender<Session>,
}

impl Default for SessionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProvider {
    /// Creates a provider in the loading state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::loading());
        Self { tx }
    }

    /// Publishes the provider's initial state, ending the loading phase.
    pub fn resolve(&self, user: Option<Identity>) {
        self.publish(Session {
            user,
            loading: false,
        });
    }

    pub fn sign_in(&self, identity: Identity) {
        self.publish(Session::authenticated(identity));
    }

    pub fn sign_out(&self) {
        self.publish(Session::anonymous());
    }

    pub fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            rx: self.tx.subscribe(),
        }
    }

    // Identical states are not re-broadcast.
    fn publish(&self, next: Session) {
        self.tx.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            tracing::debug!(
                loading = next.loading,
                role = next.role().map(|r| r.as_str()),
                "session state changed"
            );
            *current = next;
            true
        });
    }
}

/// SessionSubscription
///
/// A read-only view of a `SessionProvider`.
#[derive(Debug, Clone)]
pub struct SessionSubscription {
    rx: watch::Receiver<Session>,
}

impl SessionSubscription {
    /// Current session snapshot.
    pub fn current(&self) -> Session {
        self.rx.borrow().clone()
    }

    /// Waits for the next state change and returns the new snapshot.
    ///
    /// Returns `None` once the provider has been dropped.
    pub async fn changed(&mut self) -> Option<Session> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Marks the current value as seen so that `changed` only reports newer states.
    pub(crate) fn mark_seen(&mut self) -> Session {
        self.rx.borrow_and_update().clone()
    }
}
