//! Session state and the auth gate.
//!
//! [`AuthGate`] is created once per front end and handed (as an `Arc`) to
//! every protected view. Views only ever read the session; the gate alone
//! moves between [`AuthState::Unauthenticated`] and
//! [`AuthState::Authenticated`].

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use dishbook_core::types::Timestamp;
use dishbook_store::AuthApi;
use tokio::sync::watch;
use uuid::Uuid;

use crate::error::ClientError;

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// A signed-in session. `access_token` is sent as a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub user: SessionUser,
    /// `None` means the session does not expire on its own.
    pub expires_at: Option<Timestamp>,
}

impl Session {
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Whether someone is signed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated(Session),
}

/// The external sign-in collaborator.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ClientError>;
    async fn sign_out(&self, session: &Session) -> Result<(), ClientError>;
}

type ExpiryListener = Box<dyn Fn() + Send + Sync>;

/// Holds the current [`AuthState`] and drives its lifecycle.
pub struct AuthGate {
    authenticator: Arc<dyn Authenticator>,
    state: watch::Sender<AuthState>,
    expiry_listeners: Mutex<Vec<ExpiryListener>>,
}

impl AuthGate {
    /// A gate that starts signed out.
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        let (state, _) = watch::channel(AuthState::Unauthenticated);
        Self {
            authenticator,
            state,
            expiry_listeners: Mutex::new(Vec::new()),
        }
    }

    /// A gate restored from an existing session.
    pub fn with_session(authenticator: Arc<dyn Authenticator>, session: Session) -> Self {
        let gate = Self::new(authenticator);
        gate.state.send_replace(AuthState::Authenticated(session));
        gate
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.state.borrow(), AuthState::Authenticated(_))
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Sign in and become [`AuthState::Authenticated`].
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        if email.trim().is_empty() {
            return Err(ClientError::Validation("Email is required".into()));
        }
        let session = self.authenticator.sign_in(email, password).await?;
        tracing::info!(user_id = %session.user.id, "Session started");
        self.state
            .send_replace(AuthState::Authenticated(session.clone()));
        Ok(session)
    }

    /// Sign out. The local session is dropped even if revoking it remotely
    /// fails; the remote error is still returned.
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        let previous = self.state.send_replace(AuthState::Unauthenticated);
        match previous {
            AuthState::Authenticated(session) => {
                tracing::info!(user_id = %session.user.id, "Session ended");
                self.authenticator.sign_out(&session).await
            }
            AuthState::Unauthenticated => Ok(()),
        }
    }

    /// Register a callback fired when an authenticated session expires.
    pub fn on_session_expired(&self, listener: impl Fn() + Send + Sync + 'static) {
        self.expiry_listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(listener));
    }

    /// Drop the current session because it is no longer valid.
    pub fn expire(&self) {
        let previous = self.state.send_replace(AuthState::Unauthenticated);
        if let AuthState::Authenticated(session) = previous {
            tracing::warn!(user_id = %session.user.id, "Session expired");
            let listeners = self
                .expiry_listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            for listener in listeners.iter() {
                listener();
            }
        }
    }

    /// The current session, or [`ClientError::Unauthenticated`]. A session
    /// past its expiry is expired here first.
    pub fn require_session(&self) -> Result<Session, ClientError> {
        let current = self.state();
        match current {
            AuthState::Authenticated(session) if session.is_expired_at(Utc::now()) => {
                self.expire();
                Err(ClientError::Unauthenticated)
            }
            AuthState::Authenticated(session) => Ok(session),
            AuthState::Unauthenticated => Err(ClientError::Unauthenticated),
        }
    }

    /// Let the gate see a failed request; a 401 from any collaborator ends
    /// the session.
    pub fn observe(&self, err: &ClientError) {
        if err.is_unauthorized() {
            self.expire();
        }
    }
}

// ---------------------------------------------------------------------------
// Authenticators
// ---------------------------------------------------------------------------

/// Password sign-in against the hosted store.
pub struct StoreAuthenticator {
    auth: AuthApi,
}

impl StoreAuthenticator {
    pub fn new(auth: AuthApi) -> Self {
        Self { auth }
    }
}

#[async_trait]
impl Authenticator for StoreAuthenticator {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let issued_at = Utc::now();
        let granted = self.auth.sign_in_with_password(email, password).await?;
        Ok(Session {
            expires_at: Some(granted.expiry(issued_at)),
            access_token: granted.access_token,
            user: SessionUser {
                id: granted.user.id,
                email: granted.user.email,
            },
        })
    }

    async fn sign_out(&self, session: &Session) -> Result<(), ClientError> {
        self.auth
            .sign_out(&session.access_token)
            .await
            .map_err(ClientError::from)
    }
}

/// Local development sign-in: any non-empty email is accepted and the
/// session never expires. Only meant for the bundled API server.
#[derive(Debug, Default)]
pub struct DevAuthenticator;

#[async_trait]
impl Authenticator for DevAuthenticator {
    async fn sign_in(&self, email: &str, _password: &str) -> Result<Session, ClientError> {
        tracing::warn!(email, "Using development sign-in; no credentials are checked");
        Ok(Session {
            access_token: format!("dev-{}", Uuid::new_v4()),
            user: SessionUser {
                id: Uuid::new_v4(),
                email: Some(email.to_string()),
            },
            expires_at: None,
        })
    }

    async fn sign_out(&self, _session: &Session) -> Result<(), ClientError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
