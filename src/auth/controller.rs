//! Auth session controller
//!
//! Owns the session token and the signed-in identity. Everything else reads
//! session state through the controller; nothing else writes it.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{watch, Mutex};

use crate::auth::identity::Identity;
use crate::auth::models::{AuthResponse, LoginRequest, Registration};
use crate::auth::routes::Route;
use crate::auth::session::SessionStore;
use crate::client::AuthBackend;
use crate::config::UnknownRolePolicy;
use crate::error::{Error, Result};

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";
const REQUEST_IN_FLIGHT: &str = "Another authentication request is already in progress";
const SESSION_LOADING: &str = "Session is still loading";

/// Session state as seen by guards and consumers
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// The startup token check has not finished
    Loading,
    Authenticated(Identity),
    Anonymous,
}

impl AuthState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            AuthState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    /// Whether the current user may open `route`
    pub fn can_open(&self, route: Route) -> bool {
        self.identity().is_some_and(|identity| identity.can_open(route))
    }
}

/// Result of a login or registration attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Success(Identity),
    Failure(String),
}

impl AuthOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            AuthOutcome::Success(identity) => Some(identity),
            AuthOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AuthOutcome::Success(_) => None,
            AuthOutcome::Failure(message) => Some(message),
        }
    }
}

/// Drives the session lifecycle against an [`AuthBackend`]
///
/// Create one per application and share it (e.g. behind an `Arc`).
pub struct AuthController<B> {
    backend: B,
    store: SessionStore,
    policy: UnknownRolePolicy,
    state: watch::Sender<AuthState>,
    restored: AtomicBool,
    in_flight: Mutex<()>,
}

impl<B: AuthBackend> AuthController<B> {
    /// Create a controller in the `Loading` state. Call [`restore`](Self::restore) next;
    /// sign-in attempts fail until it has run.
    pub fn new(backend: B, store: SessionStore, policy: UnknownRolePolicy) -> Self {
        let (state, _) = watch::channel(AuthState::Loading);
        Self {
            backend,
            store,
            policy,
            state,
            restored: AtomicBool::new(false),
            in_flight: Mutex::new(()),
        }
    }

    /// Create a controller and run the startup token check
    pub async fn bootstrap(backend: B, store: SessionStore, policy: UnknownRolePolicy) -> Self {
        let controller = Self::new(backend, store, policy);
        controller.restore().await;
        controller
    }

    /// Validate any persisted token with the backend.
    ///
    /// Runs once per controller; later calls return immediately. A rejected
    /// token is purged and the session settles as anonymous.
    pub async fn restore(&self) {
        if self.restored.swap(true, Ordering::SeqCst) {
            return;
        }
        let _slot = self.in_flight.lock().await;

        let next = match self.store.get_token().await {
            None => {
                tracing::debug!("No stored session token");
                AuthState::Anonymous
            }
            Some(token) => match self.backend.me(&token).await {
                Ok(user) => {
                    let identity = Identity::from_record(user, self.policy);
                    tracing::info!("Restored session for user {} ({})", identity.id(), identity.role());
                    AuthState::Authenticated(identity)
                }
                Err(e) => {
                    tracing::warn!("Stored session token rejected, signing out: {}", e);
                    self.purge_token().await;
                    AuthState::Anonymous
                }
            },
        };

        self.state.send_replace(next);
    }

    /// Snapshot of the current state
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Wait until the startup check has finished and return the settled state
    pub async fn wait_until_resolved(&self) -> AuthState {
        let mut receiver = self.state.subscribe();
        let settled = match receiver.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            // The sender lives as long as `self`, so the channel cannot close here
            Err(_) => self.state(),
        };
        settled
    }

    /// Whether the current user may open the route named `route`.
    ///
    /// False while loading, when anonymous, and for unknown route keys.
    pub fn has_access(&self, route: &str) -> bool {
        match route.parse::<Route>() {
            Ok(route) => self.can_open(route),
            Err(_) => false,
        }
    }

    pub fn can_open(&self, route: Route) -> bool {
        self.state.borrow().can_open(route)
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
        let Ok(_slot) = self.in_flight.try_lock() else {
            return AuthOutcome::Failure(REQUEST_IN_FLIGHT.to_string());
        };
        // restore() holds the slot until it publishes, so Loading here means it never ran
        if self.is_loading() {
            return AuthOutcome::Failure(SESSION_LOADING.to_string());
        }

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self.backend.login(&request).await;
        self.complete(result, LOGIN_FAILED).await
    }

    pub async fn register(&self, registration: &Registration) -> AuthOutcome {
        let Ok(_slot) = self.in_flight.try_lock() else {
            return AuthOutcome::Failure(REQUEST_IN_FLIGHT.to_string());
        };
        // restore() holds the slot until it publishes, so Loading here means it never ran
        if self.is_loading() {
            return AuthOutcome::Failure(SESSION_LOADING.to_string());
        }

        let request = registration.to_request();
        let result = self.backend.register(&request).await;
        self.complete(result, REGISTRATION_FAILED).await
    }

    /// End the session. Local state is cleared even if the backend call fails.
    pub async fn logout(&self) {
        let _slot = self.in_flight.lock().await;

        if let Some(token) = self.store.get_token().await {
            if let Err(e) = self.backend.logout(&token).await {
                tracing::warn!("Backend logout failed, clearing local session anyway: {}", e);
            }
        }

        self.purge_token().await;
        self.state.send_replace(AuthState::Anonymous);
    }

    /// Turn a login/register response into an outcome, updating state on success
    async fn complete(&self, result: Result<AuthResponse>, fallback: &str) -> AuthOutcome {
        let response = match result {
            Ok(response) => response,
            Err(Error::Backend { status, message }) => {
                tracing::debug!("{} ({}): {}", fallback, status, message);
                return AuthOutcome::Failure(message);
            }
            Err(e) => {
                tracing::warn!("{}: {}", fallback, e);
                return AuthOutcome::Failure(fallback.to_string());
            }
        };

        let reason = response
            .reason()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string());

        match (response.token, response.user) {
            (Some(token), Some(user)) if !token.is_empty() => {
                if let Err(e) = self.store.set_token(Some(token)).await {
                    tracing::error!("Failed to persist session token: {}", e);
                    return AuthOutcome::Failure(fallback.to_string());
                }

                let identity = Identity::from_record(user, self.policy);
                tracing::info!("Signed in as user {} ({})", identity.id(), identity.role());
                self.state
                    .send_replace(AuthState::Authenticated(identity.clone()));
                AuthOutcome::Success(identity)
            }
            _ => AuthOutcome::Failure(reason),
        }
    }

    async fn purge_token(&self) {
        if let Err(e) = self.store.clear().await {
            tracing::error!("Failed to clear stored session token: {}", e);
        }
    }
}
