//! Route guards

use serde::Serialize;

use crate::auth::controller::{AuthController, AuthState};
use crate::auth::routes::Route;
use crate::client::AuthBackend;
use crate::config::AccessConfig;

/// Where a guard sends a user it turns away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Redirect {
    /// The sign-in entry point
    SignIn,
    /// Root of the authenticated area
    Home,
}

impl Redirect {
    /// Path configured for this redirect
    pub fn path<'a>(&self, access: &'a AccessConfig) -> &'a str {
        match self {
            Redirect::SignIn => &access.sign_in_path,
            Redirect::Home => &access.home_path,
        }
    }
}

/// What a guard decided for the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GuardDecision {
    /// Session still loading; show a placeholder
    Pending,
    Allow,
    Redirect(Redirect),
}

/// Access requirement for a protected page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// Any signed-in user
    Authenticated,
    /// Signed in with access to at least one of the routes
    AnyOf(Vec<Route>),
    /// Signed in as an administrator
    Admin,
}

impl Guard {
    pub fn authenticated() -> Self {
        Guard::Authenticated
    }

    pub fn any_of(routes: impl IntoIterator<Item = Route>) -> Self {
        Guard::AnyOf(routes.into_iter().collect())
    }

    pub fn admin() -> Self {
        Guard::Admin
    }

    /// Decide against a state snapshot
    pub fn check(&self, state: &AuthState) -> GuardDecision {
        let identity = match state {
            AuthState::Loading => return GuardDecision::Pending,
            AuthState::Anonymous => return GuardDecision::Redirect(Redirect::SignIn),
            AuthState::Authenticated(identity) => identity,
        };

        let allowed = match self {
            Guard::Authenticated => true,
            Guard::AnyOf(routes) => routes.iter().any(|route| identity.can_open(*route)),
            Guard::Admin => identity.role().is_admin(),
        };

        if allowed {
            GuardDecision::Allow
        } else {
            tracing::debug!("User {} redirected home by {:?}", identity.id(), self);
            GuardDecision::Redirect(Redirect::Home)
        }
    }

    /// Wait for the session to settle, then decide. Never returns `Pending`.
    pub async fn resolve<B: AuthBackend>(&self, controller: &AuthController<B>) -> GuardDecision {
        let state = controller.wait_until_resolved().await;
        self.check(&state)
    }
}
