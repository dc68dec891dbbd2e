//! Normalized session identity

use serde::Serialize;

use crate::auth::models::{Role, UserRecord};
use crate::auth::routes::{allowed_routes, Route, RouteSet};
use crate::config::UnknownRolePolicy;

/// The signed-in user for the current session
///
/// `id`, `role` and `allowed_routes` are fixed when the identity is built;
/// the routes are always the ones the role grants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    id: String,
    pub name: String,
    pub email: String,
    role: Role,
    pub subjects: Vec<String>,
    pub bio: String,
    allowed_routes: RouteSet,
}

impl Identity {
    /// Build an identity from a backend record
    pub fn from_record(raw: UserRecord, policy: UnknownRolePolicy) -> Self {
        let role = raw.role.as_deref().map(Role::parse).unwrap_or(Role::Unknown);

        Self {
            id: raw.id,
            name: raw.full_name.unwrap_or_default(),
            email: raw.email.unwrap_or_default(),
            role,
            subjects: raw.subjects.unwrap_or_default(),
            bio: raw.bio.unwrap_or_default(),
            allowed_routes: allowed_routes(role, policy),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn allowed_routes(&self) -> &RouteSet {
        &self.allowed_routes
    }

    pub fn can_open(&self, route: Route) -> bool {
        self.allowed_routes.contains(&route)
    }
}

/// Convert a backend user record into an identity
///
/// `None` maps to `None`; a missing name, email or bio becomes an empty
/// string and missing subjects an empty list.
pub fn map_identity(raw: Option<UserRecord>, policy: UnknownRolePolicy) -> Option<Identity> {
    raw.map(|raw| Identity::from_record(raw, policy))
}
