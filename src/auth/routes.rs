//! Route keys and the role-to-route table

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::auth::models::Role;
use crate::config::UnknownRolePolicy;
use crate::error::Error;

/// Protected areas of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Overview,
    Tutors,
    Documents,
    Chat,
    Profile,
    CreateExam,
    Planner,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Overview,
        Route::Tutors,
        Route::Documents,
        Route::Chat,
        Route::Profile,
        Route::CreateExam,
        Route::Planner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Overview => "overview",
            Route::Tutors => "tutors",
            Route::Documents => "documents",
            Route::Chat => "chat",
            Route::Profile => "profile",
            Route::CreateExam => "create-exam",
            Route::Planner => "planner",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Route {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::ALL
            .into_iter()
            .find(|route| route.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown route '{}'", s)))
    }
}

const STUDENT_ROUTES: [Route; 5] = [
    Route::Overview,
    Route::Tutors,
    Route::Documents,
    Route::Chat,
    Route::Profile,
];

const TUTOR_ROUTES: [Route; 4] = [
    Route::CreateExam,
    Route::Planner,
    Route::Documents,
    Route::Profile,
];

/// Set of routes a role may open
pub type RouteSet = BTreeSet<Route>;

/// Routes permitted for `role`
pub fn allowed_routes(role: Role, policy: UnknownRolePolicy) -> RouteSet {
    match role {
        Role::Student => STUDENT_ROUTES.into_iter().collect(),
        Role::Tutor => TUTOR_ROUTES.into_iter().collect(),
        Role::Both => STUDENT_ROUTES.into_iter().chain(TUTOR_ROUTES).collect(),
        Role::Admin => Route::ALL.into_iter().collect(),
        Role::Unknown => match policy {
            UnknownRolePolicy::Student => STUDENT_ROUTES.into_iter().collect(),
            UnknownRolePolicy::Deny => RouteSet::new(),
        },
    }
}
