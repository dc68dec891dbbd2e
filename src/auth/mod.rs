//! Authentication, session lifecycle and role-based access control

pub mod controller;
pub mod guard;
pub mod identity;
pub mod models;
pub mod routes;
pub mod session;
pub mod storage;

pub use controller::{AuthController, AuthOutcome, AuthState};
pub use guard::{Guard, GuardDecision, Redirect};
pub use identity::{map_identity, Identity};
pub use models::{Registration, Role, UserRecord};
pub use routes::{allowed_routes, Route, RouteSet};
pub use session::SessionStore;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
