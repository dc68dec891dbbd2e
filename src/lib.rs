//! tutorlink - session lifecycle and role-based access control
//!
//! This is the library interface for tutorlink: the auth session
//! controller, route guards and token storage used by the peer-tutoring
//! platform, plus a reference auth backend for local development.

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod server;

pub use auth::{AuthController, Guard, Identity, Role, Route};
pub use config::Config;
pub use error::Error;
