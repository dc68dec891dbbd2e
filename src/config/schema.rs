//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::auth::models::Role;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub access: AccessConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Settings for talking to the auth backend and persisting the session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the auth backend, without a trailing slash
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// File holding the durable key-value store
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Key the bearer token is stored under
    #[serde(default = "default_token_key")]
    pub token_key: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://127.0.0.1:5000/api".to_string()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./.tutorlink/storage.json")
}

fn default_token_key() -> String {
    "token".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            store_path: default_store_path(),
            token_key: default_token_key(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// What an unrecognized role string is allowed to see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnknownRolePolicy {
    /// Treat the user as a student
    #[default]
    Student,
    /// Grant no routes at all
    Deny,
}

/// Access control settings shared by the mapper and the guards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    #[serde(default)]
    pub unknown_role: UnknownRolePolicy,

    /// Where anonymous users are sent
    #[serde(default = "default_sign_in_path")]
    pub sign_in_path: String,

    /// Where signed-in users without permission are sent
    #[serde(default = "default_home_path")]
    pub home_path: String,
}

fn default_sign_in_path() -> String {
    "/login".to_string()
}

fn default_home_path() -> String {
    "/dashboard".to_string()
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            unknown_role: UnknownRolePolicy::default(),
            sign_in_path: default_sign_in_path(),
            home_path: default_home_path(),
        }
    }
}

/// Reference auth backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// HMAC secret used to sign session tokens
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,

    /// bcrypt work factor for stored passwords
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Accounts created when the server starts
    #[serde(default)]
    pub seed_users: Vec<SeedUser>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_jwt_secret() -> String {
    "tutorlink-secret-key-change-in-production".to_string()
}

fn default_token_ttl_secs() -> i64 {
    3600
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            jwt_secret: default_jwt_secret(),
            token_ttl_secs: default_token_ttl_secs(),
            bcrypt_cost: default_bcrypt_cost(),
            seed_users: Vec::new(),
        }
    }
}

/// Account seeded into the reference backend's directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,

    #[serde(default)]
    pub subjects: Vec<String>,

    #[serde(default)]
    pub bio: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.client.token_key, "token");
        assert_eq!(config.access.unknown_role, UnknownRolePolicy::Student);
        assert_eq!(config.access.sign_in_path, "/login");
        assert_eq!(config.server.port, 5000);
        assert!(config.server.seed_users.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let content = r#"
[client]
api_url = "http://example.test/api"

[access]
unknown_role = "deny"
home_path = "/app"

[server]
port = 8080
token_ttl_secs = 60

[[server.seed_users]]
name = "Root"
email = "root@example.test"
password = "secret"
role = "admin"
"#;
        let config: Config = toml::from_str(content).unwrap();
        assert_eq!(config.client.api_url, "http://example.test/api");
        assert_eq!(config.access.unknown_role, UnknownRolePolicy::Deny);
        assert_eq!(config.access.home_path, "/app");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.seed_users.len(), 1);
        assert_eq!(config.server.seed_users[0].role, Role::Admin);
        assert!(config.server.seed_users[0].subjects.is_empty());
    }
}
