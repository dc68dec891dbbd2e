//! Shared state for the reference backend

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::directory::UserDirectory;
use super::jwt::TokenIssuer;
use crate::config::ServerConfig;
use crate::error::Result;

/// IDs of tokens ended by logout, kept until the token would have expired
#[derive(Debug, Default)]
pub struct RevokedTokens {
    expiry_by_id: HashMap<String, i64>,
}

impl RevokedTokens {
    /// Record a revoked token and drop entries that have expired anyway
    pub fn revoke(&mut self, jti: &str, exp: i64) {
        let now = chrono::Utc::now().timestamp();
        self.expiry_by_id.retain(|_, expiry| *expiry >= now);
        self.expiry_by_id.insert(jti.to_string(), exp);
    }

    pub fn contains(&self, jti: &str) -> bool {
        self.expiry_by_id.contains_key(jti)
    }

    pub fn len(&self) -> usize {
        self.expiry_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expiry_by_id.is_empty()
    }
}

/// Application state shared across handlers
pub struct AppState {
    pub directory: RwLock<UserDirectory>,
    pub revoked: RwLock<RevokedTokens>,
    pub tokens: TokenIssuer,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build state from configuration, hashing seed account passwords
    pub fn from_config(config: &ServerConfig) -> Result<SharedState> {
        let directory = UserDirectory::from_seed(&config.seed_users, config.bcrypt_cost)?;
        tracing::info!("Loaded {} seed user(s)", directory.len());

        Ok(Arc::new(Self {
            directory: RwLock::new(directory),
            revoked: RwLock::new(RevokedTokens::default()),
            tokens: TokenIssuer::new(&config.jwt_secret, config.token_ttl_secs),
        }))
    }
}
