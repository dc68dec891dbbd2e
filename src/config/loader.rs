//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::Path;

use super::Config;

pub const CONFIG_FILENAME: &str = "tutorlink.toml";

/// Load configuration from tutorlink.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load configuration, falling back to defaults when no file exists
pub fn load_config_or_default() -> Result<Config> {
    match load_config() {
        Ok(config) => Ok(config),
        Err(Error::ConfigNotFound) => {
            tracing::debug!("No {} found, using default configuration", CONFIG_FILENAME);
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<std::path::PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // Compile-time constant pattern; failure here is a bug, not a runtime condition
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# tutorlink configuration

[client]
api_url = "${TUTORLINK_API_URL:-http://127.0.0.1:5000/api}"
store_path = "./.tutorlink/storage.json"
token_key = "token"
timeout_secs = 10

[access]
# What an unrecognized role may see: "student" or "deny"
unknown_role = "student"
sign_in_path = "/login"
home_path = "/dashboard"

# Reference auth backend, started with 'tutorlink serve'
[server]
host = "127.0.0.1"
port = 5000
jwt_secret = "${TUTORLINK_JWT_SECRET:-tutorlink-secret-key-change-in-production}"
token_ttl_secs = 3600

[[server.seed_users]]
name = "Platform Admin"
email = "admin@tutorlink.local"
password = "${TUTORLINK_ADMIN_PASSWORD:-admin123}"
role = "admin"

[[server.seed_users]]
name = "Ana Tutor"
email = "ana@tutorlink.local"
password = "tutor123"
role = "tutor"
subjects = ["Math", "Physics"]
bio = "Calculus and mechanics"
"#
}
