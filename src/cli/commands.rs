//! CLI command implementations

use anyhow::{anyhow, Result};
use std::fs;
use std::sync::Arc;

use crate::auth::{
    allowed_routes, AuthController, AuthOutcome, AuthState, FileStore, Guard, Registration, Role,
    Route, SessionStore,
};
use crate::cli::{error, format_decision, info, print_identity, print_route_table, success, warn, OutputFormat};
use crate::client::HttpBackend;
use crate::config::{self, loader::CONFIG_FILENAME, Config};
use crate::server;

/// Initialize a new tutorlink.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new(CONFIG_FILENAME);

    if config_path.exists() {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Run 'tutorlink serve' to start the auth backend, then 'tutorlink login --email <email>'");

    Ok(())
}

/// Start the reference auth backend
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = load_config()?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    info(&format!(
        "Starting auth server at http://{}:{}",
        config.server.host, config.server.port
    ));

    server::run_server(&config.server).await?;
    Ok(())
}

pub async fn login(email: &str, password: Option<String>) -> Result<()> {
    let config = load_config()?;
    let controller = controller(&config).await?;
    let password = password_or_prompt(password)?;

    report(controller.login(email, &password).await)
}

pub async fn register(
    name: String,
    email: String,
    password: Option<String>,
    role: String,
    subjects: Vec<String>,
    bio: String,
) -> Result<()> {
    let config = load_config()?;
    let controller = controller(&config).await?;

    let registration = Registration {
        name,
        email,
        password: password_or_prompt(password)?,
        role,
        subjects,
        bio,
    };

    report(controller.register(&registration).await)
}

pub async fn logout() -> Result<()> {
    let config = load_config()?;
    let controller = controller(&config).await?;

    controller.logout().await;
    success("Signed out");
    Ok(())
}

pub async fn whoami(format: OutputFormat) -> Result<()> {
    let config = load_config()?;
    let controller = controller(&config).await?;

    match controller.wait_until_resolved().await {
        AuthState::Authenticated(identity) => match format {
            OutputFormat::Table => print_identity(&identity),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&identity)?),
        },
        _ => warn("Not signed in. Run 'tutorlink login --email <email>'"),
    }

    Ok(())
}

/// Report what a guard over `routes` (or the admin area) decides for the current session
pub async fn access(routes: Vec<String>, admin: bool) -> Result<()> {
    let config = load_config()?;
    let controller = controller(&config).await?;

    let guard = if admin {
        Guard::admin()
    } else if routes.is_empty() {
        Guard::authenticated()
    } else {
        let mut parsed = Vec::with_capacity(routes.len());
        for key in &routes {
            match key.parse::<Route>() {
                Ok(route) => parsed.push(route),
                Err(e) => warn(&e.to_string()),
            }
        }
        Guard::any_of(parsed)
    };

    let decision = guard.resolve(&controller).await;
    println!("{}", format_decision(decision, &config.access));

    for key in &routes {
        let mark = if controller.has_access(key) { "✓" } else { "✗" };
        println!("  {} {}", mark, key);
    }

    Ok(())
}

/// Print the role-to-route table
pub async fn routes(role: Option<String>) -> Result<()> {
    let config = load_config()?;
    let policy = config.access.unknown_role;

    let roles = match role {
        Some(role) => vec![Role::parse(&role)],
        None => vec![Role::Student, Role::Tutor, Role::Both, Role::Admin, Role::Unknown],
    };

    let rows: Vec<_> = roles
        .into_iter()
        .map(|role| (role, allowed_routes(role, policy)))
        .collect();
    print_route_table(&rows);

    Ok(())
}

fn load_config() -> Result<Config> {
    Ok(config::load_config_or_default()?)
}

/// Build the session controller and restore any stored session
async fn controller(config: &Config) -> Result<AuthController<HttpBackend>> {
    let backend = HttpBackend::from_config(&config.client)?;
    let storage = Arc::new(FileStore::new(&config.client.store_path));
    let store = SessionStore::new(storage, config.client.token_key.clone());

    Ok(AuthController::bootstrap(backend, store, config.access.unknown_role).await)
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => Ok(dialoguer::Password::new()
            .with_prompt("Password")
            .interact()?),
    }
}

fn report(outcome: AuthOutcome) -> Result<()> {
    match outcome {
        AuthOutcome::Success(identity) => {
            success(&format!("Signed in as {} ({})", identity.name, identity.role()));
            Ok(())
        }
        AuthOutcome::Failure(message) => {
            error(&message);
            Err(anyhow!(message))
        }
    }
}
