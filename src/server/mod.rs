//! Reference auth backend
//!
//! Serves the endpoints the session controller talks to, so the client can
//! be exercised end to end without the production backend.

pub mod directory;
pub mod jwt;
pub mod middleware;
mod routes;
mod state;

pub use state::{AppState, SharedState};

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::Result;

/// Run the auth server on the configured address
pub async fn run_server(config: &ServerConfig) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    serve(listener, config).await
}

/// Run the auth server on an already bound listener
pub async fn serve(listener: TcpListener, config: &ServerConfig) -> Result<()> {
    let state = AppState::from_config(config)?;
    let app = create_router(state);

    tracing::info!("Auth server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    let auth = Router::new()
        .route("/me", get(routes::me))
        .route("/login", post(routes::login))
        .route("/register", post(routes::register))
        .route("/logout", post(routes::logout));

    Router::new()
        .route("/api/health", get(routes::health))
        .nest("/api/auth", auth)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
