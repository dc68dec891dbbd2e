//! Auth endpoint handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::directory::{hash_password, NewUser};
use super::middleware::Authenticated;
use super::state::SharedState;
use crate::auth::models::{AuthResponse, LoginRequest, RegisterRequest, Role};
use crate::error::{Error, Result};

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::InvalidCredentials
            | Error::InvalidToken(_)
            | Error::TokenRevoked
            | Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::EmailTaken(_) => StatusCode::CONFLICT,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self);
        }

        let body = AuthResponse {
            success: false,
            error: Some(self.to_string()),
            ..AuthResponse::default()
        };
        (status, Json(body)).into_response()
    }
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Run CPU-bound work (bcrypt) on the blocking pool
async fn run_blocking<T, F>(work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| Error::Other(format!("blocking task failed: {}", e)))?
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let user = state
        .directory
        .read()
        .await
        .find_by_email(&req.email)
        .cloned();

    let verified = match user {
        Some(user) => {
            let password = req.password.clone();
            run_blocking(move || Ok(user.verify_password(&password)?.then_some(user))).await?
        }
        None => None,
    };
    let Some(user) = verified else {
        tracing::info!("Failed login for {}", req.email.trim());
        return Err(Error::InvalidCredentials);
    };

    let token = state.tokens.issue(&user.id, &user.email, user.role)?;
    tracing::info!("User {} logged in", user.id);

    Ok(Json(AuthResponse {
        success: true,
        token: Some(token),
        user: Some(user.to_record()),
        ..AuthResponse::default()
    }))
}

pub async fn register(
    State(state): State<SharedState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let role = Role::parse(&req.role);
    if matches!(role, Role::Admin | Role::Unknown) {
        return Err(Error::InvalidInput(format!(
            "role '{}' cannot be chosen at registration",
            req.role
        )));
    }

    let new_user = NewUser {
        full_name: req.full_name,
        email: req.email,
        password: req.password,
        role,
        subjects: req.subjects,
        bio: req.bio,
    };

    let cost = {
        let directory = state.directory.read().await;
        directory.check_new(&new_user)?;
        directory.bcrypt_cost()
    };
    let password = new_user.password.clone();
    let password_hash = run_blocking(move || hash_password(&password, cost)).await?;

    // Another registration may have taken the email while hashing
    let user = state
        .directory
        .write()
        .await
        .insert_hashed(new_user, password_hash)?;

    let token = state.tokens.issue(&user.id, &user.email, user.role)?;
    tracing::info!("Registered user {} as {}", user.id, user.role);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            token: Some(token),
            user: Some(user.to_record()),
            ..AuthResponse::default()
        }),
    ))
}

pub async fn me(
    State(state): State<SharedState>,
    auth: Authenticated,
) -> Result<Json<serde_json::Value>> {
    let directory = state.directory.read().await;
    let user = directory
        .find_by_id(&auth.claims.sub)
        .ok_or_else(|| Error::Unauthorized("account no longer exists".to_string()))?;

    Ok(Json(json!({ "success": true, "user": user.to_record() })))
}

pub async fn logout(State(state): State<SharedState>, auth: Authenticated) -> Json<AuthResponse> {
    state
        .revoked
        .write()
        .await
        .revoke(&auth.claims.jti, auth.claims.exp);
    tracing::info!("User {} logged out", auth.claims.sub);

    Json(AuthResponse {
        success: true,
        ..AuthResponse::default()
    })
}
