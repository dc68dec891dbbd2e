//! Bearer token extraction for protected endpoints

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::jwt::Claims;
use super::state::SharedState;
use crate::error::{Error, Result};

/// Cookie consulted when no Authorization header is present
pub const TOKEN_COOKIE: &str = "tutorlink_token";

/// Pull the raw token from `Authorization: Bearer` or the session cookie
pub fn extract_token(headers: &HeaderMap) -> Result<String> {
    if let Some(auth_header) = headers.get(AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| Error::Unauthorized("malformed authorization header".to_string()))?;
        let (scheme, token) = auth_str
            .trim()
            .split_once(' ')
            .ok_or_else(|| Error::Unauthorized("malformed authorization header".to_string()))?;
        if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
            return Err(Error::Unauthorized("expected a bearer token".to_string()));
        }
        return Ok(token.trim().to_string());
    }

    if let Some(cookie_header) = headers.get("Cookie") {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                if let Some(token) = cookie.trim().strip_prefix(&format!("{}=", TOKEN_COOKIE)) {
                    return Ok(token.to_string());
                }
            }
        }
    }

    Err(Error::Unauthorized("no authentication token found".to_string()))
}

/// A request carrying a valid, unrevoked session token
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub token: String,
    pub claims: Claims,
}

impl FromRequestParts<SharedState> for Authenticated {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)?;
        let claims = state.tokens.validate(&token)?;

        if state.revoked.read().await.contains(&claims.jti) {
            return Err(Error::TokenRevoked);
        }

        Ok(Self { token, claims })
    }
}
