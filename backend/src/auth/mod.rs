//! Session token handling.
//!
//! The identity provider's credential flow (password checks, OAuth) lives
//! outside this backend; this module only mints and validates the signed
//! session tokens and resolves a request to an [`Identity`].

use std::convert::Infallible;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::ApiError;
use crate::models::Role;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    role: String,
    exp: usize,
}

/// The authenticated caller, as resolved by the identity provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("unrecognized role claim: {0}")]
    UnknownRole(String),
    #[error("clock error: {0}")]
    Clock(#[from] std::time::SystemTimeError),
}

pub fn create_token(
    user_id: &str,
    email: &str,
    role: Role,
    jwt_secret: &str,
) -> Result<String, AuthError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)?
        .as_secs() as usize
        + 24 * 60 * 60; // 24 hours
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.as_str().to_string(),
        exp: expiration,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Identity, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::default(),
    )?;
    let claims = token_data.claims;
    let role = Role::parse(&claims.role).ok_or(AuthError::UnknownRole(claims.role))?;
    Ok(Identity {
        id: claims.sub,
        email: claims.email,
        role,
    })
}

/// Resolves the `Authorization: Bearer` header to an identity, or `None` for
/// anonymous and invalid sessions. Route gating decides whether anonymous is
/// acceptable.
pub fn bearer_identity(headers: &HeaderMap, jwt_secret: &str) -> Option<Identity> {
    let token = headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;
    match validate_token(token, jwt_secret) {
        Ok(identity) => Some(identity),
        Err(err) => {
            debug!("rejected session token: {err}");
            None
        }
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or_else(ApiError::unauthorized)
    }
}

/// Extractor for handlers that serve both anonymous and authenticated
/// callers (public listings apply a role-gated default filter).
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for MaybeIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeIdentity(parts.extensions.get::<Identity>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trip() {
        let token = create_token("u-1", "jane@example.com", Role::Admin, SECRET).unwrap();
        let identity = validate_token(&token, SECRET).unwrap();
        assert_eq!(identity.id, "u-1");
        assert_eq!(identity.email, "jane@example.com");
        assert_eq!(identity.role, Role::Admin);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_token("u-1", "jane@example.com", Role::User, SECRET).unwrap();
        assert!(validate_token(&token, "other-secret").is_err());
    }

    #[test]
    fn bearer_header_resolves_to_identity() {
        let token = create_token("u-2", "john@example.com", Role::User, SECRET).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
        let identity = bearer_identity(&headers, SECRET).unwrap();
        assert_eq!(identity.id, "u-2");
    }

    #[test]
    fn malformed_headers_are_anonymous() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Token abc".parse().unwrap());
        assert!(bearer_identity(&headers, SECRET).is_none());
        assert!(bearer_identity(&HeaderMap::new(), SECRET).is_none());
    }
}
