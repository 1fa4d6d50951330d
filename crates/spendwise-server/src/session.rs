//! Stateless session tokens
//!
//! A session is an HS256 JWT carrying the account id and email. Logging out
//! is a client-side discard; tokens stay valid until they expire.

use anyhow::Context;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::ServerConfig;
use spendwise_core::models::Account;

/// Environment variable holding the token signing secret
pub const SESSION_SECRET_ENV: &str = "SPENDWISE_SESSION_SECRET";

/// Environment variable overriding the token lifetime in hours
pub const SESSION_TTL_ENV: &str = "SPENDWISE_SESSION_TTL_HOURS";

/// JWT claims for a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// The authenticated caller, added to request extensions by the middleware
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account_id: i64,
    pub email: String,
}

/// Sign a session token for an account
///
/// Fails if the configured lifetime does not fit in a timestamp.
pub fn issue_token(config: &ServerConfig, account: &Account) -> anyhow::Result<String> {
    let now = Utc::now();
    let expires = Duration::try_hours(config.session_ttl_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .with_context(|| {
            format!(
                "Session lifetime of {} hours is out of range",
                config.session_ttl_hours
            )
        })?;

    let claims = Claims {
        sub: account.id.to_string(),
        email: account.email.clone(),
        iat: now.timestamp(),
        exp: expires.timestamp(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.session_secret.as_bytes()),
    )?;
    Ok(token)
}

/// Verify signature and expiry, returning the caller
pub fn validate_token(
    config: &ServerConfig,
    token: &str,
) -> jsonwebtoken::errors::Result<AuthUser> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.session_secret.as_bytes()),
        &validation,
    )?;

    let account_id = data
        .claims
        .sub
        .parse::<i64>()
        .map_err(|_| jsonwebtoken::errors::ErrorKind::InvalidSubject)?;

    Ok(AuthUser {
        account_id,
        email: data.claims.email,
    })
}
