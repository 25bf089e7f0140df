use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::{self, Environment};

/// Name of the session cookie issued at login and cleared at logout.
pub const SESSION_COOKIE: &str = "lotes_session";

/// Identity encoded into a session token at login time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject username
    pub sub: String,
    pub email: String,
    pub rol: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(sub: String, email: String, rol: String) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.session_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub,
            email,
            rol,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum TokenError {
    Generation(String),
    MissingSecret,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Generation(msg) => write!(f, "token generation error: {}", msg),
            TokenError::MissingSecret => write!(f, "session secret not configured"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Sign a session token with the configured secret.
pub fn issue_session_token(claims: &Claims) -> Result<String, TokenError> {
    issue_with_secret(claims, &config::config().security.session_secret)
}

fn issue_with_secret(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| TokenError::Generation(e.to_string()))
}

/// Verify signature and expiration of a candidate token.
///
/// Deliberately collapses every failure (malformed, bad signature, expired)
/// into `None` so callers cannot distinguish rejection causes.
pub fn verify_session_token(token: &str) -> Option<Claims> {
    verify_with_secret(token, &config::config().security.session_secret)
}

fn verify_with_secret(token: &str, secret: &str) -> Option<Claims> {
    if secret.is_empty() {
        return None;
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.leeway = 0;

    match decode::<Claims>(token, &decoding_key, &validation) {
        Ok(data) => Some(data.claims),
        Err(e) => {
            tracing::debug!("session token rejected: {}", e);
            None
        }
    }
}

/// Build the Set-Cookie value for a fresh session.
pub fn session_cookie(token: &str) -> String {
    let max_age = config::config().security.session_expiry_hours * 3600;
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        SESSION_COOKIE,
        token,
        max_age,
        secure_attribute()
    )
}

/// Build the Set-Cookie value that clears the session. Empty value,
/// Max-Age=0, same attributes as the issuing cookie.
pub fn clear_session_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0{}",
        SESSION_COOKIE,
        secure_attribute()
    )
}

fn secure_attribute() -> &'static str {
    if config::config().environment == Environment::Development {
        ""
    } else {
        "; Secure"
    }
}
