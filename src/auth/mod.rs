use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tower_cookies::Cookie;
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Name of the cookie carrying the signed session token
pub const SESSION_COOKIE: &str = "todo_session";

/// The signed-in user a request acts as. Handlers receive this explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Session secret is not configured")]
    InvalidSecret,

    #[error("Session token generation failed: {0}")]
    TokenGeneration(String),

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

/// Signs and verifies session tokens (HS256 JWTs) and builds the session cookie.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

struct SessionKeysInner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_hours: u64,
    secure_cookies: bool,
}

impl SessionKeys {
    pub fn from_config(security: &SecurityConfig) -> Result<Self, AuthError> {
        let secret = &security.session_secret;
        if secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }

        Ok(Self {
            inner: Arc::new(SessionKeysInner {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
                expiry_hours: security.session_expiry_hours,
                secure_cookies: security.secure_cookies,
            }),
        })
    }

    pub fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: identity.user_id,
            username: identity.username.clone(),
            exp: (now + Duration::hours(self.inner.expiry_hours as i64)).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.inner.encoding)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let data = decode::<Claims>(token, &self.inner.decoding, &Validation::default())
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        Ok(data.claims.into())
    }

    pub fn cookie(&self, token: String) -> Cookie<'static> {
        let mut cookie = Cookie::new(SESSION_COOKIE, token);
        cookie.set_http_only(true);
        cookie.set_path("/");
        cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
        cookie.set_secure(self.inner.secure_cookies);
        cookie
    }
}

/// Stands in for the stored hash when the username is unknown, so a failed
/// login costs one argon2 verification whether or not the account exists.
static DUMMY_HASH: Lazy<String> =
    Lazy::new(|| hash_blocking("todo-web-dummy-password").unwrap_or_default());

/// Hash a password with Argon2id on the blocking pool, returning the PHC string
pub async fn hash_password(password: &str) -> Result<String, AuthError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?
}

/// Check a password against a stored PHC string on the blocking pool.
///
/// `None` means there is no such account: the password is still checked
/// against a throwaway hash and the result is always `false`. A malformed
/// stored hash never matches.
pub async fn verify_password(password: &str, password_hash: Option<&str>) -> bool {
    let password = password.to_owned();
    let stored = password_hash.map(str::to_owned);

    let result = tokio::task::spawn_blocking(move || match stored {
        Some(hash) => verify_blocking(&password, &hash),
        None => {
            verify_blocking(&password, &DUMMY_HASH);
            false
        }
    })
    .await;

    match result {
        Ok(matched) => matched,
        Err(e) => {
            tracing::error!("Password verification task failed: {}", e);
            false
        }
    }
}

fn hash_blocking(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

fn verify_blocking(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        tracing::warn!("Stored password hash could not be parsed");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn keys() -> SessionKeys {
        SessionKeys::from_config(&AppConfig::development().security).unwrap()
    }

    fn alice() -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            username: "alice".to_string(),
        }
    }

    #[test]
    fn token_round_trips_identity() {
        let keys = keys();
        let identity = alice();
        let token = keys.issue(&identity).unwrap();
        assert_eq!(keys.verify(&token).unwrap(), identity);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let mut security = AppConfig::development().security;
        security.session_secret = "someone-else".to_string();
        let other = SessionKeys::from_config(&security).unwrap();

        let token = other.issue(&alice()).unwrap();
        assert!(matches!(keys().verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn rejects_expired_token() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            username: "alice".to_string(),
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
            iat: (Utc::now() - Duration::hours(3)).timestamp(),
        };
        let secret = AppConfig::development().security.session_secret;
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        assert!(keys().verify(&token).is_err());
    }

    #[test]
    fn empty_secret_is_refused() {
        let security = AppConfig::production().security;
        assert!(matches!(
            SessionKeys::from_config(&security),
            Err(AuthError::InvalidSecret)
        ));
    }

    #[test]
    fn session_cookie_is_http_only() {
        let cookie = keys().cookie("token".to_string());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[tokio::test]
    async fn password_hash_verifies() {
        let hash = hash_password("pw1").await.unwrap();
        assert_ne!(hash, "pw1");
        assert!(verify_password("pw1", Some(&hash)).await);
        assert!(!verify_password("pw2", Some(&hash)).await);
        assert!(!verify_password("pw1", Some("not-a-phc-string")).await);
    }

    #[tokio::test]
    async fn missing_account_still_runs_a_real_check() {
        assert!(PasswordHash::new(&DUMMY_HASH).is_ok());
        assert!(!verify_password("todo-web-dummy-password", None).await);
        assert!(!verify_password("pw1", None).await);
    }
}
