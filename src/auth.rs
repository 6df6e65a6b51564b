use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{AppState, config::AuthConfig, error::AppError, models::User};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Identity of the caller, taken from a verified `Authorization: Bearer` token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
}

pub fn create_token(config: &AuthConfig, user: &User) -> Result<String, AppError> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        iat: now.unix_timestamp(),
        exp: (now + Duration::days(config.token_ttl_days)).unix_timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalError(e.into()))
}

pub fn verify_token(config: &AuthConfig, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!("Rejected token: {e}");
        AppError::Unauthorized("Invalid token".to_string())
    })
}

pub fn hash_password(config: &AuthConfig, password: &str) -> Result<String, AppError> {
    bcrypt::hash(password.as_bytes(), config.bcrypt_cost)
        .map_err(|e| AppError::InternalError(e.into()))
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    bcrypt::verify(password.as_bytes(), password_hash)
        .map_err(|e| AppError::InternalError(e.into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("No token provided".to_string()))?;

        let token = header_value
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty() && !token.contains(' '))
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization format".to_string()))?;

        let claims = verify_token(&state.auth_config, token)?;

        Ok(AuthUser {
            user_id: claims.sub,
            username: claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl_days: 7,
            bcrypt_cost: 4,
        }
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: String::new(),
            avatar: String::new(),
            channels: Vec::new(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn token_round_trips_identity() {
        let user = user();
        let token = create_token(&config(), &user).unwrap();
        let claims = verify_token(&config(), &token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = create_token(&config(), &user()).unwrap();
        let other = AuthConfig {
            jwt_secret: "other".to_string(),
            ..config()
        };
        assert!(matches!(
            verify_token(&other, &token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let user = user();
        let past = OffsetDateTime::now_utc() - Duration::days(2);
        let claims = Claims {
            sub: user.id,
            username: user.username,
            email: user.email,
            iat: past.unix_timestamp(),
            exp: (past + Duration::days(1)).unix_timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(verify_token(&config(), &token).is_err());
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password(&config(), "hunter2").unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }
}
