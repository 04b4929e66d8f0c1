//! Utilidades JWT
//!
//! Los tokens los emite el user service: HS256 con claims
//! `{user_id, email, exp}`. Este servicio solo los verifica y extrae el id
//! entero del usuario. Si falta `user_id` se acepta un `sub` numérico.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{config::environment::EnvironmentConfig, utils::errors::AppError};

/// Claims del token emitido por el user service
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct JwtClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
}

impl JwtClaims {
    pub fn user_id(&self) -> Result<i32, AppError> {
        if let Some(id) = self.user_id {
            return Ok(id);
        }

        self.sub
            .as_deref()
            .ok_or_else(|| AppError::Jwt("token carries no user id".to_string()))?
            .parse()
            .map_err(|_| AppError::Jwt("subject is not a valid user id".to_string()))
    }
}

/// Configuración JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Lifetime in seconds of tokens minted by `generate_token`
    pub expiration: u64,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiration: config.jwt_expiration,
        }
    }
}

/// Mint a token with the user service's claim shape. Used by local tooling and tests.
pub fn generate_token(user_id: i32, config: &JwtConfig) -> Result<String, AppError> {
    let now = Utc::now();
    let lifetime = i64::try_from(config.expiration)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| AppError::Jwt("token lifetime out of range".to_string()))?;
    let expires_at = now
        .checked_add_signed(lifetime)
        .ok_or_else(|| AppError::Jwt("token lifetime out of range".to_string()))?;

    let claims = JwtClaims {
        user_id: Some(user_id),
        exp: u64::try_from(expires_at.timestamp())
            .map_err(|_| AppError::Jwt("token expiry before epoch".to_string()))?,
        iat: u64::try_from(now.timestamp()).ok(),
        ..Default::default()
    };

    let encoding_key = EncodingKey::from_secret(config.secret.as_ref());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Jwt(format!("error generating token: {}", e)))
}

/// Verify signature and expiry, then decode the claims
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<JwtClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

    let token_data = decode::<JwtClaims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AppError::Jwt(format!("invalid token: {}", e)))?;

    Ok(token_data.claims)
}

/// Extract the token from an `Authorization` header value
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("invalid authorization header".to_string()))?;

    if token.trim().is_empty() {
        return Err(AppError::Unauthorized("empty bearer token".to_string()));
    }

    Ok(token.trim())
}
