//! Tab token creation and verification.
//!
//! Tab tokens are HS256 JWTs whose subject is the tab id. A request that
//! presents no token, or one that fails verification, is given a new tab.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use boscocare_config::TabConfig;
use boscocare_core::AppError;

use crate::claims::TabClaims;

pub fn create_tab_token(tab_id: Uuid, tab_config: &TabConfig) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + tab_config.expiry_secs.max(0) as usize;

    let claims = TabClaims {
        sub: tab_id.to_string(),
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(tab_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create tab token: {}", e)))
}

/// Verifies a tab token and returns the tab id it names.
pub fn verify_tab_token(token: &str, tab_config: &TabConfig) -> Result<Uuid, AppError> {
    let data = decode::<TabClaims>(
        token,
        &DecodingKey::from_secret(tab_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::unauthorized("Invalid tab token".to_string()))?;

    data.claims
        .sub
        .parse()
        .map_err(|_| AppError::unauthorized("Invalid tab token".to_string()))
}
