use std::collections::HashSet;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::server::ServerError;

/// JWT payload. Tokens carry no `exp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub username: String,
    pub is_admin: bool,
    pub iat: i64,
}

impl Claims {
    pub fn new(username: &str, is_admin: bool) -> Self {
        Self {
            username: username.to_string(),
            is_admin,
            iat: Utc::now().timestamp(),
        }
    }
}

pub fn create_token(claims: &Claims, secret: &str) -> Result<String, ServerError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ServerError::InternalServerError(format!("Could not sign token: {e}")))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, ServerError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims = HashSet::new();
    validation.validate_exp = false;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("Invalid token: {}", e);
        ServerError::Unauthorized
    })
}
