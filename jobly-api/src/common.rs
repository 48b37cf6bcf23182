use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

use crate::server::ServerError;
use regex::Regex;

pub const MIN_LEN_PASSWORD: usize = 5;
pub const MAX_LEN_PASSWORD: usize = 20;
pub const MAX_LEN_USERNAME: usize = 25;
pub const MAX_LEN_NAME: usize = 30;
pub const MAX_LEN_HANDLE: usize = 25;

pub fn hash_password(password: &str) -> Result<String, ServerError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    Ok(argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ServerError::InternalServerError(e.to_string()))?
        .to_string())
}

/// A malformed stored hash is a server fault, a mismatch is just `false`.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServerError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| ServerError::InternalServerError(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn is_valid_password(password: &str) -> bool {
    (MIN_LEN_PASSWORD..=MAX_LEN_PASSWORD).contains(&password.chars().count())
}

pub fn is_valid_email(email: &str) -> Result<bool, ServerError> {
    let regex = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .map_err(|e| ServerError::InternalServerError(e.to_string()))?;

    Ok(regex.is_match(email))
}

pub fn is_valid_url(url: &str) -> Result<bool, ServerError> {
    let regex = Regex::new(r"^https?://[^\s/$.?#][^\s]*$")
        .map_err(|e| ServerError::InternalServerError(e.to_string()))?;

    Ok(regex.is_match(url))
}

/// Non-empty and at most `max` characters.
pub fn is_valid_length(value: &str, max: usize) -> bool {
    (1..=max).contains(&value.chars().count())
}

pub fn require(valid: bool, message: &str) -> Result<(), ServerError> {
    if valid {
        Ok(())
    } else {
        Err(ServerError::BadRequest(message.to_string()))
    }
}
