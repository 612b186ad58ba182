use crate::error::AppError;
use bcrypt::{hash, verify};
use std::sync::OnceLock;

/// bcrypt work factor. 10 keeps a single hash in the tens of milliseconds.
pub const PASSWORD_HASH_COST: u32 = 10;

/// bcrypt only reads the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Produces a salted bcrypt digest of `password`.
///
/// Fails with `AppError::HashingError` when the password is longer than
/// bcrypt can hash without truncation, or when bcrypt itself fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::HashingError(format!(
            "password exceeds {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    hash(password, PASSWORD_HASH_COST)
        .map_err(|e| AppError::HashingError(format!("Failed to hash password: {}", e)))
}

/// Checks `password` against a stored digest.
///
/// A mismatch is `Ok(false)`; only a malformed digest is an error. Input
/// past `MAX_PASSWORD_BYTES` never matches, since bcrypt would compare only
/// its prefix.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Ok(false);
    }
    verify(password, hashed_password)
        .map_err(|e| AppError::HashingError(format!("Failed to verify password: {}", e)))
}

static DECOY_DIGEST: OnceLock<String> = OnceLock::new();

/// Runs a full bcrypt comparison against a digest no account owns.
///
/// Login calls this when the email is unknown so that path costs the same
/// work as a wrong password. Always `Ok(false)`.
pub fn verify_decoy(password: &str) -> Result<bool, AppError> {
    let digest = match DECOY_DIGEST.get() {
        Some(digest) => digest,
        None => {
            let fresh = hash_password("decoy-digest-without-account")?;
            DECOY_DIGEST.get_or_init(|| fresh)
        }
    };
    verify_password(password, digest)?;
    Ok(false)
}
