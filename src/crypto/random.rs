//! Cryptographically strong random material.
//!
//! Secrets are drawn from `rand::rng()`, the thread-local ChaCha CSPRNG
//! seeded from the operating system.  The same source fills salts, so a
//! weak generator here would weaken the cipher as well.

use rand::{Rng, RngCore};

use crate::errors::{Field, PrjRemError, Result};
use crate::vault::charset::Alphabet;

/// Length of the per-save scrypt salt in bytes.
pub const SALT_LEN: usize = 16;

/// Length used for generated secrets when the caller gives none.
pub const DEFAULT_SEQUENCE_LEN: usize = 16;

/// Build a string of exactly `length` characters drawn uniformly, with
/// replacement, from `alphabet`.
///
/// Fails when `length > 0` and every character has been omitted.
pub fn sequence(alphabet: &Alphabet, length: usize) -> Result<String> {
    let chars = alphabet.chars();
    if chars.is_empty() && length > 0 {
        return Err(PrjRemError::validation(
            Field::Secret,
            "every character is omitted from the generation alphabet",
        ));
    }

    let mut rng = rand::rng();
    Ok((0..length)
        .map(|_| chars[rng.random_range(0..chars.len())])
        .collect())
}

/// Interpret a user-supplied length for a generated secret.
///
/// - `None` or a non-numeric string falls back to `default`.
/// - A negative number is rejected rather than clamped.
pub fn parse_length(input: Option<&str>, default: usize) -> Result<usize> {
    let Some(raw) = input.map(str::trim) else {
        return Ok(default);
    };

    match raw.parse::<i64>() {
        Ok(n) if n < 0 => Err(PrjRemError::validation(
            Field::Length,
            format!("length must not be negative (got {n})"),
        )),
        Ok(n) => usize::try_from(n)
            .map_err(|_| PrjRemError::validation(Field::Length, "length is too large")),
        Err(_) => Ok(default),
    }
}

/// Generate a fresh random salt for one save.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
