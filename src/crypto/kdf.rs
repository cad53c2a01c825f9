//! Password-based key derivation using scrypt.
//!
//! scrypt is memory-hard: with the default parameters one derivation
//! touches 1 GiB and blocks the calling thread for a noticeable moment.
//! That cost is what slows offline guessing, so it is not worked around.
//! Parameters are recorded in every vault header so a file always reopens
//! with the exact settings it was written with.

use crate::crypto::keys::{DerivedKey, Passphrase, KEY_LEN};
use crate::errors::{PrjRemError, Result};

/// Upper bound on `log_n` accepted from a vault header (2^20).
pub const MAX_LOG_N: u8 = 20;
/// Upper bound on `r` accepted from a vault header.
pub const MAX_R: u32 = 32;
/// Upper bound on `p` accepted from a vault header.
pub const MAX_P: u32 = 16;

/// scrypt cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// log2 of the CPU/memory cost `N`.
    pub log_n: u8,
    /// Block size.
    pub r: u32,
    /// Parallelism.
    pub p: u32,
}

impl KdfParams {
    /// `N = 2^20`.
    pub const LOG_N: u8 = 20;
    pub const R: u32 = 8;
    pub const P: u32 = 1;

    /// Whether these params are safe to run on untrusted input.
    ///
    /// A tampered header must never be able to request an unbounded
    /// allocation before authentication has a chance to fail.
    pub fn within_bounds(&self) -> bool {
        (1..=MAX_LOG_N).contains(&self.log_n)
            && (1..=MAX_R).contains(&self.r)
            && (1..=MAX_P).contains(&self.p)
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            log_n: Self::LOG_N,
            r: Self::R,
            p: Self::P,
        }
    }
}

/// Derive a 32-byte key from a passphrase and salt.
///
/// Deterministic: the same passphrase, salt, and params always give the
/// same key.
pub fn derive_key(passphrase: &Passphrase, salt: &[u8], params: &KdfParams) -> Result<DerivedKey> {
    if !params.within_bounds() {
        return Err(PrjRemError::KeyDerivationFailed(format!(
            "scrypt params out of range (log_n={}, r={}, p={})",
            params.log_n, params.r, params.p
        )));
    }

    let scrypt_params = scrypt::Params::new(params.log_n, params.r, params.p, KEY_LEN)
        .map_err(|e| PrjRemError::KeyDerivationFailed(format!("invalid scrypt params: {e}")))?;

    let mut key = [0u8; KEY_LEN];
    scrypt::scrypt(passphrase.as_bytes(), salt, &scrypt_params, &mut key)
        .map_err(|e| PrjRemError::KeyDerivationFailed(format!("scrypt failed: {e}")))?;

    let derived = DerivedKey::new(key);
    zeroize::Zeroize::zeroize(&mut key);
    Ok(derived)
}
