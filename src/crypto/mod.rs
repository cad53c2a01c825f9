//! Cryptographic primitives for prjrem.
//!
//! This module provides:
//! - Random sequences and salts (`random`)
//! - scrypt password-based key derivation (`kdf`)
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - Read-only AES-CBC decoding of legacy vaults (`legacy`)
//! - Zeroizing passphrase and key wrappers (`keys`)

pub mod encryption;
pub mod kdf;
pub mod keys;
pub mod legacy;
pub mod random;

pub use encryption::{open, seal};
pub use kdf::{derive_key, KdfParams};
pub use keys::{DerivedKey, Passphrase};
pub use random::{generate_salt, parse_length, sequence};
