use std::fmt;

use thiserror::Error;

use crate::vault::VaultStatus;

/// Which part of an entry failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Key,
    Secret,
    Length,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Field::Key => "key",
            Field::Secret => "secret",
            Field::Length => "length",
        };
        f.write_str(label)
    }
}

/// All errors that can occur in prjrem.
#[derive(Debug, Error)]
pub enum PrjRemError {
    // --- Registry errors ---
    #[error("Invalid {field}: {reason}")]
    Validation { field: Field, reason: String },

    #[error("No entry matches '{0}'")]
    NotFound(String),

    // --- Crypto errors ---
    #[error("Decryption failed — wrong passphrase or corrupted vault")]
    DecryptionFailed,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Vault file errors ---
    #[error("Path error: {0}")]
    PathError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Cannot {operation} while the vault is {status}")]
    InvalidState {
        operation: &'static str,
        status: VaultStatus,
    },

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Editor error: {0}")]
    EditorError(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

impl PrjRemError {
    pub(crate) fn validation(field: Field, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for prjrem results.
pub type Result<T> = std::result::Result<T, PrjRemError>;
