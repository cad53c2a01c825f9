//! A single credential record.

use std::fmt;

/// One credential: key, secret value, optional free-text description.
#[derive(Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub secret: String,
    pub description: Option<String>,
}

impl Entry {
    pub fn new(
        key: impl Into<String>,
        secret: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            description,
        }
    }
}

// Secrets stay out of logs and panic messages.
impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("secret", &"[REDACTED]")
            .field("description", &self.description)
            .finish()
    }
}

impl Drop for Entry {
    fn drop(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.secret);
    }
}
