//! The in-memory entry map and identifier resolution.
//!
//! Entries live in a plain `HashMap`.  Index-based lookups sort the keys
//! afresh on every call; an index is a convenience for one interactive
//! moment, not a stable identifier, so an insert or delete between `list`
//! and `retrieve` can shift it.

use std::collections::HashMap;

use tracing::debug;

use crate::crypto::random;
use crate::errors::{Field, PrjRemError, Result};

use super::charset::{is_legit, Alphabet};
use super::entry::Entry;
use super::format;

/// Outcome of a bulk import.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Number of entries created or overwritten.
    pub imported: usize,
    /// `(key, reason)` for every entry that was refused.
    pub rejected: Vec<(String, String)>,
}

/// Keys mapped to their entries.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EntryRegistry {
    entries: HashMap<String, Entry>,
}

impl EntryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_entries(entries: HashMap<String, Entry>) -> Self {
        Self { entries }
    }

    pub(crate) fn entries(&self) -> &HashMap<String, Entry> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or overwrite an entry.
    ///
    /// With `secret = None` a secret of `length` characters is generated
    /// from `alphabet`.  A supplied secret must pass `is_legit`.
    pub fn create(
        &mut self,
        key: &str,
        secret: Option<&str>,
        description: Option<&str>,
        alphabet: &Alphabet,
        length: usize,
    ) -> Result<&Entry> {
        if !is_legit(key) {
            return Err(PrjRemError::validation(
                Field::Key,
                format!("'{key}' is empty or contains characters outside [A-Za-z0-9!@#$]"),
            ));
        }

        let secret = match secret {
            Some(s) if is_legit(s) => s.to_string(),
            Some(_) => {
                return Err(PrjRemError::validation(
                    Field::Secret,
                    "secret is empty or contains characters outside [A-Za-z0-9!@#$]",
                ));
            }
            None => {
                if length == 0 {
                    return Err(PrjRemError::validation(
                        Field::Length,
                        "generated secret length must be at least 1",
                    ));
                }
                random::sequence(alphabet, length)?
            }
        };

        let entry = Entry::new(key, secret, description.map(str::to_string));
        debug!(key = %key, "entry stored");

        self.entries.insert(key.to_string(), entry);
        Ok(&self.entries[key])
    }

    /// Look an entry up by exact key, falling back to its position in the
    /// sorted key list.
    pub fn retrieve(&self, identifier: &str) -> Result<&Entry> {
        let key = self.resolve(identifier)?;
        Ok(&self.entries[&key])
    }

    /// Remove an entry by exact key.  Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            debug!(key = %key, "entry deleted");
        }
        removed
    }

    /// Replace only the description of an existing entry.
    pub fn describe(&mut self, identifier: &str, description: Option<&str>) -> Result<&Entry> {
        let key = self.resolve(identifier)?;
        let entry = self
            .entries
            .get_mut(&key)
            .ok_or_else(|| PrjRemError::NotFound(identifier.to_string()))?;
        entry.description = description.map(str::to_string);
        Ok(entry)
    }

    /// `(index, key)` pairs in sorted key order as of this call.
    pub fn list(&self) -> Vec<(usize, &str)> {
        self.sorted_keys().into_iter().enumerate().collect()
    }

    /// The whole map as indented JSON, `key -> [secret, description]`.
    pub fn export_all(&self) -> Result<zeroize::Zeroizing<String>> {
        format::serialize_entries_pretty(&self.entries)
    }

    /// Run `create` for every entry of a JSON map.
    ///
    /// Malformed JSON fails as a whole; individual invalid entries are
    /// reported in the returned `ImportReport` and the rest still land.
    pub fn import_all(&mut self, text: &str, alphabet: &Alphabet) -> Result<ImportReport> {
        let incoming = format::deserialize_entries(text.as_bytes())?;

        let mut keys: Vec<&String> = incoming.keys().collect();
        keys.sort();

        let mut report = ImportReport::default();
        for key in keys {
            let entry = &incoming[key];
            match self.create(
                key,
                Some(entry.secret.as_str()),
                entry.description.as_deref(),
                alphabet,
                random::DEFAULT_SEQUENCE_LEN,
            ) {
                Ok(_) => report.imported += 1,
                Err(e) => report.rejected.push((key.clone(), e.to_string())),
            }
        }

        debug!(
            imported = report.imported,
            rejected = report.rejected.len(),
            "bulk import finished"
        );
        Ok(report)
    }

    fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    fn resolve(&self, identifier: &str) -> Result<String> {
        if self.entries.contains_key(identifier) {
            return Ok(identifier.to_string());
        }

        identifier
            .parse::<usize>()
            .ok()
            .and_then(|index| self.sorted_keys().get(index).map(|k| k.to_string()))
            .ok_or_else(|| PrjRemError::NotFound(identifier.to_string()))
    }
}
