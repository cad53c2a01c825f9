//! High-level vault operations used by CLI commands.
//!
//! `VaultStore` owns the vault file location, the lock/unlock status, and
//! the in-memory `EntryRegistry`.  It never holds a passphrase or derived
//! key: callers pass a `Passphrase` into `open` and `save`, and the key
//! derived from it is dropped (and zeroed) before those calls return.
//!
//! ```text
//! NO-FILE --set_location--> NEW      (target absent)
//! NO-FILE --set_location--> LOCKED   (target present)
//! LOCKED  --open ok-------> UNLOCKED
//! LOCKED  --open failed---> LOCKED
//! NEW     --save----------> UNLOCKED (needs at least one entry)
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::crypto::kdf::KdfParams;
use crate::crypto::keys::Passphrase;
use crate::crypto::random::{parse_length, DEFAULT_SEQUENCE_LEN};
use crate::errors::{PrjRemError, Result};

use super::charset::Alphabet;
use super::entry::Entry;
use super::format::{self, FormatVersion};
use super::registry::{EntryRegistry, ImportReport};

/// Where the store is in its lifecycle.  Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultStatus {
    /// No usable location configured.
    NoFile,
    /// Location configured, file does not exist yet.
    New,
    /// File present; not decrypted yet, or the last attempt failed.
    Locked,
    /// Decrypted; entries are available.
    Unlocked,
}

impl fmt::Display for VaultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VaultStatus::NoFile => "NO-FILE",
            VaultStatus::New => "NEW",
            VaultStatus::Locked => "LOCKED",
            VaultStatus::Unlocked => "UNLOCKED",
        };
        f.write_str(label)
    }
}

/// The main vault handle.
pub struct VaultStore {
    /// Path to the vault file, once one has been accepted.
    location: Option<PathBuf>,

    status: VaultStatus,

    /// Decrypted entries (empty unless NEW or UNLOCKED).
    registry: EntryRegistry,

    /// Format the current entries were loaded from.
    format_version: Option<FormatVersion>,

    /// Cost parameters used for the next save.
    kdf_params: KdfParams,

    /// Characters used when generating secrets.
    alphabet: Alphabet,

    /// Length of generated secrets when the caller gives none.
    default_length: usize,

    /// Entries changed since the last load or save.
    dirty: bool,

    last_error: Option<String>,
}

impl VaultStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a store with no location yet.
    pub fn new(kdf_params: KdfParams, alphabet: Alphabet) -> Self {
        Self {
            location: None,
            status: VaultStatus::NoFile,
            registry: EntryRegistry::new(),
            format_version: None,
            kdf_params,
            alphabet,
            default_length: DEFAULT_SEQUENCE_LEN,
            dirty: false,
            last_error: None,
        }
    }

    /// Change the length used for generated secrets.
    pub fn with_default_length(mut self, length: usize) -> Self {
        self.default_length = length;
        self
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Point the store at a vault file.
    ///
    /// The parent directory must exist.  A missing target moves the store
    /// to NEW; an existing one to LOCKED, awaiting `open`.  Any entries
    /// from a previous location are dropped.  On failure nothing changes.
    pub fn set_location(&mut self, path: &Path) -> Result<VaultStatus> {
        let result = Self::check_location(path);
        let next = self.record(result)?;

        self.location = Some(path.to_path_buf());
        self.status = next;
        self.registry = EntryRegistry::new();
        self.format_version = None;
        self.dirty = false;

        info!(path = %path.display(), status = %next, "vault location set");
        Ok(next)
    }

    fn check_location(path: &Path) -> Result<VaultStatus> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if !parent.is_dir() {
            return Err(PrjRemError::PathError(format!(
                "directory {} does not exist",
                parent.display()
            )));
        }
        if path.is_dir() {
            return Err(PrjRemError::PathError(format!(
                "{} is a directory",
                path.display()
            )));
        }
        Ok(if path.exists() {
            VaultStatus::Locked
        } else {
            VaultStatus::New
        })
    }

    /// Decrypt the vault file with `passphrase`.
    ///
    /// Success replaces the in-memory entries and moves to UNLOCKED.
    /// Failure moves to LOCKED with no entries, records the error, and
    /// leaves the file untouched so another passphrase can be tried.
    /// Opening a NEW store whose file still does not exist is a no-op.
    pub fn open(&mut self, passphrase: &Passphrase) -> Result<VaultStatus> {
        let location = self.location.clone();
        let Some(path) = location.filter(|_| self.status != VaultStatus::NoFile) else {
            let err = self.invalid_state("open");
            return self.record(Err(err));
        };

        if self.status == VaultStatus::New && !path.exists() {
            return Ok(VaultStatus::New);
        }

        let decoded =
            format::read_vault_file(&path).and_then(|bytes| format::decode(&bytes, passphrase));

        match decoded {
            Ok((entries, version)) => {
                self.registry = EntryRegistry::from_entries(entries);
                self.format_version = Some(version);
                self.status = VaultStatus::Unlocked;
                self.last_error = None;
                // A legacy file still has to be rewritten in the current format.
                self.dirty = version.is_legacy();
                if version.is_legacy() {
                    warn!(%version, "opened legacy vault; save to migrate it");
                }
                debug!(entries = self.registry.len(), "vault unlocked");
                Ok(VaultStatus::Unlocked)
            }
            Err(e) => {
                self.registry = EntryRegistry::new();
                self.format_version = None;
                self.status = VaultStatus::Locked;
                self.dirty = false;
                warn!("vault open failed");
                self.record(Err(e))
            }
        }
    }

    /// Encrypt the entries under `passphrase` with a fresh salt and write
    /// the file atomically.
    ///
    /// Allowed from UNLOCKED, or from NEW once at least one entry exists.
    /// The file is always written in the current format.
    pub fn save(&mut self, passphrase: &Passphrase) -> Result<()> {
        let allowed = match self.status {
            VaultStatus::Unlocked => true,
            VaultStatus::New => !self.registry.is_empty(),
            VaultStatus::NoFile | VaultStatus::Locked => false,
        };
        let path = match self.location.clone() {
            Some(path) if allowed => path,
            _ => {
                let err = self.invalid_state("save");
                return self.record(Err(err));
            }
        };

        let result = format::encode(self.registry.entries(), passphrase, &self.kdf_params)
            .and_then(|bytes| format::write_vault_file(&path, &bytes));
        self.record(result)?;

        if let Some(previous) = self.format_version.filter(FormatVersion::is_legacy) {
            info!(from = %previous, "vault migrated to current format");
        }
        self.status = VaultStatus::Unlocked;
        self.format_version = Some(FormatVersion::ScryptGcm);
        self.dirty = false;
        debug!(entries = self.registry.len(), "vault saved");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Entry operations
    // ------------------------------------------------------------------

    /// Add or overwrite an entry; see `EntryRegistry::create`.
    ///
    /// `length` is the raw user input for a generated secret's length.
    pub fn create(
        &mut self,
        key: &str,
        secret: Option<&str>,
        description: Option<&str>,
        length: Option<&str>,
    ) -> Result<&Entry> {
        self.require_writable("create")?;
        let created = parse_length(length, self.default_length).and_then(|length| {
            self.registry
                .create(key, secret, description, &self.alphabet, length)
                .map(|_| ())
        });
        self.record(created)?;
        self.dirty = true;
        self.registry.retrieve(key)
    }

    pub fn retrieve(&self, identifier: &str) -> Result<&Entry> {
        self.require_readable("retrieve")?;
        self.registry.retrieve(identifier)
    }

    /// Remove an entry by exact key.  Returns `false` when absent.
    pub fn delete(&mut self, key: &str) -> Result<bool> {
        self.require_writable("delete")?;
        let removed = self.registry.delete(key);
        self.dirty |= removed;
        Ok(removed)
    }

    pub fn describe(&mut self, identifier: &str, description: Option<&str>) -> Result<&Entry> {
        self.require_writable("describe")?;
        let described = self
            .registry
            .describe(identifier, description)
            .map(|_| ());
        self.record(described)?;
        self.dirty = true;
        self.registry.retrieve(identifier)
    }

    pub fn list(&self) -> Result<Vec<(usize, &str)>> {
        self.require_readable("list")?;
        Ok(self.registry.list())
    }

    pub fn export_all(&self) -> Result<zeroize::Zeroizing<String>> {
        self.require_readable("export")?;
        self.registry.export_all()
    }

    pub fn import_all(&mut self, text: &str) -> Result<ImportReport> {
        self.require_writable("import")?;
        let imported = self.registry.import_all(text, &self.alphabet);
        let report = self.record(imported)?;
        if let Some((key, reason)) = report.rejected.first() {
            self.last_error = Some(format!("import skipped '{key}': {reason}"));
        }
        self.dirty |= report.imported > 0;
        Ok(report)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn current_status(&self) -> VaultStatus {
        self.status
    }

    /// Human-readable reason for the most recent failure, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Format the entries were loaded from, or `ScryptGcm` after a save.
    pub fn format_version(&self) -> Option<FormatVersion> {
        self.format_version
    }

    /// Whether there are changes the file does not have yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    pub fn entry_count(&self) -> usize {
        self.registry.len()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf_params
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn require_readable(&self, operation: &'static str) -> Result<()> {
        match self.status {
            VaultStatus::New | VaultStatus::Unlocked => Ok(()),
            _ => Err(self.invalid_state(operation)),
        }
    }

    fn require_writable(&mut self, operation: &'static str) -> Result<()> {
        let check = self.require_readable(operation);
        self.record(check)
    }

    fn invalid_state(&self, operation: &'static str) -> PrjRemError {
        PrjRemError::InvalidState {
            operation,
            status: self.status,
        }
    }

    /// Remember the message of a failed result as `last_error`.
    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.last_error = Some(e.to_string());
        }
        result
    }
}

impl fmt::Debug for VaultStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultStore")
            .field("location", &self.location)
            .field("status", &self.status)
            .field("entries", &self.registry.len())
            .field("format_version", &self.format_version)
            .field("dirty", &self.dirty)
            .finish()
    }
}
