//! Vault module — encrypted entry storage.
//!
//! This module provides:
//! - The key/secret character universe (`charset`)
//! - The `Entry` record (`entry`)
//! - Versioned binary vault formats and atomic file IO (`format`)
//! - The in-memory `EntryRegistry` with identifier resolution (`registry`)
//! - The `VaultStore` lock/unlock state machine (`store`)

pub mod charset;
pub mod entry;
pub mod format;
pub mod registry;
pub mod store;

// Re-export the most commonly used items.
pub use charset::{is_legit, Alphabet};
pub use entry::Entry;
pub use format::{detect_version, FormatVersion, VersionTag};
pub use registry::{EntryRegistry, ImportReport};
pub use store::{VaultStatus, VaultStore};
