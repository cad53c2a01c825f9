//! Binary vault file formats.
//!
//! The current format has this layout:
//!
//! ```text
//! [PRJM: 4 bytes][version: 1 byte][log_n: 1][r: 4 LE][p: 4 LE][salt: 16][nonce: 12][ciphertext + tag: 16]
//! ```
//!
//! - **Magic** (`PRJM`) and **version** identify the format.
//! - **log_n / r / p**: scrypt cost used to derive the key, so the file
//!   reopens with exactly the settings it was written with.
//! - **salt**: fresh for every save.
//! - **nonce + ciphertext + tag**: AES-256-GCM over the serialized entry
//!   map.  The 14-byte header and the salt are bound in as associated
//!   data, so flipping any byte of the file fails authentication.
//!
//! Legacy formats carry no header: `[IV: 16][AES-CBC ciphertext]`.  They
//! are decoded here but there is deliberately no way to encode them.
//!
//! Known legacy defect: one old writer zero-padded the JSON and then lost
//! the padding step, so the tail of some files is garbage.  Legacy
//! plaintext is therefore cut at the final `}` instead of being unpadded
//! by length.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Deserialize;
use zeroize::Zeroizing;

use crate::crypto::encryption::{self, NONCE_LEN, TAG_LEN};
use crate::crypto::kdf::{self, KdfParams};
use crate::crypto::keys::Passphrase;
use crate::crypto::legacy::{self, BLOCK_LEN, STATIC_KEY};
use crate::crypto::random::{generate_salt, SALT_LEN};
use crate::errors::{PrjRemError, Result};

use super::entry::Entry;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of every current-format vault file.
pub const MAGIC: &[u8; 4] = b"PRJM";

/// Current binary format version.
pub const CURRENT_VERSION: u8 = 4;

/// Fixed-size header: 4 (magic) + 1 (version) + 1 (log_n) + 4 (r) + 4 (p).
pub const HEADER_LEN: usize = 14;

// ---------------------------------------------------------------------------
// Versions
// ---------------------------------------------------------------------------

/// The concrete scheme a vault file was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatVersion {
    /// AES-128-CBC under a key compiled into the program.
    StaticKey,
    /// AES-128-CBC under the passphrase padded to 16 bytes.
    NaiveKey128,
    /// AES-256-CBC under the passphrase padded to 32 bytes.
    NaiveKey256,
    /// scrypt + AES-256-GCM.  The only format ever written.
    ScryptGcm,
}

impl FormatVersion {
    pub fn is_legacy(&self) -> bool {
        !matches!(self, FormatVersion::ScryptGcm)
    }

    /// Key for a legacy variant, or `None` if it cannot apply to this passphrase.
    fn legacy_key(&self, passphrase: &Passphrase) -> Option<Zeroizing<Vec<u8>>> {
        match self {
            FormatVersion::StaticKey => Some(Zeroizing::new(STATIC_KEY.to_vec())),
            FormatVersion::NaiveKey128 => legacy::naive_key(passphrase, 16),
            FormatVersion::NaiveKey256 => legacy::naive_key(passphrase, 32),
            FormatVersion::ScryptGcm => None,
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FormatVersion::StaticKey => "legacy static-key AES-128-CBC",
            FormatVersion::NaiveKey128 => "legacy padded-passphrase AES-128-CBC",
            FormatVersion::NaiveKey256 => "legacy padded-passphrase AES-256-CBC",
            FormatVersion::ScryptGcm => "scrypt AES-256-GCM",
        };
        f.write_str(label)
    }
}

/// What the raw bytes of a file look like, before any key is tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionTag {
    Current,
    Legacy,
    Unknown,
}

/// Classify a blob by its framing alone.
pub fn detect_version(bytes: &[u8]) -> VersionTag {
    if bytes.starts_with(MAGIC) {
        VersionTag::Current
    } else if bytes.len() >= 2 * BLOCK_LEN && bytes.len() % BLOCK_LEN == 0 {
        VersionTag::Legacy
    } else {
        VersionTag::Unknown
    }
}

/// Legacy variants in the order they are tried.
const LEGACY_ORDER: [FormatVersion; 3] = [
    FormatVersion::NaiveKey256,
    FormatVersion::NaiveKey128,
    FormatVersion::StaticKey,
];

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

fn header_bytes(params: &KdfParams) -> [u8; HEADER_LEN] {
    let mut buf = [0u8; HEADER_LEN];
    buf[0..4].copy_from_slice(MAGIC);
    buf[4] = CURRENT_VERSION;
    buf[5] = params.log_n;
    buf[6..10].copy_from_slice(&params.r.to_le_bytes());
    buf[10..14].copy_from_slice(&params.p.to_le_bytes());
    buf
}

fn parse_header(bytes: &[u8]) -> Result<KdfParams> {
    if bytes.len() < HEADER_LEN || &bytes[0..4] != MAGIC || bytes[4] != CURRENT_VERSION {
        return Err(PrjRemError::DecryptionFailed);
    }
    let r = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]);
    let p = u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]);
    let params = KdfParams {
        log_n: bytes[5],
        r,
        p,
    };
    if !params.within_bounds() {
        return Err(PrjRemError::DecryptionFailed);
    }
    Ok(params)
}

// ---------------------------------------------------------------------------
// Entry map serialization
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredValue {
    Pair(String, Option<String>),
    Bare(String),
}

/// Serialize entries as a JSON object of `key -> [secret, description]`,
/// sorted by key so equal maps produce equal bytes.
pub fn serialize_entries(entries: &HashMap<String, Entry>) -> Result<Zeroizing<Vec<u8>>> {
    serde_json::to_vec(&as_sorted_pairs(entries))
        .map(Zeroizing::new)
        .map_err(|e| PrjRemError::SerializationError(format!("entries: {e}")))
}

/// Same encoding as `serialize_entries`, indented for humans.
pub fn serialize_entries_pretty(entries: &HashMap<String, Entry>) -> Result<Zeroizing<String>> {
    serde_json::to_string_pretty(&as_sorted_pairs(entries))
        .map(Zeroizing::new)
        .map_err(|e| PrjRemError::SerializationError(format!("entries: {e}")))
}

fn as_sorted_pairs(entries: &HashMap<String, Entry>) -> BTreeMap<&str, (&str, Option<&str>)> {
    entries
        .iter()
        .map(|(key, entry)| {
            (
                key.as_str(),
                (entry.secret.as_str(), entry.description.as_deref()),
            )
        })
        .collect()
}

/// Parse a JSON entry map.  Values may be `[secret, description]` pairs or,
/// as in the oldest files, bare secret strings.
pub fn deserialize_entries(bytes: &[u8]) -> Result<HashMap<String, Entry>> {
    let raw: HashMap<String, StoredValue> = serde_json::from_slice(bytes)
        .map_err(|e| PrjRemError::SerializationError(format!("entries: {e}")))?;

    Ok(raw
        .into_iter()
        .map(|(key, value)| {
            let entry = match value {
                StoredValue::Pair(secret, description) => {
                    Entry::new(key.clone(), secret, description)
                }
                StoredValue::Bare(secret) => Entry::new(key.clone(), secret, None),
            };
            (key, entry)
        })
        .collect())
}

/// Cut decrypted legacy plaintext down to the JSON object it contains:
/// from the first `{` (after leading whitespace) to the last `}`.
pub fn recover_structured_text(plain: &[u8]) -> Option<&[u8]> {
    let start = plain.iter().position(|b| !b.is_ascii_whitespace())?;
    if plain[start] != b'{' {
        return None;
    }
    let end = plain.iter().rposition(|&b| b == b'}')?;
    (end > start).then(|| &plain[start..=end])
}

// ---------------------------------------------------------------------------
// Encode / decode
// ---------------------------------------------------------------------------

/// Encrypt an entry map into a current-format blob under a fresh salt.
pub fn encode(
    entries: &HashMap<String, Entry>,
    passphrase: &Passphrase,
    params: &KdfParams,
) -> Result<Vec<u8>> {
    let plaintext = serialize_entries(entries)?;

    let salt = generate_salt();
    let key = kdf::derive_key(passphrase, &salt, params)?;

    let mut aad = Vec::with_capacity(HEADER_LEN + SALT_LEN);
    aad.extend_from_slice(&header_bytes(params));
    aad.extend_from_slice(&salt);

    let sealed = encryption::seal(key.as_bytes(), &plaintext, &aad)?;

    let mut out = aad;
    out.extend_from_slice(&sealed);
    Ok(out)
}

/// Decrypt a blob of any supported format.
///
/// Every failure is `DecryptionFailed`: wrong passphrase, tampering,
/// truncation, and unknown framing are indistinguishable to the caller.
pub fn decode(
    bytes: &[u8],
    passphrase: &Passphrase,
) -> Result<(HashMap<String, Entry>, FormatVersion)> {
    match detect_version(bytes) {
        VersionTag::Current => {
            decode_current(bytes, passphrase).map(|e| (e, FormatVersion::ScryptGcm))
        }
        VersionTag::Legacy => decode_legacy(bytes, passphrase),
        VersionTag::Unknown => Err(PrjRemError::DecryptionFailed),
    }
}

fn decode_current(bytes: &[u8], passphrase: &Passphrase) -> Result<HashMap<String, Entry>> {
    let prefix_len = HEADER_LEN + SALT_LEN;
    if bytes.len() < prefix_len + NONCE_LEN + TAG_LEN {
        return Err(PrjRemError::DecryptionFailed);
    }

    let params = parse_header(bytes)?;
    let (aad, sealed) = bytes.split_at(prefix_len);
    let salt = &aad[HEADER_LEN..];

    let key =
        kdf::derive_key(passphrase, salt, &params).map_err(|_| PrjRemError::DecryptionFailed)?;
    let plaintext = Zeroizing::new(encryption::open(key.as_bytes(), sealed, aad)?);

    deserialize_entries(&plaintext).map_err(|_| PrjRemError::DecryptionFailed)
}

fn decode_legacy(
    bytes: &[u8],
    passphrase: &Passphrase,
) -> Result<(HashMap<String, Entry>, FormatVersion)> {
    for version in LEGACY_ORDER {
        let Some(key) = version.legacy_key(passphrase) else {
            continue;
        };
        let Ok(plain) = legacy::decrypt_cbc(&key, bytes) else {
            continue;
        };
        let Some(text) = recover_structured_text(&plain) else {
            continue;
        };
        if let Ok(entries) = deserialize_entries(text) {
            return Ok((entries, version));
        }
    }
    Err(PrjRemError::DecryptionFailed)
}

// ---------------------------------------------------------------------------
// File IO
// ---------------------------------------------------------------------------

/// Read the raw bytes of a vault file.
pub fn read_vault_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path)
        .map_err(|e| PrjRemError::PathError(format!("cannot read {}: {e}", path.display())))
}

/// Write a vault file to disk **atomically**.
///
/// The bytes go to a temp file in the same directory which is then
/// renamed over the target, so a failure at any point leaves the previous
/// file intact.
pub fn write_vault_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    let result = write_new_file(&tmp_path, bytes).and_then(|()| {
        fs::rename(&tmp_path, path)
            .map_err(|e| PrjRemError::PathError(format!("cannot replace {}: {e}", path.display())))
    });

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_new_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    // Owner-only read/write.
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(path)
        .map_err(|e| PrjRemError::PathError(format!("cannot write {}: {e}", path.display())))?;
    file.write_all(bytes)?;
    file.sync_all()?;
    Ok(())
}
