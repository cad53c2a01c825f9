//! Read-only support for pre-scrypt vault files.
//!
//! Older vaults were written as `IV[16] || AES-CBC(plaintext)` with no
//! authentication.  Keys were either the passphrase right-padded with
//! ASCII `'0'`, or a key compiled into the program.  Nothing in this
//! module can produce ciphertext; it exists only so old files can be
//! opened once and re-saved in the current format.

use aes::{Aes128, Aes256};
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, KeyIvInit};
use zeroize::Zeroizing;

use crate::crypto::keys::Passphrase;
use crate::errors::{PrjRemError, Result};

type Aes128CbcDec = cbc::Decryptor<Aes128>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES block and IV size.
pub const BLOCK_LEN: usize = 16;

/// The key used by the oldest vault files regardless of passphrase.
pub const STATIC_KEY: &[u8; 16] = b"PrjRemStaticKey!";

/// Pad byte used by the naive passphrase-to-key scheme.
const NAIVE_PAD: u8 = b'0';

/// Turn a passphrase into a `key_len`-byte key by right-padding with `'0'`.
///
/// Returns `None` when the passphrase is longer than `key_len`; those
/// passphrases could never have opened a file under this scheme.
pub fn naive_key(passphrase: &Passphrase, key_len: usize) -> Option<Zeroizing<Vec<u8>>> {
    let bytes = passphrase.as_bytes();
    if bytes.len() > key_len {
        return None;
    }
    let mut key = Zeroizing::new(Vec::with_capacity(key_len));
    key.extend_from_slice(bytes);
    key.resize(key_len, NAIVE_PAD);
    Some(key)
}

/// Decrypt `IV || ciphertext` with AES-CBC, choosing AES-128 or AES-256
/// from the key length.  No unpadding is applied; callers locate the end
/// of the structured text themselves.
pub fn decrypt_cbc(key: &[u8], blob: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if blob.len() < 2 * BLOCK_LEN || blob.len() % BLOCK_LEN != 0 {
        return Err(PrjRemError::DecryptionFailed);
    }

    let (iv, ciphertext) = blob.split_at(BLOCK_LEN);
    let mut buf = Zeroizing::new(ciphertext.to_vec());

    let plain_len = match key.len() {
        16 => Aes128CbcDec::new_from_slices(key, iv)
            .map_err(|_| PrjRemError::DecryptionFailed)?
            .decrypt_padded_mut::<NoPadding>(&mut buf)
            .map_err(|_| PrjRemError::DecryptionFailed)?
            .len(),
        32 => Aes256CbcDec::new_from_slices(key, iv)
            .map_err(|_| PrjRemError::DecryptionFailed)?
            .decrypt_padded_mut::<NoPadding>(&mut buf)
            .map_err(|_| PrjRemError::DecryptionFailed)?
            .len(),
        _ => return Err(PrjRemError::DecryptionFailed),
    };

    buf.truncate(plain_len);
    Ok(buf)
}
