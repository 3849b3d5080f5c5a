//! Utility functions used across the library.
//!
//! Padding removal lives here because both decryption paths share it.

use crate::consts::AES_BLOCK_SIZE;
use crate::error::DrmError;

/// How the trailing pad count of a decrypted buffer is read and validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PaddingConvention {
    /// The last byte is the number of bytes to drop (zero allowed).
    ///
    /// Only the count itself is checked against the buffer length. This is the
    /// lenient convention publication tooling produces in practice.
    #[default]
    LastByteCount,

    /// Strict PKCS#7: the count is `1..=16` and every pad byte equals it.
    Pkcs7,
}

/// Number of padding bytes at the end of `bytes` under `convention`.
///
/// An empty buffer has no padding.
///
/// # Errors
///
/// [`DrmError::Padding`] if the count runs past the start of the buffer, or
/// (for [`PaddingConvention::Pkcs7`]) if the count or the pad bytes are invalid.
pub fn padding_len(bytes: &[u8], convention: PaddingConvention) -> Result<usize, DrmError> {
    let Some(&last) = bytes.last() else {
        return Ok(0);
    };
    let count = last as usize;

    if count > bytes.len() {
        return Err(DrmError::Padding(format!(
            "pad count {count} exceeds buffer of {} bytes",
            bytes.len()
        )));
    }

    if convention == PaddingConvention::Pkcs7 {
        if count == 0 || count > AES_BLOCK_SIZE {
            return Err(DrmError::Padding(format!(
                "pad count {count} outside 1..={AES_BLOCK_SIZE}"
            )));
        }
        if bytes[bytes.len() - count..].iter().any(|&b| b != last) {
            return Err(DrmError::Padding("inconsistent PKCS#7 pad bytes".into()));
        }
    }

    Ok(count)
}

/// Strip trailing padding from `bytes` under `convention`.
///
/// # Example
///
/// ```
/// use drmcrypt_rs::utils::{strip_padding, PaddingConvention};
///
/// let padded = b"<p>hi</p>\x03\x03\x03";
/// assert_eq!(strip_padding(padded, PaddingConvention::Pkcs7)?, b"<p>hi</p>");
/// # Ok::<(), drmcrypt_rs::DrmError>(())
/// ```
pub fn strip_padding(bytes: &[u8], convention: PaddingConvention) -> Result<&[u8], DrmError> {
    let count = padding_len(bytes, convention)?;
    Ok(&bytes[..bytes.len() - count])
}

/// Owned variant of [`strip_padding`]; truncates in place.
pub fn strip_padding_vec(
    mut bytes: Vec<u8>,
    convention: PaddingConvention,
) -> Result<Vec<u8>, DrmError> {
    let count = padding_len(&bytes, convention)?;
    bytes.truncate(bytes.len() - count);
    Ok(bytes)
}
