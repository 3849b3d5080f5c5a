//! src/decryptor/full.rs
//! Whole-resource decryption for resources that cannot be streamed.
//!
//! Every decryption failure falls back to the original bytes. The outcome says
//! which of the two happened.

use std::io::Read;

use flate2::read::DeflateDecoder;
use tracing::{debug, warn};

use crate::crypto::DecryptCapability;
use crate::error::{DrmError, FallbackReason};
use crate::resource::{EncryptionDescriptor, ResourceLink};
use crate::utils::{strip_padding_vec, PaddingConvention};

/// Result of a full-buffer decryption.
#[derive(Debug)]
pub enum FullDecryption {
    /// Padding stripped, inflated when the resource was deflated.
    Decrypted(Vec<u8>),
    /// Decryption failed; `original` holds the input bytes untouched.
    Fallback {
        original: Vec<u8>,
        reason: FallbackReason,
    },
}

impl FullDecryption {
    pub fn is_fallback(&self) -> bool {
        matches!(self, FullDecryption::Fallback { .. })
    }

    /// Plaintext, or the original bytes after a fallback.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            FullDecryption::Decrypted(bytes) => bytes,
            FullDecryption::Fallback { original, .. } => original,
        }
    }
}

/// Read all of `input`, drop it, and decrypt the bytes with [`decrypt_buffer`].
///
/// # Errors
///
/// Only [`DrmError::Io`] when `input` itself fails: there is nothing to fall
/// back to in that case.
pub fn decrypt_fully<R: Read>(
    mut input: R,
    link: &ResourceLink,
    license: &dyn DecryptCapability,
    padding: PaddingConvention,
) -> Result<FullDecryption, DrmError> {
    let mut original = Vec::new();
    input.read_to_end(&mut original)?;
    drop(input);

    Ok(decrypt_buffer(original, link, license, padding))
}

/// Decrypt a whole resource held in memory.
///
/// One `decipher` call on the full buffer, then padding removal, then raw
/// inflate when the descriptor says `deflate`. Never fails: any error yields
/// [`FullDecryption::Fallback`] with `original` handed back as is.
pub fn decrypt_buffer(
    original: Vec<u8>,
    link: &ResourceLink,
    license: &dyn DecryptCapability,
    padding: PaddingConvention,
) -> FullDecryption {
    let deflated = link
        .encryption()
        .is_some_and(EncryptionDescriptor::is_deflated);

    match decrypt_bytes(&original, license, padding, deflated) {
        Ok(plaintext) => {
            debug!(
                href = %link.href,
                encrypted = original.len(),
                decrypted = plaintext.len(),
                deflated,
                "resource decrypted fully"
            );
            FullDecryption::Decrypted(plaintext)
        }
        Err(reason) => {
            warn!(
                href = %link.href,
                %reason,
                "failed to decrypt fully the resource, returning it unchanged"
            );
            FullDecryption::Fallback { original, reason }
        }
    }
}

fn decrypt_bytes(
    original: &[u8],
    license: &dyn DecryptCapability,
    padding: PaddingConvention,
    deflated: bool,
) -> Result<Vec<u8>, FallbackReason> {
    if original.is_empty() {
        return Err(FallbackReason::EmptyInput);
    }

    let plaintext = license
        .decipher(original)
        .map_err(FallbackReason::Decipher)?;
    if plaintext.is_empty() {
        return Err(FallbackReason::EmptyPlaintext);
    }

    let plaintext = strip_padding_vec(plaintext, padding).map_err(FallbackReason::Padding)?;
    if !deflated {
        return Ok(plaintext);
    }

    inflate_raw(&plaintext).map_err(FallbackReason::Inflate)
}

/// Inflate a raw deflate stream (no zlib header, no checksum).
pub fn inflate_raw(compressed: &[u8]) -> Result<Vec<u8>, DrmError> {
    let mut decoder = DeflateDecoder::new(compressed);
    let mut inflated = Vec::with_capacity(compressed.len() * 2);
    decoder
        .read_to_end(&mut inflated)
        .map_err(|e| DrmError::Inflate(e.to_string()))?;
    Ok(inflated)
}
