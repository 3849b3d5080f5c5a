//! # Error Types
//!
//! This module defines the error types used throughout the library.
//! Streaming reads return [`Result<T, DrmError>`](DrmError); the full-buffer
//! path never fails on decryption and reports a [`FallbackReason`] instead.

use thiserror::Error;

/// The error type for all decryption operations.
#[derive(Error, Debug)]
pub enum DrmError {
    /// I/O error from the underlying byte source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The decrypt capability rejected its input.
    ///
    /// Used for key/IV setup failures, misaligned input and any other
    /// failure reported by a [`DecryptCapability`](crate::DecryptCapability).
    #[error("Decipher error: {0}")]
    Decipher(String),

    /// The trailing padding does not follow the configured convention.
    #[error("Padding error: {0}")]
    Padding(String),

    /// The ciphertext has an impossible shape (too short, truncated window).
    #[error("Ciphertext error: {0}")]
    Ciphertext(String),

    /// Raw inflate of the decrypted bytes failed.
    #[error("Inflate error: {0}")]
    Inflate(String),

    /// A streaming read failed. Carries the href of the resource being read.
    #[error("Failed to read CBC-encrypted stream for {href}: {source}")]
    Read {
        href: String,
        #[source]
        source: Box<DrmError>,
    },
}

impl DrmError {
    /// Tag an error with the href of the resource it happened on.
    pub fn for_resource(self, href: &str) -> Self {
        match self {
            tagged @ DrmError::Read { .. } => tagged,
            other => DrmError::Read {
                href: href.to_string(),
                source: Box::new(other),
            },
        }
    }
}

impl From<DrmError> for std::io::Error {
    fn from(err: DrmError) -> Self {
        std::io::Error::other(err)
    }
}

/// Why the full-buffer path handed back the original, still-encrypted bytes.
#[derive(Error, Debug)]
pub enum FallbackReason {
    /// The source contained no bytes at all.
    #[error("resource is empty")]
    EmptyInput,

    /// The capability failed on the whole buffer.
    #[error("decipher failed: {0}")]
    Decipher(DrmError),

    /// The capability succeeded but returned nothing.
    #[error("decipher returned no plaintext")]
    EmptyPlaintext,

    /// The decrypted buffer ends with invalid padding.
    #[error("invalid padding: {0}")]
    Padding(DrmError),

    /// Raw inflate of the decrypted bytes failed.
    #[error("inflate failed: {0}")]
    Inflate(DrmError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_resource_wraps_once() {
        let err = DrmError::Decipher("bad key".into())
            .for_resource("OEBPS/ch1.xhtml")
            .for_resource("ignored.xhtml");
        assert_eq!(
            err.to_string(),
            "Failed to read CBC-encrypted stream for OEBPS/ch1.xhtml: Decipher error: bad key"
        );
    }

    #[test]
    fn converts_into_io_error() {
        let io: std::io::Error = DrmError::Padding("count 42".into()).into();
        assert_eq!(io.kind(), std::io::ErrorKind::Other);
        assert!(io.to_string().contains("count 42"));
    }
}
