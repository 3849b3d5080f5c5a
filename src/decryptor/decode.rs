//! src/decryptor/decode.rs
//! Per-resource strategy selection and the plaintext source it produces.

use std::fmt;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::sync::Arc;

use tracing::debug;

use crate::builders::DrmDecoderBuilder;
use crate::crypto::DecryptCapability;
use crate::decryptor::full::{decrypt_fully, FullDecryption};
use crate::decryptor::stream::CbcDrmReader;
use crate::error::{DrmError, FallbackReason};
use crate::resource::ResourceLink;
use crate::utils::PaddingConvention;

/// How a resource gets decrypted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Not encrypted under the configured license; bytes go through untouched.
    Passthrough,
    /// Decrypt the whole resource in memory before returning anything.
    FullBuffer,
    /// Decrypt block windows on demand with a [`CbcDrmReader`].
    Streaming,
}

enum Route<'a> {
    Passthrough,
    FullBuffer(&'a Arc<dyn DecryptCapability>),
    Streaming(&'a Arc<dyn DecryptCapability>),
}

/// Plaintext byte source returned by [`DrmDecoder`].
pub enum Decoded<R> {
    Passthrough(R),
    Streaming(CbcDrmReader<R>),
    Decrypted(Cursor<Vec<u8>>),
    /// Full-buffer decryption failed; reads yield the original bytes.
    Fallback {
        original: Cursor<Vec<u8>>,
        reason: FallbackReason,
    },
}

impl<R> Decoded<R> {
    /// Strategy that produced this source. A fallback reports
    /// [`Strategy::FullBuffer`].
    pub fn strategy(&self) -> Strategy {
        match self {
            Decoded::Passthrough(_) => Strategy::Passthrough,
            Decoded::Streaming(_) => Strategy::Streaming,
            Decoded::Decrypted(_) | Decoded::Fallback { .. } => Strategy::FullBuffer,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Decoded::Fallback { .. })
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self {
            Decoded::Fallback { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

impl<R: Read + Seek> Decoded<R> {
    /// Plaintext bytes left to read, if known. Passthrough sources report `None`.
    pub fn available(&mut self) -> Option<u64> {
        match self {
            Decoded::Passthrough(_) => None,
            Decoded::Streaming(reader) => Some(reader.available()),
            Decoded::Decrypted(cursor) | Decoded::Fallback { original: cursor, .. } => {
                Some((cursor.get_ref().len() as u64).saturating_sub(cursor.position()))
            }
        }
    }
}

impl<R> From<FullDecryption> for Decoded<R> {
    fn from(outcome: FullDecryption) -> Self {
        match outcome {
            FullDecryption::Decrypted(bytes) => Decoded::Decrypted(Cursor::new(bytes)),
            FullDecryption::Fallback { original, reason } => Decoded::Fallback {
                original: Cursor::new(original),
                reason,
            },
        }
    }
}

impl<R: Read + Seek> Read for Decoded<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Decoded::Passthrough(inner) => inner.read(buf),
            Decoded::Streaming(reader) => reader.read(buf),
            Decoded::Decrypted(cursor) | Decoded::Fallback { original: cursor, .. } => {
                cursor.read(buf)
            }
        }
    }
}

impl<R: Read + Seek> Seek for Decoded<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Decoded::Passthrough(inner) => inner.seek(pos),
            Decoded::Streaming(reader) => reader.seek(pos),
            Decoded::Decrypted(cursor) | Decoded::Fallback { original: cursor, .. } => {
                cursor.seek(pos)
            }
        }
    }
}

/// Adapter for transports that can only be read forward.
///
/// Seeking always fails with [`io::ErrorKind::Unsupported`]. Produced by
/// [`DrmDecoder::decode_sequential`], which never picks the streaming path.
#[derive(Debug)]
pub struct ForwardOnly<R>(pub R);

impl<R: Read> Read for ForwardOnly<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl<R> Seek for ForwardOnly<R> {
    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "source only supports forward reads",
        ))
    }
}

/// Chooses a decryption strategy per resource and builds its plaintext source.
///
/// # Thread Safety
///
/// `DrmDecoder` is `Send + Sync` and cheap to clone. Every decoded source owns
/// its state, so resources can be decoded on separate threads.
#[derive(Clone)]
pub struct DrmDecoder {
    license: Option<Arc<dyn DecryptCapability>>,
    padding: PaddingConvention,
    streaming: bool,
}

impl DrmDecoder {
    /// Decoder with default settings. `None` makes every resource pass through.
    pub fn new(license: Option<Arc<dyn DecryptCapability>>) -> Self {
        Self::from_parts(license, PaddingConvention::default(), true)
    }

    pub fn builder() -> DrmDecoderBuilder {
        DrmDecoderBuilder::new()
    }

    pub(crate) fn from_parts(
        license: Option<Arc<dyn DecryptCapability>>,
        padding: PaddingConvention,
        streaming: bool,
    ) -> Self {
        Self {
            license,
            padding,
            streaming,
        }
    }

    /// The license used for scheme matching, if any.
    pub fn license(&self) -> Option<&Arc<dyn DecryptCapability>> {
        self.license.as_ref()
    }

    pub fn padding(&self) -> PaddingConvention {
        self.padding
    }

    /// Strategy [`decode`](Self::decode) would use for `link`.
    pub fn select_strategy(&self, link: &ResourceLink) -> Strategy {
        match self.route(link) {
            Route::Passthrough => Strategy::Passthrough,
            Route::FullBuffer(_) => Strategy::FullBuffer,
            Route::Streaming(_) => Strategy::Streaming,
        }
    }

    /// Decode a seekable source.
    ///
    /// # Errors
    ///
    /// [`DrmError::Io`] if the full-buffer path cannot read `input`. Decryption
    /// failures never surface here: streaming errors come from later reads, and
    /// full-buffer failures become [`Decoded::Fallback`].
    pub fn decode<R: Read + Seek>(
        &self,
        input: R,
        link: &ResourceLink,
    ) -> Result<Decoded<R>, DrmError> {
        match self.route(link) {
            Route::Passthrough => Ok(Decoded::Passthrough(input)),
            Route::FullBuffer(license) => {
                Ok(decrypt_fully(input, link, &**license, self.padding)?.into())
            }
            Route::Streaming(license) => Ok(Decoded::Streaming(
                CbcDrmReader::new(input, link, Arc::clone(license)).with_padding(self.padding),
            )),
        }
    }

    /// Decode a forward-only source. Streamable resources are decrypted in
    /// full, since window reads need to reposition the source.
    ///
    /// # Errors
    ///
    /// [`DrmError::Io`] if `input` cannot be read into memory. This is the only
    /// error; every decryption failure becomes [`Decoded::Fallback`].
    pub fn decode_sequential<R: Read>(
        &self,
        input: R,
        link: &ResourceLink,
    ) -> Result<Decoded<ForwardOnly<R>>, DrmError> {
        match self.route(link) {
            Route::Passthrough => Ok(Decoded::Passthrough(ForwardOnly(input))),
            Route::FullBuffer(license) | Route::Streaming(license) => {
                Ok(decrypt_fully(input, link, &**license, self.padding)?.into())
            }
        }
    }

    fn route(&self, link: &ResourceLink) -> Route<'_> {
        let (Some(license), Some(encryption)) = (self.license.as_ref(), link.encryption()) else {
            return Route::Passthrough;
        };
        if encryption.scheme.as_deref() != Some(license.scheme()) {
            debug!(
                href = %link.href,
                scheme = ?encryption.scheme,
                license_scheme = license.scheme(),
                "scheme mismatch, passing resource through"
            );
            return Route::Passthrough;
        }

        let streamable = !encryption.is_deflated()
            && encryption.is_aes256_cbc()
            && encryption.original_length.is_some();

        if streamable && self.streaming {
            debug!(href = %link.href, "streaming CBC decryption");
            Route::Streaming(license)
        } else {
            debug!(
                href = %link.href,
                deflated = encryption.is_deflated(),
                algorithm = %encryption.algorithm,
                original_length = ?encryption.original_length,
                "full-buffer decryption"
            );
            Route::FullBuffer(license)
        }
    }
}

impl fmt::Debug for DrmDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrmDecoder")
            .field("scheme", &self.license.as_ref().map(|l| l.scheme()))
            .field("padding", &self.padding)
            .field("streaming", &self.streaming)
            .finish()
    }
}
