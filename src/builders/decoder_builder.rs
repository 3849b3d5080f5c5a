//! src/builders/decoder_builder.rs
//! Fluent configuration for `DrmDecoder`

use std::sync::Arc;

use crate::crypto::DecryptCapability;
use crate::decryptor::DrmDecoder;
use crate::utils::PaddingConvention;

/// Builder for [`DrmDecoder`].
///
/// Defaults: no license (every resource passes through), lenient
/// [`PaddingConvention::LastByteCount`], streaming enabled.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use drmcrypt_rs::utils::PaddingConvention;
/// use drmcrypt_rs::{Aes256CbcLicense, DrmDecoderBuilder};
///
/// let license = Aes256CbcLicense::from_key_bytes("http://readium.org/2014/01/lcp", [7u8; 32]);
/// let decoder = DrmDecoderBuilder::new()
///     .with_license(Arc::new(license))
///     .with_padding(PaddingConvention::Pkcs7)
///     .streaming(false)
///     .build();
///
/// assert_eq!(decoder.padding(), PaddingConvention::Pkcs7);
/// ```
#[derive(Clone)]
pub struct DrmDecoderBuilder {
    license: Option<Arc<dyn DecryptCapability>>,
    padding: PaddingConvention,
    streaming: bool,
}

impl DrmDecoderBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            license: None,
            padding: PaddingConvention::default(),
            streaming: true,
        }
    }

    /// Capability used for resources whose scheme matches its own.
    #[must_use]
    pub fn with_license(mut self, license: Arc<dyn DecryptCapability>) -> Self {
        self.license = Some(license);
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: PaddingConvention) -> Self {
        self.padding = padding;
        self
    }

    /// Allow block-window decryption for streamable resources. When off,
    /// every encrypted resource is decrypted in full.
    #[must_use]
    pub fn streaming(mut self, enabled: bool) -> Self {
        self.streaming = enabled;
        self
    }

    #[must_use]
    pub fn build(self) -> DrmDecoder {
        DrmDecoder::from_parts(self.license, self.padding, self.streaming)
    }
}

impl Default for DrmDecoderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
