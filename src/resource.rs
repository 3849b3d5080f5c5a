//! # Resource Metadata
//!
//! Typed view of the manifest data the decoder needs for one resource: its
//! href, its media type, and the `properties.encryption` object.
//!
//! Everything here deserializes straight from publication manifest JSON.

use serde::{Deserialize, Deserializer};

use crate::consts::{AES256_CBC_ALGORITHM, DEFLATE_COMPRESSION};

/// Compression applied to a resource before it was encrypted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    #[default]
    None,
    /// Raw deflate stream, no zlib header.
    Deflate,
}

impl Compression {
    /// Map a manifest compression name. Case-insensitive; unknown names mean
    /// no compression.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case(DEFLATE_COMPRESSION) {
            Compression::Deflate
        } else {
            Compression::None
        }
    }
}

impl<'de> Deserialize<'de> for Compression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(name.as_deref().map_or(Compression::None, Compression::from_name))
    }
}

/// Encryption properties of a resource, as declared by the manifest.
///
/// # Example
///
/// ```
/// use drmcrypt_rs::resource::{Compression, EncryptionDescriptor};
///
/// let descriptor: EncryptionDescriptor = serde_json::from_str(r#"{
///     "scheme": "http://readium.org/2014/01/lcp",
///     "algorithm": "http://www.w3.org/2001/04/xmlenc#aes256-cbc",
///     "compression": "Deflate",
///     "originalLength": 4096
/// }"#)?;
///
/// assert!(descriptor.is_aes256_cbc());
/// assert_eq!(descriptor.compression, Compression::Deflate);
/// assert_eq!(descriptor.original_length, Some(4096));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionDescriptor {
    /// DRM scheme URI. A missing scheme matches no capability.
    #[serde(default)]
    pub scheme: Option<String>,
    /// Cipher algorithm URI.
    pub algorithm: String,
    #[serde(default)]
    pub compression: Compression,
    /// Plaintext length in bytes, when the manifest knows it.
    #[serde(default)]
    pub original_length: Option<u64>,
    /// License profile URI.
    #[serde(default)]
    pub profile: Option<String>,
}

impl EncryptionDescriptor {
    pub fn new(algorithm: impl Into<String>) -> Self {
        Self {
            scheme: None,
            algorithm: algorithm.into(),
            compression: Compression::None,
            original_length: None,
            profile: None,
        }
    }

    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    #[must_use]
    pub fn with_original_length(mut self, length: u64) -> Self {
        self.original_length = Some(length);
        self
    }

    #[must_use]
    pub fn is_aes256_cbc(&self) -> bool {
        self.algorithm == AES256_CBC_ALGORITHM
    }

    #[must_use]
    pub fn is_deflated(&self) -> bool {
        self.compression == Compression::Deflate
    }
}

/// A resource media type, e.g. `application/xhtml+xml`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct MediaType(String);

impl MediaType {
    pub const HTML: &'static str = "text/html";
    pub const XHTML: &'static str = "application/xhtml+xml";

    pub fn new(media_type: impl Into<String>) -> Self {
        Self(media_type.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Type and subtype only, lowercased, parameters dropped.
    pub fn essence(&self) -> String {
        self.0
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }

    /// HTML or XHTML.
    ///
    /// Markup resources keep their cipher padding in the final block, so the
    /// streaming reader strips it from the tail window.
    pub fn is_markup(&self) -> bool {
        matches!(self.essence().as_str(), Self::HTML | Self::XHTML)
    }
}

/// Manifest `properties` object; only encryption matters here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LinkProperties {
    #[serde(default)]
    pub encryption: Option<EncryptionDescriptor>,
}

/// One manifest link: the resource identity plus what the decoder needs to
/// pick a strategy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceLink {
    pub href: String,
    #[serde(rename = "type", default)]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub properties: LinkProperties,
}

impl ResourceLink {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            media_type: None,
            properties: LinkProperties::default(),
        }
    }

    #[must_use]
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(MediaType::new(media_type));
        self
    }

    #[must_use]
    pub fn with_encryption(mut self, encryption: EncryptionDescriptor) -> Self {
        self.properties.encryption = Some(encryption);
        self
    }

    pub fn encryption(&self) -> Option<&EncryptionDescriptor> {
        self.properties.encryption.as_ref()
    }

    pub fn is_markup(&self) -> bool {
        self.media_type.as_ref().is_some_and(MediaType::is_markup)
    }
}
