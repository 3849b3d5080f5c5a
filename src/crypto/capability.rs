//! src/crypto/capability.rs
//! The decrypt-block boundary.

use crate::error::DrmError;

/// A capability to decrypt resources of one DRM scheme.
///
/// Implementations hold the key material. The decoder never sees it: it only
/// hands over block-aligned ciphertext and takes back plaintext.
///
/// Two call shapes reach [`decipher`](Self::decipher):
///
/// - **streaming windows**: one chaining block followed by `N` blocks; the
///   result is `N` decrypted blocks, padding untouched;
/// - **whole buffer**: the complete resource; the result is the complete
///   plaintext. Trailing padding may be left in place, the caller strips it.
///
/// # Thread Safety
///
/// Capabilities are `Send + Sync` so one license can back readers on
/// several threads at once behind an `Arc`.
pub trait DecryptCapability: Send + Sync {
    /// Scheme URI this capability decrypts. Compared verbatim with the
    /// `scheme` of each resource's encryption descriptor.
    fn scheme(&self) -> &str;

    /// Decrypt `ciphertext`, whose length is a multiple of the block size.
    fn decipher(&self, ciphertext: &[u8]) -> Result<Vec<u8>, DrmError>;
}
