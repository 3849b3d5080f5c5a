//! # Constants
//!
//! Block geometry and the manifest identifiers the dispatcher matches against.

/// AES block size in bytes.
///
/// All window alignment arithmetic on the streaming path is relative to this value.
pub const AES_BLOCK_SIZE: usize = 16;

/// AES-256 key size in bytes.
pub const AES256_KEY_SIZE: usize = 32;

/// Algorithm URI of the only cipher the streaming path understands.
///
/// Resources encrypted with any other algorithm go through the full-buffer path.
pub const AES256_CBC_ALGORITHM: &str = "http://www.w3.org/2001/04/xmlenc#aes256-cbc";

/// Compression name that marks a resource as raw-deflated before encryption.
pub const DEFLATE_COMPRESSION: &str = "deflate";

/// Smallest ciphertext the length probe accepts: one chaining block plus one data block.
pub const MIN_CIPHERTEXT_LEN: u64 = 2 * AES_BLOCK_SIZE as u64;
