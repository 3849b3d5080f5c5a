// src/lib.rs

pub mod aliases;
#[cfg(feature = "batch-ops")]
pub mod batch_ops;
pub mod builders;
pub mod consts;
pub mod crypto;
pub mod decryptor;
pub mod error;
pub mod resource;
pub mod utils;

// High-level API
pub use builders::DrmDecoderBuilder;
pub use decryptor::{Decoded, DrmDecoder, ForwardOnly, Strategy};
pub use error::{DrmError, FallbackReason};
pub use resource::{Compression, EncryptionDescriptor, MediaType, ResourceLink};

// Building blocks for custom pipelines
pub use crypto::{Aes256CbcLicense, DecryptCapability};
pub use decryptor::{decrypt_buffer, decrypt_fully, CbcDrmReader, FullDecryption};

#[cfg(feature = "batch-ops")]
pub use batch_ops::decode_batch;
