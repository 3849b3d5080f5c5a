// src/decryptor/mod.rs

//! Decryption facade.
//!
//! Core API: [`DrmDecoder::decode`] picks passthrough, streaming or
//! full-buffer decryption per resource and returns a [`Decoded`] reader.
//! Building blocks: [`CbcDrmReader`] for block-window reads,
//! [`decrypt_fully`] / [`decrypt_buffer`] for whole resources.

pub(crate) mod decode;
pub(crate) mod full;
pub(crate) mod stream;

pub use decode::{Decoded, DrmDecoder, ForwardOnly, Strategy};
pub use full::{decrypt_buffer, decrypt_fully, inflate_raw, FullDecryption};
pub use stream::{CbcDrmReader, ReadWindow};
