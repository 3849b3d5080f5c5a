// src/crypto/mod.rs

//! Decrypt capabilities.
//!
//! [`DecryptCapability`] is the seam between this crate and whatever holds the
//! content key. [`Aes256CbcLicense`] is the RustCrypto-backed implementation.

pub mod aes_cbc;
pub mod capability;

pub use aes_cbc::Aes256CbcLicense;
pub use capability::DecryptCapability;
