//! # Builders
//!
//! Builder patterns for configuring the decoder.
//!
//! ## Modules
//!
//! - [`decoder_builder`] - Builder for [`DrmDecoder`](crate::DrmDecoder)

pub mod decoder_builder;

pub use decoder_builder::DrmDecoderBuilder;
