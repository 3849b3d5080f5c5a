// src/decryptor/stream/mod.rs
pub(crate) mod reader;
pub(crate) mod window;

pub use reader::CbcDrmReader;
pub use window::ReadWindow;
