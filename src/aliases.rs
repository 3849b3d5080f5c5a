//! # Secure-Gate Type Aliases
//!
//! Key material is held in [`secure-gate`](https://github.com/Slurp9187/secure-gate)
//! wrappers, zeroized on drop and only reachable through `.expose_secret()`.
//!
//! Ciphertext and IVs are public data in this crate; only the content key is
//! wrapped.

use crate::consts::AES256_KEY_SIZE;

// ─────────────────────────────────────────────────────────────────────────────
// SpanBuffer: generic secure stack buffer (alias to secure-gate Fixed)
// ─────────────────────────────────────────────────────────────────────────────
pub type SpanBuffer<const N: usize> = secure_gate::Fixed<[u8; N]>;

pub type Aes256Key32 = SpanBuffer<AES256_KEY_SIZE>; // content key
