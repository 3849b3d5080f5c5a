//! src/decryptor/stream/window.rs
//! Block-window arithmetic for random-access CBC reads.
//!
//! Ciphertext layout is `IV || C1 || C2 || ...`. Plaintext block `k` comes out
//! of ciphertext block `k + 1` chained with block `k`, so the chaining block of
//! a window starting at plaintext offset `a` sits at ciphertext offset `a`.

use crate::consts::AES_BLOCK_SIZE;

/// Ciphertext span that must be fetched and decrypted to serve one read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadWindow {
    /// Plaintext offset of the first block in the window.
    pub aligned_start: u64,
    /// Bytes of the first decrypted block that precede the read cursor.
    pub block_offset: usize,
    /// Blocks of plaintext the window yields (chaining block excluded).
    pub data_blocks: usize,
}

impl ReadWindow {
    /// Window covering `len` plaintext bytes starting at `position`.
    pub fn plan(position: u64, len: usize) -> Self {
        let block_offset = (position % AES_BLOCK_SIZE as u64) as usize;
        let aligned_start = position - block_offset as u64;
        let data_blocks = (block_offset + len).div_ceil(AES_BLOCK_SIZE);
        Self {
            aligned_start,
            block_offset,
            data_blocks,
        }
    }

    /// Ciphertext offset of the chaining block.
    #[inline]
    pub fn fetch_offset(&self) -> u64 {
        self.aligned_start
    }

    /// Ciphertext bytes to fetch: the chaining block plus the data blocks.
    #[inline]
    pub fn fetch_len(&self) -> usize {
        (self.data_blocks + 1) * AES_BLOCK_SIZE
    }

    /// Ciphertext offset just past the window.
    #[inline]
    pub fn fetch_end(&self) -> u64 {
        self.fetch_offset() + self.fetch_len() as u64
    }
}
