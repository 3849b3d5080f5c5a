//! src/crypto/aes_cbc.rs
//! AES-256-CBC capability backed by the `aes` + `cbc` crates.

use std::fmt;

use aes::Aes256;
use cbc::cipher::{block_padding::NoPadding, BlockDecryptMut, KeyIvInit};
use cbc::Decryptor;
use tracing::trace;

use crate::aliases::Aes256Key32;
use crate::consts::{AES256_KEY_SIZE, AES_BLOCK_SIZE};
use crate::crypto::capability::DecryptCapability;
use crate::error::DrmError;

/// Content-key license for AES-256-CBC encrypted resources.
///
/// Every call treats the first 16 bytes of its input as the CBC chaining
/// block (the stored IV, or the ciphertext block preceding a window) and
/// returns the remaining blocks decrypted. No padding is removed, so the
/// streaming and whole-buffer call shapes share one contract.
pub struct Aes256CbcLicense {
    scheme: String,
    key: Aes256Key32,
}

impl Aes256CbcLicense {
    /// License for `scheme`, decrypting with an already-unwrapped content key.
    pub fn new(scheme: impl Into<String>, key: Aes256Key32) -> Self {
        Self {
            scheme: scheme.into(),
            key,
        }
    }

    /// Convenience: wrap a raw 32-byte key.
    pub fn from_key_bytes(scheme: impl Into<String>, key: [u8; AES256_KEY_SIZE]) -> Self {
        Self::new(scheme, Aes256Key32::new(key))
    }
}

impl fmt::Debug for Aes256CbcLicense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aes256CbcLicense")
            .field("scheme", &self.scheme)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl DecryptCapability for Aes256CbcLicense {
    fn scheme(&self) -> &str {
        &self.scheme
    }

    fn decipher(&self, ciphertext: &[u8]) -> Result<Vec<u8>, DrmError> {
        if ciphertext.len() % AES_BLOCK_SIZE != 0 {
            return Err(DrmError::Decipher(format!(
                "input length {} is not aligned to AES block size {AES_BLOCK_SIZE}",
                ciphertext.len()
            )));
        }
        if ciphertext.len() < 2 * AES_BLOCK_SIZE {
            return Err(DrmError::Decipher(format!(
                "input length {} leaves no block after the chaining block",
                ciphertext.len()
            )));
        }

        let (chaining, blocks) = ciphertext.split_at(AES_BLOCK_SIZE);
        let decryptor = Decryptor::<Aes256>::new_from_slices(self.key.expose_secret(), chaining)
            .map_err(|e| DrmError::Decipher(format!("invalid key or IV: {e}")))?;

        let mut output = blocks.to_vec();
        let written = decryptor
            .decrypt_padded_mut::<NoPadding>(&mut output)
            .map_err(|e| DrmError::Decipher(format!("CBC decrypt failed: {e}")))?
            .len();
        output.truncate(written);

        trace!(
            encrypted = ciphertext.len(),
            decrypted = written,
            "aes256_cbc: window decrypted"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use aes::Aes256;
    use cbc::cipher::{block_padding::NoPadding, BlockEncryptMut, KeyIvInit};
    use cbc::Encryptor;

    use super::*;

    const KEY: [u8; 32] = [0x42; 32];
    const IV: [u8; 16] = [0x13; 16];

    fn encrypt_blocks(blocks: &[u8]) -> Vec<u8> {
        let mut buf = blocks.to_vec();
        let len = Encryptor::<Aes256>::new((&KEY).into(), (&IV).into())
            .encrypt_padded_mut::<NoPadding>(&mut buf, blocks.len())
            .expect("aligned input")
            .len();
        buf.truncate(len);
        let mut out = IV.to_vec();
        out.extend_from_slice(&buf);
        out
    }

    #[test]
    fn decrypts_after_chaining_block() {
        let plaintext: Vec<u8> = (0..48).collect();
        let ciphertext = encrypt_blocks(&plaintext);
        let license = Aes256CbcLicense::from_key_bytes("urn:test", KEY);

        assert_eq!(license.decipher(&ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn any_preceding_block_chains_a_window() {
        let plaintext: Vec<u8> = (0..64).collect();
        let ciphertext = encrypt_blocks(&plaintext);
        let license = Aes256CbcLicense::from_key_bytes("urn:test", KEY);

        // Ciphertext blocks 2..=3 yield plaintext block 2 only.
        let window = &ciphertext[32..64];
        assert_eq!(license.decipher(window).unwrap(), &plaintext[32..48]);
    }

    #[test]
    fn nist_sp800_38a_cbc_aes256() {
        let key: [u8; 32] =
            hex::decode("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4")
                .unwrap()
                .try_into()
                .unwrap();
        let iv = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let ciphertext = hex::decode(concat!(
            "f58c4c04d6e5f1ba779eabfb5f7bfbd6",
            "9cfc4e967edb808d679f777bc6702c7d",
            "39f23369a9d9bacfa530e26304231461",
            "b2eb05e2c39be9fcda6c19078c6a9d1b",
        ))
        .unwrap();
        let plaintext = hex::decode(concat!(
            "6bc1bee22e409f96e93d7e117393172a",
            "ae2d8a571e03ac9c9eb76fac45af8e51",
            "30c81c46a35ce411e5fbc1191a0a52ef",
            "f69f2445df4f9b17ad2b417be66c3710",
        ))
        .unwrap();

        let license = Aes256CbcLicense::from_key_bytes("urn:nist", key);

        let mut whole = iv.clone();
        whole.extend_from_slice(&ciphertext);
        assert_eq!(license.decipher(&whole).unwrap(), plaintext);

        // C2 chains C3 without touching the IV.
        assert_eq!(
            license.decipher(&ciphertext[16..48]).unwrap(),
            &plaintext[32..48]
        );
    }

    #[test]
    fn rejects_unaligned_and_short_input() {
        let license = Aes256CbcLicense::from_key_bytes("urn:test", KEY);
        assert!(matches!(
            license.decipher(&[0u8; 33]),
            Err(DrmError::Decipher(_))
        ));
        assert!(matches!(
            license.decipher(&[0u8; 16]),
            Err(DrmError::Decipher(_))
        ));
    }

    #[test]
    fn debug_redacts_key() {
        let license = Aes256CbcLicense::from_key_bytes("urn:test", KEY);
        let shown = format!("{license:?}");
        assert!(shown.contains("urn:test"));
        assert!(shown.contains("[REDACTED]"));
    }
}
