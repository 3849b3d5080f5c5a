//! tests/common.rs
//! Fixtures shared across test files: a fixed key, CBC encryption of
//! plaintext the way publication packagers do it, and test-double capabilities.

#![allow(dead_code)] // each test file uses a different subset

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};
use cbc::Encryptor;
use drmcrypt_rs::consts::{AES256_CBC_ALGORITHM, AES_BLOCK_SIZE};
use drmcrypt_rs::{
    Aes256CbcLicense, Compression, DecryptCapability, DrmError, EncryptionDescriptor,
    ResourceLink,
};
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::sync::Arc;

pub const TEST_SCHEME: &str = "http://readium.org/2014/01/lcp";
pub const OTHER_SCHEME: &str = "http://www.idpf.org/2008/embedding";
pub const TEST_KEY: [u8; 32] = [0x42; 32];
pub const TEST_IV: [u8; 16] = [0x13; 16];

pub const XHTML: &str = "application/xhtml+xml";
pub const JPEG: &str = "image/jpeg";

/// Chunk sizes exercised by the read-pattern tests.
pub const CHUNK_SIZES: &[usize] = &[1, 2, 3, 5, 7, 10, 15, 16, 17, 31, 32, 33, 64, 1000];

/// Plaintext lengths around block boundaries.
pub const PLAINTEXT_LENGTHS: &[usize] = &[0, 1, 15, 16, 17, 31, 32, 33, 63, 64, 65, 100, 257];

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Deterministic, non-repeating test bytes.
pub fn sample_plaintext(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

/// `IV || AES-256-CBC(plaintext || PKCS#7 padding)`.
pub fn encrypt_resource(plaintext: &[u8]) -> Vec<u8> {
    let padded_len = plaintext.len() + (AES_BLOCK_SIZE - plaintext.len() % AES_BLOCK_SIZE);
    let mut buf = vec![0u8; padded_len];
    buf[..plaintext.len()].copy_from_slice(plaintext);
    let ciphertext = Encryptor::<Aes256>::new((&TEST_KEY).into(), (&TEST_IV).into())
        .encrypt_padded_mut::<Pkcs7>(&mut buf, plaintext.len())
        .expect("buffer sized for padding");

    let mut resource = TEST_IV.to_vec();
    resource.extend_from_slice(ciphertext);
    resource
}

pub fn license() -> Arc<dyn DecryptCapability> {
    Arc::new(Aes256CbcLicense::from_key_bytes(TEST_SCHEME, TEST_KEY))
}

pub fn cbc_descriptor(original_length: Option<u64>) -> EncryptionDescriptor {
    let descriptor = EncryptionDescriptor::new(AES256_CBC_ALGORITHM).with_scheme(TEST_SCHEME);
    match original_length {
        Some(len) => descriptor.with_original_length(len),
        None => descriptor,
    }
}

/// Streamable link: CBC, known length, no compression.
pub fn streamable_link(href: &str, media_type: &str, len: usize) -> ResourceLink {
    ResourceLink::new(href)
        .with_media_type(media_type)
        .with_encryption(cbc_descriptor(Some(len as u64)))
}

pub fn deflated_link(href: &str, media_type: &str) -> ResourceLink {
    ResourceLink::new(href)
        .with_media_type(media_type)
        .with_encryption(cbc_descriptor(None).with_compression(Compression::Deflate))
}

/// Read until end-of-stream with a buffer of `chunk` bytes.
/// Returns the bytes and the number of non-empty reads.
pub fn read_in_chunks<R: Read>(reader: &mut R, chunk: usize) -> io::Result<(Vec<u8>, usize)> {
    let mut out = Vec::new();
    let mut reads = 0;
    let mut buf = vec![0u8; chunk];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            return Ok((out, reads));
        }
        reads += 1;
        out.extend_from_slice(&buf[..n]);
    }
}

/// Always fails.
pub struct FailingLicense;

impl DecryptCapability for FailingLicense {
    fn scheme(&self) -> &str {
        TEST_SCHEME
    }

    fn decipher(&self, _ciphertext: &[u8]) -> Result<Vec<u8>, DrmError> {
        Err(DrmError::Decipher("license revoked".into()))
    }
}

/// Succeeds with no output.
pub struct EmptyLicense;

impl DecryptCapability for EmptyLicense {
    fn scheme(&self) -> &str {
        TEST_SCHEME
    }

    fn decipher(&self, _ciphertext: &[u8]) -> Result<Vec<u8>, DrmError> {
        Ok(Vec::new())
    }
}

/// Answers the two-block length probe with the real license, fails every
/// other call.
pub struct ProbeOnlyLicense(pub Arc<dyn DecryptCapability>);

impl DecryptCapability for ProbeOnlyLicense {
    fn scheme(&self) -> &str {
        TEST_SCHEME
    }

    fn decipher(&self, ciphertext: &[u8]) -> Result<Vec<u8>, DrmError> {
        if ciphertext.len() == 2 * AES_BLOCK_SIZE {
            self.0.decipher(ciphertext)
        } else {
            Err(DrmError::Decipher("window rejected".into()))
        }
    }
}

/// Real decryption, but windows longer than two blocks come back with a
/// last byte no padding convention accepts.
pub struct TrailingGarbageLicense(pub Arc<dyn DecryptCapability>);

impl DecryptCapability for TrailingGarbageLicense {
    fn scheme(&self) -> &str {
        TEST_SCHEME
    }

    fn decipher(&self, ciphertext: &[u8]) -> Result<Vec<u8>, DrmError> {
        let mut plaintext = self.0.decipher(ciphertext)?;
        if ciphertext.len() > 2 * AES_BLOCK_SIZE {
            if let Some(last) = plaintext.last_mut() {
                *last = 0xEE;
            }
        }
        Ok(plaintext)
    }
}

/// Seekable source whose reads fail when they start inside the first block.
pub struct BrokenHead(pub Cursor<Vec<u8>>);

impl Read for BrokenHead {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.0.position() < AES_BLOCK_SIZE as u64 {
            return Err(io::Error::other("transport closed"));
        }
        self.0.read(buf)
    }
}

impl Seek for BrokenHead {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.0.seek(pos)
    }
}

/// Forward-only source that fails on first read.
pub struct DeadTransport;

impl Read for DeadTransport {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away"))
    }
}
