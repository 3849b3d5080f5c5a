//! src/decryptor/stream/reader.rs
//! Random-access plaintext reader over AES-CBC ciphertext.
//!
//! Only the blocks a read touches are fetched and decrypted. The underlying
//! source is repositioned explicitly before every fetch, so reads may jump
//! around freely.

use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;

use tracing::{trace, warn};

use crate::consts::{AES_BLOCK_SIZE, MIN_CIPHERTEXT_LEN};
use crate::crypto::DecryptCapability;
use crate::decryptor::stream::window::ReadWindow;
use crate::error::DrmError;
use crate::resource::ResourceLink;
use crate::utils::{padding_len, strip_padding_vec, PaddingConvention};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StreamLengths {
    ciphertext: u64,
    plaintext: u64,
}

impl StreamLengths {
    const EMPTY: Self = Self {
        ciphertext: 0,
        plaintext: 0,
    };
}

/// Plaintext view of one CBC-encrypted resource.
///
/// The plaintext length is probed from the last two ciphertext blocks on
/// first use and cached. After that every [`read`](Read::read) decrypts one
/// block-aligned window: the chaining block plus the blocks the request
/// overlaps.
///
/// # Example
///
/// ```no_run
/// use std::fs::File;
/// use std::io::Read;
/// use std::sync::Arc;
/// use drmcrypt_rs::{Aes256CbcLicense, CbcDrmReader, ResourceLink};
///
/// let license = Arc::new(Aes256CbcLicense::from_key_bytes("urn:example", [0u8; 32]));
/// let link = ResourceLink::new("OEBPS/chapter1.xhtml").with_media_type("application/xhtml+xml");
///
/// let mut reader = CbcDrmReader::new(File::open("chapter1.xhtml.enc")?, &link, license);
/// let mut html = String::new();
/// reader.read_to_string(&mut html)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct CbcDrmReader<R> {
    source: R,
    href: String,
    markup: bool,
    license: Arc<dyn DecryptCapability>,
    padding: PaddingConvention,
    position: u64,
    lengths: Option<StreamLengths>,
}

impl<R> CbcDrmReader<R> {
    /// Reader for the resource described by `link`.
    ///
    /// Nothing is read from `source` until the first length query or read.
    pub fn new(source: R, link: &ResourceLink, license: Arc<dyn DecryptCapability>) -> Self {
        Self {
            source,
            href: link.href.clone(),
            markup: link.is_markup(),
            license,
            padding: PaddingConvention::default(),
            position: 0,
            lengths: None,
        }
    }

    #[must_use]
    pub fn with_padding(mut self, padding: PaddingConvention) -> Self {
        self.padding = padding;
        self
    }

    /// Plaintext bytes already delivered (or the target of the last seek).
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn into_inner(self) -> R {
        self.source
    }
}

impl<R: Read + Seek> CbcDrmReader<R> {
    /// Exact plaintext length, padding excluded.
    ///
    /// Probed once. An invalid or undecryptable stream reports zero.
    pub fn plaintext_len(&mut self) -> u64 {
        self.lengths().plaintext
    }

    /// Plaintext bytes left after the cursor.
    pub fn available(&mut self) -> u64 {
        self.plaintext_len().saturating_sub(self.position)
    }

    /// Decrypt up to `buf.len()` plaintext bytes at the cursor into `buf`.
    ///
    /// Returns `Ok(0)` at end of plaintext.
    ///
    /// # Errors
    ///
    /// [`DrmError::Read`] carrying this resource's href, wrapping the source
    /// I/O error or the capability failure.
    pub fn read_plaintext(&mut self, buf: &mut [u8]) -> Result<usize, DrmError> {
        let lengths = self.lengths();
        let available = lengths.plaintext.saturating_sub(self.position);
        let effective = (buf.len() as u64).min(available) as usize;
        if effective == 0 {
            return Ok(0);
        }

        let window = ReadWindow::plan(self.position, effective);
        let plaintext = self
            .decrypt_window(&window, lengths)
            .map_err(|e| e.for_resource(&self.href))?;

        let start = window.block_offset.min(plaintext.len());
        let end = (start + effective).min(plaintext.len());
        let produced = end - start;
        buf[..produced].copy_from_slice(&plaintext[start..end]);
        self.position += produced as u64;

        trace!(
            href = %self.href,
            window_start = window.fetch_offset(),
            window_len = window.fetch_len(),
            produced,
            position = self.position,
            "cbc_reader: window served"
        );
        Ok(produced)
    }

    fn decrypt_window(
        &mut self,
        window: &ReadWindow,
        lengths: StreamLengths,
    ) -> Result<Vec<u8>, DrmError> {
        self.source.seek(SeekFrom::Start(window.fetch_offset()))?;

        let mut ciphertext = vec![0u8; window.fetch_len()];
        self.source.read_exact(&mut ciphertext).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                DrmError::Ciphertext(format!(
                    "window {}..{} runs past the end of the stream",
                    window.fetch_offset(),
                    window.fetch_end()
                ))
            } else {
                DrmError::Io(e)
            }
        })?;

        let plaintext = self.license.decipher(&ciphertext)?;

        // Markup keeps its cipher padding in the final block.
        if self.markup && window.fetch_end() >= lengths.ciphertext {
            return strip_padding_vec(plaintext, self.padding);
        }
        Ok(plaintext)
    }

    fn lengths(&mut self) -> StreamLengths {
        if let Some(lengths) = self.lengths {
            return lengths;
        }
        let lengths = match self.probe_lengths() {
            Ok(lengths) => lengths,
            Err(e) => {
                warn!(
                    href = %self.href,
                    error = %e,
                    "failed to get the plaintext size of CBC-encrypted stream"
                );
                StreamLengths::EMPTY
            }
        };
        self.lengths = Some(lengths);
        lengths
    }

    fn probe_lengths(&mut self) -> Result<StreamLengths, DrmError> {
        let ciphertext = self.source.seek(SeekFrom::End(0))?;
        if ciphertext < MIN_CIPHERTEXT_LEN {
            warn!(
                href = %self.href,
                ciphertext,
                "invalid CBC-encrypted stream: shorter than two blocks"
            );
            return Ok(StreamLengths::EMPTY);
        }
        if ciphertext % AES_BLOCK_SIZE as u64 != 0 {
            return Err(DrmError::Ciphertext(format!(
                "length {ciphertext} is not a multiple of the block size"
            )));
        }

        self.source.seek(SeekFrom::Start(ciphertext - MIN_CIPHERTEXT_LEN))?;
        let mut tail = [0u8; 2 * AES_BLOCK_SIZE];
        self.source.read_exact(&mut tail)?;

        let last_block = self.license.decipher(&tail)?;
        let padding = padding_len(&last_block, self.padding)? as u64;
        let plaintext = ciphertext
            .saturating_sub(AES_BLOCK_SIZE as u64)
            .saturating_sub(padding);

        trace!(href = %self.href, ciphertext, plaintext, padding, "cbc_reader: length probed");
        Ok(StreamLengths {
            ciphertext,
            plaintext,
        })
    }
}

impl<R: Read + Seek> Read for CbcDrmReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_plaintext(buf).map_err(io::Error::from)
    }
}

/// Moves the plaintext cursor. Targets past the end clamp to the plaintext
/// length; nothing is read until the next [`read`](Read::read).
impl<R: Read + Seek> Seek for CbcDrmReader<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let len = self.plaintext_len();
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => len.checked_add_signed(delta),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
        }
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before the start of the plaintext",
            )
        })?;

        self.position = target.min(len);
        Ok(self.position)
    }
}
