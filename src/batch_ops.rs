#[cfg(feature = "batch-ops")]
use rayon::prelude::*;
#[cfg(feature = "batch-ops")]
use std::io::{self, Read, Seek, Write};

#[cfg(feature = "batch-ops")]
use crate::{DrmDecoder, DrmError, ResourceLink};

/// Decode every `(source, link, destination)` triple in parallel, copying the
/// plaintext of each source into its destination.
///
/// Stops at the first error. Full-buffer fallbacks are not errors: their
/// destinations receive the original bytes.
#[cfg(feature = "batch-ops")]
pub fn decode_batch<R, W>(
    decoder: &DrmDecoder,
    batch: &mut [(R, ResourceLink, W)],
) -> Result<(), DrmError>
where
    R: Read + Seek + Send,
    W: Write + Send,
{
    batch.par_iter_mut().try_for_each(|(src, link, dst)| {
        let mut plaintext = decoder.decode(src, link)?;
        io::copy(&mut plaintext, dst)?;
        Ok(())
    })
}
