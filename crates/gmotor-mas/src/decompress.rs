//! Decompression utilities for MAS payloads.

use std::io;

use flate2::{Decompress, FlushDecompress, Status};

use crate::entry::FileEntry;
use crate::{Error, Result};

/// Output grows by at least this much when the buffer is full.
const GROW_CHUNK: usize = 64 * 1024;

/// Upper bound on the up-front allocation taken from a declared size.
const MAX_PREALLOC: usize = 64 * 1024 * 1024;

/// Decompress zlib-wrapped DEFLATE data.
///
/// The stream must reach its final block; input that runs out earlier is an
/// `UnexpectedEof` error rather than a silently short result.
pub fn decompress_zlib(data: &[u8], output: &mut Vec<u8>) -> io::Result<()> {
    inflate_bounded(data, output, usize::MAX).map(|_| ())
}

/// Decompress zlib data with known output size.
///
/// The size is only an allocation hint; longer output is still returned.
pub fn decompress_zlib_sized(data: &[u8], expected_size: usize) -> io::Result<Vec<u8>> {
    let mut output = Vec::with_capacity(expected_size.min(MAX_PREALLOC));
    decompress_zlib(data, &mut output)?;
    Ok(output)
}

/// Inflate an entry's payload and check it against the declared size.
///
/// At most `size` bytes are kept. A longer stream is still run to its end
/// so the error reports the full inflated length.
pub(crate) fn inflate_entry(entry: &FileEntry, compressed: &[u8]) -> Result<Vec<u8>> {
    let expected = entry.expected_size()?;

    let mut data = Vec::with_capacity(expected.min(MAX_PREALLOC));
    let total = inflate_bounded(compressed, &mut data, expected).map_err(|e| {
        Error::DecompressionFailed {
            name: entry.name().to_string(),
            reason: e.to_string(),
        }
    })?;

    if total != expected as u64 {
        return Err(Error::CorruptEntry {
            name: entry.name().to_string(),
            actual: total,
            expected: expected as u64,
        });
    }

    Ok(data)
}

/// Inflate `data` into `output`, which grows to roughly `limit` bytes at
/// most. Output past that point is counted but not stored.
///
/// Returns the total inflated length of the stream.
fn inflate_bounded(data: &[u8], output: &mut Vec<u8>, limit: usize) -> io::Result<u64> {
    let mut inflater = Decompress::new(true);
    let mut scratch = Vec::new();

    output.clear();
    loop {
        let consumed = inflater.total_in() as usize;
        let produced = inflater.total_out();

        let status = if output.len() < limit {
            if output.len() == output.capacity() {
                let room = GROW_CHUNK.max(output.capacity()).min(limit - output.len());
                output.reserve_exact(room);
            }
            inflater.decompress_vec(&data[consumed..], output, FlushDecompress::None)
        } else {
            if scratch.is_empty() {
                scratch = vec![0u8; GROW_CHUNK];
            }
            inflater.decompress(&data[consumed..], &mut scratch, FlushDecompress::None)
        }
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        match status {
            Status::StreamEnd => return Ok(inflater.total_out()),
            Status::Ok | Status::BufError => {
                // There is always output room here, so no progress means no input.
                if inflater.total_in() as usize == consumed && inflater.total_out() == produced {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "compressed stream ends before its final block",
                    ));
                }
            }
        }
    }
}
