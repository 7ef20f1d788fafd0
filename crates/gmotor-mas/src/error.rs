//! Error types for the MAS crate.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when working with MAS containers.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Signature matches none of the known container variants.
    #[error("unrecognized MAS signature: {}", Signature(.signature))]
    UnrecognizedFormat { signature: [u8; 16] },

    /// Stream ended inside the signature, header or file table.
    #[error("truncated MAS header: stream ended while reading the {section}")]
    TruncatedHeader { section: &'static str },

    /// Header field holds a value no container can have.
    #[error("invalid MAS header: {field} is {value}")]
    InvalidHeader { field: &'static str, value: i64 },

    /// Extraction target already exists.
    #[error("destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    /// Member name is not a plain file name.
    #[error("refusing to extract unsafe entry name {name:?}")]
    UnsafeEntryName { name: String },

    /// Table entry holds a value no member can have.
    #[error("invalid entry {name}: {field} is {value}")]
    InvalidEntry {
        name: String,
        field: &'static str,
        value: i64,
    },

    /// Fewer payload bytes on disk than the entry declares.
    #[error("truncated payload for {name}: expected {expected} bytes, only {available} available")]
    TruncatedPayload {
        name: String,
        expected: usize,
        available: usize,
    },

    /// Payload is not a valid zlib stream.
    #[error("decompression of {name} failed: {reason}")]
    DecompressionFailed { name: String, reason: String },

    /// Inflated length disagrees with the declared size.
    #[error("invalid inflated size {actual} for {name} should be {expected}")]
    CorruptEntry {
        name: String,
        actual: u64,
        expected: u64,
    },

    /// Entry index past the end of the file table.
    #[error("entry index {index} out of range for {count} entries")]
    EntryIndexOutOfRange { index: usize, count: usize },
}

/// Result type for MAS operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Renders signature bytes as printable ASCII with `\xNN` escapes.
struct Signature<'a>(&'a [u8; 16]);

impl fmt::Display for Signature<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("b\"")?;
        for &b in self.0 {
            write!(f, "{}", std::ascii::escape_default(b))?;
        }
        f.write_str("\"")
    }
}
