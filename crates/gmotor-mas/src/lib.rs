//! MAS container reader for gMotor game files.
//!
//! MAS files pack the meshes, textures and track data of gMotor games into
//! one flat file: a 16-byte signature, a file count, a table of fixed-size
//! 256-byte records, then one zlib stream per member. Several historical
//! layouts exist and are told apart by the signature:
//!
//! - `GMOTORMAS10` - 240-byte names at the end of each record
//! - An opaque binary magic - type/flags bytes and 236-byte names
//! - `CUBEMAS4.10` - 236-byte names at the end of each record
//!
//! Payload offsets are relative to the end of the file table. Every payload
//! is checked against its declared size after inflation.
//!
//! # Example
//!
//! ```no_run
//! use gmotor_mas::{ListStyle, MasArchive};
//!
//! let mut archive = MasArchive::open("car.mas")?;
//!
//! archive
//!     .container()
//!     .write_listing(&mut std::io::stdout(), ListStyle::Verbose)?;
//!
//! // Read a specific file
//! if let Some(entry) = archive.find("car.dds").cloned() {
//!     let data = archive.read(&entry)?;
//!     println!("{} bytes", data.len());
//! }
//!
//! // Or unpack everything into a fresh directory
//! archive.extract_to("car")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod archive;
mod decompress;
mod entry;
mod error;
mod extract;
pub mod format;
mod listing;

#[cfg(test)]
mod testutil;

pub use archive::{MasArchive, MasContainer};
pub use decompress::{decompress_zlib, decompress_zlib_sized};
pub use entry::FileEntry;
pub use error::{Error, Result};
pub use extract::ExtractReport;
pub use format::MasVariant;
pub use listing::{ListStyle, Summary};
