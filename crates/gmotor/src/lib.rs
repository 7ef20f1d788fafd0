//! gMotor game file reading library.
//!
//! This crate bundles the gmotor crates behind one dependency.
//!
//! # Crates
//!
//! - [`gmotor_common`] - Common utilities (stream reading, fixed-width names)
//! - [`gmotor_mas`] - MAS container reading and extraction
//!
//! # Example
//!
//! ```no_run
//! use gmotor::prelude::*;
//!
//! let mut archive = MasArchive::open("track.mas")?;
//! println!("{} ({} entries)", archive.container().variant(), archive.entry_count());
//!
//! if let Some(entry) = archive.find("track.gdb").cloned() {
//!     let data = archive.read(&entry)?;
//!     println!("{}: {} bytes", entry.name(), data.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use gmotor_common as common;
pub use gmotor_mas as mas;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use gmotor_common::{FixedName, ReadExt};
    pub use gmotor_mas::{
        ExtractReport, FileEntry, ListStyle, MasArchive, MasContainer, MasVariant, Summary,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
