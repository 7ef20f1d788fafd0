//! Common utilities for gmotor.
//!
//! This crate provides foundational types used across the gmotor crates:
//!
//! - [`ReadExt`] - Exact and record-sized reads from any [`std::io::Read`]
//! - [`FixedName`] - Fixed-width, NUL-padded legacy name fields

mod error;
mod reader;
mod text;

pub use error::{Error, Result};
pub use reader::ReadExt;
pub use text::FixedName;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
