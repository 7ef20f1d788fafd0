//! MAS on-disk format.
//!
//! A MAS container starts with a 16-byte signature naming its variant, then
//! a small header holding the file count and the total payload size, then
//! one 256-byte record per member. Compressed payloads follow the table.

mod record;

pub use record::{CubeRecord, GmotorRecord, OpaqueRecord, ShortNameRecord, TableRecord, RECORD_SIZE};

use std::fmt;

use crate::{Error, Result};

/// Length of the signature at the start of every container.
pub const SIGNATURE_LEN: usize = 16;

/// Signature of the original gMotor layout.
pub const GMOTOR_SIGNATURE: [u8; SIGNATURE_LEN] = *b"GMOTORMAS10\0\0\0\0\0";

/// Signature of the layout with per-entry type and flags bytes.
pub const OPAQUE_SIGNATURE: [u8; SIGNATURE_LEN] = [
    0xC8, 0xCF, 0xD2, 0xD8, 0xCE, 0xD8, 0xE6, 0xC9, 0xCA, 0xDD, 0xD8, 0xBE, 0xBB, 0xA6, 0xBF, 0x90,
];

/// Signature of the CUBE layout.
pub const CUBE_SIGNATURE: [u8; SIGNATURE_LEN] = *b"CUBEMAS4.10\0\0\0\0\0";

/// Container layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MasVariant {
    /// `GMOTORMAS10`: 240-byte names at the end of each record.
    Gmotor,
    /// Binary magic: type/flags bytes, 236-byte names, padded header.
    Opaque,
    /// 16-byte names.
    ///
    /// No signature for this layout is known, so [`MasVariant::classify`]
    /// never returns it. The record decoder exists so the layout stays
    /// documented and testable.
    ShortName,
    /// `CUBEMAS4.10`: 236-byte names at the end of each record.
    Cube,
}

impl MasVariant {
    /// Variants that can be recognized from a signature.
    pub const KNOWN: [MasVariant; 3] = [Self::Gmotor, Self::Opaque, Self::Cube];

    /// Identify the variant from the signature bytes.
    ///
    /// Matching is exact; anything else is [`Error::UnrecognizedFormat`].
    pub fn classify(signature: &[u8; SIGNATURE_LEN]) -> Result<Self> {
        match *signature {
            GMOTOR_SIGNATURE => Ok(Self::Gmotor),
            OPAQUE_SIGNATURE => Ok(Self::Opaque),
            CUBE_SIGNATURE => Ok(Self::Cube),
            _ => Err(Error::UnrecognizedFormat {
                signature: *signature,
            }),
        }
    }

    /// The signature bytes, if the layout has a known one.
    pub const fn signature(self) -> Option<&'static [u8; SIGNATURE_LEN]> {
        match self {
            Self::Gmotor => Some(&GMOTOR_SIGNATURE),
            Self::Opaque => Some(&OPAQUE_SIGNATURE),
            Self::Cube => Some(&CUBE_SIGNATURE),
            Self::ShortName => None,
        }
    }

    /// Padding bytes between the signature and the file count.
    pub const fn header_padding(self) -> usize {
        match self {
            Self::Opaque => 4,
            _ => 0,
        }
    }

    /// Offset of the first table record.
    pub const fn table_offset(self) -> u64 {
        (SIGNATURE_LEN + self.header_padding() + 8) as u64
    }

    /// Width of the name field in each record.
    pub const fn name_width(self) -> usize {
        match self {
            Self::Gmotor => 240,
            Self::Opaque | Self::Cube => 236,
            Self::ShortName => 16,
        }
    }
}

impl fmt::Display for MasVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Gmotor => "GMOTORMAS10",
            Self::Opaque => "opaque",
            Self::ShortName => "short-name",
            Self::Cube => "CUBEMAS4.10",
        };
        f.write_str(name)
    }
}
