//! File table records.
//!
//! Every layout uses 256-byte records, but the fields sit at different
//! offsets and the name field has a different width. Integers are signed
//! 32-bit little-endian.

use gmotor_common::FixedName;
use zerocopy::little_endian::I32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::entry::FileEntry;

/// Size of one file table record.
pub const RECORD_SIZE: usize = 256;

/// A record layout that can be turned into a [`FileEntry`].
pub trait TableRecord: FromBytes {
    /// Decode the record.
    fn to_entry(&self) -> FileEntry;
}

/// Record of the `GMOTORMAS10` layout.
#[derive(Debug, Clone, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct GmotorRecord {
    pub(crate) reserved: [u8; 4],
    /// Payload offset, relative to the end of the table
    pub offset: I32,
    /// Uncompressed size
    pub size: I32,
    /// Compressed size
    pub zsize: I32,
    /// NUL-padded name
    pub name: [u8; 240],
}

/// Record of the binary-signature layout.
#[derive(Debug, Clone, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct OpaqueRecord {
    /// Entry type
    pub kind: u8,
    /// Entry flags
    pub flags: u8,
    pub(crate) reserved: [u8; 2],
    /// NUL-padded name
    pub name: [u8; 236],
    /// Payload offset, relative to the end of the table
    pub offset: I32,
    /// Uncompressed size
    pub size: I32,
    /// Compressed size
    pub zsize: I32,
    pub(crate) trailer: [u8; 4],
}

/// Record of the layout with 16-byte names.
#[derive(Debug, Clone, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct ShortNameRecord {
    pub(crate) reserved: [u8; 4],
    /// NUL-padded name
    pub name: [u8; 16],
    /// Payload offset, relative to the end of the table
    pub offset: I32,
    /// Uncompressed size
    pub size: I32,
    /// Compressed size
    pub zsize: I32,
    pub(crate) trailer: [u8; 224],
}

/// Record of the `CUBEMAS4.10` layout.
#[derive(Debug, Clone, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct CubeRecord {
    pub(crate) reserved: [u8; 4],
    /// Payload offset, relative to the end of the table
    pub offset: I32,
    /// Uncompressed size
    pub size: I32,
    /// Compressed size
    pub zsize: I32,
    pub(crate) gap: [u8; 4],
    /// NUL-padded name
    pub name: [u8; 236],
}

const _: () = assert!(std::mem::size_of::<GmotorRecord>() == RECORD_SIZE);
const _: () = assert!(std::mem::size_of::<OpaqueRecord>() == RECORD_SIZE);
const _: () = assert!(std::mem::size_of::<ShortNameRecord>() == RECORD_SIZE);
const _: () = assert!(std::mem::size_of::<CubeRecord>() == RECORD_SIZE);

impl TableRecord for GmotorRecord {
    fn to_entry(&self) -> FileEntry {
        FileEntry::new(
            0,
            0,
            FixedName::new(&self.name).decode(),
            self.offset.get(),
            self.size.get(),
            self.zsize.get(),
        )
    }
}

impl TableRecord for OpaqueRecord {
    fn to_entry(&self) -> FileEntry {
        FileEntry::new(
            self.kind,
            self.flags,
            FixedName::new(&self.name).decode(),
            self.offset.get(),
            self.size.get(),
            self.zsize.get(),
        )
    }
}

impl TableRecord for ShortNameRecord {
    fn to_entry(&self) -> FileEntry {
        FileEntry::new(
            0,
            0,
            FixedName::new(&self.name).decode(),
            self.offset.get(),
            self.size.get(),
            self.zsize.get(),
        )
    }
}

impl TableRecord for CubeRecord {
    fn to_entry(&self) -> FileEntry {
        FileEntry::new(
            0,
            0,
            FixedName::new(&self.name).decode(),
            self.offset.get(),
            self.size.get(),
            self.zsize.get(),
        )
    }
}
