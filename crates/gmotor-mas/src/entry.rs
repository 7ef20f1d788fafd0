//! MAS file table entry.

use std::path::{Component, Path};

use crate::{Error, Result};

/// An entry (member file) within a MAS container.
///
/// This contains metadata about the member, not its data.
/// Use [`MasContainer::read_entry`](crate::MasContainer::read_entry) to get
/// the inflated contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Entry type (only stored by the opaque layout).
    entry_type: u8,
    /// Entry flags (only stored by the opaque layout).
    flags: u8,
    /// Decoded member name.
    name: String,
    /// Payload offset relative to the end of the file table.
    offset: i32,
    /// Uncompressed size in bytes.
    size: i32,
    /// Compressed size in bytes.
    zsize: i32,
}

impl FileEntry {
    /// Create a new entry.
    pub(crate) fn new(
        entry_type: u8,
        flags: u8,
        name: String,
        offset: i32,
        size: i32,
        zsize: i32,
    ) -> Self {
        Self {
            entry_type,
            flags,
            name,
            offset,
            size,
            zsize,
        }
    }

    /// Get the member name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the entry type. Zero for layouts that do not store one.
    #[inline]
    pub fn entry_type(&self) -> u8 {
        self.entry_type
    }

    /// Get the entry flags. Zero for layouts that do not store them.
    #[inline]
    pub fn flags(&self) -> u8 {
        self.flags
    }

    /// Get the payload offset, relative to the end of the file table.
    #[inline]
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Get the declared uncompressed size.
    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Get the compressed size.
    #[inline]
    pub fn zsize(&self) -> i32 {
        self.zsize
    }

    /// Payload offset as an unsigned value.
    pub(crate) fn payload_offset(&self) -> Result<u64> {
        u64::try_from(self.offset).map_err(|_| self.invalid("offset", self.offset))
    }

    /// Compressed size as a byte count.
    pub(crate) fn payload_len(&self) -> Result<usize> {
        usize::try_from(self.zsize).map_err(|_| self.invalid("zsize", self.zsize))
    }

    /// Declared uncompressed size as a byte count.
    pub(crate) fn expected_size(&self) -> Result<usize> {
        usize::try_from(self.size).map_err(|_| self.invalid("size", self.size))
    }

    /// The name as a file name that is safe to create inside the
    /// extraction directory.
    ///
    /// Only a single plain path component is accepted: no separators,
    /// no `.` or `..`, no root or prefix, not empty.
    pub fn safe_file_name(&self) -> Result<&str> {
        let name = self.name.as_str();
        let mut components = Path::new(name).components();

        let single_plain = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );

        if name.is_empty() || name.contains(|c: char| c == '/' || c == '\\') || !single_plain {
            return Err(Error::UnsafeEntryName {
                name: self.name.clone(),
            });
        }

        Ok(name)
    }

    fn invalid(&self, field: &'static str, value: i32) -> Error {
        Error::InvalidEntry {
            name: self.name.clone(),
            field,
            value: value.into(),
        }
    }
}
