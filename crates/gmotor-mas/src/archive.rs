//! MAS container reader.
//!
//! [`MasContainer`] holds the parsed file table and reads payloads through a
//! stream the caller passes in. [`MasArchive`] bundles a container with the
//! stream it was read from.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use gmotor_common::ReadExt;
use tracing::{debug, trace};

use crate::decompress;
use crate::entry::FileEntry;
use crate::format::{
    CubeRecord, GmotorRecord, MasVariant, OpaqueRecord, ShortNameRecord, TableRecord,
    SIGNATURE_LEN,
};
use crate::{Error, Result};

/// Table entries reserved up front, whatever the header claims.
const MAX_TABLE_PREALLOC: usize = 4096;

/// Parsed MAS header and file table.
///
/// The container does not own the stream it was read from; payload reads
/// take the stream again and seek to `base_offset + entry.offset`.
#[derive(Debug, Clone)]
pub struct MasContainer {
    variant: MasVariant,
    file_count: i32,
    data_size: i32,
    entries: Vec<FileEntry>,
    base_offset: u64,
}

impl MasContainer {
    /// Read the signature, header and file table from a stream positioned at
    /// the start of the container.
    pub fn read_from<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let signature: [u8; SIGNATURE_LEN] = reader
            .read_byte_array()
            .map_err(|e| header_error(e, "signature"))?;
        let variant = MasVariant::classify(&signature)?;

        if variant.header_padding() > 0 {
            reader
                .read_exactly(variant.header_padding())
                .map_err(|e| header_error(e, "header"))?;
        }

        let file_count = reader
            .read_i32::<LittleEndian>()
            .map_err(|e| header_error(e.into(), "header"))?;
        let data_size = reader
            .read_i32::<LittleEndian>()
            .map_err(|e| header_error(e.into(), "header"))?;

        let count = usize::try_from(file_count).map_err(|_| Error::InvalidHeader {
            field: "file_count",
            value: file_count.into(),
        })?;

        let entries = match variant {
            MasVariant::Gmotor => read_table::<GmotorRecord, _>(reader, count)?,
            MasVariant::Opaque => read_table::<OpaqueRecord, _>(reader, count)?,
            MasVariant::ShortName => read_table::<ShortNameRecord, _>(reader, count)?,
            MasVariant::Cube => read_table::<CubeRecord, _>(reader, count)?,
        };

        // Payload offsets count from wherever the table actually ended.
        let base_offset = reader.stream_position()?;

        debug!(
            %variant,
            file_count,
            data_size,
            base_offset,
            "read MAS file table"
        );

        Ok(Self {
            variant,
            file_count,
            data_size,
            entries,
            base_offset,
        })
    }

    /// Get the container variant.
    #[inline]
    pub fn variant(&self) -> MasVariant {
        self.variant
    }

    /// Get the file count declared in the header.
    #[inline]
    pub fn file_count(&self) -> i32 {
        self.file_count
    }

    /// Get the payload size declared in the header.
    #[inline]
    pub fn data_size(&self) -> i32 {
        self.data_size
    }

    /// Get the stream offset that entry offsets are relative to.
    #[inline]
    pub fn base_offset(&self) -> u64 {
        self.base_offset
    }

    /// Get the entries in table order.
    #[inline]
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Get the number of entries.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over entries in table order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, FileEntry> {
        self.entries.iter()
    }

    /// Get entry by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&FileEntry> {
        self.entries.get(index)
    }

    /// Find the first entry with the given name (case-insensitive).
    pub fn find(&self, name: &str) -> Option<&FileEntry> {
        self.entries
            .iter()
            .find(|e| e.name().eq_ignore_ascii_case(name))
    }

    /// Read, inflate and verify one entry's contents.
    pub fn read_entry<R: Read + Seek>(&self, reader: &mut R, entry: &FileEntry) -> Result<Vec<u8>> {
        let compressed = self.read_payload(reader, entry)?;
        decompress::inflate_entry(entry, &compressed)
    }

    /// Read an entry's compressed payload.
    pub(crate) fn read_payload<R: Read + Seek>(
        &self,
        reader: &mut R,
        entry: &FileEntry,
    ) -> Result<Vec<u8>> {
        let offset = entry.payload_offset()?;
        let len = entry.payload_len()?;

        trace!(name = entry.name(), offset, len, "reading payload");

        reader.seek(SeekFrom::Start(self.base_offset + offset))?;
        reader.read_exactly(len).map_err(|e| match e {
            gmotor_common::Error::UnexpectedEof { needed, available } => Error::TruncatedPayload {
                name: entry.name().to_string(),
                expected: needed,
                available,
            },
            gmotor_common::Error::Io(e) => Error::Io(e),
        })
    }
}

impl<'a> IntoIterator for &'a MasContainer {
    type Item = &'a FileEntry;
    type IntoIter = std::slice::Iter<'a, FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Read `count` records of one layout.
fn read_table<T: TableRecord, R: Read>(reader: &mut R, count: usize) -> Result<Vec<FileEntry>> {
    let mut entries = Vec::with_capacity(count.min(MAX_TABLE_PREALLOC));

    for _ in 0..count {
        let record: T = reader
            .read_struct()
            .map_err(|e| header_error(e, "file table"))?;
        entries.push(record.to_entry());
    }

    Ok(entries)
}

fn header_error(e: gmotor_common::Error, section: &'static str) -> Error {
    match e {
        gmotor_common::Error::Io(e) if e.kind() != std::io::ErrorKind::UnexpectedEof => {
            Error::Io(e)
        }
        _ => Error::TruncatedHeader { section },
    }
}

/// A MAS container together with the stream it was read from.
pub struct MasArchive<R = BufReader<File>> {
    /// Underlying stream
    reader: R,
    /// Archive file name
    name: String,
    /// Parsed header and table
    container: MasContainer,
}

impl MasArchive {
    /// Open a MAS container file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let mut archive = Self::from_reader(BufReader::new(file))?;
        archive.name = name;
        Ok(archive)
    }
}

impl<R: Read + Seek> MasArchive<R> {
    /// Read a container from a stream positioned at its start.
    pub fn from_reader(mut reader: R) -> Result<Self> {
        let container = MasContainer::read_from(&mut reader)?;

        Ok(Self {
            reader,
            name: String::new(),
            container,
        })
    }

    /// Get the archive file name (empty when read from a plain stream).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the parsed header and table.
    #[inline]
    pub fn container(&self) -> &MasContainer {
        &self.container
    }

    /// Get the entries in table order.
    #[inline]
    pub fn entries(&self) -> &[FileEntry] {
        self.container.entries()
    }

    /// Get the number of entries.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.container.entry_count()
    }

    /// Find the first entry with the given name (case-insensitive).
    pub fn find(&self, name: &str) -> Option<&FileEntry> {
        self.container.find(name)
    }

    /// Read entry contents - seeks, inflates and verifies the size.
    pub fn read(&mut self, entry: &FileEntry) -> Result<Vec<u8>> {
        self.container.read_entry(&mut self.reader, entry)
    }

    /// Read entry by index.
    pub fn read_index(&mut self, index: usize) -> Result<Vec<u8>> {
        let entry = self
            .container
            .get(index)
            .ok_or(Error::EntryIndexOutOfRange {
                index,
                count: self.container.entry_count(),
            })?;

        self.container.read_entry(&mut self.reader, entry)
    }

    /// Split into the stream and the parsed container.
    pub fn into_parts(self) -> (R, MasContainer) {
        (self.reader, self.container)
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut R, &MasContainer) {
        (&mut self.reader, &self.container)
    }
}

impl<R> std::fmt::Debug for MasArchive<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasArchive")
            .field("name", &self.name)
            .field("variant", &self.container.variant)
            .field("entries", &self.container.entries.len())
            .finish()
    }
}
