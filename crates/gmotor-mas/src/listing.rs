//! Table listings.
//!
//! Listing only looks at the parsed table; payloads are never read.

use std::io::{self, Write};

use tracing::warn;

use crate::archive::MasContainer;

/// How [`MasContainer::write_listing`] prints entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle<'a> {
    /// One name per line.
    Names,
    /// One `"<prefix>: <name>"` line per entry.
    PrefixedNames(&'a str),
    /// A table of flags, type, offset, sizes and name, then the totals.
    Verbose,
}

/// Aggregate statistics of a file table next to the header's own claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Entries actually present in the table.
    pub entries_found: usize,
    /// File count declared in the header.
    pub declared_file_count: i32,
    /// Sum of the declared uncompressed sizes.
    pub total_size: i64,
    /// Sum of the compressed sizes.
    pub total_zsize: i64,
    /// Payload size declared in the header.
    pub declared_data_size: i32,
}

impl Summary {
    /// Whether the table holds as many entries as the header declares.
    pub fn count_matches(&self) -> bool {
        i64::try_from(self.entries_found).ok() == Some(i64::from(self.declared_file_count))
    }
}

impl MasContainer {
    /// Compute aggregate statistics over the table.
    pub fn summary(&self) -> Summary {
        Summary {
            entries_found: self.entry_count(),
            declared_file_count: self.file_count(),
            total_size: self.iter().map(|e| i64::from(e.size())).sum(),
            total_zsize: self.iter().map(|e| i64::from(e.zsize())).sum(),
            declared_data_size: self.data_size(),
        }
    }

    /// Write a listing of the table in the given style.
    pub fn write_listing<W: Write>(&self, out: &mut W, style: ListStyle<'_>) -> io::Result<()> {
        match style {
            ListStyle::Names => {
                for entry in self {
                    writeln!(out, "{}", entry.name())?;
                }
            }
            ListStyle::PrefixedNames(prefix) => {
                for entry in self {
                    writeln!(out, "{}: {}", prefix, entry.name())?;
                }
            }
            ListStyle::Verbose => self.write_verbose(out)?,
        }
        Ok(())
    }

    fn write_verbose<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "{:>6} {:>6} {:<8} {:<8} {:<8} {:<8}",
            "flags:", "type:", "offset:", "size:", "zsize:", "name:"
        )?;
        for entry in self {
            writeln!(
                out,
                "{:>6x} {:>6} {:>8} {:>8} {:>8} {}",
                entry.flags(),
                entry.entry_type(),
                entry.offset(),
                entry.size(),
                entry.zsize(),
                entry.name()
            )?;
        }

        let summary = self.summary();
        writeln!(out)?;
        writeln!(out, "number of files:       {:>12}", summary.entries_found)?;
        writeln!(out, "header file_count:     {:>12}", summary.declared_file_count)?;
        if !summary.count_matches() {
            warn!(
                found = summary.entries_found,
                declared = summary.declared_file_count,
                "file table size disagrees with header"
            );
            writeln!(
                out,
                "warning: found {} entries but the header declares {}",
                summary.entries_found, summary.declared_file_count
            )?;
        }
        writeln!(out)?;
        writeln!(out, "total extracted size:  {:>12}", summary.total_size)?;
        writeln!(out)?;
        writeln!(out, "total compressed size: {:>12}", summary.total_zsize)?;
        writeln!(out, "header data_size:      {:>12}", summary.declared_data_size)?;
        Ok(())
    }
}
