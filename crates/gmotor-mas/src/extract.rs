//! Extraction of a whole container into a new directory.
//!
//! Entries are processed in table order and the first failure aborts the
//! run. Files written before the failure stay on disk.

use std::fs;
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::archive::{MasArchive, MasContainer};
use crate::entry::FileEntry;
use crate::{Error, Result};

/// Entries whose payloads are held in memory at once when inflating in parallel.
#[cfg(feature = "parallel")]
const PARALLEL_BATCH: usize = 16;

/// Outcome of a successful extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractReport {
    /// Number of files written.
    pub files_written: usize,
    /// Total inflated bytes written.
    pub bytes_written: u64,
}

impl MasContainer {
    /// Extract every entry into `dir`, which must not exist yet.
    pub fn extract_to<R, P>(&self, reader: &mut R, dir: P) -> Result<ExtractReport>
    where
        R: Read + Seek,
        P: AsRef<Path>,
    {
        self.extract_to_with(reader, dir, |_, _| {})
    }

    /// Extract every entry into `dir`, calling `on_entry` after each file is
    /// written.
    ///
    /// All names are checked before the directory is created, so an unsafe
    /// name or an existing destination leaves the filesystem untouched.
    pub fn extract_to_with<R, P, F>(
        &self,
        reader: &mut R,
        dir: P,
        mut on_entry: F,
    ) -> Result<ExtractReport>
    where
        R: Read + Seek,
        P: AsRef<Path>,
        F: FnMut(&FileEntry, &Path),
    {
        let dir = dir.as_ref();

        let targets = self
            .iter()
            .map(|entry| entry.safe_file_name().map(|name| dir.join(name)))
            .collect::<Result<Vec<PathBuf>>>()?;

        create_destination(dir)?;
        debug!(dir = %dir.display(), entries = self.entry_count(), "extracting MAS container");

        let mut report = ExtractReport::default();
        let mut write = |entry: &FileEntry, target: &Path, data: Vec<u8>| -> Result<()> {
            fs::write(target, &data)?;
            trace!(name = entry.name(), bytes = data.len(), "extracted entry");

            report.files_written += 1;
            report.bytes_written += data.len() as u64;
            on_entry(entry, target);
            Ok(())
        };

        #[cfg(not(feature = "parallel"))]
        {
            for (entry, target) in self.iter().zip(&targets) {
                let data = self.read_entry(reader, entry)?;
                write(entry, target, data)?;
            }
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            // Payloads come off the stream in order; only inflation fans out.
            for (entries, targets) in self
                .entries()
                .chunks(PARALLEL_BATCH)
                .zip(targets.chunks(PARALLEL_BATCH))
            {
                let mut payloads = Vec::with_capacity(entries.len());
                let mut read_error = None;
                for entry in entries {
                    match self.read_payload(reader, entry) {
                        Ok(payload) => payloads.push(payload),
                        Err(e) => {
                            read_error = Some(e);
                            break;
                        }
                    }
                }

                let inflated: Vec<Result<Vec<u8>>> = entries[..payloads.len()]
                    .par_iter()
                    .zip(payloads.par_iter())
                    .map(|(entry, payload)| crate::decompress::inflate_entry(entry, payload))
                    .collect();
                drop(payloads);

                for ((entry, target), data) in entries.iter().zip(targets).zip(inflated) {
                    write(entry, target, data?)?;
                }

                if let Some(e) = read_error {
                    return Err(e);
                }
            }
        }

        Ok(report)
    }
}

impl<R: Read + Seek> MasArchive<R> {
    /// Extract every entry into `dir`, which must not exist yet.
    pub fn extract_to<P: AsRef<Path>>(&mut self, dir: P) -> Result<ExtractReport> {
        let (reader, container) = self.parts_mut();
        container.extract_to(reader, dir)
    }

    /// Extract every entry into `dir`, calling `on_entry` after each file.
    pub fn extract_to_with<P, F>(&mut self, dir: P, on_entry: F) -> Result<ExtractReport>
    where
        P: AsRef<Path>,
        F: FnMut(&FileEntry, &Path),
    {
        let (reader, container) = self.parts_mut();
        container.extract_to_with(reader, dir, on_entry)
    }
}

/// Create the extraction directory; it must not exist already.
fn create_destination(dir: &Path) -> Result<()> {
    match fs::create_dir(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            Err(Error::DestinationExists(dir.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::MasVariant;
    use crate::testutil::{zlib, MasBuilder};
    use std::io::Cursor;

    fn open(bytes: Vec<u8>) -> MasArchive<Cursor<Vec<u8>>> {
        MasArchive::from_reader(Cursor::new(bytes)).unwrap()
    }

    fn pattern(len: usize, seed: u8) -> Vec<u8> {
        (0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect()
    }

    fn files_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_single_dds_example() {
        let source = pattern(1024, 7);
        let mut archive = open(
            MasBuilder::new(MasVariant::Gmotor)
                .file("car.dds", &source)
                .build(),
        );
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");

        let report = archive.extract_to(&out).unwrap();

        assert_eq!(report.files_written, 1);
        assert_eq!(report.bytes_written, 1024);
        assert_eq!(files_in(&out), vec!["car.dds"]);
        assert_eq!(fs::read(out.join("car.dds")).unwrap(), source);
    }

    #[test]
    fn test_roundtrip_all_variants() {
        let members: Vec<(String, Vec<u8>)> = (0..5)
            .map(|i| (format!("member{i}.bin"), pattern(100 * i + 1, i as u8)))
            .collect();

        for variant in MasVariant::KNOWN {
            let mut builder = MasBuilder::new(variant);
            for (name, content) in &members {
                builder = builder.file(name, content);
            }
            let mut archive = open(builder.build());

            let summary = archive.container().summary();
            assert_eq!(summary.entries_found, members.len());
            assert!(summary.count_matches());

            let tmp = tempfile::tempdir().unwrap();
            let out = tmp.path().join(variant.to_string());
            let mut seen = Vec::new();
            archive
                .extract_to_with(&out, |entry, path| {
                    seen.push((entry.name().to_string(), path.to_path_buf()))
                })
                .unwrap();

            for (i, (name, content)) in members.iter().enumerate() {
                assert_eq!(&fs::read(out.join(name)).unwrap(), content, "{variant}: {name}");
                assert_eq!(seen[i], (name.clone(), out.join(name)));
            }
        }
    }

    #[test]
    fn test_empty_container_extracts_nothing() {
        let mut archive = open(MasBuilder::new(MasVariant::Opaque).build());
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("empty");

        let report = archive.extract_to(&out).unwrap();
        assert_eq!(report, ExtractReport::default());
        assert!(out.is_dir());
        assert!(files_in(&out).is_empty());
    }

    #[test]
    fn test_existing_destination() {
        let mut archive = open(
            MasBuilder::new(MasVariant::Gmotor)
                .file("a.txt", b"a")
                .build(),
        );
        let tmp = tempfile::tempdir().unwrap();

        match archive.extract_to(tmp.path()) {
            Err(Error::DestinationExists(path)) => assert_eq!(path, tmp.path()),
            other => panic!("expected DestinationExists, got {other:?}"),
        }
        assert!(files_in(tmp.path()).is_empty());
    }

    #[test]
    fn test_unsafe_name_writes_nothing() {
        let mut archive = open(
            MasBuilder::new(MasVariant::Cube)
                .file("fine.txt", b"ok")
                .file("../escape.txt", b"nope")
                .build(),
        );
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");

        let err = archive.extract_to(&out).unwrap_err();
        assert!(matches!(err, Error::UnsafeEntryName { ref name } if name == "../escape.txt"));
        assert!(!out.exists());
        assert_eq!(files_in(tmp.path()), Vec::<String>::new());
    }

    #[test]
    fn test_truncated_payload_aborts() {
        let mut bytes = MasBuilder::new(MasVariant::Gmotor)
            .file("first.txt", &pattern(500, 1))
            .file("second.txt", &pattern(500, 2))
            .build();
        bytes.truncate(bytes.len() - 1);
        let mut archive = open(bytes);
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");

        let err = archive.extract_to(&out).unwrap_err();
        assert!(
            matches!(
                err,
                Error::TruncatedPayload { ref name, .. } | Error::DecompressionFailed { ref name, .. }
                    if name == "second.txt"
            ),
            "unexpected error: {err:?}"
        );
        assert_eq!(files_in(&out), vec!["first.txt"]);
    }

    #[test]
    fn test_wrong_inflated_length_is_fail_fast() {
        let mut archive = open(
            MasBuilder::new(MasVariant::Opaque)
                .file("before.txt", b"before")
                .raw("liar.dds", 1024, zlib(&[0xAB; 1000]))
                .file("after.txt", b"after")
                .build(),
        );
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");

        match archive.extract_to(&out) {
            Err(Error::CorruptEntry {
                name,
                actual,
                expected,
            }) => {
                assert_eq!(name, "liar.dds");
                assert_eq!(actual, 1000);
                assert_eq!(expected, 1024);
            }
            other => panic!("expected CorruptEntry, got {other:?}"),
        }

        // Entries before the failure were written, nothing after it.
        assert_eq!(files_in(&out), vec!["before.txt"]);
    }

    #[test]
    fn test_inflated_larger_than_declared() {
        let mut archive = open(
            MasBuilder::new(MasVariant::Gmotor)
                .raw("liar.dds", 1000, zlib(&[0xAB; 200_000]))
                .build(),
        );
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");

        match archive.extract_to(&out) {
            Err(Error::CorruptEntry {
                name,
                actual,
                expected,
            }) => {
                assert_eq!(name, "liar.dds");
                assert_eq!(actual, 200_000);
                assert_eq!(expected, 1000);
            }
            other => panic!("expected CorruptEntry, got {other:?}"),
        }
        assert!(files_in(&out).is_empty());
    }

    #[test]
    fn test_member_larger_than_preallocation() {
        let big = vec![7u8; (64 << 20) + 4096];
        let mut archive = open(
            MasBuilder::new(MasVariant::Cube)
                .file("big.gdb", &big)
                .file("small.txt", b"small")
                .build(),
        );
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");

        let report = archive.extract_to(&out).unwrap();
        assert_eq!(report.files_written, 2);
        assert_eq!(report.bytes_written, big.len() as u64 + 5);
        assert!(fs::read(out.join("big.gdb")).unwrap() == big);
    }

    #[test]
    fn test_many_members_in_order() {
        let mut builder = MasBuilder::new(MasVariant::Opaque);
        for i in 0..40 {
            builder = builder.file(&format!("part{i:02}.bin"), &pattern(3000 + i, i as u8));
        }
        let mut archive = open(builder.build());
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");

        let mut order = Vec::new();
        archive
            .extract_to_with(&out, |entry, _| order.push(entry.name().to_string()))
            .unwrap();

        let expected: Vec<String> = (0..40).map(|i| format!("part{i:02}.bin")).collect();
        assert_eq!(order, expected);
        for i in 0..40 {
            let data = fs::read(out.join(&expected[i])).unwrap();
            assert_eq!(data, pattern(3000 + i, i as u8));
        }
    }

    #[test]
    fn test_bad_stream_names_entry() {
        let mut archive = open(
            MasBuilder::new(MasVariant::Gmotor)
                .raw("broken.gmt", 16, b"not a zlib stream".to_vec())
                .build(),
        );
        let tmp = tempfile::tempdir().unwrap();

        let err = archive.extract_to(tmp.path().join("out")).unwrap_err();
        assert!(matches!(err, Error::DecompressionFailed { ref name, .. } if name == "broken.gmt"));
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let mut archive = open(
            MasBuilder::new(MasVariant::Gmotor)
                .file("same.txt", b"old")
                .file("same.txt", b"new")
                .build(),
        );
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");

        let report = archive.extract_to(&out).unwrap();
        assert_eq!(report.files_written, 2);
        assert_eq!(fs::read(out.join("same.txt")).unwrap(), b"new");
    }
}
