//! ArchiveReader - sequential archive reader
//!
//! Validates the header on creation and yields entries in archive order. The
//! format has no resynchronization marker, so the reader stops after the
//! first failing entry.

use super::entry::{read_array, ArchiveEntry};
use crate::common::MAGIC;
use crate::{Result, SarchError};
use std::io::{ErrorKind, Read};

/// Streaming archive reader yielding `(name, data)` pairs
#[derive(Debug)]
pub struct ArchiveReader<R: Read> {
    reader: R,
    entry_count: u32,
    next_index: u32,
    failed: bool,
}

impl<R: Read> ArchiveReader<R> {
    /// Create a reader, checking the signature and reading the entry count
    ///
    /// # Errors
    /// Returns `InvalidFormat` if the input does not start with `SARCH`.
    pub fn new(mut reader: R) -> Result<Self> {
        let mut magic = [0u8; MAGIC.len()];
        match reader.read_exact(&mut magic) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(SarchError::InvalidFormat)
            }
            Err(e) => return Err(e.into()),
        }
        if &magic != MAGIC {
            return Err(SarchError::InvalidFormat);
        }

        let entry_count = u32::from_le_bytes(read_array(&mut reader, "entry count")?);
        log::debug!("Archive declares {entry_count} entries");

        Ok(Self {
            reader,
            entry_count,
            next_index: 0,
            failed: false,
        })
    }

    /// Number of entries declared in the header
    pub fn entry_count(&self) -> u32 {
        self.entry_count
    }

    /// Entries not yet read
    pub fn remaining(&self) -> u32 {
        if self.failed {
            0
        } else {
            self.entry_count - self.next_index
        }
    }

    /// Read the next record without decompressing it
    ///
    /// Errors are wrapped in `SarchError::Entry` with the entry index and,
    /// when it could be read, the entry name.
    pub fn next_raw(&mut self) -> Option<Result<ArchiveEntry>> {
        if self.failed || self.next_index >= self.entry_count {
            return None;
        }
        let index = self.next_index;
        self.next_index += 1;

        let result = match ArchiveEntry::read_name(&mut self.reader) {
            Ok(name) => ArchiveEntry::read_body(&mut self.reader, name.clone())
                .map_err(|e| entry_error(index, Some(name), e)),
            Err(e) => Err(entry_error(index, None, e)),
        };
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }

    /// Return the inner reader, positioned after the last entry read
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Iterator for ArchiveReader<R> {
    type Item = Result<(String, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next_index;
        let entry = match self.next_raw()? {
            Ok(entry) => entry,
            Err(e) => return Some(Err(e)),
        };

        match entry.decompress() {
            Ok(data) => {
                log::debug!("Unpacked {}: {} bytes", entry.name, data.len());
                Some(Ok((entry.name, data)))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(entry_error(index, Some(entry.name), e)))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining() as usize))
    }
}

fn entry_error(index: u32, name: Option<String>, source: SarchError) -> SarchError {
    SarchError::Entry {
        index,
        name,
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveWriter;

    fn sample_archive() -> Vec<u8> {
        let mut writer = ArchiveWriter::new(Vec::new(), 3).unwrap();
        writer.add_entry("one", b"first file").unwrap();
        writer.add_entry("two", b"second file").unwrap();
        writer.add_entry("three", b"third file").unwrap();
        writer.finish().unwrap()
    }

    #[test]
    fn test_reads_in_order() {
        let archive = sample_archive();
        let mut reader = ArchiveReader::new(archive.as_slice()).unwrap();
        assert_eq!(reader.entry_count(), 3);

        let names: Vec<String> = reader
            .by_ref()
            .map(|r| r.unwrap().0)
            .collect();
        assert_eq!(names, ["one", "two", "three"]);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_bad_magic() {
        let err = ArchiveReader::new(&b"XXXXX\x00\x00\x00\x00"[..]).unwrap_err();
        assert!(matches!(err, SarchError::InvalidFormat));

        let err = ArchiveReader::new(&b"SAR"[..]).unwrap_err();
        assert!(matches!(err, SarchError::InvalidFormat));
    }

    #[test]
    fn test_missing_count() {
        let err = ArchiveReader::new(&b"SARCH\x01"[..]).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_truncation_keeps_earlier_entries() {
        let archive = sample_archive();
        let cut = &archive[..archive.len() - 3];
        let mut reader = ArchiveReader::new(cut).unwrap();

        assert_eq!(reader.next().unwrap().unwrap().0, "one");
        assert_eq!(reader.next().unwrap().unwrap().0, "two");
        let err = reader.next().unwrap().unwrap_err();
        match &err {
            SarchError::Entry { index, name, .. } => {
                assert_eq!(*index, 2);
                assert_eq!(name.as_deref(), Some("three"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.is_malformed());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_next_raw() {
        let archive = sample_archive();
        let mut reader = ArchiveReader::new(archive.as_slice()).unwrap();
        let raw = reader.next_raw().unwrap().unwrap();
        assert_eq!(raw.name, "one");
        assert_eq!(raw.decompress().unwrap(), b"first file");
        assert_eq!(reader.remaining(), 2);
    }
}
