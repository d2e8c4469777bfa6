//! ArchiveWriter - sequential archive writer
//!
//! Writes the header on creation and one record per [`ArchiveWriter::add_entry`]
//! call. The entry count is part of the header, so it must be known up front.

use super::entry::ArchiveEntry;
use crate::common::{EntryStats, MAGIC};
use crate::{Result, SarchError};
use std::io::Write;

/// Streaming archive writer implementing the SARCH layout
#[derive(Debug)]
pub struct ArchiveWriter<W: Write> {
    writer: W,
    expected_entries: u32,
    written_entries: u32,
    bytes_written: u64,
}

impl<W: Write> ArchiveWriter<W> {
    /// Create a writer and emit the header for `entry_count` entries
    pub fn new(mut writer: W, entry_count: u32) -> Result<Self> {
        writer.write_all(MAGIC)?;
        writer.write_all(&entry_count.to_le_bytes())?;
        Ok(Self {
            writer,
            expected_entries: entry_count,
            written_entries: 0,
            bytes_written: (MAGIC.len() + 4) as u64,
        })
    }

    /// Compress `data` and append it as entry `name`
    pub fn add_entry(&mut self, name: &str, data: &[u8]) -> Result<EntryStats> {
        let (entry, stats) = ArchiveEntry::compress(name, data)?;
        self.write_entry(&entry)?;

        log::debug!(
            "Packed {}: {} -> {} bytes (rle {}, table {}, {} symbols)",
            name,
            stats.original_size,
            stats.table_size + stats.payload_size,
            stats.rle_size,
            stats.table_size,
            stats.distinct_symbols
        );
        Ok(stats)
    }

    /// Append an already compressed entry
    pub fn write_entry(&mut self, entry: &ArchiveEntry) -> Result<()> {
        if self.written_entries >= self.expected_entries {
            return Err(SarchError::EntryCountMismatch {
                expected: self.expected_entries,
                actual: self.written_entries + 1,
            });
        }

        entry.write_to(&mut self.writer)?;
        self.written_entries += 1;
        self.bytes_written += entry.encoded_len() as u64;
        Ok(())
    }

    /// Entries written so far
    pub fn entries_written(&self) -> u32 {
        self.written_entries
    }

    /// Bytes written so far, header included
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Check the entry count, flush and return the inner writer
    pub fn finish(mut self) -> Result<W> {
        if self.written_entries != self.expected_entries {
            return Err(SarchError::EntryCountMismatch {
                expected: self.expected_entries,
                actual: self.written_entries,
            });
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}
