//! SARCH container format
//!
//! An archive is the 5-byte signature `SARCH`, a little-endian `u32` entry
//! count and the entries back to back:
//!
//! ```text
//! name_len     u16 LE
//! name         UTF-8
//! table_len    u32 LE
//! code_table   see crate::table
//! padding      u8 (0-7)
//! payload_len  u32 LE
//! payload      Huffman-coded RLE stream
//! ```
//!
//! There is no index; entries must be read in order.

mod entry;
mod reader;
mod writer;

pub use entry::ArchiveEntry;
pub use reader::ArchiveReader;
pub use writer::ArchiveWriter;

use crate::{Result, SarchError};

/// Pack named buffers into an in-memory archive, preserving order
pub fn pack<N: AsRef<str>, D: AsRef<[u8]>>(entries: &[(N, D)]) -> Result<Vec<u8>> {
    let count = u32::try_from(entries.len()).map_err(|_| {
        SarchError::LimitExceeded(format!("{} entries do not fit in u32", entries.len()))
    })?;

    let mut writer = ArchiveWriter::new(Vec::new(), count)?;
    for (name, data) in entries {
        writer.add_entry(name.as_ref(), data.as_ref())?;
    }
    writer.finish()
}

/// Unpack every entry of an in-memory archive, in archive order
///
/// # Errors
/// `InvalidFormat` for a bad signature; `Entry` wrapping the cause for the
/// first entry that cannot be read or decoded.
pub fn unpack(archive: &[u8]) -> Result<Vec<(String, Vec<u8>)>> {
    ArchiveReader::new(archive)?.collect()
}
