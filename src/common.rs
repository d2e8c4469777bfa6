//! Common types and constants for the SARCH archive format
//!
//! This module defines the error type, format constants and statistics shared
//! by the codec stages and the container format.

use thiserror::Error;

/// Archive signature written at offset 0
pub const MAGIC: &[u8; 5] = b"SARCH";

/// Size of the fixed archive header (magic + entry count)
pub const HEADER_SIZE: usize = MAGIC.len() + 4;

/// Longest run a single RLE pair can describe
pub const MAX_RUN_LENGTH: usize = 255;

/// Longest entry name the container can store (u16 length prefix)
pub const MAX_NAME_LENGTH: usize = u16::MAX as usize;

/// Longest code a table can store (u8 length field)
pub const MAX_CODE_LENGTH: usize = u8::MAX as usize;

/// Error type for SARCH operations
#[derive(Debug, Error)]
pub enum SarchError {
    /// Archive signature is missing or wrong
    #[error("Invalid archive format: bad or missing SARCH signature")]
    InvalidFormat,

    /// Truncated or inconsistent data in a code table, entry or bitstream
    #[error("Malformed data: {0}")]
    MalformedData(String),

    /// A byte to encode has no code in the table
    #[error("Unknown symbol: 0x{0:02X} has no code in the table")]
    UnknownSymbol(u8),

    /// Entry name cannot be used as a file name
    #[error("Invalid entry name: {0:?}")]
    InvalidEntryName(String),

    /// Two entries would be written to the same file
    #[error("Duplicate entry name: {0:?}")]
    DuplicateEntryName(String),

    /// A value does not fit its length-prefixed field
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    /// Writer finished with a different number of entries than declared
    #[error("Entry count mismatch: header declares {expected}, wrote {actual}")]
    EntryCountMismatch {
        /// Entry count written in the header
        expected: u32,
        /// Entries actually written
        actual: u32,
    },

    /// Failure while reading or decoding one archive entry
    #[error("Entry {index}{}: {source}", .name.as_ref().map(|n| format!(" ({n})")).unwrap_or_default())]
    Entry {
        /// Zero-based position of the entry in the archive
        index: u32,
        /// Entry name, if it was read before the failure
        name: Option<String>,
        /// Underlying cause
        source: Box<SarchError>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SarchError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        SarchError::MalformedData(msg.into())
    }

    /// The underlying cause, looking through `Entry` wrappers
    pub fn root_cause(&self) -> &SarchError {
        match self {
            SarchError::Entry { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether the root cause is `MalformedData`
    pub fn is_malformed(&self) -> bool {
        matches!(self.root_cause(), SarchError::MalformedData(_))
    }
}

/// Result type alias for SARCH operations
pub type Result<T> = std::result::Result<T, SarchError>;

/// Sizes recorded while packing one entry
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EntryStats {
    /// Raw input size
    pub original_size: usize,
    /// Size after run-length encoding
    pub rle_size: usize,
    /// Serialized code table size
    pub table_size: usize,
    /// Huffman payload size
    pub payload_size: usize,
    /// Number of distinct symbols in the RLE stream
    pub distinct_symbols: usize,
}

impl EntryStats {
    /// Stored size relative to the original, in percent
    pub fn ratio(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        ((self.table_size + self.payload_size) as f64 / self.original_size as f64) * 100.0
    }
}
