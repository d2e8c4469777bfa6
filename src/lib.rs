//! SARCH - a simple multi-file archiver
//!
//! This crate implements a two-stage codec, run-length encoding followed by
//! Huffman coding, and a sequential container format that stores each file's
//! name, code table and compressed payload behind a `SARCH` signature.
//!
//! # Features
//!
//! - Lossless RLE with runs capped at 255 bytes
//! - Deterministic Huffman codes (identical input, identical table)
//! - Compact per-entry code tables
//! - Streaming archive writer and iterating reader
//! - Filesystem helpers that skip missing inputs and never write partial output
//!   for a corrupt archive
//! - Optional tokio-based filesystem helpers (`async` feature)
//!
//! # Example - In-memory archives
//!
//! ```
//! use sarch::{pack, unpack};
//!
//! let archive = pack(&[("a.txt", b"hello"), ("b.txt", b"world")])?;
//! let files = unpack(&archive)?;
//! assert_eq!(files[0], ("a.txt".to_string(), b"hello".to_vec()));
//! assert_eq!(files[1], ("b.txt".to_string(), b"world".to_vec()));
//! # Ok::<(), sarch::SarchError>(())
//! ```
//!
//! # Example - Files on disk
//!
//! ```no_run
//! use sarch::fs::{pack_files, unpack_files};
//!
//! let report = pack_files(&["notes.txt", "data.bin"], "backup.sarch")?;
//! for skipped in &report.skipped {
//!     eprintln!("skipped {}: {}", skipped.path.display(), skipped.error);
//! }
//! let written = unpack_files("backup.sarch", "extracted")?;
//! # Ok::<(), sarch::SarchError>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Public modules
pub mod archive;
pub mod common;
pub mod error;
pub mod fs;
pub mod huffman;
pub mod rle;
pub mod table;

// Async modules (only available with async feature)
#[cfg(feature = "async")]
pub mod async_fs;

// Re-export commonly used types
pub use archive::{pack, unpack, ArchiveEntry, ArchiveReader, ArchiveWriter};
pub use common::{EntryStats, Result, SarchError, HEADER_SIZE, MAGIC, MAX_RUN_LENGTH};
pub use huffman::{Code, CodeTable, HuffmanNode};
