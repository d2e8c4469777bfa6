//! Huffman coding stage
//!
//! This module builds a prefix-free code from the byte frequencies of one
//! buffer and packs the buffer into a bitstream under that code. Every call
//! returns its own [`CodeTable`]; no state is kept between calls.

mod bits;
mod coder;
mod codes;
mod tree;

pub use bits::{BitReader, BitWriter};
pub use coder::{decode, encode};
pub use codes::{assign_codes, Code, CodeTable};
pub use tree::{build_tree, build_tree_from_frequencies, FrequencyTable, HuffmanNode};

use crate::Result;

/// Code table and bitstream produced for one buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HuffmanOutput {
    /// Code used for every symbol of the input
    pub table: CodeTable,
    /// Packed bitstream
    pub payload: Vec<u8>,
    /// Zero bits padding the last payload byte (0-7)
    pub padding: u8,
}

/// Build a code for `data` and encode `data` with it
///
/// Empty input produces an empty table, an empty payload and zero padding.
pub fn compress(data: &[u8]) -> Result<HuffmanOutput> {
    let table = match build_tree(data) {
        Some(root) => assign_codes(&root),
        None => CodeTable::new(),
    };
    let (payload, padding) = encode(data, &table)?;
    Ok(HuffmanOutput {
        table,
        payload,
        padding,
    })
}

/// Decode a payload produced by [`compress`]
pub fn decompress(payload: &[u8], table: &CodeTable, padding: u8) -> Result<Vec<u8>> {
    decode(payload, table, padding)
}
