//! Prefix codes and code tables
//!
//! A [`Code`] is a bit string read from the tree root to a leaf. A
//! [`CodeTable`] maps every symbol of one buffer to its code and is produced
//! fresh by each encode call.

use super::tree::HuffmanNode;
use crate::{Result, SarchError};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A variable-length bit string, first bit first
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    /// Create an empty code
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a code from individual bits
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// The bits of this code
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Number of bits
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether the code has no bits
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Append one bit
    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Whether `self` is a prefix of `other`
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }

    /// The code as a big-endian unsigned integer in `ceil(len / 8)` bytes
    ///
    /// Leading filler bits of the first byte are zero.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let byte_len = self.bits.len().div_ceil(8);
        let mut bytes = vec![0u8; byte_len];
        let offset = byte_len * 8 - self.bits.len();
        for (i, &bit) in self.bits.iter().enumerate() {
            if bit {
                let pos = offset + i;
                bytes[pos / 8] |= 0x80 >> (pos % 8);
            }
        }
        bytes
    }

    /// Inverse of [`Code::to_be_bytes`]
    ///
    /// # Errors
    /// Returns `MalformedData` if `bytes` is not exactly `ceil(bit_len / 8)`
    /// long or sets a bit above `bit_len`.
    pub fn from_be_bytes(bytes: &[u8], bit_len: usize) -> Result<Self> {
        let byte_len = bit_len.div_ceil(8);
        if bytes.len() != byte_len {
            return Err(SarchError::malformed(format!(
                "code of {bit_len} bits stored in {} bytes, expected {byte_len}",
                bytes.len()
            )));
        }

        let offset = byte_len * 8 - bit_len;
        if offset > 0 && bytes[0] >> (8 - offset) != 0 {
            return Err(SarchError::malformed(format!(
                "code value wider than its {bit_len}-bit length"
            )));
        }

        let bits = (offset..byte_len * 8)
            .map(|pos| bytes[pos / 8] & (0x80 >> (pos % 8)) != 0)
            .collect();
        Ok(Self { bits })
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Code {
    type Err = SarchError;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(SarchError::malformed(format!(
                    "invalid bit character {other:?}"
                ))),
            })
            .collect::<Result<Vec<_>>>()
            .map(Code::from_bits)
    }
}

/// Mapping from symbol to prefix-free code, ordered by symbol
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the code for `symbol`, returning the previous one
    pub fn insert(&mut self, symbol: u8, code: Code) -> Option<Code> {
        self.codes.insert(symbol, code)
    }

    /// Code for `symbol`
    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    /// Number of symbols
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the table has no symbols
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterate `(symbol, code)` in ascending symbol order
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> {
        self.codes.iter().map(|(&s, c)| (s, c))
    }

    /// Whether no code is empty and no code is a prefix of another
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&Code> = self.codes.values().collect();
        if codes.iter().any(|c| c.is_empty()) {
            return false;
        }
        // After sorting, a prefix sorts directly before some code it prefixes
        codes.sort_by(|a, b| a.bits.cmp(&b.bits));
        codes.windows(2).all(|w| !w[0].is_prefix_of(w[1]))
    }
}

impl FromIterator<(u8, Code)> for CodeTable {
    fn from_iter<I: IntoIterator<Item = (u8, Code)>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().collect(),
        }
    }
}

/// Assign codes by walking the tree: `0` on left edges, `1` on right edges
///
/// A tree consisting of a single leaf gets the code `0`.
pub fn assign_codes(root: &HuffmanNode) -> CodeTable {
    let mut table = CodeTable::new();
    let mut stack = vec![(root, Code::new())];

    while let Some((node, path)) = stack.pop() {
        match node {
            HuffmanNode::Leaf { symbol, .. } => {
                let code = if path.is_empty() {
                    Code::from_bits(vec![false])
                } else {
                    path
                };
                table.insert(*symbol, code);
            }
            HuffmanNode::Internal { left, right, .. } => {
                let mut right_path = path.clone();
                right_path.push(true);
                stack.push((right, right_path));

                let mut left_path = path;
                left_path.push(false);
                stack.push((left, left_path));
            }
        }
    }

    table
}
