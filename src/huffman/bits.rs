//! MSB-first bit I/O
//!
//! `BitWriter` packs bits most-significant first and zero-fills the last
//! byte. `BitReader` yields bits in the same order and stops before the
//! filler bits declared by the caller.

use super::codes::Code;
use crate::{Result, SarchError};

/// Packs bits into bytes, most significant bit first
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    bit_buffer: u8,
    bit_count: u8,
}

impl BitWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty writer with room for `bytes` output bytes
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            ..Self::default()
        }
    }

    /// Append one bit
    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.bit_buffer |= 0x80 >> self.bit_count;
        }
        self.bit_count += 1;

        if self.bit_count == 8 {
            self.bytes.push(self.bit_buffer);
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
    }

    /// Append every bit of `code`
    pub fn write_code(&mut self, code: &Code) {
        for &bit in code.bits() {
            self.write_bit(bit);
        }
    }

    /// Total bits written so far
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }

    /// Flush the partial byte and return `(bytes, padding)`
    ///
    /// `padding` is the number of zero bits added to the last byte (0-7).
    pub fn finish(mut self) -> (Vec<u8>, u8) {
        let mut padding = 0;
        if self.bit_count > 0 {
            padding = 8 - self.bit_count;
            self.bytes.push(self.bit_buffer);
        }
        (self.bytes, padding)
    }
}

/// Reads bits most significant first, excluding trailing padding
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_position: usize,
    bit_limit: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader that ignores the last `padding` bits of `data`
    ///
    /// # Errors
    /// Returns `MalformedData` if `padding` is above 7 or longer than `data`.
    pub fn new(data: &'a [u8], padding: u8) -> Result<Self> {
        let total = data.len() * 8;
        if padding > 7 || padding as usize > total {
            return Err(SarchError::malformed(format!(
                "padding of {padding} bits is invalid for a {}-byte payload",
                data.len()
            )));
        }
        Ok(Self {
            data,
            bit_position: 0,
            bit_limit: total - padding as usize,
        })
    }

    /// Next bit, or `None` once the data bits are exhausted
    pub fn read_bit(&mut self) -> Option<bool> {
        if self.bit_position >= self.bit_limit {
            return None;
        }
        let byte = self.data[self.bit_position / 8];
        let bit = byte & (0x80 >> (self.bit_position % 8)) != 0;
        self.bit_position += 1;
        Some(bit)
    }

    /// Bits consumed so far
    pub fn position(&self) -> usize {
        self.bit_position
    }

    /// Data bits not yet read
    pub fn bits_remaining(&self) -> usize {
        self.bit_limit - self.bit_position
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.read_bit()
    }
}
