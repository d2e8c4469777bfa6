//! Code table serialization
//!
//! Layout:
//!
//! ```text
//! count            1 byte   (0 means 256 when entries follow)
//! per entry:
//!   symbol         1 byte
//!   bit_length     1 byte
//!   byte_length    1 byte   ceil(bit_length / 8)
//!   code           byte_length bytes, big-endian value of the code
//! ```
//!
//! An empty table serializes to zero bytes.

use crate::common::MAX_CODE_LENGTH;
use crate::huffman::{Code, CodeTable};
use crate::{Result, SarchError};

/// Serialize `table`, entries in ascending symbol order
///
/// # Errors
/// Returns `LimitExceeded` if a code is longer than 255 bits.
pub fn serialize(table: &CodeTable) -> Result<Vec<u8>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }

    let mut out = Vec::with_capacity(1 + table.len() * 4);
    // 256 entries wraps to 0
    out.push(table.len() as u8);

    for (symbol, code) in table.iter() {
        if code.is_empty() || code.len() > MAX_CODE_LENGTH {
            return Err(SarchError::LimitExceeded(format!(
                "code for symbol 0x{symbol:02X} has {} bits, expected 1..={MAX_CODE_LENGTH}",
                code.len()
            )));
        }
        let code_bytes = code.to_be_bytes();
        out.push(symbol);
        out.push(code.len() as u8);
        out.push(code_bytes.len() as u8);
        out.extend_from_slice(&code_bytes);
    }

    Ok(out)
}

/// Parse a table written by [`serialize`]
///
/// Returns the table and the number of bytes consumed.
///
/// # Errors
/// Returns `MalformedData` if `data` is shorter than the declared counts or an
/// entry is inconsistent (zero-length code, wrong byte count, value wider
/// than its bit length, repeated symbol).
pub fn deserialize(data: &[u8]) -> Result<(CodeTable, usize)> {
    let Some((&count, _)) = data.split_first() else {
        return Ok((CodeTable::new(), 0));
    };
    let count = if count == 0 { 256 } else { count as usize };

    let mut table = CodeTable::new();
    let mut pos = 1;

    for entry in 0..count {
        let Some(&[symbol, bit_len, byte_len]) = data.get(pos..pos + 3) else {
            return Err(SarchError::malformed(format!(
                "code table truncated in entry {entry} of {count}"
            )));
        };
        pos += 3;

        if bit_len == 0 {
            return Err(SarchError::malformed(format!(
                "symbol 0x{symbol:02X} has a zero-length code"
            )));
        }

        let byte_len = byte_len as usize;
        let code_bytes = data.get(pos..pos + byte_len).ok_or_else(|| {
            SarchError::malformed(format!(
                "code table truncated in code of symbol 0x{symbol:02X}"
            ))
        })?;
        pos += byte_len;

        let code = Code::from_be_bytes(code_bytes, bit_len as usize)?;
        if table.insert(symbol, code).is_some() {
            return Err(SarchError::malformed(format!(
                "symbol 0x{symbol:02X} appears twice in code table"
            )));
        }
    }

    Ok((table, pos))
}
