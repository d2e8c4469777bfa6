//! One archive record and its per-file compression pipeline

use crate::common::{EntryStats, MAX_NAME_LENGTH};
use crate::{huffman, rle, table, Result, SarchError};
use std::io::{Read, Write};

/// A stored file: name, serialized code table, padding and payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// File name
    pub name: String,
    /// Serialized code table
    pub code_table: Vec<u8>,
    /// Zero bits padding the last payload byte
    pub padding: u8,
    /// Huffman-coded RLE stream
    pub payload: Vec<u8>,
}

impl ArchiveEntry {
    /// Run `data` through RLE, Huffman coding and table serialization
    pub fn compress(name: impl Into<String>, data: &[u8]) -> Result<(Self, EntryStats)> {
        let name = name.into();
        if name.len() > MAX_NAME_LENGTH {
            return Err(SarchError::LimitExceeded(format!(
                "entry name is {} bytes, maximum is {MAX_NAME_LENGTH}",
                name.len()
            )));
        }

        let rle_encoded = rle::encode(data);
        let coded = huffman::compress(&rle_encoded)?;
        let code_table = table::serialize(&coded.table)?;

        let stats = EntryStats {
            original_size: data.len(),
            rle_size: rle_encoded.len(),
            table_size: code_table.len(),
            payload_size: coded.payload.len(),
            distinct_symbols: coded.table.len(),
        };

        let entry = Self {
            name,
            code_table,
            padding: coded.padding,
            payload: coded.payload,
        };
        Ok((entry, stats))
    }

    /// Reverse [`ArchiveEntry::compress`] and return the original bytes
    pub fn decompress(&self) -> Result<Vec<u8>> {
        let (code_table, used) = table::deserialize(&self.code_table)?;
        if used != self.code_table.len() {
            return Err(SarchError::malformed(format!(
                "code table has {} trailing bytes",
                self.code_table.len() - used
            )));
        }
        let rle_encoded = huffman::decompress(&self.payload, &code_table, self.padding)?;
        rle::decode(&rle_encoded)
    }

    /// Size of this record on disk
    pub fn encoded_len(&self) -> usize {
        2 + self.name.len() + 4 + self.code_table.len() + 1 + 4 + self.payload.len()
    }

    /// Write the length-prefixed record
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let name_len = u16::try_from(self.name.len())
            .map_err(|_| SarchError::LimitExceeded("entry name longer than 65535 bytes".into()))?;
        let table_len = u32::try_from(self.code_table.len())
            .map_err(|_| SarchError::LimitExceeded("code table larger than 4 GiB".into()))?;
        let payload_len = u32::try_from(self.payload.len())
            .map_err(|_| SarchError::LimitExceeded("payload larger than 4 GiB".into()))?;

        writer.write_all(&name_len.to_le_bytes())?;
        writer.write_all(self.name.as_bytes())?;
        writer.write_all(&table_len.to_le_bytes())?;
        writer.write_all(&self.code_table)?;
        writer.write_all(&[self.padding])?;
        writer.write_all(&payload_len.to_le_bytes())?;
        writer.write_all(&self.payload)?;
        Ok(())
    }

    /// Read the name field of a record
    pub(crate) fn read_name<R: Read>(reader: &mut R) -> Result<String> {
        let name_len = u16::from_le_bytes(read_array(reader, "name length")?) as usize;
        let name = read_vec(reader, name_len, "name")?;
        String::from_utf8(name).map_err(|_| SarchError::malformed("entry name is not UTF-8"))
    }

    /// Read the fields following the name
    pub(crate) fn read_body<R: Read>(reader: &mut R, name: String) -> Result<Self> {
        let table_len = u32::from_le_bytes(read_array(reader, "code table length")?) as usize;
        let code_table = read_vec(reader, table_len, "code table")?;
        let [padding] = read_array(reader, "padding")?;
        if padding > 7 {
            return Err(SarchError::malformed(format!(
                "padding of {padding} bits is out of range"
            )));
        }
        let payload_len = u32::from_le_bytes(read_array(reader, "payload length")?) as usize;
        let payload = read_vec(reader, payload_len, "payload")?;

        Ok(Self {
            name,
            code_table,
            padding,
            payload,
        })
    }

    /// Read a complete record
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let name = Self::read_name(reader)?;
        Self::read_body(reader, name)
    }
}

/// Read a fixed-size field; end of input is `MalformedData`
pub(crate) fn read_array<R: Read, const N: usize>(reader: &mut R, field: &str) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf).map_err(|e| eof_as_malformed(e, field))?;
    Ok(buf)
}

/// Read a length-prefixed field without trusting the length for allocation
fn read_vec<R: Read>(reader: &mut R, len: usize, field: &str) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(len.min(64 * 1024));
    reader.by_ref().take(len as u64).read_to_end(&mut buf)?;
    if buf.len() < len {
        return Err(SarchError::malformed(format!(
            "{field} truncated: expected {len} bytes, found {}",
            buf.len()
        )));
    }
    Ok(buf)
}

fn eof_as_malformed(err: std::io::Error, field: &str) -> SarchError {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        SarchError::malformed(format!("archive truncated in {field}"))
    } else {
        SarchError::Io(err)
    }
}
