//! Bitstream encoding and decoding under a fixed code table
//!
//! Decoding rebuilds a binary trie from the table and walks it one bit at a
//! time, emitting a symbol whenever a leaf is reached. For a prefix-free table
//! this is the same as greedily matching the shortest code.

use super::bits::{BitReader, BitWriter};
use super::codes::CodeTable;
use crate::{Result, SarchError};

/// Replace each byte by its code and pack the bits MSB first
///
/// Returns the packed bytes and the number of zero bits (0-7) padding the
/// last byte.
///
/// # Errors
/// Returns `UnknownSymbol` if a byte of `data` has no code in `table`.
pub fn encode(data: &[u8], table: &CodeTable) -> Result<(Vec<u8>, u8)> {
    let mut writer = BitWriter::with_capacity(data.len() / 2);
    for &byte in data {
        let code = table.get(byte).ok_or(SarchError::UnknownSymbol(byte))?;
        writer.write_code(code);
    }
    Ok(writer.finish())
}

/// Decode a bitstream produced by [`encode`]
///
/// An empty `data` decodes to an empty buffer whatever the table.
///
/// # Errors
/// Returns `MalformedData` if the table is not prefix-free, `padding` is
/// invalid, a bit sequence matches no code, or the stream ends mid-code.
pub fn decode(data: &[u8], table: &CodeTable, padding: u8) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let trie = DecodeTrie::from_table(table)?;
    let mut reader = BitReader::new(data, padding)?;
    let mut decoded = Vec::with_capacity(data.len() * 2);
    let mut current = DecodeTrie::ROOT;

    while let Some(bit) = reader.read_bit() {
        let Some(next) = trie.child(current, bit) else {
            return Err(SarchError::malformed(format!(
                "bit sequence at bit {} matches no code",
                reader.position() - 1
            )));
        };
        match trie.nodes[next] {
            TrieNode::Leaf(symbol) => {
                decoded.push(symbol);
                current = DecodeTrie::ROOT;
            }
            TrieNode::Branch(_) => current = next,
        }
    }

    if current != DecodeTrie::ROOT {
        return Err(SarchError::malformed(
            "bitstream ends in the middle of a code",
        ));
    }

    Ok(decoded)
}

#[derive(Debug, Clone)]
enum TrieNode {
    Branch([Option<usize>; 2]),
    Leaf(u8),
}

/// Binary trie with one leaf per code, stored in an arena
#[derive(Debug, Clone)]
struct DecodeTrie {
    nodes: Vec<TrieNode>,
}

impl DecodeTrie {
    const ROOT: usize = 0;

    fn from_table(table: &CodeTable) -> Result<Self> {
        let mut nodes = vec![TrieNode::Branch([None, None])];

        for (symbol, code) in table.iter() {
            if code.is_empty() {
                return Err(SarchError::malformed(format!(
                    "symbol 0x{symbol:02X} has an empty code"
                )));
            }

            let mut current = Self::ROOT;
            let last = code.len() - 1;
            for (i, &bit) in code.bits().iter().enumerate() {
                let existing = match &nodes[current] {
                    TrieNode::Branch(children) => children[bit as usize],
                    TrieNode::Leaf(_) => return Err(Self::not_prefix_free(symbol)),
                };

                current = match existing {
                    Some(_) if i == last => return Err(Self::not_prefix_free(symbol)),
                    Some(next) => next,
                    None => {
                        let next = nodes.len();
                        nodes.push(if i == last {
                            TrieNode::Leaf(symbol)
                        } else {
                            TrieNode::Branch([None, None])
                        });
                        if let TrieNode::Branch(children) = &mut nodes[current] {
                            children[bit as usize] = Some(next);
                        }
                        next
                    }
                };
            }
        }

        Ok(Self { nodes })
    }

    fn not_prefix_free(symbol: u8) -> SarchError {
        SarchError::malformed(format!(
            "code table is not prefix-free at symbol 0x{symbol:02X}"
        ))
    }

    fn child(&self, node: usize, bit: bool) -> Option<usize> {
        match &self.nodes[node] {
            TrieNode::Branch(children) => children[bit as usize],
            TrieNode::Leaf(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::huffman::codes::{assign_codes, Code};
    use crate::huffman::tree::build_tree;

    fn table(entries: &[(u8, &str)]) -> CodeTable {
        entries
            .iter()
            .map(|&(s, c)| (s, c.parse::<Code>().unwrap()))
            .collect()
    }

    #[test]
    fn test_encode_known_table() {
        let t = table(&[(b'a', "1"), (b'b', "00"), (b'c', "01")]);
        let (bytes, padding) = encode(b"aaabc", &t).unwrap();
        // 1 1 1 00 01 is seven bits, one bit of padding
        assert_eq!(bytes, vec![0b1110_0010]);
        assert_eq!(padding, 1);
        assert_eq!(decode(&bytes, &t, padding).unwrap(), b"aaabc");
    }

    #[test]
    fn test_round_trip_built_table() {
        let data = b"mississippi river";
        let t = assign_codes(&build_tree(data).unwrap());
        let (bytes, padding) = encode(data, &t).unwrap();
        assert!(padding < 8);
        assert_eq!(decode(&bytes, &t, padding).unwrap(), data);
    }

    #[test]
    fn test_single_symbol() {
        let data = b"AAAAA";
        let t = assign_codes(&build_tree(data).unwrap());
        let (bytes, padding) = encode(data, &t).unwrap();
        assert_eq!(bytes, vec![0x00]);
        assert_eq!(padding, 3);
        assert_eq!(decode(&bytes, &t, padding).unwrap(), data);
    }

    #[test]
    fn test_empty_identity() {
        let (bytes, padding) = encode(&[], &CodeTable::new()).unwrap();
        assert!(bytes.is_empty());
        assert_eq!(padding, 0);

        let t = table(&[(1, "0")]);
        assert!(decode(&[], &t, 5).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_symbol() {
        let t = table(&[(b'a', "0")]);
        let err = encode(b"ab", &t).unwrap_err();
        assert!(matches!(err, SarchError::UnknownSymbol(b'b')));
    }

    #[test]
    fn test_stream_ends_mid_code() {
        let t = table(&[(b'a', "0"), (b'b', "10"), (b'c', "11")]);
        // 0 0 1 then padding drops the rest: "001" leaves a dangling "1"
        let err = decode(&[0b0010_0000], &t, 5).unwrap_err();
        assert!(matches!(err, SarchError::MalformedData(_)));
    }

    #[test]
    fn test_unmatched_bits() {
        let t = table(&[(b'a', "0")]);
        let err = decode(&[0b1000_0000], &t, 7).unwrap_err();
        assert!(matches!(err, SarchError::MalformedData(_)));

        let err = decode(&[0x00], &CodeTable::new(), 0).unwrap_err();
        assert!(matches!(err, SarchError::MalformedData(_)));
    }

    #[test]
    fn test_rejects_non_prefix_free_table() {
        let t = table(&[(b'a', "0"), (b'b', "01")]);
        assert!(decode(&[0x00], &t, 0).is_err());

        let t = table(&[(b'a', "01"), (b'b', "0")]);
        assert!(decode(&[0x00], &t, 0).is_err());

        let t = table(&[(b'a', "1"), (b'b', "1")]);
        assert!(decode(&[0x00], &t, 0).is_err());
    }

    #[test]
    fn test_bad_padding() {
        let t = table(&[(b'a', "0")]);
        assert!(decode(&[0x00], &t, 8).is_err());
    }
}
