//! Run-length encoding stage
//!
//! The first compression stage. Each maximal run of one byte value is written
//! as a `(count, value)` pair with `count` in `1..=255`; longer runs are split.

use crate::common::MAX_RUN_LENGTH;
use crate::{Result, SarchError};

/// Run-length encode `data` into `(count, value)` pairs
pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(data.len().min(1024) * 2);
    let mut pos = 0;

    while pos < data.len() {
        let value = data[pos];
        let run = data[pos..]
            .iter()
            .take(MAX_RUN_LENGTH)
            .take_while(|&&b| b == value)
            .count();

        encoded.push(run as u8);
        encoded.push(value);
        pos += run;
    }

    encoded
}

/// Expand `(count, value)` pairs back into the original bytes
///
/// # Errors
/// Returns `MalformedData` for a dangling trailing byte or a zero count.
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() % 2 != 0 {
        return Err(SarchError::malformed(format!(
            "RLE stream has odd length {}",
            data.len()
        )));
    }

    let mut decoded = Vec::with_capacity(data.len() * 4);
    for (pair_index, pair) in data.chunks_exact(2).enumerate() {
        let (count, value) = (pair[0], pair[1]);
        if count == 0 {
            return Err(SarchError::malformed(format!(
                "RLE pair {pair_index} has zero run length"
            )));
        }
        decoded.resize(decoded.len() + count as usize, value);
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert!(encode(&[]).is_empty());
        assert!(decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_runs() {
        let encoded = encode(b"AAABBBBBCC");
        assert_eq!(encoded, vec![3, 65, 5, 66, 2, 67]);
        assert_eq!(decode(&encoded).unwrap(), b"AAABBBBBCC");
    }

    #[test]
    fn test_long_run_is_split() {
        let data = vec![0x7Fu8; 600];
        let encoded = encode(&data);
        assert_eq!(encoded, vec![255, 0x7F, 255, 0x7F, 90, 0x7F]);
        assert_eq!(decode(&encoded).unwrap(), data);
    }

    #[test]
    fn test_exact_cap() {
        let data = vec![1u8; 255];
        assert_eq!(encode(&data), vec![255, 1]);

        let data = vec![1u8; 256];
        assert_eq!(encode(&data), vec![255, 1, 1, 1]);
    }

    #[test]
    fn test_no_runs() {
        let data: Vec<u8> = (0..=255).collect();
        let encoded = encode(&data);
        assert_eq!(encoded.len(), 512);
        assert!(encoded.chunks(2).all(|p| p[0] == 1));
        assert_eq!(decode(&encoded).unwrap(), data);
    }

    #[test]
    fn test_dangling_byte_rejected() {
        let err = decode(&[3, 65, 2]).unwrap_err();
        assert!(matches!(err, SarchError::MalformedData(_)));
    }

    #[test]
    fn test_zero_count_rejected() {
        let err = decode(&[3, 65, 0, 66]).unwrap_err();
        assert!(matches!(err, SarchError::MalformedData(_)));
    }
}
