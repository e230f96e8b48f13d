//! Variable-length integer encoding (ULEB128 / ZigZag)
//!
//! Encoders append to a caller-owned buffer; decoders read from a slice and
//! report how many bytes they consumed so callers can advance a cursor.

use smallvec::SmallVec;

use crate::error::{PackError, Result};

/// Longest ULEB128 encoding of a u64.
pub const MAX_ULEB128_LEN: usize = 10;

/// Encode a u64 as ULEB128
pub fn encode_uleb128(val: u64) -> SmallVec<[u8; MAX_ULEB128_LEN]> {
    let mut out = SmallVec::new();
    let mut rest = val;

    while rest >= 0x80 {
        out.push((rest & 0x7F) as u8 | 0x80);
        rest >>= 7;
    }
    out.push(rest as u8);

    out
}

/// Append the ULEB128 encoding of `val` to `buf`
pub fn write_uleb128(buf: &mut Vec<u8>, val: u64) {
    buf.extend_from_slice(&encode_uleb128(val));
}

/// Append the ZigZag + ULEB128 encoding of `val` to `buf`
pub fn write_zigzag_i64(buf: &mut Vec<u8>, val: i64) {
    write_uleb128(buf, zigzag_encode(val));
}

/// Decode ULEB128 from the front of `bytes`, returning the value and its width
pub fn decode_uleb128(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut value = 0u64;

    for (i, &byte) in bytes.iter().enumerate() {
        if i >= MAX_ULEB128_LEN {
            return Err(PackError::LimitExceeded("ULEB128 too long".to_string()));
        }

        let bits = (byte & 0x7F) as u64;
        let shift = 7 * i as u32;
        // The tenth byte may only carry the top bit of a u64.
        if i == MAX_ULEB128_LEN - 1 && bits > 1 {
            return Err(PackError::CorruptPayload(
                "ULEB128 overflows u64".to_string(),
            ));
        }
        value |= bits << shift;

        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(PackError::UnexpectedEof)
}

/// Decode a ZigZag + ULEB128 signed integer from the front of `bytes`
pub fn decode_zigzag_i64(bytes: &[u8]) -> Result<(i64, usize)> {
    let (raw, width) = decode_uleb128(bytes)?;
    Ok((zigzag_decode(raw), width))
}

/// ZigZag encode a signed integer
pub fn zigzag_encode(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

/// ZigZag decode to signed integer
pub fn zigzag_decode(u: u64) -> i64 {
    ((u >> 1) as i64) ^ -((u & 1) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_uleb128_known_encodings() {
        assert_eq!(encode_uleb128(0).as_slice(), &[0x00]);
        assert_eq!(encode_uleb128(127).as_slice(), &[0x7F]);
        assert_eq!(encode_uleb128(128).as_slice(), &[0x80, 0x01]);
        assert_eq!(encode_uleb128(300).as_slice(), &[0xAC, 0x02]);
        assert_eq!(encode_uleb128(u64::MAX).len(), MAX_ULEB128_LEN);
    }

    #[test]
    fn test_write_uleb128_appends() {
        let mut buf = vec![0xFF];
        write_uleb128(&mut buf, 300);
        assert_eq!(buf, vec![0xFF, 0xAC, 0x02]);
    }

    proptest! {
        #[test]
        fn prop_uleb128_roundtrip(value in any::<u64>()) {
            let encoded = encode_uleb128(value);
            let (decoded, consumed) = decode_uleb128(&encoded).unwrap();
            prop_assert_eq!(decoded, value);
            prop_assert_eq!(consumed, encoded.len());
        }

        #[test]
        fn prop_zigzag_i64_roundtrip(value in any::<i64>()) {
            let mut buf = Vec::new();
            write_zigzag_i64(&mut buf, value);
            let (decoded, consumed) = decode_zigzag_i64(&buf).unwrap();
            prop_assert_eq!(decoded, value);
            prop_assert_eq!(consumed, buf.len());
        }
    }

    #[test]
    fn test_uleb128_decode_truncated() {
        let encoded = encode_uleb128(1000);
        let truncated = &encoded[..encoded.len() - 1];
        assert!(matches!(
            decode_uleb128(truncated),
            Err(PackError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_uleb128_decode_too_long() {
        let mut long_bytes = vec![0x80; 11];
        long_bytes.push(0x00);
        assert!(matches!(
            decode_uleb128(&long_bytes),
            Err(PackError::LimitExceeded(_))
        ));
    }

    #[test]
    fn test_uleb128_decode_overflow() {
        let mut bytes = vec![0xFF; 9];
        bytes.push(0x02);
        assert!(matches!(
            decode_uleb128(&bytes),
            Err(PackError::CorruptPayload(_))
        ));
    }

    #[test]
    fn test_zigzag_encoding_values() {
        assert_eq!(zigzag_encode(0), 0);
        assert_eq!(zigzag_encode(-1), 1);
        assert_eq!(zigzag_encode(1), 2);
        assert_eq!(zigzag_encode(-2), 3);
        assert_eq!(zigzag_decode(zigzag_encode(i64::MIN)), i64::MIN);
    }
}
