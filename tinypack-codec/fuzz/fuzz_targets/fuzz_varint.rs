#![no_main]

use libfuzzer_sys::fuzz_target;
use tinypack_format::varint::{
    decode_uleb128, decode_zigzag_i64, encode_uleb128, write_uleb128, write_zigzag_i64,
};

fuzz_target!(|data: &[u8]| {
    // Whatever decodes must re-encode to its shortest form and decode again.
    if let Ok((value, width)) = decode_uleb128(data) {
        let mut buf = Vec::new();
        write_uleb128(&mut buf, value);
        assert!(buf.len() <= width);
        assert_eq!(decode_uleb128(&buf).ok(), Some((value, buf.len())));
    }
    if let Ok((value, width)) = decode_zigzag_i64(data) {
        let mut buf = Vec::new();
        write_zigzag_i64(&mut buf, value);
        assert!(buf.len() <= width);
        assert_eq!(decode_zigzag_i64(&buf).ok(), Some((value, buf.len())));
    }

    // Integers taken straight from the input round-trip through both writers.
    for chunk in data.chunks_exact(8) {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(chunk);

        let unsigned = u64::from_le_bytes(raw);
        let encoded = encode_uleb128(unsigned);
        assert_eq!(decode_uleb128(&encoded).ok(), Some((unsigned, encoded.len())));

        let signed = i64::from_le_bytes(raw);
        let mut buf = Vec::new();
        write_zigzag_i64(&mut buf, signed);
        buf.push(0xFF);
        assert_eq!(decode_zigzag_i64(&buf).ok(), Some((signed, buf.len() - 1)));
    }
});
