//! RLP encoding and decoding of transaction field lists.
//!
//! MOAC transactions are a single flat RLP list of byte strings. No nesting,
//! no typed envelope. That makes the codec small, but every rule matters:
//!
//! - integers are minimal big-endian, zero is the empty string;
//! - addresses are their 20 raw bytes, or empty when absent;
//! - payloads are used verbatim;
//! - the list header carries the total payload length.
//!
//! Decoding is the exact inverse for one level of nesting. It is strict
//! (canonical headers, no trailing bytes) because its output is re-encoded
//! and signed.

use alloy_primitives::{Address, Bytes, U256};
use alloy_rlp::{Decodable, Encodable, Header};

use crate::error::KeyringError;

/// Encodes `fields` as one RLP list of byte strings.
pub fn encode_fields(fields: &[Bytes]) -> Vec<u8> {
    let payload_length: usize = fields.iter().map(Encodable::length).sum();
    let mut out = Vec::with_capacity(payload_length + 9);
    Header {
        list: true,
        payload_length,
    }
    .encode(&mut out);
    for field in fields {
        field.encode(&mut out);
    }
    out
}

/// Decodes a single-level RLP list back into its byte-string items.
///
/// Empty input decodes to an empty list. A byte-string at the top level, a
/// nested list, trailing bytes or a truncated payload are all rejected.
pub fn decode_fields(encoded: &[u8]) -> Result<Vec<Bytes>, KeyringError> {
    if encoded.is_empty() {
        return Ok(Vec::new());
    }

    let mut buf = encoded;
    let header = Header::decode(&mut buf)?;
    if !header.list {
        return Err(KeyringError::Codec(
            "expected an RLP list, found a byte string".to_string(),
        ));
    }
    if buf.len() < header.payload_length {
        return Err(KeyringError::Codec(format!(
            "list payload truncated: header says {} bytes, {} available",
            header.payload_length,
            buf.len()
        )));
    }
    if buf.len() > header.payload_length {
        return Err(KeyringError::Codec(format!(
            "{} trailing bytes after the list",
            buf.len() - header.payload_length
        )));
    }

    let mut fields = Vec::new();
    while !buf.is_empty() {
        fields.push(Bytes::decode(&mut buf)?);
    }
    Ok(fields)
}

/// Decodes and keeps only the first `count` items.
pub fn decode_fields_truncated(encoded: &[u8], count: usize) -> Result<Vec<Bytes>, KeyringError> {
    let mut fields = decode_fields(encoded)?;
    fields.truncate(count);
    Ok(fields)
}

/// Minimal big-endian bytes of `value`; zero is empty.
pub fn encode_quantity(value: U256) -> Bytes {
    Bytes::from(value.to_be_bytes_trimmed_vec())
}

/// Inverse of [`encode_quantity`]. Rejects leading zero bytes and values
/// wider than 256 bits.
pub fn decode_quantity(bytes: &[u8]) -> Result<U256, KeyringError> {
    if bytes.len() > 32 {
        return Err(KeyringError::Codec(format!(
            "integer field is {} bytes, at most 32 allowed",
            bytes.len()
        )));
    }
    if bytes.first() == Some(&0) {
        return Err(KeyringError::Codec(
            "integer field has a leading zero byte".to_string(),
        ));
    }
    Ok(U256::from_be_slice(bytes))
}

/// The 20 address bytes, or empty for `None`.
pub fn encode_address(address: Option<Address>) -> Bytes {
    match address {
        Some(address) => Bytes::copy_from_slice(address.as_slice()),
        None => Bytes::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn b(bytes: &[u8]) -> Bytes {
        Bytes::copy_from_slice(bytes)
    }

    #[test]
    fn empty_list() {
        assert_eq!(encode_fields(&[]), vec![0xc0]);
        assert!(decode_fields(&[0xc0]).unwrap().is_empty());
    }

    #[test]
    fn empty_input_decodes_to_nothing() {
        assert!(decode_fields(&[]).unwrap().is_empty());
    }

    #[test]
    fn short_strings_and_single_bytes() {
        // ["", 0x00, 0x7f, 0x80, "dog"]
        let fields = vec![b(&[]), b(&[0x00]), b(&[0x7f]), b(&[0x80]), b(b"dog")];
        let encoded = encode_fields(&fields);
        assert_eq!(
            encoded,
            vec![0xc9, 0x80, 0x00, 0x7f, 0x81, 0x80, 0x83, b'd', b'o', b'g']
        );
        assert_eq!(decode_fields(&encoded).unwrap(), fields);
    }

    #[test]
    fn long_list_uses_extended_header() {
        let fields = vec![b(&[0xaa; 60])];
        let encoded = encode_fields(&fields);
        // 62-byte payload: 0xb8 0x3c + 60 bytes inside a 0xf8 0x3e list.
        assert_eq!(&encoded[..4], &[0xf8, 0x3e, 0xb8, 0x3c]);
        assert_eq!(decode_fields(&encoded).unwrap(), fields);
    }

    #[test]
    fn round_trip_preserves_fields() {
        let fields = vec![
            encode_quantity(U256::from(0x6c)),
            encode_quantity(U256::ZERO),
            encode_quantity(U256::from(200_000_000u64)),
            b(&[0xd8; 20]),
            b(&[0x00]),
            b(&[0x11; 100]),
        ];
        assert_eq!(decode_fields(&encode_fields(&fields)).unwrap(), fields);
    }

    #[test]
    fn truncated_decode_keeps_prefix() {
        let fields = vec![b(&[1]), b(&[2]), b(&[3])];
        let encoded = encode_fields(&fields);
        assert_eq!(
            decode_fields_truncated(&encoded, 2).unwrap(),
            vec![b(&[1]), b(&[2])]
        );
        assert_eq!(decode_fields_truncated(&encoded, 9).unwrap(), fields);
    }

    #[test]
    fn rejects_top_level_string() {
        assert!(matches!(
            decode_fields(&[0x83, b'd', b'o', b'g']),
            Err(KeyringError::Codec(_))
        ));
    }

    #[test]
    fn rejects_nested_list() {
        assert!(matches!(
            decode_fields(&[0xc2, 0xc1, 0x01]),
            Err(KeyringError::Codec(_))
        ));
    }

    #[test]
    fn rejects_trailing_bytes() {
        assert!(matches!(
            decode_fields(&[0xc1, 0x01, 0x02]),
            Err(KeyringError::Codec(_))
        ));
    }

    #[test]
    fn rejects_truncated_payload() {
        assert!(matches!(
            decode_fields(&[0xc3, 0x01]),
            Err(KeyringError::Codec(_))
        ));
    }

    #[test]
    fn quantities_are_minimal() {
        assert!(encode_quantity(U256::ZERO).is_empty());
        assert_eq!(encode_quantity(U256::from(1)), b(&[0x01]));
        assert_eq!(encode_quantity(U256::from(0x0100)), b(&[0x01, 0x00]));
        assert_eq!(
            encode_quantity(U256::from(0x0bebc200u64)),
            b(&[0x0b, 0xeb, 0xc2, 0x00])
        );
    }

    #[test]
    fn quantity_decode_is_strict() {
        assert_eq!(decode_quantity(&[]).unwrap(), U256::ZERO);
        assert_eq!(decode_quantity(&[0x01, 0x00]).unwrap(), U256::from(256));
        assert!(decode_quantity(&[0x00, 0x01]).is_err());
        assert!(decode_quantity(&[0x01; 33]).is_err());
    }

    #[test]
    fn address_encoding() {
        assert!(encode_address(None).is_empty());
        let address = Address::repeat_byte(0xab);
        assert_eq!(encode_address(Some(address)).len(), 20);
    }
}
