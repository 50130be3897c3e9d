//! Single-byte encodings where one byte is exactly one codepoint.
//!
//! ASCII covers `0x00..=0x7F`; ISO-8859-1 covers `0x00..=0xFF` and maps each
//! byte to the codepoint with the same value, so neither needs a table.

use crate::{Codec, CodepointSequence, EncodingFormat, Error, ErrorKind, Result};

/// Decode bytes whose value equals their codepoint, rejecting bytes above `max`
fn decode_identity(bytes: &[u8], max: u8, kind: ErrorKind, name: &str) -> Result<CodepointSequence> {
    bytes
        .iter()
        .enumerate()
        .map(|(pos, &byte)| {
            if byte <= max {
                Ok(char::from(byte))
            } else {
                Err(Error::new(
                    kind,
                    pos,
                    format!("byte 0x{byte:02X} is not valid {name}"),
                ))
            }
        })
        .collect()
}

/// Encode codepoints whose value fits in `max` as one byte each
fn encode_identity(codepoints: &CodepointSequence, max: u8, name: &str) -> Result<Vec<u8>> {
    codepoints
        .scalars()
        .enumerate()
        .map(|(index, cp)| {
            u8::try_from(cp)
                .ok()
                .filter(|&byte| byte <= max)
                .ok_or_else(|| {
                    Error::new(
                        ErrorKind::CodepointOutOfRange,
                        index,
                        format!("U+{cp:04X} cannot be encoded as {name}"),
                    )
                })
        })
        .collect()
}

/// US-ASCII (7-bit) codec
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AsciiCodec;

impl Codec for AsciiCodec {
    fn format(&self) -> EncodingFormat {
        EncodingFormat::Ascii
    }

    fn decode(&self, bytes: &[u8]) -> Result<CodepointSequence> {
        decode_identity(bytes, 0x7F, ErrorKind::NonAsciiByte, "ASCII")
    }

    fn encode(&self, codepoints: &CodepointSequence) -> Result<Vec<u8>> {
        encode_identity(codepoints, 0x7F, "ASCII")
    }
}

/// ISO-8859-1 (Latin-1) codec
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latin1Codec;

impl Codec for Latin1Codec {
    fn format(&self) -> EncodingFormat {
        EncodingFormat::Iso8859_1
    }

    fn decode(&self, bytes: &[u8]) -> Result<CodepointSequence> {
        Ok(bytes.iter().map(|&byte| char::from(byte)).collect())
    }

    fn encode(&self, codepoints: &CodepointSequence) -> Result<Vec<u8>> {
        encode_identity(codepoints, 0xFF, "ISO-8859-1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_boundary() {
        let ok = CodepointSequence::from_scalars(&[0x7F]).unwrap();
        assert_eq!(AsciiCodec.encode(&ok).unwrap(), vec![0x7F]);

        let too_high = CodepointSequence::from_scalars(&[0x41, 0x80]).unwrap();
        let err = AsciiCodec.encode(&too_high).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CodepointOutOfRange);
        assert_eq!(err.position, 1);
    }

    #[test]
    fn test_ascii_decode_rejects_high_bytes() {
        assert_eq!(AsciiCodec.decode(b"Hello").unwrap().to_string(), "Hello");

        let err = AsciiCodec.decode(&[b'o', b'k', 0xE9]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NonAsciiByte);
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_latin1_full_byte_range() {
        let all: Vec<u8> = (0..=255).collect();
        let seq = Latin1Codec.decode(&all).unwrap();
        assert_eq!(seq.len(), 256);
        assert_eq!(seq.scalars().collect::<Vec<_>>(), (0..=255).collect::<Vec<u32>>());
        assert_eq!(Latin1Codec.encode(&seq).unwrap(), all);
    }

    #[test]
    fn test_latin1_rejects_beyond_ff() {
        let seq = CodepointSequence::from("caf\u{E9} \u{20AC}");
        let err = Latin1Codec.encode(&seq).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CodepointOutOfRange);
        assert_eq!(err.position, 5);
    }
}
