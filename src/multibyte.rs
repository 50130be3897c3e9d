//! Multi-byte encoding support for UTF-8 and UTF-16
//!
//! Both codecs are hand-rolled so that every malformed input maps to a
//! distinct [`ErrorKind`] with the byte offset of the fault, instead of the
//! single opaque error the standard library conversions report.

use serde::{Deserialize, Serialize};

use crate::{Codec, CodepointSequence, EncodingFormat, Error, ErrorKind, Result};

const HIGH_SURROGATES: std::ops::RangeInclusive<u32> = 0xD800..=0xDBFF;
const LOW_SURROGATES: std::ops::RangeInclusive<u32> = 0xDC00..=0xDFFF;

/// Split a supplementary-plane codepoint (`> 0xFFFF`) into its UTF-16
/// high and low surrogates.
pub fn surrogate_pair(codepoint: u32) -> (u16, u16) {
    let offset = codepoint - 0x10000;
    let high = 0xD800 + (offset >> 10);
    let low = 0xDC00 + (offset & 0x3FF);
    (high as u16, low as u16)
}

/// Combine a high and low surrogate into the codepoint they encode
pub fn combine_surrogates(high: u16, low: u16) -> u32 {
    0x10000 + (u32::from(high) - 0xD800) * 0x400 + (u32::from(low) - 0xDC00)
}

/// Whether `unit` is a UTF-16 high (leading) surrogate
pub fn is_high_surrogate(unit: u16) -> bool {
    HIGH_SURROGATES.contains(&u32::from(unit))
}

/// Whether `unit` is a UTF-16 low (trailing) surrogate
pub fn is_low_surrogate(unit: u16) -> bool {
    LOW_SURROGATES.contains(&u32::from(unit))
}

/// UTF-8 codec
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf8Codec;

impl Utf8Codec {
    /// Smallest value that legitimately needs a sequence of `len` bytes
    fn min_value(len: usize) -> u32 {
        match len {
            2 => 0x80,
            3 => 0x800,
            _ => 0x10000,
        }
    }
}

impl Codec for Utf8Codec {
    fn format(&self) -> EncodingFormat {
        EncodingFormat::Utf8
    }

    fn decode(&self, bytes: &[u8]) -> Result<CodepointSequence> {
        let mut chars = Vec::with_capacity(bytes.len());
        let mut pos = 0;

        while pos < bytes.len() {
            let lead = bytes[pos];
            let (len, mut value) = match lead {
                0x00..=0x7F => {
                    chars.push(char::from(lead));
                    pos += 1;
                    continue;
                }
                0xC0..=0xDF => (2, u32::from(lead & 0x1F)),
                0xE0..=0xEF => (3, u32::from(lead & 0x0F)),
                0xF0..=0xF7 => (4, u32::from(lead & 0x07)),
                _ => {
                    return Err(Error::new(
                        ErrorKind::InvalidLeadByte,
                        pos,
                        format!("byte 0x{lead:02X} cannot start a UTF-8 sequence"),
                    ));
                }
            };

            for i in 1..len {
                let Some(&byte) = bytes.get(pos + i) else {
                    return Err(Error::new(
                        ErrorKind::TruncatedSequence,
                        pos,
                        format!(
                            "{len}-byte sequence has only {} byte(s) before end of input",
                            bytes.len() - pos
                        ),
                    ));
                };
                if byte & 0xC0 != 0x80 {
                    return Err(Error::new(
                        ErrorKind::InvalidContinuationByte,
                        pos + i,
                        format!("byte 0x{byte:02X} is not a continuation byte"),
                    ));
                }
                value = (value << 6) | u32::from(byte & 0x3F);
            }

            if value < Self::min_value(len) {
                return Err(Error::new(
                    ErrorKind::OverlongEncoding,
                    pos,
                    format!("U+{value:04X} encoded in {len} bytes"),
                ));
            }
            if (0xD800..=0xDFFF).contains(&value) {
                return Err(Error::new(
                    ErrorKind::SurrogateInUtf8,
                    pos,
                    format!("surrogate 0x{value:04X} encoded as UTF-8"),
                ));
            }
            let ch = char::from_u32(value).ok_or_else(|| {
                Error::new(
                    ErrorKind::CodepointOutOfRange,
                    pos,
                    format!("value 0x{value:X} exceeds U+10FFFF"),
                )
            })?;

            chars.push(ch);
            pos += len;
        }

        Ok(CodepointSequence::from(chars))
    }

    fn encode(&self, codepoints: &CodepointSequence) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(codepoints.len());

        for cp in codepoints.scalars() {
            match cp {
                0x00..=0x7F => output.push(cp as u8),
                0x80..=0x7FF => output.extend_from_slice(&[
                    0xC0 | (cp >> 6) as u8,
                    0x80 | (cp & 0x3F) as u8,
                ]),
                0x800..=0xFFFF => output.extend_from_slice(&[
                    0xE0 | (cp >> 12) as u8,
                    0x80 | ((cp >> 6) & 0x3F) as u8,
                    0x80 | (cp & 0x3F) as u8,
                ]),
                _ => output.extend_from_slice(&[
                    0xF0 | (cp >> 18) as u8,
                    0x80 | ((cp >> 12) & 0x3F) as u8,
                    0x80 | ((cp >> 6) & 0x3F) as u8,
                    0x80 | (cp & 0x3F) as u8,
                ]),
            }
        }

        Ok(output)
    }
}

/// Byte order of UTF-16 code units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ByteOrder {
    /// Least significant byte first
    #[default]
    LittleEndian,
    /// Most significant byte first
    BigEndian,
}

impl ByteOrder {
    fn read(self, pair: [u8; 2]) -> u16 {
        match self {
            ByteOrder::LittleEndian => u16::from_le_bytes(pair),
            ByteOrder::BigEndian => u16::from_be_bytes(pair),
        }
    }

    fn write(self, unit: u16) -> [u8; 2] {
        match self {
            ByteOrder::LittleEndian => unit.to_le_bytes(),
            ByteOrder::BigEndian => unit.to_be_bytes(),
        }
    }
}

/// UTF-16 codec without byte order mark
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf16Codec {
    byte_order: ByteOrder,
}

impl Utf16Codec {
    /// Create a codec for the given byte order
    pub fn new(byte_order: ByteOrder) -> Self {
        Self { byte_order }
    }

    /// Configured byte order
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }
}

impl Codec for Utf16Codec {
    fn format(&self) -> EncodingFormat {
        EncodingFormat::Utf16
    }

    fn decode(&self, bytes: &[u8]) -> Result<CodepointSequence> {
        if bytes.len() % 2 != 0 {
            return Err(Error::new(
                ErrorKind::OddByteLength,
                bytes.len() - 1,
                format!("UTF-16 data has odd length {}", bytes.len()),
            ));
        }

        let mut units = bytes
            .chunks_exact(2)
            .map(|pair| self.byte_order.read([pair[0], pair[1]]))
            .enumerate()
            .peekable();
        let mut chars = Vec::with_capacity(bytes.len() / 2);

        while let Some((index, unit)) = units.next() {
            let offset = index * 2;
            let value = if is_high_surrogate(unit) {
                match units.next_if(|&(_, next)| is_low_surrogate(next)) {
                    Some((_, low)) => combine_surrogates(unit, low),
                    None => {
                        return Err(Error::new(
                            ErrorKind::LoneHighSurrogate,
                            offset,
                            format!("high surrogate 0x{unit:04X} not followed by a low surrogate"),
                        ));
                    }
                }
            } else if is_low_surrogate(unit) {
                return Err(Error::new(
                    ErrorKind::LoneLowSurrogate,
                    offset,
                    format!("low surrogate 0x{unit:04X} without a preceding high surrogate"),
                ));
            } else {
                u32::from(unit)
            };

            let ch = char::from_u32(value).ok_or_else(|| {
                Error::new(
                    ErrorKind::CodepointOutOfRange,
                    offset,
                    format!("value 0x{value:X} is not a scalar value"),
                )
            })?;
            chars.push(ch);
        }

        Ok(CodepointSequence::from(chars))
    }

    fn encode(&self, codepoints: &CodepointSequence) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(codepoints.len() * 2);

        for cp in codepoints.scalars() {
            if cp <= 0xFFFF {
                output.extend_from_slice(&self.byte_order.write(cp as u16));
            } else {
                let (high, low) = surrogate_pair(cp);
                output.extend_from_slice(&self.byte_order.write(high));
                output.extend_from_slice(&self.byte_order.write(low));
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_err(bytes: &[u8]) -> Error {
        Utf8Codec.decode(bytes).unwrap_err()
    }

    #[test]
    fn test_utf8_encode_widths() {
        let seq = CodepointSequence::from("A\u{E9}\u{20AC}\u{1F600}");
        let bytes = Utf8Codec.encode(&seq).unwrap();
        assert_eq!(bytes, "A\u{E9}\u{20AC}\u{1F600}".as_bytes());
        assert_eq!(bytes.len(), 1 + 2 + 3 + 4);
    }

    #[test]
    fn test_utf8_decode_matches_std() {
        let text = "Hello 世界! 🌍";
        let seq = Utf8Codec.decode(text.as_bytes()).unwrap();
        assert_eq!(seq.to_string(), text);
    }

    #[test]
    fn test_utf8_rejects_overlong_nul() {
        let err = decode_err(&[0xC0, 0x80]);
        assert_eq!(err.kind, ErrorKind::OverlongEncoding);
        assert_eq!(err.position, 0);
    }

    #[test]
    fn test_utf8_rejects_overlong_three_byte() {
        // U+007F padded into three bytes
        let err = decode_err(&[b'a', 0xE0, 0x81, 0xBF]);
        assert_eq!(err.kind, ErrorKind::OverlongEncoding);
        assert_eq!(err.position, 1);
    }

    #[test]
    fn test_utf8_invalid_lead_bytes() {
        assert_eq!(decode_err(&[0x80]).kind, ErrorKind::InvalidLeadByte);
        let err = decode_err(&[b'x', 0xFF]);
        assert_eq!(err.kind, ErrorKind::InvalidLeadByte);
        assert_eq!(err.position, 1);
    }

    #[test]
    fn test_utf8_truncated_sequence() {
        let err = decode_err(&[b'a', b'b', 0xE2, 0x82]);
        assert_eq!(err.kind, ErrorKind::TruncatedSequence);
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_utf8_invalid_continuation_points_at_bad_byte() {
        let err = decode_err(&[0xE2, 0x82, 0x41]);
        assert_eq!(err.kind, ErrorKind::InvalidContinuationByte);
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_utf8_rejects_encoded_surrogate() {
        let err = decode_err(&[0xED, 0xA0, 0x80]);
        assert_eq!(err.kind, ErrorKind::SurrogateInUtf8);
    }

    #[test]
    fn test_utf8_rejects_above_max() {
        // 0x110000
        let err = decode_err(&[0xF4, 0x90, 0x80, 0x80]);
        assert_eq!(err.kind, ErrorKind::CodepointOutOfRange);
        assert_eq!(err.position, 0);
    }

    #[test]
    fn test_surrogate_pair_math() {
        assert_eq!(surrogate_pair(0x1F600), (0xD83D, 0xDE00));
        assert_eq!(combine_surrogates(0xD83D, 0xDE00), 0x1F600);
        assert_eq!(surrogate_pair(0x10000), (0xD800, 0xDC00));
        assert_eq!(surrogate_pair(0x10FFFF), (0xDBFF, 0xDFFF));
    }

    #[test]
    fn test_utf16_little_endian_default() {
        let codec = Utf16Codec::default();
        assert_eq!(codec.byte_order(), ByteOrder::LittleEndian);

        let bytes = codec.encode(&CodepointSequence::from("Hi")).unwrap();
        assert_eq!(bytes, vec![0x48, 0x00, 0x69, 0x00]);
    }

    #[test]
    fn test_utf16_big_endian_surrogate_pair() {
        let codec = Utf16Codec::new(ByteOrder::BigEndian);
        let seq = CodepointSequence::from("\u{1F600}");
        let bytes = codec.encode(&seq).unwrap();
        assert_eq!(bytes, vec![0xD8, 0x3D, 0xDE, 0x00]);
        assert_eq!(codec.decode(&bytes).unwrap(), seq);
    }

    #[test]
    fn test_utf16_lone_high_surrogate() {
        let err = Utf16Codec::default().decode(&[0x00, 0xD8]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::LoneHighSurrogate);
        assert_eq!(err.position, 0);

        // High surrogate followed by a regular unit
        let err = Utf16Codec::default()
            .decode(&[0x41, 0x00, 0x00, 0xD8, 0x41, 0x00])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::LoneHighSurrogate);
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_utf16_lone_low_surrogate() {
        let err = Utf16Codec::default().decode(&[0x41, 0x00, 0x00, 0xDC]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::LoneLowSurrogate);
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_utf16_odd_length() {
        let err = Utf16Codec::default().decode(&[0x41, 0x00, 0x42]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::OddByteLength);
        assert_eq!(err.position, 2);
    }
}
