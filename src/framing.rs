//! Human-readable framings of raw bytes.
//!
//! Rendering conventions:
//!
//! - Hex: two lowercase digits per byte, no separator (`"AB"` -> `"4142"`).
//!   Parsing ignores whitespace and accepts either digit case.
//! - Binary: eight `0`/`1` digits per byte, groups joined by a single space
//!   (`"AB"` -> `"01000001 01000010"`). Parsing splits on any whitespace.
//!
//! Error positions are character offsets into the original input string.

use std::fmt::Write;

use crate::{ByteFormatter, EncodingFormat, Error, ErrorKind, Result};

/// Hexadecimal framing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HexFormatter;

impl ByteFormatter for HexFormatter {
    fn format(&self) -> EncodingFormat {
        EncodingFormat::Hex
    }

    fn render(&self, bytes: &[u8]) -> String {
        hex::encode(bytes)
    }

    fn parse_located(&self, text: &str) -> Result<Vec<(usize, u8)>> {
        let mut digits = Vec::with_capacity(text.len());
        for (pos, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let value = ch.to_digit(16).ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidHexDigit,
                    pos,
                    format!("{ch:?} is not a hexadecimal digit"),
                )
            })?;
            digits.push((pos, value as u8));
        }

        let pairs = digits.chunks_exact(2);
        if let [(pos, _)] = pairs.remainder() {
            return Err(Error::new(
                ErrorKind::OddHexLength,
                *pos,
                format!("{} hex digits cannot form whole bytes", digits.len()),
            ));
        }

        Ok(pairs
            .map(|pair| (pair[0].0, (pair[0].1 << 4) | pair[1].1))
            .collect())
    }
}

/// Bit-string framing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinaryFormatter;

impl BinaryFormatter {
    fn parse_token(token: &str, start: usize) -> Result<u8> {
        let invalid = || {
            Error::new(
                ErrorKind::InvalidBinaryToken,
                start,
                format!("{token:?} is not exactly eight binary digits"),
            )
        };
        if token.len() != 8 || !token.bytes().all(|b| b == b'0' || b == b'1') {
            return Err(invalid());
        }
        u8::from_str_radix(token, 2).map_err(|_| invalid())
    }
}

impl ByteFormatter for BinaryFormatter {
    fn format(&self) -> EncodingFormat {
        EncodingFormat::Binary
    }

    fn render(&self, bytes: &[u8]) -> String {
        let mut out = String::with_capacity(bytes.len() * 9);
        for (i, byte) in bytes.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            // Writing to a String cannot fail
            let _ = write!(out, "{byte:08b}");
        }
        out
    }

    fn parse_located(&self, text: &str) -> Result<Vec<(usize, u8)>> {
        let mut bytes = Vec::new();
        let mut token = String::new();
        let mut start = 0;

        for (pos, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                if !token.is_empty() {
                    bytes.push((start, Self::parse_token(&token, start)?));
                    token.clear();
                }
            } else {
                if token.is_empty() {
                    start = pos;
                }
                token.push(ch);
            }
        }
        if !token.is_empty() {
            bytes.push((start, Self::parse_token(&token, start)?));
        }

        Ok(bytes)
    }
}
