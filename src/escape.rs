//! `\uXXXX` escape notation over codepoints.
//!
//! Supplementary-plane codepoints are written as their UTF-16 surrogate pair,
//! so U+1F600 renders as `\ud83d\ude00`. Parsing accepts mixed literal and
//! escaped text; any character outside an escape stands for itself.

use std::fmt::Write;

use crate::multibyte::{combine_surrogates, is_high_surrogate, is_low_surrogate, surrogate_pair};
use crate::{CodepointSequence, Error, ErrorKind, Result};

/// Length of one `\uXXXX` escape in characters
const ESCAPE_LEN: usize = 6;

/// Unicode escape framing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnicodeEscapeFormatter;

impl UnicodeEscapeFormatter {
    /// Render every codepoint as a lowercase `\uXXXX` escape
    pub fn render(&self, codepoints: &CodepointSequence) -> String {
        let mut out = String::with_capacity(codepoints.len() * ESCAPE_LEN);
        // Writing to a String cannot fail
        for cp in codepoints.scalars() {
            if cp <= 0xFFFF {
                let _ = write!(out, "\\u{cp:04x}");
            } else {
                let (high, low) = surrogate_pair(cp);
                let _ = write!(out, "\\u{high:04x}\\u{low:04x}");
            }
        }
        out
    }

    /// Parse text containing `\uXXXX` escapes into codepoints.
    ///
    /// Positions in errors are character offsets. A high surrogate escape must
    /// be immediately followed by a low surrogate escape.
    pub fn parse(&self, text: &str) -> Result<CodepointSequence> {
        let chars: Vec<char> = text.chars().collect();
        let mut out = Vec::with_capacity(chars.len());
        let mut pos = 0;

        while pos < chars.len() {
            let Some(unit) = Self::escape_at(&chars, pos)? else {
                out.push(chars[pos]);
                pos += 1;
                continue;
            };
            let start = pos;
            pos += ESCAPE_LEN;

            let value = if is_high_surrogate(unit) {
                match Self::escape_at(&chars, pos)? {
                    Some(low) if is_low_surrogate(low) => {
                        pos += ESCAPE_LEN;
                        combine_surrogates(unit, low)
                    }
                    _ => {
                        return Err(Error::new(
                            ErrorKind::UnpairedSurrogateEscape,
                            start,
                            format!("high surrogate \\u{unit:04x} is not followed by a low surrogate escape"),
                        ));
                    }
                }
            } else if is_low_surrogate(unit) {
                return Err(Error::new(
                    ErrorKind::UnpairedSurrogateEscape,
                    start,
                    format!("low surrogate \\u{unit:04x} without a preceding high surrogate"),
                ));
            } else {
                u32::from(unit)
            };

            let ch = char::from_u32(value).ok_or_else(|| {
                Error::new(
                    ErrorKind::CodepointOutOfRange,
                    start,
                    format!("value 0x{value:X} is not a scalar value"),
                )
            })?;
            out.push(ch);
        }

        Ok(CodepointSequence::from(out))
    }

    /// Read the escape starting at `pos`, or `None` if no `\u` starts there
    fn escape_at(chars: &[char], pos: usize) -> Result<Option<u16>> {
        if chars.get(pos) != Some(&'\\') || chars.get(pos + 1) != Some(&'u') {
            return Ok(None);
        }

        let mut value: u16 = 0;
        for offset in pos + 2..pos + ESCAPE_LEN {
            let digit = match chars.get(offset) {
                Some(ch) => ch.to_digit(16).ok_or_else(|| {
                    Error::new(
                        ErrorKind::InvalidHexDigit,
                        offset,
                        format!("{ch:?} is not a hexadecimal digit in \\u escape"),
                    )
                })?,
                None => {
                    return Err(Error::new(
                        ErrorKind::InvalidHexDigit,
                        offset,
                        "input ends inside a \\u escape",
                    ));
                }
            };
            value = (value << 4) | digit as u16;
        }

        Ok(Some(value))
    }
}
