//! Error taxonomy shared by every codec, formatter and the conversion engine.
//!
//! Every failure carries a stable [`ErrorKind`], the byte or character offset
//! closest to the fault, and a human-readable detail string. The kind is the
//! only part callers should match on; the detail is for logs and debugging.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Machine-readable classification of a conversion failure.
///
/// [`ErrorKind::as_str`] returns the variant name, which is the stable string
/// handed to callers that localize error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    // Structural
    /// Byte cannot start a UTF-8 sequence
    InvalidLeadByte,
    /// Buffer ends in the middle of a multi-byte sequence
    TruncatedSequence,
    /// Byte inside a UTF-8 sequence is not of the form `10xxxxxx`
    InvalidContinuationByte,
    /// UTF-8 sequence uses more bytes than its value requires
    OverlongEncoding,
    /// UTF-16 data has an odd number of bytes
    OddByteLength,

    // Surrogate-related
    /// UTF-8 sequence decodes to a value in `0xD800..=0xDFFF`
    SurrogateInUtf8,
    /// UTF-16 high surrogate without a following low surrogate
    LoneHighSurrogate,
    /// UTF-16 low surrogate without a preceding high surrogate
    LoneLowSurrogate,
    /// `\uXXXX` surrogate escape that is not part of a valid pair
    UnpairedSurrogateEscape,

    // Range
    /// Codepoint cannot be represented in the target encoding
    CodepointOutOfRange,
    /// Byte `>= 0x80` in ASCII data
    NonAsciiByte,

    // Framing
    /// Hex input has an odd number of digits
    OddHexLength,
    /// Character that is not a hexadecimal digit
    InvalidHexDigit,
    /// Binary token that is not exactly eight `0`/`1` digits
    InvalidBinaryToken,

    // Resource
    /// Input exceeds the configured size limit
    InputTooLarge,
}

impl ErrorKind {
    /// Stable identifier of this kind
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidLeadByte => "InvalidLeadByte",
            ErrorKind::TruncatedSequence => "TruncatedSequence",
            ErrorKind::InvalidContinuationByte => "InvalidContinuationByte",
            ErrorKind::OverlongEncoding => "OverlongEncoding",
            ErrorKind::OddByteLength => "OddByteLength",
            ErrorKind::SurrogateInUtf8 => "SurrogateInUtf8",
            ErrorKind::LoneHighSurrogate => "LoneHighSurrogate",
            ErrorKind::LoneLowSurrogate => "LoneLowSurrogate",
            ErrorKind::UnpairedSurrogateEscape => "UnpairedSurrogateEscape",
            ErrorKind::CodepointOutOfRange => "CodepointOutOfRange",
            ErrorKind::NonAsciiByte => "NonAsciiByte",
            ErrorKind::OddHexLength => "OddHexLength",
            ErrorKind::InvalidHexDigit => "InvalidHexDigit",
            ErrorKind::InvalidBinaryToken => "InvalidBinaryToken",
            ErrorKind::InputTooLarge => "InputTooLarge",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A conversion failure with the offset closest to the fault
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at position {position}: {detail}")]
pub struct Error {
    /// What went wrong
    pub kind: ErrorKind,
    /// Byte offset (byte-oriented input) or character offset (text input)
    pub position: usize,
    /// Human-readable description, never localized
    pub detail: String,
}

impl Error {
    /// Create an error of `kind` at `position`
    pub fn new(kind: ErrorKind, position: usize, detail: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            detail: detail.into(),
        }
    }
}
