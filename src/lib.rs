//! # TextConv - Lossless Multi-Encoding Text Conversion
//!
//! Converts text and byte data between character encodings and human-readable
//! byte framings while keeping exact byte-for-byte and codepoint-for-codepoint
//! fidelity wherever both sides can express the same information.
//!
//! ## Supported formats
//!
//! - **Codecs** (codepoints <-> bytes): UTF-8, UTF-16 (little-endian by
//!   default, no BOM), ASCII, ISO-8859-1
//! - **Framings**: Hex and Binary (over bytes), Unicode Escape `\uXXXX`
//!   (over codepoints)
//!
//! Every conversion routes through a [`CodepointSequence`] or a raw byte
//! buffer. Malformed input always surfaces as an [`Error`] with a stable
//! [`ErrorKind`] and the offset of the fault, never as a replacement
//! character.
//!
//! ## Quick Start
//!
//! ```rust
//! use textconv::{convert, EncodingFormat};
//!
//! let hex = convert("AB", EncodingFormat::Utf8, EncodingFormat::Hex).unwrap();
//! assert_eq!(hex.output, "4142");
//!
//! let bits = convert("4142", EncodingFormat::Hex, EncodingFormat::Binary).unwrap();
//! assert_eq!(bits.output, "01000001 01000010");
//!
//! let err = convert("4G", EncodingFormat::Hex, EncodingFormat::Utf8).unwrap_err();
//! assert_eq!(err.kind.as_str(), "InvalidHexDigit");
//! assert_eq!(err.position, 1);
//! ```

#![deny(missing_docs)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

mod codepoints;
mod error;
pub mod escape;
pub mod framing;
pub mod multibyte;
pub mod singlebyte;

pub use codepoints::{CodepointSequence, MAX_CODEPOINT};
pub use error::{Error, ErrorKind, Result};
pub use escape::UnicodeEscapeFormatter;
pub use framing::{BinaryFormatter, HexFormatter};
pub use multibyte::{ByteOrder, Utf8Codec, Utf16Codec};
pub use singlebyte::{AsciiCodec, Latin1Codec};

/// Default limit on input size, in bytes
pub const DEFAULT_MAX_INPUT_LEN: usize = 16 * 1024 * 1024;

/// Whether a format is a character encoding or a framing of data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    /// Converts codepoints to and from bytes
    Codec,
    /// Renders bytes or codepoints as human-readable text
    Framing,
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FormatKind::Codec => "codec",
            FormatKind::Framing => "framing",
        })
    }
}

/// Supported representations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncodingFormat {
    /// UTF-8 Unicode encoding (variable length, 1-4 bytes)
    #[serde(rename = "utf8")]
    Utf8,
    /// UTF-16 Unicode encoding (2 or 4 bytes, configurable byte order)
    #[serde(rename = "utf16")]
    Utf16,
    /// ASCII (7-bit, 0-127)
    #[serde(rename = "ascii")]
    Ascii,
    /// ISO-8859-1 (Latin-1) - Western European
    #[serde(rename = "iso-8859-1")]
    Iso8859_1,
    /// Two hexadecimal digits per byte
    #[serde(rename = "hex")]
    Hex,
    /// Eight binary digits per byte
    #[serde(rename = "binary")]
    Binary,
    /// `\uXXXX` escapes, surrogate pairs above U+FFFF
    #[serde(rename = "unicode-escape")]
    UnicodeEscape,
}

impl EncodingFormat {
    /// Every supported format
    pub const ALL: [EncodingFormat; 7] = [
        EncodingFormat::Utf8,
        EncodingFormat::Utf16,
        EncodingFormat::Ascii,
        EncodingFormat::Iso8859_1,
        EncodingFormat::Hex,
        EncodingFormat::Binary,
        EncodingFormat::UnicodeEscape,
    ];

    /// Stable identifier used in requests and responses
    pub fn id(self) -> &'static str {
        match self {
            EncodingFormat::Utf8 => "utf8",
            EncodingFormat::Utf16 => "utf16",
            EncodingFormat::Ascii => "ascii",
            EncodingFormat::Iso8859_1 => "iso-8859-1",
            EncodingFormat::Hex => "hex",
            EncodingFormat::Binary => "binary",
            EncodingFormat::UnicodeEscape => "unicode-escape",
        }
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            EncodingFormat::Utf8 => "UTF-8",
            EncodingFormat::Utf16 => "UTF-16",
            EncodingFormat::Ascii => "ASCII",
            EncodingFormat::Iso8859_1 => "ISO-8859-1",
            EncodingFormat::Hex => "Hex",
            EncodingFormat::Binary => "Binary",
            EncodingFormat::UnicodeEscape => "Unicode Escape",
        }
    }

    /// Codec or framing
    pub fn kind(self) -> FormatKind {
        match self {
            EncodingFormat::Utf8
            | EncodingFormat::Utf16
            | EncodingFormat::Ascii
            | EncodingFormat::Iso8859_1 => FormatKind::Codec,
            EncodingFormat::Hex | EncodingFormat::Binary | EncodingFormat::UnicodeEscape => {
                FormatKind::Framing
            }
        }
    }

    /// Check if this encoding uses variable-length character representation
    pub fn is_multibyte(self) -> bool {
        matches!(self, EncodingFormat::Utf8 | EncodingFormat::Utf16)
    }

    /// Check if ASCII text is stored byte-for-byte unchanged
    pub fn is_ascii_compatible(self) -> bool {
        matches!(
            self,
            EncodingFormat::Utf8 | EncodingFormat::Ascii | EncodingFormat::Iso8859_1
        )
    }

    /// One-line description
    pub fn description(self) -> &'static str {
        match self {
            EncodingFormat::Utf8 => "Unicode Transformation Format 8-bit, variable-length encoding",
            EncodingFormat::Utf16 => {
                "Unicode Transformation Format 16-bit, surrogate pairs above U+FFFF"
            }
            EncodingFormat::Ascii => "American Standard Code for Information Interchange (7-bit)",
            EncodingFormat::Iso8859_1 => "Latin alphabet No. 1, identical to U+0000..U+00FF",
            EncodingFormat::Hex => "UTF-8 bytes as lowercase hex digit pairs",
            EncodingFormat::Binary => "UTF-8 bytes as space-separated 8-bit groups",
            EncodingFormat::UnicodeEscape => "Codepoints as \\uXXXX escapes",
        }
    }
}

impl fmt::Display for EncodingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Unknown format name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown format: {0}")]
pub struct ParseFormatError(pub String);

impl FromStr for EncodingFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let format = match s.trim().to_lowercase().as_str() {
            "utf8" | "utf-8" => EncodingFormat::Utf8,
            "utf16" | "utf-16" | "utf16le" | "utf-16le" => EncodingFormat::Utf16,
            "ascii" | "us-ascii" => EncodingFormat::Ascii,
            "iso-8859-1" | "iso88591" | "iso8859-1" | "latin1" | "latin-1" => {
                EncodingFormat::Iso8859_1
            }
            "hex" | "hexadecimal" | "base16" => EncodingFormat::Hex,
            "binary" | "bin" | "bits" => EncodingFormat::Binary,
            "unicode-escape" | "unicode" | "escape" | "\\u" => EncodingFormat::UnicodeEscape,
            _ => return Err(ParseFormatError(s.to_string())),
        };
        Ok(format)
    }
}

/// A character encoding between codepoints and bytes
pub trait Codec {
    /// Format this codec implements
    fn format(&self) -> EncodingFormat;

    /// Decode bytes into codepoints; errors carry byte offsets
    fn decode(&self, bytes: &[u8]) -> Result<CodepointSequence>;

    /// Encode codepoints into bytes; errors carry codepoint indices
    fn encode(&self, codepoints: &CodepointSequence) -> Result<Vec<u8>>;
}

/// A human-readable framing of bytes that is not itself a character encoding
pub trait ByteFormatter {
    /// Format this formatter implements
    fn format(&self) -> EncodingFormat;

    /// Render bytes as text
    fn render(&self, bytes: &[u8]) -> String;

    /// Parse text back into bytes; errors carry character offsets
    fn parse(&self, text: &str) -> Result<Vec<u8>> {
        Ok(self.parse_located(text)?.into_iter().map(|(_, byte)| byte).collect())
    }

    /// Parse text into bytes, each paired with the character offset where
    /// its digits start
    fn parse_located(&self, text: &str) -> Result<Vec<(usize, u8)>>;
}

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineOptions {
    /// Largest accepted input in bytes; `0` disables the limit
    pub max_input_len: usize,
    /// Byte order used by the UTF-16 codec
    pub utf16_byte_order: ByteOrder,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_input_len: DEFAULT_MAX_INPUT_LEN,
            utf16_byte_order: ByteOrder::LittleEndian,
        }
    }
}

/// A single conversion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    /// Text to convert
    pub input: String,
    /// Representation of `input`
    pub source_format: EncodingFormat,
    /// Representation to produce
    pub target_format: EncodingFormat,
}

impl ConversionRequest {
    /// Create a request
    pub fn new(input: impl Into<String>, source_format: EncodingFormat, target_format: EncodingFormat) -> Self {
        Self {
            input: input.into(),
            source_format,
            target_format,
        }
    }
}

/// Successful conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Rendered result
    pub output: String,
    /// Target bytes: the encoded text for codecs, the framed bytes for
    /// hex/binary, UTF-8 for Unicode Escape
    pub encoded: Vec<u8>,
    /// Number of codepoints in the intermediate form (0 when hex/binary
    /// passthrough bytes are not valid UTF-8)
    pub codepoint_count: usize,
}

impl Conversion {
    /// Length of [`Conversion::encoded`]
    pub fn byte_length(&self) -> usize {
        self.encoded.len()
    }
}

/// Outcome of a conversion
pub type ConversionResult = Result<Conversion>;

/// Serializable form of a [`ConversionResult`]:
/// `{ok, output, byteLength, codepointCount}` or `{ok, errorKind, position, detail}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Whether the conversion succeeded
    pub ok: bool,
    /// Rendered result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Byte length of the target representation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_length: Option<usize>,
    /// Number of codepoints converted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codepoint_count: Option<usize>,
    /// Stable error identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// Offset closest to the fault
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    /// Unlocalized description of the fault
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<&ConversionResult> for Response {
    fn from(result: &ConversionResult) -> Self {
        match result {
            Ok(conversion) => Self {
                ok: true,
                output: Some(conversion.output.clone()),
                byte_length: Some(conversion.byte_length()),
                codepoint_count: Some(conversion.codepoint_count),
                error_kind: None,
                position: None,
                detail: None,
            },
            Err(err) => Self::from(err),
        }
    }
}

impl From<&Error> for Response {
    fn from(err: &Error) -> Self {
        Self {
            ok: false,
            output: None,
            byte_length: None,
            codepoint_count: None,
            error_kind: Some(err.kind),
            position: Some(err.position),
            detail: Some(err.detail.clone()),
        }
    }
}

/// Resolved handler for one format
enum Stage<'a> {
    Codec(&'a dyn Codec),
    Bytes(&'static dyn ByteFormatter),
    Escape(UnicodeEscapeFormatter),
}

/// Data between the source and target stages
enum Intermediate {
    /// Parsed bytes and the source character offset of each one
    Bytes { bytes: Vec<u8>, offsets: Vec<usize> },
    Codepoints(CodepointSequence),
}

impl Intermediate {
    fn from_located(located: Vec<(usize, u8)>) -> Self {
        let (offsets, bytes): (Vec<usize>, Vec<u8>) = located.into_iter().unzip();
        Intermediate::Bytes { bytes, offsets }
    }

    /// Decode as UTF-8; error positions point back into the parsed text
    fn into_codepoints(self) -> Result<CodepointSequence> {
        match self {
            Intermediate::Bytes { bytes, offsets } => {
                Utf8Codec.decode(&bytes).map_err(|mut err| {
                    if let Some(&offset) = offsets.get(err.position) {
                        err.position = offset;
                    }
                    err
                })
            }
            Intermediate::Codepoints(codepoints) => Ok(codepoints),
        }
    }

    /// Bytes plus the number of codepoints they carry
    fn into_bytes(self) -> Result<(Vec<u8>, usize)> {
        match self {
            Intermediate::Bytes { bytes, .. } => {
                let count = Utf8Codec.decode(&bytes).map_or(0, |cps| cps.len());
                Ok((bytes, count))
            }
            Intermediate::Codepoints(codepoints) => {
                Ok((Utf8Codec.encode(&codepoints)?, codepoints.len()))
            }
        }
    }
}

/// Stateless converter between any two [`EncodingFormat`]s.
///
/// The engine holds only configuration, so one instance can be shared freely
/// across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversionEngine {
    options: EngineOptions,
    utf16: Utf16Codec,
}

impl ConversionEngine {
    /// Engine with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with explicit options
    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            options,
            utf16: Utf16Codec::new(options.utf16_byte_order),
        }
    }

    /// Active options
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Codec for `format`, if it is a character encoding
    pub fn codec(&self, format: EncodingFormat) -> Option<&dyn Codec> {
        match self.stage(format) {
            Stage::Codec(codec) => Some(codec),
            Stage::Bytes(_) | Stage::Escape(_) => None,
        }
    }

    fn stage(&self, format: EncodingFormat) -> Stage<'_> {
        match format {
            EncodingFormat::Utf8 => Stage::Codec(&Utf8Codec),
            EncodingFormat::Utf16 => Stage::Codec(&self.utf16),
            EncodingFormat::Ascii => Stage::Codec(&AsciiCodec),
            EncodingFormat::Iso8859_1 => Stage::Codec(&Latin1Codec),
            EncodingFormat::Hex => Stage::Bytes(&HexFormatter),
            EncodingFormat::Binary => Stage::Bytes(&BinaryFormatter),
            EncodingFormat::UnicodeEscape => Stage::Escape(UnicodeEscapeFormatter),
        }
    }

    /// Convert a request
    pub fn convert(&self, request: &ConversionRequest) -> ConversionResult {
        self.convert_str(&request.input, request.source_format, request.target_format)
    }

    /// Convert text.
    ///
    /// With a codec source the text must be representable in that encoding;
    /// with a framing source it is parsed by the formatter.
    pub fn convert_str(
        &self,
        input: &str,
        source: EncodingFormat,
        target: EncodingFormat,
    ) -> ConversionResult {
        self.run(input.len(), source, target, || self.read_text(input, source))
    }

    /// Convert raw bytes.
    ///
    /// With a codec source the bytes are decoded by that codec, so decode
    /// errors report byte offsets into `input`. With a framing source the
    /// bytes must be UTF-8 text.
    pub fn convert_bytes(
        &self,
        input: &[u8],
        source: EncodingFormat,
        target: EncodingFormat,
    ) -> ConversionResult {
        self.run(input.len(), source, target, || self.read_bytes(input, source))
    }

    /// Check that `input` is well-formed in `format`
    pub fn validate(&self, input: &[u8], format: EncodingFormat) -> Result<()> {
        self.check_size(input.len())?;
        self.read_bytes(input, format).map(|_| ())
    }

    fn run(
        &self,
        input_len: usize,
        source: EncodingFormat,
        target: EncodingFormat,
        read: impl FnOnce() -> Result<Intermediate>,
    ) -> ConversionResult {
        debug!(%source, %target, input_len, "converting");

        let result = self
            .check_size(input_len)
            .and_then(|()| read())
            .and_then(|intermediate| self.write(intermediate, target));

        match &result {
            Ok(conversion) => debug!(
                byte_length = conversion.byte_length(),
                codepoint_count = conversion.codepoint_count,
                "conversion finished"
            ),
            Err(err) => debug!(kind = %err.kind, position = err.position, "conversion failed"),
        }
        result
    }

    fn check_size(&self, len: usize) -> Result<()> {
        let limit = self.options.max_input_len;
        if limit != 0 && len > limit {
            return Err(Error::new(
                ErrorKind::InputTooLarge,
                limit,
                format!("input of {len} bytes exceeds the {limit}-byte limit"),
            ));
        }
        Ok(())
    }

    fn read_text(&self, input: &str, source: EncodingFormat) -> Result<Intermediate> {
        match self.stage(source) {
            Stage::Codec(codec) => {
                let bytes = codec.encode(&CodepointSequence::from(input))?;
                codec.decode(&bytes).map(Intermediate::Codepoints)
            }
            Stage::Bytes(formatter) => formatter
                .parse_located(input)
                .map(Intermediate::from_located),
            Stage::Escape(formatter) => formatter.parse(input).map(Intermediate::Codepoints),
        }
    }

    fn read_bytes(&self, input: &[u8], source: EncodingFormat) -> Result<Intermediate> {
        match self.stage(source) {
            Stage::Codec(codec) => codec.decode(input).map(Intermediate::Codepoints),
            Stage::Bytes(_) | Stage::Escape(_) => {
                let text = Utf8Codec.decode(input)?.to_string();
                self.read_text(&text, source)
            }
        }
    }

    fn write(&self, intermediate: Intermediate, target: EncodingFormat) -> ConversionResult {
        match self.stage(target) {
            Stage::Codec(codec) => {
                let codepoints = intermediate.into_codepoints()?;
                let encoded = codec.encode(&codepoints)?;
                Ok(Conversion {
                    output: codepoints.to_string(),
                    encoded,
                    codepoint_count: codepoints.len(),
                })
            }
            Stage::Bytes(formatter) => {
                let (bytes, codepoint_count) = intermediate.into_bytes()?;
                Ok(Conversion {
                    output: formatter.render(&bytes),
                    encoded: bytes,
                    codepoint_count,
                })
            }
            Stage::Escape(formatter) => {
                let codepoints = intermediate.into_codepoints()?;
                Ok(Conversion {
                    output: formatter.render(&codepoints),
                    encoded: Utf8Codec.encode(&codepoints)?,
                    codepoint_count: codepoints.len(),
                })
            }
        }
    }
}

/// Convert `input` with a default [`ConversionEngine`]
pub fn convert(input: &str, source: EncodingFormat, target: EncodingFormat) -> ConversionResult {
    ConversionEngine::new().convert_str(input, source, target)
}
