//! The canonical intermediate form every conversion routes through.

use std::fmt;

use crate::{Error, ErrorKind, Result};

/// Highest Unicode scalar value
pub const MAX_CODEPOINT: u32 = 0x10FFFF;

/// Ordered sequence of Unicode scalar values.
///
/// Backed by `char`, so every element is guaranteed to be in `0..=0x10FFFF`
/// and outside the surrogate range. The sequence is immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CodepointSequence(Vec<char>);

impl CodepointSequence {
    /// Empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sequence from untrusted scalar values.
    ///
    /// Surrogates and values above `0x10FFFF` fail with
    /// [`ErrorKind::CodepointOutOfRange`] at the index of the bad value.
    pub fn from_scalars(values: &[u32]) -> Result<Self> {
        values
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                char::from_u32(value).ok_or_else(|| {
                    let reason = if (0xD800..=0xDFFF).contains(&value) {
                        "is a surrogate"
                    } else {
                        "exceeds U+10FFFF"
                    };
                    Error::new(
                        ErrorKind::CodepointOutOfRange,
                        index,
                        format!("value 0x{value:X} {reason}"),
                    )
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    /// Number of codepoints
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the sequence holds no codepoints
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Codepoints as `char`s
    pub fn as_chars(&self) -> &[char] {
        &self.0
    }

    /// Iterate over the scalar values
    pub fn scalars(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().map(|&ch| ch as u32)
    }
}

impl From<&str> for CodepointSequence {
    fn from(text: &str) -> Self {
        Self(text.chars().collect())
    }
}

impl From<Vec<char>> for CodepointSequence {
    fn from(chars: Vec<char>) -> Self {
        Self(chars)
    }
}

impl FromIterator<char> for CodepointSequence {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for CodepointSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|ch| fmt::Write::write_char(f, *ch))
    }
}
