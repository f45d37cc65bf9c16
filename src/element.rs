// MIT License
//
// Copyright (c) 2026 Raja Lehtihet & Wael El Oraiby
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.
//
//! Conversion of typed set elements into hash input bytes.
//!
//! Every accepted kind has one deterministic byte encoding, so sketches built
//! in different processes stay comparable:
//! - integers are widened to 64 bits and written as 8 little-endian bytes,
//! - text that parses as an unsigned 64-bit integer uses that integer's bytes,
//! - any other text uses its UTF-8 bytes (with a `0xFF` terminator when it is
//!   exactly 8 bytes long, so it can never equal an integer encoding),
//! - raw byte slices are used as-is.

use tracing::trace;

const INTEGER_WIDTH: usize = 8;
const TEXT_TERMINATOR: u8 = 0xFF;

/// One set element, in one of the accepted input kinds.
///
/// # Example
/// ```rust
/// use minwise::element::Element;
///
/// // Numeric text hashes like the integer it spells.
/// assert_eq!(Element::from("07").to_bytes(), Element::from(7_u64).to_bytes());
/// assert_eq!(Element::from("0x10").to_bytes(), Element::from(16_u8).to_bytes());
/// // Anything else hashes as raw text.
/// assert_eq!(Element::from("12x").to_bytes(), b"12x".to_vec());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element<'a> {
    Bytes(&'a [u8]),
    Text(&'a str),
    Unsigned(u64),
    Signed(i64),
}

impl<'a> Element<'a> {
    /// Calls `f` with the encoded bytes of this element without allocating.
    pub fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        match *self {
            Element::Bytes(bytes) => f(bytes),
            Element::Unsigned(value) => f(&value.to_le_bytes()),
            Element::Signed(value) => f(&(value as u64).to_le_bytes()),
            Element::Text(text) => match parse_unsigned(text) {
                Some(value) => f(&value.to_le_bytes()),
                None => {
                    trace!(text, "text is not an unsigned integer, hashing raw bytes");
                    let bytes = text.as_bytes();
                    if bytes.len() == INTEGER_WIDTH {
                        let mut terminated = [TEXT_TERMINATOR; INTEGER_WIDTH + 1];
                        terminated[..INTEGER_WIDTH].copy_from_slice(bytes);
                        f(&terminated)
                    } else {
                        f(bytes)
                    }
                }
            },
        }
    }

    /// Returns an owned copy of the encoded bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.with_bytes(<[u8]>::to_vec)
    }
}

/// Parses `text` as an unsigned 64-bit integer.
///
/// Accepts decimal digits or a `0x`, `0o` or `0b` prefix. Signs, whitespace
/// and empty digit strings are rejected. Leading zeros stay decimal.
pub fn parse_unsigned(text: &str) -> Option<u64> {
    let (digits, radix) = if let Some(rest) = strip_radix_prefix(text, 'x') {
        (rest, 16)
    } else if let Some(rest) = strip_radix_prefix(text, 'o') {
        (rest, 8)
    } else if let Some(rest) = strip_radix_prefix(text, 'b') {
        (rest, 2)
    } else {
        (text, 10)
    };

    // from_str_radix tolerates a leading '+', which is not a digit.
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_alphanumeric()) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok()
}

fn strip_radix_prefix(text: &str, marker: char) -> Option<&str> {
    let rest = text.strip_prefix('0')?;
    rest.strip_prefix(marker)
        .or_else(|| rest.strip_prefix(marker.to_ascii_uppercase()))
}

macro_rules! unsigned_element {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Element<'_> {
            fn from(value: $ty) -> Self {
                Element::Unsigned(value as u64)
            }
        }

        impl From<&$ty> for Element<'_> {
            fn from(value: &$ty) -> Self {
                Element::Unsigned(*value as u64)
            }
        })*
    };
}

macro_rules! signed_element {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Element<'_> {
            fn from(value: $ty) -> Self {
                Element::Signed(value as i64)
            }
        }

        impl From<&$ty> for Element<'_> {
            fn from(value: &$ty) -> Self {
                Element::Signed(*value as i64)
            }
        })*
    };
}

unsigned_element!(u8, u16, u32, u64, usize);
signed_element!(i8, i16, i32, i64, isize);

impl<'a> From<&'a str> for Element<'a> {
    fn from(value: &'a str) -> Self {
        Element::Text(value)
    }
}

impl<'a> From<&'a String> for Element<'a> {
    fn from(value: &'a String) -> Self {
        Element::Text(value.as_str())
    }
}

impl<'a> From<&'a [u8]> for Element<'a> {
    fn from(value: &'a [u8]) -> Self {
        Element::Bytes(value)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Element<'a> {
    fn from(value: &'a [u8; N]) -> Self {
        Element::Bytes(value)
    }
}

impl<'a> From<&'a Vec<u8>> for Element<'a> {
    fn from(value: &'a Vec<u8>) -> Self {
        Element::Bytes(value.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::{Element, parse_unsigned};

    #[test]
    fn integers_are_eight_bytes_little_endian() {
        assert_eq!(Element::from(1_u64).to_bytes(), vec![1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(Element::from(1_u8).to_bytes(), Element::from(1_u64).to_bytes());
        assert_eq!(Element::from(-1_i32).to_bytes(), vec![0xFF; 8]);
        assert_eq!(Element::from(&300_u16).to_bytes(), 300_u64.to_le_bytes().to_vec());
    }

    #[test]
    fn signed_and_unsigned_share_non_negative_encoding() {
        assert_eq!(Element::from(42_i64).to_bytes(), Element::from(42_u64).to_bytes());
    }

    #[test]
    fn numeric_text_parses_before_hashing() {
        assert_eq!(parse_unsigned("7"), Some(7));
        assert_eq!(parse_unsigned("07"), Some(7));
        assert_eq!(parse_unsigned("012"), Some(12));
        assert_eq!(parse_unsigned("0x1f"), Some(31));
        assert_eq!(parse_unsigned("0B101"), Some(5));
        assert_eq!(parse_unsigned("0o17"), Some(15));
        assert_eq!(parse_unsigned("18446744073709551615"), Some(u64::MAX));
    }

    #[test]
    fn malformed_numeric_text_is_rejected() {
        for text in ["", "+7", "-7", " 7", "12x", "0x", "18446744073709551616", "1_000"] {
            assert_eq!(parse_unsigned(text), None, "text={text:?}");
        }
    }

    #[test]
    fn non_numeric_text_uses_raw_bytes() {
        assert_eq!(Element::from("hello").to_bytes(), b"hello".to_vec());
        assert_eq!(Element::from("").to_bytes(), Vec::<u8>::new());
    }

    #[test]
    fn eight_byte_text_cannot_collide_with_an_integer() {
        let text = "abcdefgh";
        let spelled = u64::from_le_bytes(*b"abcdefgh");
        let encoded = Element::from(text).to_bytes();

        assert_eq!(encoded.len(), 9);
        assert_eq!(&encoded[..8], text.as_bytes());
        assert_ne!(encoded, Element::from(spelled).to_bytes());
        assert_ne!(encoded, Element::from(spelled.to_string().as_str()).to_bytes());
    }

    #[test]
    fn byte_kinds_pass_through() {
        let owned = vec![1_u8, 2, 3];
        assert_eq!(Element::from(&owned).to_bytes(), owned);
        assert_eq!(Element::from(b"raw").to_bytes(), b"raw".to_vec());
    }
}
