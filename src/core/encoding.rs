//! Input encoding detection
//!
//! Finding aids exported from Windows tools regularly arrive as UTF-16
//! with a byte order mark. Everything downstream works on UTF-8, so those
//! are transcoded once up front and a UTF-8 BOM is stripped.

use crate::error::{EadError, Result};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl XmlEncoding {
    /// Detect from the byte order mark, or from a `<` paired with a NUL
    /// byte when the BOM is missing
    pub fn detect(input: &[u8]) -> Self {
        match input {
            [0xFF, 0xFE, ..] | [b'<', 0x00, ..] => XmlEncoding::Utf16Le,
            [0xFE, 0xFF, ..] | [0x00, b'<', ..] => XmlEncoding::Utf16Be,
            _ => XmlEncoding::Utf8,
        }
    }
}

/// Return the input as validated UTF-8, transcoding UTF-16 when needed
pub fn to_utf8(input: &[u8]) -> Result<Cow<'_, str>> {
    match XmlEncoding::detect(input) {
        XmlEncoding::Utf8 => {
            let body = input.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(input);
            std::str::from_utf8(body)
                .map(Cow::Borrowed)
                .map_err(|e| EadError::Encoding(format!("invalid UTF-8: {e}")))
        }
        XmlEncoding::Utf16Le => decode_utf16(input, &[0xFF, 0xFE], u16::from_le_bytes).map(Cow::Owned),
        XmlEncoding::Utf16Be => decode_utf16(input, &[0xFE, 0xFF], u16::from_be_bytes).map(Cow::Owned),
    }
}

fn decode_utf16(input: &[u8], bom: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let body = input.strip_prefix(bom).unwrap_or(input);
    if body.len() % 2 != 0 {
        return Err(EadError::Encoding("UTF-16 input has an odd number of bytes".to_string()));
    }
    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|e| EadError::Encoding(format!("invalid UTF-16: {e}")))
}
