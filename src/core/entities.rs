//! XML entity decoding
//!
//! Handles the five predefined entities and numeric character references.
//! Finding aids exported from archival systems sometimes carry DTD-declared
//! entities we cannot expand; those references are kept verbatim.
//!
//! Uses Cow for zero-copy when no entities are present.

use memchr::memchr;
use std::borrow::Cow;

/// Decode entity references in text or attribute content
///
/// Returns Borrowed if no '&' is present.
#[inline]
pub fn decode_text(input: &[u8]) -> Cow<'_, [u8]> {
    if memchr(b'&', input).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_entities(input))
}

fn decode_entities(input: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = memchr(b'&', rest) {
        result.extend_from_slice(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = memchr(b';', rest).and_then(|semi| {
            let mut buf = [0u8; 4];
            let len = decode_reference(&rest[1..semi], &mut buf)?.len();
            Some((buf, len, semi))
        });

        match decoded {
            Some((buf, len, semi)) => {
                result.extend_from_slice(&buf[..len]);
                rest = &rest[semi + 1..];
            }
            None => {
                result.push(b'&');
                rest = &rest[1..];
            }
        }
    }

    result.extend_from_slice(rest);
    result
}

/// Decode one reference body (between '&' and ';') into `buf`
fn decode_reference<'b>(reference: &[u8], buf: &'b mut [u8; 4]) -> Option<&'b str> {
    let ch = match reference {
        b"lt" => '<',
        b"gt" => '>',
        b"amp" => '&',
        b"quot" => '"',
        b"apos" => '\'',
        [b'#', b'x' | b'X', hex @ ..] => char_from_radix(hex, 16)?,
        [b'#', dec @ ..] => char_from_radix(dec, 10)?,
        _ => return None,
    };
    Some(ch.encode_utf8(buf))
}

fn char_from_radix(digits: &[u8], radix: u32) -> Option<char> {
    if digits.is_empty() {
        return None;
    }
    let text = std::str::from_utf8(digits).ok()?;
    let codepoint = u32::from_str_radix(text, radix).ok()?;
    if codepoint == 0 {
        return None;
    }
    char::from_u32(codepoint)
}
