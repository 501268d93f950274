//! XML attribute parsing
//!
//! Parses the attribute list of a start tag. Every attribute must be
//! `name="value"` or `name='value'`; anything else is a well-formedness
//! error reported with its offset inside the attribute list.

use super::entities::decode_text;
use super::scanner::{is_name_char, is_name_start_char, is_whitespace};
use memchr::memchr;
use std::borrow::Cow;

/// A parsed XML attribute
#[derive(Debug, Clone)]
pub struct Attribute<'a> {
    /// Qualified name, prefix included
    pub name: &'a [u8],
    /// Value with entities decoded
    pub value: Cow<'a, [u8]>,
}

impl<'a> Attribute<'a> {
    /// Namespace prefix (before the colon), if any
    pub fn prefix(&self) -> Option<&'a [u8]> {
        memchr(b':', self.name).map(|pos| &self.name[..pos])
    }

    /// Name after the colon, or the whole name
    pub fn local_name(&self) -> &'a [u8] {
        match memchr(b':', self.name) {
            Some(pos) => &self.name[pos + 1..],
            None => self.name,
        }
    }

    /// Namespace declaration this attribute makes: `Some(None)` for a
    /// default `xmlns`, `Some(Some(prefix))` for `xmlns:prefix`
    pub fn namespace_declaration(&self) -> Option<Option<&'a [u8]>> {
        if self.name == b"xmlns" {
            Some(None)
        } else if self.prefix() == Some(b"xmlns".as_slice()) {
            Some(Some(self.local_name()))
        } else {
            None
        }
    }
}

/// Attribute list failure: message and offset into the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeError {
    pub message: &'static str,
    pub offset: usize,
}

impl AttributeError {
    fn at(message: &'static str, offset: usize) -> Self {
        AttributeError { message, offset }
    }
}

/// Parse the raw content between the element name and `>` / `/>`
pub fn parse_attributes(input: &[u8]) -> Result<Vec<Attribute<'_>>, AttributeError> {
    let mut attrs: Vec<Attribute<'_>> = Vec::new();
    let mut pos = 0;

    loop {
        let before_ws = pos;
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos >= input.len() {
            break;
        }
        if pos == before_ws && !attrs.is_empty() {
            return Err(AttributeError::at("whitespace required between attributes", pos));
        }

        let name_start = pos;
        if !is_name_start_char(input[pos]) {
            return Err(AttributeError::at("invalid attribute name", pos));
        }
        while pos < input.len() && is_name_char(input[pos]) {
            pos += 1;
        }
        let name = &input[name_start..pos];

        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if input.get(pos) != Some(&b'=') {
            return Err(AttributeError::at("attribute value required", pos));
        }
        pos += 1;
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }

        let quote = match input.get(pos) {
            Some(&q @ (b'"' | b'\'')) => q,
            _ => return Err(AttributeError::at("attribute value must be quoted", pos)),
        };
        pos += 1;
        let value_len = memchr(quote, &input[pos..])
            .ok_or_else(|| AttributeError::at("unterminated attribute value", pos))?;
        let raw = &input[pos..pos + value_len];
        if let Some(lt) = memchr(b'<', raw) {
            return Err(AttributeError::at("'<' not allowed in attribute value", pos + lt));
        }
        pos += value_len + 1;

        if attrs.iter().any(|a| a.name == name) {
            return Err(AttributeError::at("duplicate attribute", name_start));
        }
        attrs.push(Attribute {
            name,
            value: decode_text(raw),
        });
    }

    Ok(attrs)
}
