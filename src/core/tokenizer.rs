//! XML tokenizer
//!
//! Pull-style tokenizer producing tags, text, CDATA, comments, processing
//! instructions and prolog declarations. Lexical well-formedness problems
//! (bad names, unterminated constructs, broken attribute lists) are
//! reported here; nesting problems are left to the DOM builder.

use super::attributes::{parse_attributes, Attribute};
use super::entities::decode_text;
use super::scanner::{is_whitespace, Scanner};
use crate::error::{EadError, Result};
use memchr::memchr2;
use std::borrow::Cow;

/// A lexical XML token
#[derive(Debug, Clone)]
pub enum Token<'a> {
    /// `<name attrs>` or `<name attrs/>`
    StartTag {
        name: &'a [u8],
        attributes: Vec<Attribute<'a>>,
        empty: bool,
    },
    /// `</name>`
    EndTag { name: &'a [u8] },
    /// Character data with entities decoded
    Text(Cow<'a, [u8]>),
    /// `<![CDATA[...]]>` content
    CData(&'a [u8]),
    /// `<!--...-->` content
    Comment(&'a [u8]),
    /// `<?target data?>`
    ProcessingInstruction { target: &'a [u8] },
    /// `<?xml ...?>`
    XmlDeclaration,
    /// `<!DOCTYPE ...>`, internal subset included
    DocType,
}

/// Tokenizer over a UTF-8 document
pub struct Tokenizer<'a> {
    scanner: Scanner<'a>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Tokenizer {
            scanner: Scanner::new(input),
        }
    }

    /// Next token with its starting byte offset, `Ok(None)` at end of input
    pub fn next_token(&mut self) -> Result<Option<(usize, Token<'a>)>> {
        if self.scanner.is_eof() {
            return Ok(None);
        }
        let start = self.scanner.position();
        let token = if self.scanner.peek() == Some(b'<') {
            self.parse_markup(start)?
        } else {
            self.parse_text(start)
        };
        Ok(Some((start, token)))
    }

    fn parse_text(&mut self, start: usize) -> Token<'a> {
        let end = self.scanner.find_tag_start().unwrap_or(start + self.scanner.remaining().len());
        self.scanner.set_position(end);
        Token::Text(decode_text(self.scanner.slice(start, end)))
    }

    fn parse_markup(&mut self, start: usize) -> Result<Token<'a>> {
        if self.scanner.starts_with(b"<?") {
            self.parse_pi(start)
        } else if self.scanner.starts_with(b"<!--") {
            self.scanner.advance(4);
            let content = self.read_until(b"-->", "unterminated comment", start)?;
            Ok(Token::Comment(content))
        } else if self.scanner.starts_with(b"<![CDATA[") {
            self.scanner.advance(9);
            let content = self.read_until(b"]]>", "unterminated CDATA section", start)?;
            Ok(Token::CData(content))
        } else if self.scanner.starts_with(b"<!DOCTYPE") {
            self.parse_doctype(start)
        } else if self.scanner.starts_with(b"<!") {
            Err(EadError::parse("invalid markup declaration", start))
        } else if self.scanner.starts_with(b"</") {
            self.parse_end_tag(start)
        } else {
            self.parse_start_tag(start)
        }
    }

    /// Content up to `terminator`, leaving the cursor after it
    fn read_until(&mut self, terminator: &[u8], message: &str, start: usize) -> Result<&'a [u8]> {
        let content_start = self.scanner.position();
        let end = self
            .scanner
            .find_sequence(terminator)
            .ok_or_else(|| EadError::parse(message, start))?;
        self.scanner.set_position(end + terminator.len());
        Ok(self.scanner.slice(content_start, end))
    }

    fn parse_pi(&mut self, start: usize) -> Result<Token<'a>> {
        self.scanner.advance(2);
        let target = self
            .scanner
            .read_name()
            .ok_or_else(|| EadError::parse("invalid processing instruction target", start))?;
        self.read_until(b"?>", "unterminated processing instruction", start)?;

        if target.eq_ignore_ascii_case(b"xml") {
            if start != 0 {
                return Err(EadError::parse("XML declaration must be at the start of the document", start));
            }
            return Ok(Token::XmlDeclaration);
        }
        Ok(Token::ProcessingInstruction { target })
    }

    fn parse_doctype(&mut self, start: usize) -> Result<Token<'a>> {
        self.scanner.advance(9);
        let unterminated = || EadError::parse("unterminated DOCTYPE declaration", start);

        let stop = memchr2(b'[', b'>', self.scanner.remaining()).ok_or_else(unterminated)?;
        let at = self.scanner.position() + stop;
        self.scanner.set_position(at);

        if self.scanner.peek() == Some(b'[') {
            self.read_until(b"]", "unterminated DOCTYPE internal subset", start)?;
            self.scanner.skip_whitespace();
            if self.scanner.peek() != Some(b'>') {
                return Err(unterminated());
            }
        }
        self.scanner.advance(1);
        Ok(Token::DocType)
    }

    fn parse_end_tag(&mut self, start: usize) -> Result<Token<'a>> {
        self.scanner.advance(2);
        let name = self
            .scanner
            .read_name()
            .ok_or_else(|| EadError::parse("invalid element name in end tag", start))?;
        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'>') {
            return Err(EadError::parse("malformed end tag", start));
        }
        self.scanner.advance(1);
        Ok(Token::EndTag { name })
    }

    fn parse_start_tag(&mut self, start: usize) -> Result<Token<'a>> {
        self.scanner.advance(1);
        let name = self
            .scanner
            .read_name()
            .ok_or_else(|| EadError::parse("invalid element name", start))?;
        let attrs_start = self.scanner.position();
        if let Some(b) = self.scanner.peek() {
            if !is_whitespace(b) && b != b'>' && b != b'/' {
                return Err(EadError::parse("invalid character in element name", attrs_start));
            }
        }

        let end = self
            .scanner
            .find_tag_end_quoted()
            .ok_or_else(|| EadError::parse("unterminated start tag", start))?;
        let empty = end > attrs_start && self.scanner.slice(end - 1, end) == b"/";
        let attrs_end = if empty { end - 1 } else { end };

        let attributes = parse_attributes(self.scanner.slice(attrs_start, attrs_end))
            .map_err(|e| EadError::parse(e.message, attrs_start + e.offset))?;

        self.scanner.set_position(end + 1);
        Ok(Token::StartTag {
            name,
            attributes,
            empty,
        })
    }
}
