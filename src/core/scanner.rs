//! Byte scanner for XML markup using memchr
//!
//! memchr picks SSE2/AVX2/NEON at runtime, so delimiter searches over
//! large finding aids stay fast without any unsafe code here.

use memchr::{memchr, memchr2, memmem};

/// Cursor over the raw document bytes
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.input.len());
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        &self.input[start..end]
    }

    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.input[self.pos..].starts_with(needle)
    }

    /// Skip space, tab, newline and carriage return
    #[inline]
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if !is_whitespace(b) {
                break;
            }
            self.pos += 1;
        }
    }

    /// Next '<' at or after the cursor
    #[inline]
    pub fn find_tag_start(&self) -> Option<usize> {
        memchr(b'<', &self.input[self.pos..]).map(|i| self.pos + i)
    }

    /// Position of the '>' closing the current tag, ignoring any '>' inside
    /// quoted attribute values
    pub fn find_tag_end_quoted(&self) -> Option<usize> {
        let mut pos = self.pos;
        loop {
            let hit = memchr2(b'>', b'"', &self.input[pos..])
                .into_iter()
                .chain(memchr(b'\'', &self.input[pos..]))
                .min()?;
            let at = pos + hit;
            match self.input[at] {
                b'>' => return Some(at),
                quote => {
                    let close = memchr(quote, &self.input[at + 1..])?;
                    pos = at + 1 + close + 1;
                }
            }
        }
    }

    /// Start offset of `needle` at or after the cursor
    #[inline]
    pub fn find_sequence(&self, needle: &[u8]) -> Option<usize> {
        memmem::find(&self.input[self.pos..], needle).map(|i| self.pos + i)
    }

    /// Read an XML name at the cursor, advancing past it
    pub fn read_name(&mut self) -> Option<&'a [u8]> {
        let start = self.pos;
        if !is_name_start_char(*self.input.get(start)?) {
            return None;
        }
        self.pos += 1;
        while self.pos < self.input.len() && is_name_char(self.input[self.pos]) {
            self.pos += 1;
        }
        Some(&self.input[start..self.pos])
    }
}

#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// ASCII letters, underscore, colon, and any non-ASCII UTF-8 byte
#[inline]
pub fn is_name_start_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

#[inline]
pub fn is_name_char(b: u8) -> bool {
    is_name_start_char(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_tag_start() {
        let scanner = Scanner::new(b"Box 1 <container>");
        assert_eq!(scanner.find_tag_start(), Some(6));
    }

    #[test]
    fn test_find_tag_end_quoted() {
        let scanner = Scanner::new(b"<container label=\"a>b\" type='x>y'>1");
        assert_eq!(scanner.find_tag_end_quoted(), Some(33));
    }

    #[test]
    fn test_find_tag_end_unterminated_quote() {
        let scanner = Scanner::new(b"<container type=\"box>");
        assert_eq!(scanner.find_tag_end_quoted(), None);
    }

    #[test]
    fn test_read_name() {
        let mut scanner = Scanner::new(b"ead:unittitle>");
        assert_eq!(scanner.read_name(), Some(b"ead:unittitle" as &[u8]));
        assert_eq!(scanner.position(), 13);
    }

    #[test]
    fn test_read_name_rejects_digit_start() {
        let mut scanner = Scanner::new(b"1c01>");
        assert_eq!(scanner.read_name(), None);
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn test_find_sequence() {
        let mut scanner = Scanner::new(b"<!-- note -- here -->rest");
        scanner.advance(4);
        assert_eq!(scanner.find_sequence(b"-->"), Some(18));
    }
}
