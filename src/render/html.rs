//! Minimal HTML fragment writer

/// Append-only HTML buffer
pub struct HtmlWriter {
    buf: String,
}

impl HtmlWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        HtmlWriter {
            buf: String::with_capacity(capacity),
        }
    }

    /// `<tag attr="value" ...>`; attributes with empty values are skipped
    pub fn open(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.buf.push('<');
        self.buf.push_str(tag);
        for &(name, value) in attrs {
            if value.is_empty() {
                continue;
            }
            self.buf.push(' ');
            self.buf.push_str(name);
            self.buf.push_str("=\"");
            escape_to_buf(value, &mut self.buf);
            self.buf.push('"');
        }
        self.buf.push('>');
    }

    pub fn close(&mut self, tag: &str) {
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
    }

    pub fn text(&mut self, text: &str) {
        escape_to_buf(text, &mut self.buf);
    }

    /// `<tag>text</tag>`
    pub fn element(&mut self, tag: &str, attrs: &[(&str, &str)], text: &str) {
        self.open(tag, attrs);
        self.text(text);
        self.close(tag);
    }

    pub fn newline(&mut self) {
        self.buf.push('\n');
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

#[inline]
fn escape_to_buf(s: &str, buf: &mut String) {
    for c in s.chars() {
        match c {
            '&' => buf.push_str("&amp;"),
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            '"' => buf.push_str("&quot;"),
            '\'' => buf.push_str("&#39;"),
            _ => buf.push(c),
        }
    }
}
