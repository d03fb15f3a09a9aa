//! Push-style XML tokenizer
//!
//! Walks the input once and delivers start-tag, character-data and end-tag
//! callbacks to a [`SaxHandler`] in document order. Self-closing tags are
//! delivered as a start immediately followed by an end. Comments, processing
//! instructions, DOCTYPE and the XML declaration are consumed silently;
//! CDATA sections are delivered as character data without entity decoding.
//!
//! Parsing is permissive: unparseable markup is skipped or re-emitted as
//! text, and a truncated document simply stops delivering events. The tree
//! builders upstream return whatever was built at that point.

use super::entities::decode_text;
use super::scanner::{is_name_start_char, Scanner};

/// Consumer of tokenizer events.
///
/// Names and attribute values arrive decoded (entities resolved) and, when
/// the tokenizer was created with `local_names`, with namespace prefixes
/// stripped. Character data is delivered as-is from the document, one
/// callback per text run; adjacent runs are never merged here.
pub trait SaxHandler {
    fn start_element(&mut self, name: &str, attributes: &[(String, String)]);
    fn characters(&mut self, text: &str);
    fn end_element(&mut self, name: &str);
}

pub struct Tokenizer<'a> {
    input: &'a [u8],
    scanner: Scanner<'a>,
    /// Strip namespace prefixes from element/attribute names.
    local_names: bool,
    /// Reused per-element attribute buffer.
    attrs_buf: Vec<(String, String)>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a [u8], local_names: bool) -> Self {
        Tokenizer {
            input,
            scanner: Scanner::new(input),
            local_names,
            attrs_buf: Vec::with_capacity(8),
        }
    }

    /// Run a single pass over the input, delivering events to `handler`.
    pub fn run<H: SaxHandler>(&mut self, handler: &mut H) {
        while !self.scanner.is_eof() {
            match self.scanner.peek() {
                Some(b'<') => self.scan_markup(handler),
                Some(_) => self.scan_text(handler),
                None => break,
            }
        }
    }

    fn scan_markup<H: SaxHandler>(&mut self, handler: &mut H) {
        let start = self.scanner.position();
        self.scanner.advance(1); // '<'

        match self.scanner.peek() {
            Some(b'/') => {
                self.scanner.advance(1);
                self.scan_end_tag(handler);
            }
            Some(b'!') => {
                self.scanner.advance(1);
                if self.scanner.starts_with(b"--") {
                    self.scanner.advance(2);
                    self.skip_past(b"-->");
                } else if self.scanner.starts_with(b"[CDATA[") {
                    self.scanner.advance(7);
                    self.scan_cdata(handler);
                } else {
                    // DOCTYPE or an unrecognized declaration, possibly
                    // carrying a bracketed internal subset
                    self.skip_declaration();
                }
            }
            Some(b'?') => {
                self.scanner.advance(1);
                self.skip_past(b"?>");
            }
            Some(c) if is_name_start_char(c) => {
                self.scanner.set_position(start);
                self.scan_start_tag(handler);
            }
            _ => {
                // Not valid markup: emit the '<' as literal text and let the
                // text scanner pick up from the following byte.
                handler.characters("<");
            }
        }
    }

    fn scan_start_tag<H: SaxHandler>(&mut self, handler: &mut H) {
        self.scanner.advance(1); // '<'

        let name = match self.scanner.read_name() {
            Some(bytes) => self.resolve_name(bytes),
            None => return,
        };

        self.attrs_buf.clear();
        self.scanner.skip_whitespace();

        while !self.scanner.is_eof() {
            match self.scanner.peek() {
                Some(b'>') => {
                    self.scanner.advance(1);
                    handler.start_element(&name, &self.attrs_buf);
                    return;
                }
                Some(b'/') => {
                    self.scanner.advance(1);
                    if self.scanner.peek() == Some(b'>') {
                        self.scanner.advance(1);
                        handler.start_element(&name, &self.attrs_buf);
                        handler.end_element(&name);
                        return;
                    }
                }
                Some(c) if is_name_start_char(c) => {
                    if let Some(attr) = self.scan_attribute() {
                        self.attrs_buf.push(attr);
                    }
                }
                _ => self.scanner.advance(1),
            }
            self.scanner.skip_whitespace();
        }

        // Input ended inside the tag: the element never opened.
    }

    fn scan_attribute(&mut self) -> Option<(String, String)> {
        let name_bytes = self.scanner.read_name()?;
        let name = self.resolve_name(name_bytes);

        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'=') {
            return None;
        }
        self.scanner.advance(1);
        self.scanner.skip_whitespace();

        let quote = self.scanner.peek()?;
        if quote != b'"' && quote != b'\'' {
            return None;
        }
        self.scanner.advance(1);

        let value_start = self.scanner.position();
        let value_end = self.scanner.find_byte(quote).unwrap_or(self.input.len());
        self.scanner.set_position((value_end + 1).min(self.input.len()));

        let raw = self.scanner.bytes(value_start, value_end);
        let decoded = decode_text(raw);
        Some((name, String::from_utf8_lossy(&decoded).into_owned()))
    }

    fn scan_end_tag<H: SaxHandler>(&mut self, handler: &mut H) {
        self.scanner.skip_whitespace();

        let name = match self.scanner.read_name() {
            Some(bytes) => self.resolve_name(bytes),
            None => {
                self.skip_to_tag_end();
                return;
            }
        };

        self.scanner.skip_whitespace();
        if self.scanner.peek() == Some(b'>') {
            self.scanner.advance(1);
        }
        handler.end_element(&name);
    }

    fn scan_text<H: SaxHandler>(&mut self, handler: &mut H) {
        let start = self.scanner.position();
        let end = self.scanner.find_byte(b'<').unwrap_or(self.input.len());
        self.scanner.set_position(end);

        if end > start {
            let decoded = decode_text(self.scanner.bytes(start, end));
            handler.characters(&String::from_utf8_lossy(&decoded));
        }
    }

    fn scan_cdata<H: SaxHandler>(&mut self, handler: &mut H) {
        let start = self.scanner.position();
        let end = loop {
            match self.scanner.find_byte(b']') {
                Some(pos) => {
                    self.scanner.set_position(pos);
                    if self.scanner.starts_with(b"]]>") {
                        self.scanner.advance(3);
                        break pos;
                    }
                    self.scanner.advance(1);
                }
                None => {
                    // Unterminated CDATA: take everything to EOF
                    self.scanner.set_position(self.input.len());
                    break self.input.len();
                }
            }
        };

        if end > start {
            let raw = &self.input[start..end];
            handler.characters(&String::from_utf8_lossy(raw));
        }
    }

    /// Advance past the next occurrence of `marker`, or to EOF.
    fn skip_past(&mut self, marker: &[u8]) {
        loop {
            match self.scanner.find_byte(marker[0]) {
                Some(pos) => {
                    self.scanner.set_position(pos);
                    if self.scanner.starts_with(marker) {
                        self.scanner.advance(marker.len());
                        return;
                    }
                    self.scanner.advance(1);
                }
                None => {
                    self.scanner.set_position(self.input.len());
                    return;
                }
            }
        }
    }

    fn skip_to_tag_end(&mut self) {
        match self.scanner.find_tag_end_quoted() {
            Some(pos) => self.scanner.set_position(pos + 1),
            None => self.scanner.set_position(self.input.len()),
        }
    }

    fn skip_declaration(&mut self) {
        match self.scanner.find_declaration_end() {
            Some(pos) => self.scanner.set_position(pos + 1),
            None => self.scanner.set_position(self.input.len()),
        }
    }

    fn resolve_name(&self, bytes: &[u8]) -> String {
        let name = String::from_utf8_lossy(bytes);
        if self.local_names {
            if let Some(idx) = name.rfind(':') {
                return name[idx + 1..].to_owned();
            }
        }
        name.into_owned()
    }
}
