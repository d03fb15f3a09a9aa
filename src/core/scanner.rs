//! Byte-level scanning over raw XML input
//!
//! Delimiter searches go through memchr, which uses SIMD where the
//! platform supports it (SSE2/AVX2 on x86_64, NEON on aarch64).

use memchr::memchr;

/// Cursor over the raw input bytes.
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0 }
    }

    /// Current byte offset.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Peek at the current byte without advancing.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Slice of the input between two absolute offsets.
    #[inline]
    pub fn bytes(&self, start: usize, end: usize) -> &'a [u8] {
        &self.input[start..end]
    }

    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.input[self.pos..].starts_with(needle)
    }

    /// Skip XML whitespace (space, tab, newline, carriage return).
    #[inline]
    pub fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() {
            match self.input[self.pos] {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }

    /// Find the next occurrence of `byte` at or after the current position.
    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr(byte, &self.input[self.pos..]).map(|i| self.pos + i)
    }

    /// Find the next `>` that is not inside a quoted attribute value.
    pub fn find_tag_end_quoted(&self) -> Option<usize> {
        let mut pos = self.pos;
        let mut in_single = false;
        let mut in_double = false;

        while pos < self.input.len() {
            match self.input[pos] {
                b'"' if !in_single => in_double = !in_double,
                b'\'' if !in_double => in_single = !in_single,
                b'>' if !in_single && !in_double => return Some(pos),
                _ => {}
            }
            pos += 1;
        }
        None
    }

    /// Find the `>` closing a declaration, skipping quoted spans and any
    /// bracketed internal subset (as in a DOCTYPE with entity declarations).
    pub fn find_declaration_end(&self) -> Option<usize> {
        let mut pos = self.pos;
        let mut in_single = false;
        let mut in_double = false;
        let mut depth = 0usize;

        while pos < self.input.len() {
            match self.input[pos] {
                b'"' if !in_single => in_double = !in_double,
                b'\'' if !in_double => in_single = !in_single,
                b'[' if !in_single && !in_double => depth += 1,
                b']' if !in_single && !in_double => depth = depth.saturating_sub(1),
                b'>' if !in_single && !in_double && depth == 0 => return Some(pos),
                _ => {}
            }
            pos += 1;
        }
        None
    }

    /// Read an XML name, returning the matched slice or None if the current
    /// byte cannot start a name.
    pub fn read_name(&mut self) -> Option<&'a [u8]> {
        let start = self.pos;
        match self.input.get(start) {
            Some(&b) if is_name_start_char(b) => self.pos += 1,
            _ => return None,
        }
        while self.pos < self.input.len() && is_name_char(self.input[self.pos]) {
            self.pos += 1;
        }
        Some(&self.input[start..self.pos])
    }
}

/// Valid XML name start character: ASCII letter, underscore, colon, or any
/// non-ASCII byte (multi-byte UTF-8).
#[inline]
pub fn is_name_start_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

/// Valid XML name continuation character.
#[inline]
fn is_name_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.' | b':') || b >= 0x80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_name_stops_at_delimiter() {
        let mut scanner = Scanner::new(b"channel>");
        assert_eq!(scanner.read_name(), Some(b"channel" as &[u8]));
        assert_eq!(scanner.position(), 7);
    }

    #[test]
    fn read_name_rejects_digit_start() {
        let mut scanner = Scanner::new(b"1bad");
        assert_eq!(scanner.read_name(), None);
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn tag_end_ignores_quoted_gt() {
        let scanner = Scanner::new(b"<a href=\"x>y\">text");
        assert_eq!(scanner.find_tag_end_quoted(), Some(13));
    }

    #[test]
    fn declaration_end_spans_internal_subset() {
        let scanner = Scanner::new(b"DOCTYPE r [ <!ENTITY x \"y\"> ]><r/>");
        assert_eq!(scanner.find_declaration_end(), Some(29));

        let scanner = Scanner::new(b"DOCTYPE r SYSTEM \"a>b\"><r/>");
        assert_eq!(scanner.find_declaration_end(), Some(22));
    }

    #[test]
    fn skip_whitespace_mixed() {
        let mut scanner = Scanner::new(b" \t\r\n<item>");
        scanner.skip_whitespace();
        assert_eq!(scanner.peek(), Some(b'<'));
    }
}
