//! XML entity decoding and output escaping
//!
//! Decodes the five built-in entities plus decimal/hex character references.
//! Unknown entities are left verbatim so that feed content with stray
//! ampersands survives a permissive parse.

use memchr::memchr;
use std::borrow::Cow;

/// Decode entity references in text content.
///
/// Returns Borrowed when no `&` is present (zero-copy fast path).
#[inline]
pub fn decode_text(input: &[u8]) -> Cow<'_, [u8]> {
    if memchr(b'&', input).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_entities(input))
}

fn decode_entities(input: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(input.len());
    let mut pos = 0;

    while pos < input.len() {
        match memchr(b'&', &input[pos..]) {
            Some(amp) => {
                result.extend_from_slice(&input[pos..pos + amp]);
                pos += amp;

                match memchr(b';', &input[pos..]) {
                    Some(semi) => {
                        let entity = &input[pos + 1..pos + semi];
                        if let Some(decoded) = decode_entity(entity) {
                            let mut buf = [0u8; 4];
                            result.extend_from_slice(decoded.encode_utf8(&mut buf).as_bytes());
                            pos += semi + 1;
                        } else {
                            // Unknown entity, keep the ampersand verbatim
                            result.push(b'&');
                            pos += 1;
                        }
                    }
                    None => {
                        result.push(b'&');
                        pos += 1;
                    }
                }
            }
            None => {
                result.extend_from_slice(&input[pos..]);
                break;
            }
        }
    }

    result
}

/// Decode a single entity body (without `&` and `;`).
fn decode_entity(entity: &[u8]) -> Option<char> {
    match entity {
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"amp" => Some('&'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        // Common HTML named entities seen in feed payloads
        b"nbsp" => Some('\u{00A0}'),
        b"mdash" => Some('\u{2014}'),
        b"ndash" => Some('\u{2013}'),
        b"hellip" => Some('\u{2026}'),
        b"laquo" => Some('\u{00AB}'),
        b"raquo" => Some('\u{00BB}'),
        [b'#', rest @ ..] => decode_char_reference(rest),
        _ => None,
    }
}

/// Decode a numeric character reference body (`#65` / `#x41`, leading `#`
/// already stripped).
fn decode_char_reference(entity: &[u8]) -> Option<char> {
    if entity.is_empty() {
        return None;
    }

    let codepoint = if entity[0] == b'x' || entity[0] == b'X' {
        let hex = std::str::from_utf8(&entity[1..]).ok()?;
        u32::from_str_radix(hex, 16).ok()?
    } else {
        let dec = std::str::from_utf8(entity).ok()?;
        dec.parse::<u32>().ok()?
    };

    char::from_u32(codepoint)
}

/// Escape text for XML output.
pub fn encode_text(input: &str) -> Cow<'_, str> {
    if !input
        .bytes()
        .any(|b| matches!(b, b'<' | b'>' | b'&' | b'"' | b'\''))
    {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_entities_is_borrowed() {
        let result = decode_text(b"plain text");
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn builtin_entities() {
        let result = decode_text(b"&lt;a&gt; &amp; &quot;b&quot;");
        assert_eq!(result.as_ref(), b"<a> & \"b\"");
    }

    #[test]
    fn numeric_references() {
        assert_eq!(decode_text(b"&#65;&#x42;").as_ref(), b"AB");
    }

    #[test]
    fn unknown_entity_kept_verbatim() {
        assert_eq!(decode_text(b"&bogus; &").as_ref(), b"&bogus; &");
    }

    #[test]
    fn encode_escapes_markup() {
        assert_eq!(encode_text("a < b & c"), "a &lt; b &amp; c");
        assert!(matches!(encode_text("clean"), Cow::Borrowed(_)));
    }

    #[test]
    fn roundtrip_through_escape() {
        let decoded = decode_text(encode_text("<&>\"'").as_bytes()).into_owned();
        assert_eq!(decoded, b"<&>\"'");
    }
}
