//! Input text decoding
//!
//! Detects UTF-16 input from a BOM or byte pattern and converts it to UTF-8
//! before tokenizing. A BOM always wins over the configured encoding; the
//! configured encoding is the assumption for BOM-less input.

use std::fmt;

/// Byte-to-text decoding applied to raw parse input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl TextEncoding {
    /// Detect encoding from a BOM or an early null-byte pattern. Returns
    /// None when the input carries no recognizable marker.
    pub fn detect(input: &[u8]) -> Option<Self> {
        if input.len() < 2 {
            return None;
        }
        match (input[0], input[1]) {
            (0xFF, 0xFE) => Some(TextEncoding::Utf16Le),
            (0xFE, 0xFF) => Some(TextEncoding::Utf16Be),
            (0xEF, 0xBB) if input.get(2) == Some(&0xBF) => Some(TextEncoding::Utf8),
            (0x00, b'<') => Some(TextEncoding::Utf16Be),
            (b'<', 0x00) => Some(TextEncoding::Utf16Le),
            _ => None,
        }
    }
}

/// Failure to decode input bytes under the selected encoding.
#[derive(Debug, Clone)]
pub struct DecodeError {
    message: String,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DecodeError {}

impl DecodeError {
    fn new(message: impl Into<String>) -> Self {
        DecodeError {
            message: message.into(),
        }
    }
}

/// Decode raw input to a UTF-8 string under `assumed`, honoring a BOM when
/// one is present.
pub fn decode(input: &[u8], assumed: TextEncoding) -> Result<String, DecodeError> {
    let encoding = TextEncoding::detect(input).unwrap_or(assumed);

    match encoding {
        TextEncoding::Utf8 => {
            let body = input.strip_prefix(&[0xEF, 0xBB, 0xBF][..]).unwrap_or(input);
            std::str::from_utf8(body)
                .map(str::to_owned)
                .map_err(|e| DecodeError::new(format!("invalid UTF-8: {e}")))
        }
        TextEncoding::Utf16Le => decode_utf16(input, &[0xFF, 0xFE], u16::from_le_bytes),
        TextEncoding::Utf16Be => decode_utf16(input, &[0xFE, 0xFF], u16::from_be_bytes),
    }
}

fn decode_utf16(
    input: &[u8],
    bom: &[u8],
    from_bytes: fn([u8; 2]) -> u16,
) -> Result<String, DecodeError> {
    let body = input.strip_prefix(bom).unwrap_or(input);
    if body.len() % 2 != 0 {
        return Err(DecodeError::new("invalid UTF-16: odd number of bytes"));
    }

    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| from_bytes([pair[0], pair[1]]))
        .collect();

    String::from_utf16(&units).map_err(|e| DecodeError::new(format!("invalid UTF-16: {e}")))
}
