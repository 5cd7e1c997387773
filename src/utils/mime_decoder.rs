use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use regex::Regex;

/// Decode MIME encoded-word headers (RFC 2047)
/// Supports both Q-encoding and B-encoding
/// Format: =?charset?encoding?encoded-text?=
///
/// Sender display names in marketing mail are routinely encoded this way;
/// the scan output shows the decoded form.
pub fn decode_mime_header(input: &str) -> String {
    lazy_static::lazy_static! {
        static ref ENCODED_WORD_RE: Regex = Regex::new(
            r"=\?([^?]+)\?([BbQq])\?([^?]*)\?="
        ).unwrap();
    }

    let mut result = String::new();
    let mut last_end = 0;
    let mut prev_was_encoded_word = false;

    for cap in ENCODED_WORD_RE.captures_iter(input) {
        let (full_match, [_charset, encoding, encoded_text]) = cap.extract();
        let start = cap.get(0).unwrap().start();
        let end = cap.get(0).unwrap().end();

        let between = &input[last_end..start];
        // Whitespace between two adjacent encoded words is not significant
        // (RFC 2047 section 6.2); anything else is kept.
        if !(prev_was_encoded_word && between.chars().all(char::is_whitespace)) {
            result.push_str(between);
        }

        let decoded = match encoding.to_uppercase().as_str() {
            "B" => decode_base64(encoded_text),
            "Q" => decode_quoted_printable(encoded_text),
            _ => full_match.to_string(),
        };
        result.push_str(&decoded);

        prev_was_encoded_word = true;
        last_end = end;
    }

    // If no encoded words were found, return the original string
    if last_end == 0 {
        return input.to_string();
    }

    if last_end < input.len() {
        result.push_str(&input[last_end..]);
    }
    result
}

fn decode_base64(encoded: &str) -> String {
    BASE64
        .decode(encoded)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| encoded.to_string())
}

fn decode_quoted_printable(encoded: &str) -> String {
    let bytes = encoded.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'=' if i + 2 < bytes.len() => {
                let hex = &encoded[i + 1..i + 3];
                if let Ok(byte) = u8::from_str_radix(hex, 16) {
                    result.push(byte);
                    i += 3;
                } else {
                    // Not a valid hex sequence, treat as literal
                    result.push(bytes[i]);
                    i += 1;
                }
            }
            // In Q-encoding, underscore represents space
            b'_' => {
                result.push(b' ');
                i += 1;
            }
            _ => {
                result.push(bytes[i]);
                i += 1;
            }
        }
    }

    String::from_utf8(result).unwrap_or_else(|_| encoded.to_string())
}
