//! XML entity decoding and recovery escaping
//!
//! Handles the five built-in entities (&lt; &gt; &amp; &quot; &apos;) and
//! numeric character references (&#123; &#x7B;). Uses Cow for zero-copy when
//! no entities are present.
//!
//! Also provides the recovery-pass helper that escapes bare `&` characters
//! so a malformed fragment can be reparsed.

use memchr::memchr;
use std::borrow::Cow;

/// Decode text content, rejecting bare ampersands
///
/// Returns `Err(pos)` with the byte offset of the first `&` that does not
/// begin a recognized entity or character reference. This is the check that
/// sends malformed input down the recovery path.
#[inline]
pub fn decode_text_strict(input: &str) -> Result<Cow<'_, str>, usize> {
    if memchr(b'&', input.as_bytes()).is_none() {
        return Ok(Cow::Borrowed(input));
    }
    decode_entities(input).map(Cow::Owned)
}

/// Escape every bare `&` (one not starting a recognized reference) as `&amp;`
pub fn escape_bare_ampersands(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    let mut pos = 0;
    let mut has_bare = false;
    while let Some(i) = memchr(b'&', &bytes[pos..]).map(|i| pos + i) {
        if reference_len(bytes, i).is_none() {
            has_bare = true;
            break;
        }
        pos = i + 1;
    }
    if !has_bare {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + 8);
    let mut pos = 0;
    while pos < bytes.len() {
        match memchr(b'&', &bytes[pos..]).map(|i| pos + i) {
            Some(amp) => {
                result.push_str(&input[pos..amp]);
                match reference_len(bytes, amp) {
                    Some(len) => {
                        result.push_str(&input[amp..amp + len]);
                        pos = amp + len;
                    }
                    None => {
                        result.push_str("&amp;");
                        pos = amp + 1;
                    }
                }
            }
            None => {
                result.push_str(&input[pos..]);
                break;
            }
        }
    }
    Cow::Owned(result)
}

/// Decode all entity references in the input
fn decode_entities(input: &str) -> Result<String, usize> {
    let bytes = input.as_bytes();
    let mut result = String::with_capacity(input.len());
    let mut pos = 0;

    while pos < bytes.len() {
        match memchr(b'&', &bytes[pos..]).map(|i| pos + i) {
            Some(amp) => {
                result.push_str(&input[pos..amp]);
                match reference_len(bytes, amp) {
                    Some(len) => {
                        // Strip '&' and ';'
                        decode_reference(&input[amp + 1..amp + len - 1], &mut result);
                        pos = amp + len;
                    }
                    None => return Err(amp),
                }
            }
            None => {
                result.push_str(&input[pos..]);
                break;
            }
        }
    }

    Ok(result)
}

/// Length (including `&` and `;`) of a recognized reference at `amp`,
/// or None for a bare ampersand
fn reference_len(bytes: &[u8], amp: usize) -> Option<usize> {
    let rest = &bytes[amp + 1..];
    for named in [&b"amp;"[..], b"lt;", b"gt;", b"quot;", b"apos;"] {
        if rest.starts_with(named) {
            return Some(1 + named.len());
        }
    }
    if let Some(digits) = rest.strip_prefix(b"#x").or_else(|| rest.strip_prefix(b"#X")) {
        let n = digits.iter().take_while(|b| b.is_ascii_hexdigit()).count();
        if n > 0 && digits.get(n) == Some(&b';') {
            return Some(3 + n + 1);
        }
    } else if let Some(digits) = rest.strip_prefix(b"#") {
        let n = digits.iter().take_while(|b| b.is_ascii_digit()).count();
        if n > 0 && digits.get(n) == Some(&b';') {
            return Some(2 + n + 1);
        }
    }
    None
}

/// Decode a single recognized reference (without `&` and `;`) into `out`
fn decode_reference(entity: &str, out: &mut String) {
    match entity {
        "amp" => out.push('&'),
        "lt" => out.push('<'),
        "gt" => out.push('>'),
        "quot" => out.push('"'),
        "apos" => out.push('\''),
        _ => {
            // Numeric character reference, syntax already validated
            let code = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()
            } else {
                entity.strip_prefix('#').and_then(|d| d.parse().ok())
            };
            out.push(code.and_then(char::from_u32).unwrap_or('\u{FFFD}'));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_no_entities_is_borrowed() {
        assert!(matches!(decode_text_strict("plain text"), Ok(Cow::Borrowed(_))));
    }

    #[test]
    fn test_decode_named_entities() {
        assert_eq!(decode_text_strict("a &amp; b &lt;c&gt;").unwrap(), "a & b <c>");
        assert_eq!(decode_text_strict("&quot;x&apos;").unwrap(), "\"x'");
    }

    #[test]
    fn test_decode_numeric_references() {
        assert_eq!(decode_text_strict("&#65;&#x42;").unwrap(), "AB");
    }

    #[test]
    fn test_strict_rejects_bare_ampersand() {
        assert_eq!(decode_text_strict("A & B"), Err(2));
        assert_eq!(decode_text_strict("&undefined;").unwrap_err(), 0);
    }

    #[test]
    fn test_strict_accepts_references() {
        assert_eq!(decode_text_strict("a &amp; b").unwrap(), "a & b");
        assert_eq!(decode_text_strict("&#x2014;").unwrap(), "\u{2014}");
    }

    #[test]
    fn test_escape_bare_ampersands() {
        assert_eq!(escape_bare_ampersands("A & B"), "A &amp; B");
        assert_eq!(escape_bare_ampersands("R&D &amp; co"), "R&amp;D &amp; co");
        assert!(matches!(
            escape_bare_ampersands("all &lt;good&gt; &#10;"),
            Cow::Borrowed(_)
        ));
    }
}
