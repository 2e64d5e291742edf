//! Attribute parsing from raw tag content
//!
//! Lenient parser for the region between an element name and the closing
//! delimiter. Tolerates missing values, missing quotes, and junk bytes.

use super::entities::decode_text_strict;
use super::scanner::{is_name_char, is_whitespace};
use std::borrow::Cow;

/// A parsed attribute, value entity-decoded
#[derive(Debug, Clone)]
pub struct Attribute<'a> {
    pub name: &'a str,
    pub value: Cow<'a, str>,
}

/// Parse attributes from raw tag content, in document order
///
/// Returns `Err(pos)` (relative to `input`) if an attribute value contains a
/// bare ampersand; the caller turns that into a recovery-triggering parse
/// failure.
pub fn parse_attributes(input: &str) -> Result<Vec<Attribute<'_>>, usize> {
    let bytes = input.as_bytes();
    let mut attrs = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }

        // Parse attribute name
        let name_start = pos;
        while pos < bytes.len() && is_name_char(bytes[pos]) {
            pos += 1;
        }
        if pos == name_start {
            // Junk byte, skip it
            pos += 1;
            continue;
        }
        let name = &input[name_start..pos];

        // Skip whitespace around '='
        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }
        if pos >= bytes.len() || bytes[pos] != b'=' {
            // Attribute without a value
            attrs.push(Attribute {
                name,
                value: Cow::Borrowed(""),
            });
            continue;
        }
        pos += 1;
        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }
        if pos >= bytes.len() {
            attrs.push(Attribute {
                name,
                value: Cow::Borrowed(""),
            });
            break;
        }

        // Parse attribute value, quoted or bare
        let raw = if bytes[pos] == b'"' || bytes[pos] == b'\'' {
            let quote = bytes[pos];
            pos += 1;
            let value_start = pos;
            while pos < bytes.len() && bytes[pos] != quote {
                pos += 1;
            }
            let raw = &input[value_start..pos];
            if pos < bytes.len() {
                pos += 1; // Skip closing quote
            }
            raw
        } else {
            let value_start = pos;
            while pos < bytes.len() && !is_whitespace(bytes[pos]) {
                pos += 1;
            }
            &input[value_start..pos]
        };

        let raw_offset = raw.as_ptr() as usize - input.as_ptr() as usize;
        let value = decode_text_strict(raw).map_err(|e| raw_offset + e)?;
        attrs.push(Attribute { name, value });
    }

    Ok(attrs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_attributes() {
        let attrs = parse_attributes(" id=\"main\" class='wide'").unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].name, "id");
        assert_eq!(attrs[0].value, "main");
        assert_eq!(attrs[1].name, "class");
        assert_eq!(attrs[1].value, "wide");
    }

    #[test]
    fn test_entity_in_value() {
        let attrs = parse_attributes(" title=\"a &amp; b\"").unwrap();
        assert_eq!(attrs[0].value, "a & b");
    }

    #[test]
    fn test_bare_ampersand_in_value_is_error() {
        assert!(parse_attributes(" title=\"a & b\"").is_err());
    }

    #[test]
    fn test_valueless_and_unquoted() {
        let attrs = parse_attributes(" checked value=3").unwrap();
        assert_eq!(attrs[0].name, "checked");
        assert_eq!(attrs[0].value, "");
        assert_eq!(attrs[1].name, "value");
        assert_eq!(attrs[1].value, "3");
    }

    #[test]
    fn test_order_preserved() {
        let attrs = parse_attributes(" z=\"1\" a=\"2\"").unwrap();
        let names: Vec<_> = attrs.iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["z", "a"]);
    }
}
