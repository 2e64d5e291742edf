//! Raw-text path resolution
//!
//! Answers "which element hierarchy encloses byte offset N?" by scanning
//! raw markup with the lenient tokenizer — no tree is built, so this works
//! on truncated and malformed documents alike.

use super::compare::tags_match;
use crate::core::tokenizer::{TokenKind, Tokenizer};

/// Resolve the enclosing tag hierarchy at a byte offset
///
/// Returns the stack of tag names from the outermost enclosing element down
/// to the innermost, or None when the offset sits outside any element. When
/// the offset falls strictly inside a tag's `<...>` delimiters, the result
/// ends with that tag's name — for opening and closing tags alike, since the
/// question "which element is this" has the same answer either way.
pub fn resolve_path_at(text: &str, offset: usize) -> Option<Vec<String>> {
    let mut stack: Vec<&str> = Vec::new();

    for token in Tokenizer::new(text) {
        if token.span.0 > offset {
            break;
        }
        let name = match token.kind {
            TokenKind::Open | TokenKind::Close => token.name.unwrap_or_default(),
            // Comments, CDATA, PIs, DOCTYPEs never affect the stack
            _ => continue,
        };

        // Cursor inside the tag delimiters themselves
        if token.span.0 < offset && offset < token.span.1 {
            let mut path: Vec<String> = stack.iter().map(|s| s.to_string()).collect();
            path.push(name.to_string());
            return Some(path);
        }

        match token.kind {
            TokenKind::Close => {
                // Pop only on a permissive match; unbalanced markup leaves
                // the stack untouched
                if let Some(top) = stack.last() {
                    if tags_match(top, name) {
                        stack.pop();
                    }
                }
            }
            TokenKind::Open if !token.self_closing => stack.push(name),
            _ => {}
        }
    }

    if stack.is_empty() {
        None
    } else {
        Some(stack.into_iter().map(String::from).collect())
    }
}
