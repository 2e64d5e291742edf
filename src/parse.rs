//! Parse-with-recovery strategy
//!
//! A document is first parsed strictly. On failure, one recovery pass runs:
//! strip XML declarations, escape bare ampersands, wrap the text in a
//! synthetic fragment root (repairs multi-root and fragment input), and
//! reparse. The outcome is an explicit two-variant enum so callers can tell
//! a clean parse from a recovered one.

use crate::core::entities::escape_bare_ampersands;
use crate::dom::XmlDocument;
use memchr::memmem;
use tracing::{debug, warn};

/// Tag name of the synthetic wrapper element inserted during recovery
pub const FRAGMENT_ROOT: &str = "__fragment_root__";

/// Result of parsing a document with recovery
pub enum ParseOutcome {
    /// The document parsed as-is
    Clean(XmlDocument),
    /// The document parsed only after sanitizing and fragment-root wrapping
    Recovered(XmlDocument),
    /// Unparseable even after recovery
    Failed,
}

impl ParseOutcome {
    /// The tree, if any parse succeeded
    pub fn tree(&self) -> Option<&XmlDocument> {
        match self {
            ParseOutcome::Clean(doc) | ParseOutcome::Recovered(doc) => Some(doc),
            ParseOutcome::Failed => None,
        }
    }

    /// True if recovery was needed
    pub fn was_recovered(&self) -> bool {
        matches!(self, ParseOutcome::Recovered(_))
    }
}

/// Parse a document, applying one recovery pass on failure
pub fn parse_document(text: &str) -> ParseOutcome {
    let first_error = match XmlDocument::parse(text) {
        Ok(doc) => return ParseOutcome::Clean(doc),
        Err(e) => e,
    };
    debug!(error = %first_error, "strict parse failed, retrying with sanitized wrapper");

    let clean = strip_xml_declarations(text);
    let clean = escape_bare_ampersands(&clean);
    let wrapped = format!("<{FRAGMENT_ROOT}>{clean}</{FRAGMENT_ROOT}>");

    match XmlDocument::parse(&wrapped) {
        Ok(doc) => ParseOutcome::Recovered(doc),
        Err(e) => {
            warn!(error = %e, "document unparseable even after recovery");
            ParseOutcome::Failed
        }
    }
}

/// Remove every `<?xml ... ?>` declaration
fn strip_xml_declarations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while let Some(start) = memmem::find(&text.as_bytes()[pos..], b"<?xml").map(|i| pos + i) {
        out.push_str(&text[pos..start]);
        match memmem::find(&text.as_bytes()[start..], b"?>") {
            Some(end) => pos = start + end + 2,
            None => return out,
        }
    }
    out.push_str(&text[pos..]);
    out
}
