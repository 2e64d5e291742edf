//! Error type for the strict-parse boundary
//!
//! Public operations never surface these: per the degradation policy, an
//! unparseable document yields empty results. The variants exist so the
//! recovery layer can decide what a sanitizing reparse might fix and so
//! diagnostics carry a byte position.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("closing tag </{found}> at byte {position} does not match open <{expected}>")]
    TagMismatch {
        expected: String,
        found: String,
        position: usize,
    },

    #[error("closing tag </{found}> at byte {position} has no matching open tag")]
    UnexpectedClose { found: String, position: usize },

    #[error("element <{name}> is never closed")]
    UnclosedElement { name: String },

    #[error("document has multiple root elements (second starts at byte {position})")]
    MultipleRoots { position: usize },

    #[error("text content outside the root element at byte {position}")]
    TopLevelText { position: usize },

    #[error("bare '&' at byte {position} does not start a recognized entity")]
    BareAmpersand { position: usize },

    #[error("document has no root element")]
    NoRootElement,
}
