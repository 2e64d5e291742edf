//! xmlglass - Lenient XML navigation and search
//!
//! Three entry points over messy real-world XML:
//! A: Raw-text path resolution (resolve_path_at) - works on malformed input
//! B: Tree extraction by tag path (extract_by_path, get_unique_keys)
//! C: Case-insensitive search with raw byte offsets (search, search_documents)
//!
//! Parsing is strict-first with one recovery pass (declaration stripping,
//! ampersand escaping, synthetic fragment root); see [`parse_document`].

pub mod core;
pub mod dom;
pub mod error;
pub mod parse;
pub mod path;
pub mod search;

pub use dom::{TreeAccess, XmlDocument};
pub use error::Error;
pub use parse::{parse_document, ParseOutcome, FRAGMENT_ROOT};
pub use path::{extract_by_path, get_unique_keys, resolve_path_at, ExtractionRow};
pub use search::{search, search_documents, ContextLine, FileHit, SearchHit, SourceFile};
