//! Document search: tree-walk matching, raw-offset reconciliation,
//! breadcrumb context, parallel multi-file fan-out

pub mod context;
pub mod engine;

pub use context::ContextLine;
pub use engine::{search, search_documents, FileHit, SearchHit, SourceFile, MIN_QUERY_LEN};
