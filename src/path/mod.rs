//! Tag-path navigation: raw-text resolution and tree extraction

pub mod compare;
pub mod extract;
pub mod resolver;

pub use compare::{local_name, tags_match};
pub use extract::{extract_by_path, get_unique_keys, ExtractionRow};
pub use resolver::resolve_path_at;
