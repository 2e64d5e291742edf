//! Case-insensitive document search with raw-offset reconciliation
//!
//! Matching runs over the parsed tree (tag names, attributes, text) while
//! result offsets must point into the raw document the caller holds. The
//! two views are reconciled with a monotonic scan cursor: each hit searches
//! the raw text forward from where the previous hit left off and never
//! rewinds, so repeated values land on successive raw occurrences. When the
//! structural target cannot be located verbatim (entity-encoded text), a
//! query-only fallback runs from the cursor; the resulting offset is
//! approximate by design and may be absent entirely.

use super::context::{breadcrumb_trail, format_attributes, opening_tag, ContextLine};
use crate::dom::{NodeId, NodeKind, TreeAccess, XmlDocument};
use memchr::memmem;
use rayon::prelude::*;
use tracing::debug;

/// Queries shorter than this return no hits
pub const MIN_QUERY_LEN: usize = 2;

/// Inline text shorter than this is shown whole in the match line
const INLINE_TEXT_LIMIT: usize = 50;

/// One search match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Breadcrumb trail ending in the matched line
    pub context: Vec<ContextLine>,
    /// Byte offset of the match in the raw document, when it could be
    /// reconciled
    pub start: Option<usize>,
    /// Byte length of the query
    pub len: usize,
    /// 0-based index of this hit within its document
    pub ordinal: usize,
}

/// A named document to search
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

/// A hit paired with the file it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHit {
    pub file_name: String,
    pub hit: SearchHit,
}

/// Search one document for a query, case-insensitively
///
/// Nodes are visited in document order; each element yields at most one hit,
/// for the first reason that matches: tag name, then attribute names and
/// values in order. Text nodes are matched separately against their decoded
/// content. Documents that fail strict parsing yield no hits.
pub fn search(content: &str, query: &str) -> Vec<SearchHit> {
    if query.len() < MIN_QUERY_LEN {
        return Vec::new();
    }
    let doc = match XmlDocument::parse(content) {
        Ok(doc) => doc,
        Err(e) => {
            debug!(error = %e, "skipping unparseable document");
            return Vec::new();
        }
    };

    let lower_query = query.to_ascii_lowercase();
    let lower_content = content.to_ascii_lowercase();
    let mut cursor = RawCursor::new(&lower_content);

    let mut hits = Vec::new();
    for node in doc.descendants_vec(doc.document_node_id()) {
        let matched = match doc.node_kind(node) {
            Some(NodeKind::Element) => match_element(&doc, node, &lower_query),
            Some(NodeKind::Text) => match_text(&doc, node, &lower_query),
            _ => None,
        };
        let Some(m) = matched else { continue };

        let start = cursor.reconcile(&m.target.to_ascii_lowercase(), &lower_query);
        let ordinal = hits.len();
        hits.push(SearchHit {
            context: breadcrumb_trail(&doc, m.context_node, m.line),
            start,
            len: query.len(),
            ordinal,
        });
    }
    hits
}

/// Search a set of documents in parallel
///
/// Hits come back grouped by file, in the order the files were given; the
/// ordinal restarts per file. Files not named `*.xml` are skipped.
pub fn search_documents(files: &[SourceFile], query: &str) -> Vec<FileHit> {
    let per_file: Vec<Vec<FileHit>> = files
        .par_iter()
        .map(|file| {
            if !file.name.ends_with(".xml") {
                return Vec::new();
            }
            search(&file.content, query)
                .into_iter()
                .map(|hit| FileHit {
                    file_name: file.name.clone(),
                    hit,
                })
                .collect()
        })
        .collect();
    per_file.into_iter().flatten().collect()
}

/// A matched node, before offset reconciliation
struct NodeMatch {
    /// Element whose ancestors form the breadcrumb trail
    context_node: NodeId,
    /// Serialized line shown as the match
    line: String,
    /// Exact string to locate in the raw document
    target: String,
}

fn match_element<T: TreeAccess>(doc: &T, el: NodeId, lower_query: &str) -> Option<NodeMatch> {
    let tag = doc.tag_name(el)?;
    if contains_ci(tag, lower_query) {
        let text = doc.text_content(el);
        let line = if !text.is_empty()
            && text.len() < INLINE_TEXT_LIMIT
            && doc.child_elements(el).is_empty()
        {
            format!("<{tag}{}>{text}</{tag}>", format_attributes(doc, el))
        } else {
            opening_tag(doc, el)
        };
        return Some(NodeMatch {
            context_node: el,
            line,
            target: format!("<{tag}"),
        });
    }
    for (name, value) in doc.attributes_of(el) {
        if contains_ci(name, lower_query) {
            return Some(NodeMatch {
                context_node: el,
                line: opening_tag(doc, el),
                target: name.to_string(),
            });
        }
        if contains_ci(value, lower_query) {
            return Some(NodeMatch {
                context_node: el,
                line: opening_tag(doc, el),
                target: value.to_string(),
            });
        }
    }
    None
}

fn match_text<T: TreeAccess>(doc: &T, node: NodeId, lower_query: &str) -> Option<NodeMatch> {
    let value = doc.text_of(node)?;
    if !contains_ci(value, lower_query) {
        return None;
    }
    let parent = doc.parent_element(node)?;
    let tag = doc.tag_name(parent).unwrap_or_default();
    Some(NodeMatch {
        context_node: parent,
        line: format!("<{tag}{}>{value}</{tag}>", format_attributes(doc, parent)),
        target: value.to_string(),
    })
}

fn contains_ci(haystack: &str, lower_needle: &str) -> bool {
    memmem::find(
        haystack.to_ascii_lowercase().as_bytes(),
        lower_needle.as_bytes(),
    )
    .is_some()
}

/// Forward-only scan position over the lowercased raw document
struct RawCursor<'a> {
    lower: &'a str,
    pos: usize,
}

impl<'a> RawCursor<'a> {
    fn new(lower: &'a str) -> Self {
        RawCursor { lower, pos: 0 }
    }

    /// Locate the query within the next occurrence of `target`, advancing
    /// the cursor past whatever was found
    ///
    /// Primary: find `target` from the cursor, then the query from there.
    /// Fallback: find the query alone from the cursor. The cursor advances
    /// one byte past the found position either way and never rewinds.
    fn reconcile(&mut self, target: &str, lower_query: &str) -> Option<usize> {
        let needle = if target.is_empty() { lower_query } else { target };
        if let Some(found) = self.find_from(needle, self.pos) {
            if let Some(query_pos) = self.find_from(lower_query, found) {
                self.pos = query_pos + 1;
                return Some(query_pos);
            }
            self.pos = found + 1;
            return None;
        }
        if let Some(fallback) = self.find_from(lower_query, self.pos) {
            self.pos = fallback + 1;
            return Some(fallback);
        }
        None
    }

    fn find_from(&self, needle: &str, from: usize) -> Option<usize> {
        if from > self.lower.len() {
            return None;
        }
        memmem::find(&self.lower.as_bytes()[from..], needle.as_bytes()).map(|i| from + i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_match_offset() {
        let hits = search("<a><b>erp_1</b></a>", "erp_");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].start, Some(6));
        assert_eq!(hits[0].len, 4);
        assert_eq!(hits[0].ordinal, 0);
    }

    #[test]
    fn test_short_query_yields_nothing() {
        assert!(search("<a>x</a>", "x").is_empty());
        assert!(search("<a>x</a>", "").is_empty());
    }

    #[test]
    fn test_unparseable_yields_nothing() {
        assert!(search("<a><b></a>", "ab").is_empty());
        assert!(search("<a>A & B</a>", "A ").is_empty());
    }

    #[test]
    fn test_tag_name_match() {
        // "<a><name>x</name></a>": "<name" found at 3, query inside it at 4
        let hits = search("<a><name>x</name></a>", "name");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].start, Some(4));
        let line = hits[0].context.last().unwrap();
        assert_eq!(line.text, "<name>x</name>");
        assert!(line.is_match);
    }

    #[test]
    fn test_case_insensitive_match() {
        let hits = search("<a><b>VALUE</b></a>", "value");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].start, Some(6));
    }

    #[test]
    fn test_monotonic_cursor_on_repeated_values() {
        let hits = search("<a><b>dup</b><c>dup</c></a>", "dup");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].start, Some(6));
        assert_eq!(hits[1].start, Some(16));
        assert_eq!(hits[1].ordinal, 1);
    }

    #[test]
    fn test_attribute_name_and_value_match() {
        let hits = search("<r><item code=\"widget\">x</item></r>", "code");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].context.last().unwrap().text, "<item code=\"widget\">");
        // "code" starts right after "<item "
        assert_eq!(hits[0].start, Some(9));

        let hits = search("<r><item code=\"widget\">x</item></r>", "widget");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].start, Some(15));
    }

    #[test]
    fn test_element_matches_once_tag_before_attributes() {
        // Both the tag and an attribute contain the query; one hit, for the tag
        let hits = search("<r><code code=\"1\">x</code></r>", "code");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].start, Some(4));
    }

    #[test]
    fn test_entity_encoded_target_has_no_offset() {
        // Decoded text "fish & chips" matches but never appears verbatim in
        // the raw document, and neither does the query
        let hits = search("<a>fish &amp; chips</a>", "& chips");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].start, None);
    }

    #[test]
    fn test_breadcrumb_context() {
        let hits = search("<a><b><c>hit me</c></b></a>", "hit");
        assert_eq!(hits.len(), 1);
        let texts: Vec<&str> = hits[0].context.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["<a>", "<b>", "<c>hit me</c>"]);
    }

    #[test]
    fn test_search_documents_order_and_filter() {
        let files = vec![
            SourceFile {
                name: "one.xml".into(),
                content: "<a><b>pearl</b></a>".into(),
            },
            SourceFile {
                name: "skip.txt".into(),
                content: "<a><b>pearl</b></a>".into(),
            },
            SourceFile {
                name: "two.xml".into(),
                content: "<a><b>pearl</b><c>pearl</c></a>".into(),
            },
        ];
        let hits = search_documents(&files, "pearl");
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].file_name, "one.xml");
        assert_eq!(hits[1].file_name, "two.xml");
        assert_eq!(hits[2].file_name, "two.xml");
        // Ordinal restarts per file
        assert_eq!(hits[0].hit.ordinal, 0);
        assert_eq!(hits[1].hit.ordinal, 0);
        assert_eq!(hits[2].hit.ordinal, 1);
    }
}
