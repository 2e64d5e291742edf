//! Tree path matching and value extraction
//!
//! Finds every element whose ancestor chain matches a caller-supplied tag
//! path and extracts one row per match: whole child sets, single values, or
//! caller-selected descendant fields. Works on the recovered tree when the
//! document only parses after sanitization, and returns nothing (never an
//! error) when no tree can be built at all.

use super::compare::tags_match;
use crate::dom::{NodeId, NodeKind, TreeAccess};
use crate::parse::{parse_document, FRAGMENT_ROOT};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// One extracted row: field name -> value. Keys are unique per row.
pub type ExtractionRow = BTreeMap<String, String>;

/// Row key for a candidate with no child elements
pub const VALUE_KEY: &str = "Value";
/// Row key for the LINE-ancestor enrichment
pub const LINE_ID_KEY: &str = "LINE_ID";
/// Row key for the TAX-ancestor enrichment
pub const AUTHORITY_NAME_KEY: &str = "AUTHORITY_NAME";

/// Extract values of all elements matching the given path hierarchy
///
/// With `fields`, each row holds one entry per requested field (a tag name
/// or a `/`-separated descendant path); a field that cannot be resolved
/// yields an empty string. Without `fields`, a row holds one entry per
/// direct child element, or a single `"Value"` entry for leaf candidates.
pub fn extract_by_path(text: &str, path: &[&str], fields: Option<&[&str]>) -> Vec<ExtractionRow> {
    let outcome = parse_document(text);
    let Some(doc) = outcome.tree() else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    for candidate in matching_candidates(doc, path) {
        let mut row = ExtractionRow::new();
        enrich_from_ancestors(doc, candidate, &mut row);

        match fields {
            Some(fields) if !fields.is_empty() => {
                for &field in fields {
                    row.insert(field.to_string(), descendant_value(doc, candidate, field));
                }
            }
            _ => {
                let children = doc.child_elements(candidate);
                if children.is_empty() {
                    row.insert(VALUE_KEY.to_string(), doc.text_content(candidate));
                } else {
                    for child in children {
                        let tag = doc.tag_name(child).unwrap_or_default();
                        row.insert(tag.to_string(), doc.text_content(child));
                    }
                }
            }
        }
        rows.push(row);
    }
    debug!(rows = rows.len(), recovered = outcome.was_recovered(), "extraction finished");
    rows
}

/// Collect every descendant tag path under the matched candidates
///
/// Paths are `/`-joined tag names, deduplicated and sorted ascending. Used
/// to populate the set of extractable fields before a caller commits to a
/// field list.
pub fn get_unique_keys(text: &str, path: &[&str]) -> Vec<String> {
    let outcome = parse_document(text);
    let Some(doc) = outcome.tree() else {
        return Vec::new();
    };

    let mut keys = BTreeSet::new();
    for candidate in matching_candidates(doc, path) {
        collect_descendant_paths(doc, candidate, "", &mut keys);
    }
    keys.into_iter().collect()
}

/// Elements whose tag matches the last path entry and whose ancestor chain
/// consumes the rest of the path
fn matching_candidates<T: TreeAccess>(doc: &T, path: &[&str]) -> Vec<NodeId> {
    let Some(&target) = path.last() else {
        return Vec::new();
    };
    doc.descendants_vec(doc.document_node_id())
        .into_iter()
        .filter(|&id| doc.node_kind(id) == Some(NodeKind::Element))
        .filter(|&id| doc.tag_name(id).is_some_and(|tag| tags_match(tag, target)))
        .filter(|&id| hierarchy_matches(doc, id, path))
        .collect()
}

/// Walk ancestors upward, consuming path entries right-to-left; the
/// synthetic fragment root is skipped transparently
fn hierarchy_matches<T: TreeAccess>(doc: &T, element: NodeId, path: &[&str]) -> bool {
    let mut remaining = path.len() - 1; // entries left above the target
    let mut parent = doc.parent_element(element);

    while remaining > 0 {
        let Some(ancestor) = parent else {
            // Ancestors ran out before the path was consumed
            return false;
        };
        let tag = doc.tag_name(ancestor).unwrap_or_default();
        if tag == FRAGMENT_ROOT {
            parent = doc.parent_element(ancestor);
            continue;
        }
        if !tags_match(tag, path[remaining - 1]) {
            return false;
        }
        parent = doc.parent_element(ancestor);
        remaining -= 1;
    }
    true
}

/// Best-effort positional enrichments from the candidate's ancestor chain
fn enrich_from_ancestors<T: TreeAccess>(doc: &T, element: NodeId, row: &mut ExtractionRow) {
    // Nearest LINE ancestor carrying a non-empty ID attribute
    let mut parent = doc.parent_element(element);
    while let Some(ancestor) = parent {
        if doc.tag_name(ancestor) == Some("LINE") {
            if let Some(id) = doc.get_attribute(ancestor, "ID") {
                if !id.is_empty() {
                    row.insert(LINE_ID_KEY.to_string(), id.to_string());
                    break;
                }
            }
        }
        parent = doc.parent_element(ancestor);
    }

    // Nearest TAX ancestor: text of its AUTHORITY_NAME child
    let mut parent = doc.parent_element(element);
    while let Some(ancestor) = parent {
        if doc.tag_name(ancestor) == Some("TAX") {
            let authority = doc
                .child_elements(ancestor)
                .into_iter()
                .find(|&c| doc.tag_name(c) == Some("AUTHORITY_NAME"));
            if let Some(child) = authority {
                row.insert(AUTHORITY_NAME_KEY.to_string(), doc.text_content(child));
            }
            break;
        }
        parent = doc.parent_element(ancestor);
    }
}

/// Resolve a `/`-separated descendant field under a candidate
///
/// Leaf target: its text content. Target with child elements: only its own
/// direct text. Unresolvable: empty string, never an error.
fn descendant_value<T: TreeAccess>(doc: &T, element: NodeId, field: &str) -> String {
    let mut current = element;
    for part in field.split('/') {
        let next = doc
            .child_elements(current)
            .into_iter()
            .find(|&c| doc.tag_name(c).is_some_and(|tag| tags_match(tag, part)));
        match next {
            Some(child) => current = child,
            None => return String::new(),
        }
    }
    if doc.child_elements(current).is_empty() {
        doc.text_content(current)
    } else {
        doc.direct_text(current)
    }
}

fn collect_descendant_paths<T: TreeAccess>(
    doc: &T,
    element: NodeId,
    prefix: &str,
    keys: &mut BTreeSet<String>,
) {
    for child in doc.child_elements(element) {
        let tag = doc.tag_name(child).unwrap_or_default();
        let full = if prefix.is_empty() {
            tag.to_string()
        } else {
            format!("{prefix}/{tag}")
        };
        collect_descendant_paths(doc, child, &full, keys);
        keys.insert(full);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> ExtractionRow {
        pairs
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_leaf_values() {
        // Two sibling leaves under the same path
        let rows = extract_by_path("<A><B>1</B><B>2</B></A>", &["A", "B"], None);
        assert_eq!(rows, vec![row(&[("Value", "1")]), row(&[("Value", "2")])]);
    }

    #[test]
    fn test_line_id_enrichment() {
        let rows = extract_by_path(
            "<root><LINE ID=\"42\"><ITEM>x</ITEM></LINE></root>",
            &["LINE", "ITEM"],
            None,
        );
        assert_eq!(rows, vec![row(&[("LINE_ID", "42"), ("Value", "x")])]);
    }

    #[test]
    fn test_authority_name_enrichment() {
        let rows = extract_by_path(
            "<r><TAX><AUTHORITY_NAME>County</AUTHORITY_NAME><AMT>5</AMT></TAX></r>",
            &["TAX", "AMT"],
            None,
        );
        assert_eq!(
            rows,
            vec![row(&[("AUTHORITY_NAME", "County"), ("Value", "5")])]
        );
    }

    #[test]
    fn test_children_become_columns() {
        let rows = extract_by_path("<r><item><a>1</a><b>2</b></item></r>", &["item"], None);
        assert_eq!(rows, vec![row(&[("a", "1"), ("b", "2")])]);
    }

    #[test]
    fn test_hierarchy_must_fully_match() {
        let xml = "<top><x><leaf>1</leaf></x><y><leaf>2</leaf></y></top>";
        let rows = extract_by_path(xml, &["x", "leaf"], None);
        assert_eq!(rows, vec![row(&[("Value", "1")])]);
        // Path longer than the actual ancestry matches nothing
        assert!(extract_by_path(xml, &["missing", "top", "x", "leaf"], None).is_empty());
    }

    #[test]
    fn test_permissive_path_matching() {
        let xml = "<ns:Order><ns:Line>v</ns:Line></ns:Order>";
        let rows = extract_by_path(xml, &["order", "line"], None);
        assert_eq!(rows, vec![row(&[("Value", "v")])]);
    }

    #[test]
    fn test_fields_selection() {
        let xml = "<r><rec><name>n</name><addr><city>c</city></addr></rec></r>";
        let rows = extract_by_path(xml, &["rec"], Some(&["name", "addr/city", "nope"]));
        assert_eq!(
            rows,
            vec![row(&[("name", "n"), ("addr/city", "c"), ("nope", "")])]
        );
    }

    #[test]
    fn test_field_on_parent_takes_direct_text_only() {
        let xml = "<r><rec><addr>main <city>c</city> street</addr></rec></r>";
        let rows = extract_by_path(xml, &["rec"], Some(&["addr"]));
        assert_eq!(rows, vec![row(&[("addr", "main street")])]);
    }

    #[test]
    fn test_empty_fields_list_falls_back_to_default() {
        let rows = extract_by_path("<A><B>1</B></A>", &["A", "B"], Some(&[]));
        assert_eq!(rows, vec![row(&[("Value", "1")])]);
    }

    #[test]
    fn test_recovery_bare_ampersand() {
        // Recovery escapes the ampersand; the decoded value is unchanged
        let rows = extract_by_path("<a>A & B</a>", &["a"], None);
        assert_eq!(rows, vec![row(&[("Value", "A & B")])]);
    }

    #[test]
    fn test_recovery_multi_root_fragment() {
        let rows = extract_by_path("<A><B>1</B></A><A><B>2</B></A>", &["A", "B"], None);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_unparseable_yields_nothing() {
        assert!(extract_by_path("<a><b></a>", &["a"], None).is_empty());
        assert!(get_unique_keys("<a><b></a>", &["a"]).is_empty());
    }

    #[test]
    fn test_empty_path_yields_nothing() {
        assert!(extract_by_path("<a>x</a>", &[], None).is_empty());
    }

    #[test]
    fn test_unique_keys_sorted_dedup() {
        let xml = "<r><rec><b><c>1</c></b><a>2</a></rec><rec><a>3</a></rec></r>";
        assert_eq!(get_unique_keys(xml, &["rec"]), vec!["a", "b", "b/c"]);
    }

    #[test]
    fn test_unique_keys_empty_for_leaf_candidates() {
        assert!(get_unique_keys("<A><B>1</B></A>", &["A", "B"]).is_empty());
    }
}
