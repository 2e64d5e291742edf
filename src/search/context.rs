//! Breadcrumb context for search hits
//!
//! Every hit carries up to two ancestor opening tags plus the matched line,
//! indented by nesting depth, so a result list can show where in the
//! document a match sits without rendering the whole tree.

use crate::dom::{NodeId, TreeAccess};

/// One line of hit context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextLine {
    /// Serialized markup, e.g. `<LINE ID="42">`
    pub text: String,
    /// Nesting depth relative to the outermost breadcrumb (0, 1, or 2)
    pub indent: usize,
    /// True on the line containing the match itself
    pub is_match: bool,
}

/// Serialize an element's attributes with a leading space, or ""
pub(crate) fn format_attributes<T: TreeAccess>(doc: &T, id: NodeId) -> String {
    let mut out = String::new();
    for (name, value) in doc.attributes_of(id) {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }
    out
}

/// Serialize an element's opening tag, attributes included
pub(crate) fn opening_tag<T: TreeAccess>(doc: &T, id: NodeId) -> String {
    let tag = doc.tag_name(id).unwrap_or_default();
    format!("<{tag}{}>", format_attributes(doc, id))
}

/// Assemble the breadcrumb trail: grandparent, parent, then the match line
pub(crate) fn breadcrumb_trail<T: TreeAccess>(
    doc: &T,
    context: NodeId,
    match_line: String,
) -> Vec<ContextLine> {
    let parent = doc.parent_element(context);
    let grandparent = parent.and_then(|p| doc.parent_element(p));

    let mut lines = Vec::with_capacity(3);
    if let Some(gp) = grandparent {
        lines.push(ContextLine {
            text: opening_tag(doc, gp),
            indent: 0,
            is_match: false,
        });
    }
    if let Some(p) = parent {
        lines.push(ContextLine {
            text: opening_tag(doc, p),
            indent: usize::from(grandparent.is_some()),
            is_match: false,
        });
    }
    lines.push(ContextLine {
        text: match_line,
        indent: lines.len(),
        is_match: true,
    });
    lines
}
