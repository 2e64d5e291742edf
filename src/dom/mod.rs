//! Arena-based XML document tree
//!
//! - Arena allocation for nodes, NodeId (u32) indices
//! - String interning for names, values, and decoded text
//! - A narrow read-only trait (`TreeAccess`) so the matching and search
//!   layers never depend on this parser's internals

pub mod document;
pub mod node;
pub mod strings;

pub use document::XmlDocument;
pub use node::{NodeId, NodeKind, XmlAttribute, XmlNode};
pub use strings::StringPool;

/// Read-only tree access
///
/// The capability set is deliberately narrow — tag name, attributes,
/// children, text content, parent — so any compliant parser's tree can sit
/// behind it.
pub trait TreeAccess {
    /// The synthetic document node (parent of the root element)
    fn document_node_id(&self) -> NodeId;

    /// Root element ID, if the document has one
    fn root_element_id(&self) -> Option<NodeId>;

    /// Kind of a node
    fn node_kind(&self, id: NodeId) -> Option<NodeKind>;

    /// Parent of a node
    fn parent_of(&self, id: NodeId) -> Option<NodeId>;

    /// Tag name of an element (or target of a PI)
    fn tag_name(&self, id: NodeId) -> Option<&str>;

    /// Content of a Text or CDATA node, entity-decoded
    fn text_of(&self, id: NodeId) -> Option<&str>;

    /// Attribute name/value pairs of an element, in document order
    fn attributes_of(&self, id: NodeId) -> Vec<(&str, &str)>;

    /// Attribute value by exact name
    fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str>;

    /// Child node IDs, in document order
    fn children_vec(&self, id: NodeId) -> Vec<NodeId>;

    /// All descendants in document order (depth-first)
    fn descendants_vec(&self, id: NodeId) -> Vec<NodeId> {
        let mut stack: Vec<NodeId> = self.children_vec(id);
        stack.reverse();
        let mut out = Vec::new();
        while let Some(current) = stack.pop() {
            out.push(current);
            let mut kids = self.children_vec(current);
            kids.reverse();
            stack.extend(kids);
        }
        out
    }

    /// Parent, only when it is an element (the document node yields None)
    fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent_of(id)?;
        (self.node_kind(parent)? == NodeKind::Element).then_some(parent)
    }

    /// Direct child elements, in document order
    fn child_elements(&self, id: NodeId) -> Vec<NodeId> {
        self.children_vec(id)
            .into_iter()
            .filter(|&c| self.node_kind(c) == Some(NodeKind::Element))
            .collect()
    }

    /// Concatenated text of all Text/CDATA descendants (DOM textContent)
    fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.text_of(id) {
            return text.to_string();
        }
        let mut out = String::new();
        for child in self.descendants_vec(id) {
            if let Some(text) = self.text_of(child) {
                out.push_str(text);
            }
        }
        out
    }

    /// Only this element's own Text children, trimmed and space-joined
    /// (descendant element text excluded)
    fn direct_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children_vec(id) {
            if self.node_kind(child) != Some(NodeKind::Text) {
                continue;
            }
            if let Some(text) = self.text_of(child) {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    if !out.is_empty() {
                        out.push(' ');
                    }
                    out.push_str(trimmed);
                }
            }
        }
        out
    }
}
