//! XML node representation
//!
//! Uses NodeId (u32) for compact, cache-friendly node references into the
//! document arena.

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Type of XML node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Element node
    Element,
    /// Text content
    Text,
    /// CDATA section
    CData,
    /// Comment
    Comment,
    /// Processing instruction
    ProcessingInstruction,
}

/// An XML node in the arena
#[derive(Debug, Clone)]
pub struct XmlNode {
    /// Type of this node
    pub kind: NodeKind,
    /// Parent node (None for document root)
    pub parent: Option<NodeId>,
    /// First child node
    pub first_child: Option<NodeId>,
    /// Last child node
    pub last_child: Option<NodeId>,
    /// Previous sibling
    pub prev_sibling: Option<NodeId>,
    /// Next sibling
    pub next_sibling: Option<NodeId>,
    /// String pool index: name for elements/PIs, content for text-like nodes
    pub name_id: u32,
    /// Start of attributes in attribute arena (for elements)
    pub attr_start: u32,
    /// Number of attributes
    pub attr_count: u16,
    /// Depth in document tree
    pub depth: u16,
}

impl XmlNode {
    fn blank(kind: NodeKind, parent: Option<NodeId>, depth: u16) -> Self {
        XmlNode {
            kind,
            parent,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            name_id: 0,
            attr_start: 0,
            attr_count: 0,
            depth,
        }
    }

    /// Create the document root node
    pub fn document() -> Self {
        Self::blank(NodeKind::Document, None, 0)
    }

    /// Create an element node
    pub fn element(name_id: u32, parent: Option<NodeId>, depth: u16) -> Self {
        let mut node = Self::blank(NodeKind::Element, parent, depth);
        node.name_id = name_id;
        node
    }

    /// Create a text node (content interned under name_id)
    pub fn text(content_id: u32, parent: Option<NodeId>, depth: u16) -> Self {
        let mut node = Self::blank(NodeKind::Text, parent, depth);
        node.name_id = content_id;
        node
    }

    /// Create a CDATA node
    pub fn cdata(content_id: u32, parent: Option<NodeId>, depth: u16) -> Self {
        let mut node = Self::blank(NodeKind::CData, parent, depth);
        node.name_id = content_id;
        node
    }

    /// Create a comment node
    pub fn comment(content_id: u32, parent: Option<NodeId>, depth: u16) -> Self {
        let mut node = Self::blank(NodeKind::Comment, parent, depth);
        node.name_id = content_id;
        node
    }

    /// Create a processing instruction node
    pub fn processing_instruction(target_id: u32, parent: Option<NodeId>, depth: u16) -> Self {
        let mut node = Self::blank(NodeKind::ProcessingInstruction, parent, depth);
        node.name_id = target_id;
        node
    }

    /// Check if this is a text-like node (Text or CDATA)
    #[inline]
    pub fn is_text_like(&self) -> bool {
        matches!(self.kind, NodeKind::Text | NodeKind::CData)
    }
}

/// Stored attribute
#[derive(Debug, Clone)]
pub struct XmlAttribute {
    /// Index into string pool for attribute name
    pub name_id: u32,
    /// Index into string pool for attribute value
    pub value_id: u32,
}

impl XmlAttribute {
    pub fn new(name_id: u32, value_id: u32) -> Self {
        XmlAttribute { name_id, value_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_node() {
        let doc = XmlNode::document();
        assert_eq!(doc.kind, NodeKind::Document);
        assert!(doc.parent.is_none());
        assert_eq!(doc.depth, 0);
    }

    #[test]
    fn test_element_node() {
        let elem = XmlNode::element(1, Some(0), 1);
        assert_eq!(elem.kind, NodeKind::Element);
        assert_eq!(elem.parent, Some(0));
        assert_eq!(elem.name_id, 1);
        assert!(elem.first_child.is_none());
    }

    #[test]
    fn test_text_like() {
        assert!(XmlNode::text(1, Some(0), 1).is_text_like());
        assert!(XmlNode::cdata(1, Some(0), 1).is_text_like());
        assert!(!XmlNode::comment(1, Some(0), 1).is_text_like());
    }
}
