//! Arena-based XML document built from the lenient tokenizer
//!
//! `XmlDocument::parse` is the strict half of the parse-then-recover
//! strategy: it fails on exactly the malformations a sanitizing reparse can
//! report or repair — mismatched or unclosed tags, multiple roots, text
//! outside the root, and bare ampersands. Text and attribute values are
//! entity-decoded at parse time.

use super::node::{NodeId, NodeKind, XmlAttribute, XmlNode};
use super::strings::StringPool;
use super::TreeAccess;
use crate::core::attributes::parse_attributes;
use crate::core::entities::decode_text_strict;
use crate::core::tokenizer::{TagToken, TokenKind, Tokenizer};
use crate::error::Error;

/// An XML document stored in arena format
pub struct XmlDocument {
    /// Arena of nodes; index 0 is the document node
    nodes: Vec<XmlNode>,
    /// Arena of attributes
    attributes: Vec<XmlAttribute>,
    /// Interned strings (names, values, decoded text)
    strings: StringPool,
    /// Root element node ID
    root_element: Option<NodeId>,
}

impl XmlDocument {
    /// Parse a document, failing on malformed input
    pub fn parse(input: &str) -> Result<Self, Error> {
        let mut doc = XmlDocument {
            nodes: Vec::with_capacity(256),
            attributes: Vec::with_capacity(64),
            strings: StringPool::new(),
            root_element: None,
        };
        doc.nodes.push(XmlNode::document());
        doc.build(input)?;
        Ok(doc)
    }

    fn build(&mut self, input: &str) -> Result<(), Error> {
        // (node id, tag name span) for open elements; document node underneath
        let mut stack: Vec<(NodeId, String)> = Vec::new();
        let mut prev_end = 0usize;

        let mut tokenizer = Tokenizer::new(input);
        while let Some(token) = tokenizer.next_token() {
            self.handle_text_gap(input, prev_end, token.span.0, &stack)?;
            prev_end = token.span.1;

            match token.kind {
                TokenKind::Open => self.handle_open(input, &token, &mut stack)?,
                TokenKind::Close => {
                    let name = token.name.unwrap_or_default();
                    match stack.pop() {
                        Some((_, open_name)) if open_name == name => {}
                        Some((_, open_name)) => {
                            return Err(Error::TagMismatch {
                                expected: open_name,
                                found: name.to_string(),
                                position: token.span.0,
                            });
                        }
                        None => {
                            return Err(Error::UnexpectedClose {
                                found: name.to_string(),
                                position: token.span.0,
                            });
                        }
                    }
                }
                TokenKind::Comment => {
                    let content = inner_span(input, &token, 4, 3);
                    let id = self.strings.intern(content);
                    self.append(XmlNode::comment, id, &stack);
                }
                TokenKind::CData => {
                    // CDATA content is literal, never decoded
                    let content = inner_span(input, &token, 9, 3);
                    let id = self.strings.intern(content);
                    self.append(XmlNode::cdata, id, &stack);
                }
                TokenKind::ProcessingInstruction => {
                    let target = pi_target(inner_span(input, &token, 2, 2));
                    let id = self.strings.intern(target);
                    self.append(XmlNode::processing_instruction, id, &stack);
                }
                TokenKind::Doctype => {}
            }
        }

        // Trailing text after the last token
        self.handle_text_gap(input, prev_end, input.len(), &stack)?;

        if let Some((_, name)) = stack.into_iter().next() {
            return Err(Error::UnclosedElement { name });
        }
        if self.root_element.is_none() {
            return Err(Error::NoRootElement);
        }
        Ok(())
    }

    fn handle_open(
        &mut self,
        input: &str,
        token: &TagToken<'_>,
        stack: &mut Vec<(NodeId, String)>,
    ) -> Result<(), Error> {
        let name = token.name.unwrap_or_default();
        let parent_id = stack.last().map_or(0, |&(id, _)| id);

        if parent_id == 0 && self.root_element.is_some() {
            return Err(Error::MultipleRoots {
                position: token.span.0,
            });
        }

        let name_id = self.strings.intern(name);
        let depth = stack.len() as u16 + 1;
        let mut node = XmlNode::element(name_id, Some(parent_id), depth);

        let (attr_start, attr_end) = token.attr_span();
        let parsed = parse_attributes(&input[attr_start..attr_end]).map_err(|rel| {
            Error::BareAmpersand {
                position: attr_start + rel,
            }
        })?;
        node.attr_start = self.attributes.len() as u32;
        node.attr_count = parsed.len().min(u16::MAX as usize) as u16;
        for attr in &parsed {
            let attr_name_id = self.strings.intern(attr.name);
            let attr_value_id = self.strings.intern(&attr.value);
            self.attributes
                .push(XmlAttribute::new(attr_name_id, attr_value_id));
        }

        let node_id = self.push_linked(node, parent_id);
        if parent_id == 0 {
            self.root_element = Some(node_id);
        }
        if !token.self_closing {
            stack.push((node_id, name.to_string()));
        }
        Ok(())
    }

    /// Text between two markup tokens
    fn handle_text_gap(
        &mut self,
        input: &str,
        start: usize,
        end: usize,
        stack: &[(NodeId, String)],
    ) -> Result<(), Error> {
        if start >= end {
            return Ok(());
        }
        let raw = &input[start..end];
        let at_document_level = stack.is_empty();
        if at_document_level {
            if raw.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r')) {
                return Ok(());
            }
            return Err(Error::TopLevelText { position: start });
        }

        let decoded =
            decode_text_strict(raw).map_err(|rel| Error::BareAmpersand { position: start + rel })?;
        let content_id = self.strings.intern(&decoded);
        let parent_id = stack.last().map_or(0, |&(id, _)| id);
        let depth = stack.len() as u16 + 1;
        let node = XmlNode::text(content_id, Some(parent_id), depth);
        let node_id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        self.link_child(parent_id, node_id);
        Ok(())
    }

    /// Append a childless node built by one of the XmlNode constructors
    fn append(
        &mut self,
        make: fn(u32, Option<NodeId>, u16) -> XmlNode,
        content_id: u32,
        stack: &[(NodeId, String)],
    ) {
        let parent_id = stack.last().map_or(0, |&(id, _)| id);
        let depth = stack.len() as u16 + 1;
        let node = make(content_id, Some(parent_id), depth);
        self.push_linked(node, parent_id);
    }

    fn push_linked(&mut self, node: XmlNode, parent_id: NodeId) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        self.link_child(parent_id, node_id);
        node_id
    }

    /// Link a child node to its parent's sibling chain
    fn link_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        let last_child_opt = self.nodes[parent_id as usize].last_child;
        if let Some(last_child_id) = last_child_opt {
            self.nodes[child_id as usize].prev_sibling = Some(last_child_id);
            self.nodes[last_child_id as usize].next_sibling = Some(child_id);
        } else {
            self.nodes[parent_id as usize].first_child = Some(child_id);
        }
        self.nodes[parent_id as usize].last_child = Some(child_id);
    }

    /// Get a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&XmlNode> {
        self.nodes.get(id as usize)
    }

    /// Total number of nodes (document node included)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over children of a node
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.get_node(id).and_then(|n| n.first_child);
        ChildIter { doc: self, next: first }
    }
}

/// Strip a token's delimiters
fn inner_span<'a>(input: &'a str, token: &TagToken<'_>, prefix: usize, suffix: usize) -> &'a str {
    let start = token.span.0 + prefix;
    let end = token.span.1.saturating_sub(suffix);
    if start < end {
        &input[start..end]
    } else {
        ""
    }
}

/// Target of a processing instruction (up to the first whitespace)
fn pi_target(body: &str) -> &str {
    body.split_ascii_whitespace().next().unwrap_or("")
}

/// Iterator over child nodes
pub struct ChildIter<'d> {
    doc: &'d XmlDocument,
    next: Option<NodeId>,
}

impl<'d> Iterator for ChildIter<'d> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.get_node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

impl TreeAccess for XmlDocument {
    fn document_node_id(&self) -> NodeId {
        0
    }

    fn root_element_id(&self) -> Option<NodeId> {
        self.root_element
    }

    fn node_kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get_node(id).map(|n| n.kind)
    }

    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id).and_then(|n| n.parent)
    }

    fn tag_name(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        match node.kind {
            NodeKind::Element | NodeKind::ProcessingInstruction => self.strings.get(node.name_id),
            _ => None,
        }
    }

    fn text_of(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        if node.is_text_like() {
            self.strings.get(node.name_id)
        } else {
            None
        }
    }

    fn attributes_of(&self, id: NodeId) -> Vec<(&str, &str)> {
        let Some(node) = self.get_node(id) else {
            return Vec::new();
        };
        let start = node.attr_start as usize;
        let end = (start + node.attr_count as usize).min(self.attributes.len());
        self.attributes[start..end]
            .iter()
            .filter_map(|attr| {
                let name = self.strings.get(attr.name_id)?;
                let value = self.strings.get(attr.value_id)?;
                Some((name, value))
            })
            .collect()
    }

    fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes_of(id)
            .into_iter()
            .find(|&(n, _)| n == name)
            .map(|(_, v)| v)
    }

    fn children_vec(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).collect()
    }
}
