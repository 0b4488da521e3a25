//! Node types: NodeId, NodeData.

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for a node in the arena. Copy, lightweight (u64).
    pub struct NodeId;
}

/// Synthetic tag for text nodes.
pub const TEXT_TAG: &str = "#text";

/// Synthetic tag for the offscreen container a template is parsed under.
pub const TEMPLATE_TAG: &str = "#template";

/// Data associated with a single node: an element with ordered attributes, or
/// a text node (tag [`TEXT_TAG`], content in `text`).
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Element tag name, or a synthetic `#`-prefixed tag.
    pub tag: String,
    /// Attributes in source order.
    pub attributes: Vec<(String, String)>,
    /// Text content, set for text nodes only.
    pub text: Option<String>,
}

impl NodeData {
    /// Create an element node with no attributes.
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            text: None,
        }
    }

    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            tag: TEXT_TAG.to_owned(),
            attributes: Vec::new(),
            text: Some(content.into()),
        }
    }

    /// Set an attribute (builder).
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(&name.into(), &value.into());
        self
    }

    /// Whether this is a text node.
    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    /// Look up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether an attribute is present, regardless of value.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|(n, _)| n == name)
    }

    /// Set an attribute, overwriting an existing one of the same name.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.attributes.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value.to_owned();
        } else {
            self.attributes.push((name.to_owned(), value.to_owned()));
        }
    }
}
