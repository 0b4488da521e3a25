//! Subtree queries: a small selector grammar matched against node data.
//!
//! Supported selector forms: `*`, `tag`, `#id`, `.class`, `[attr]`,
//! `[attr=value]`, and compounds of those (e.g. `div.item[handle]`).
//! Queries are scoped: only descendants of the query root are searched,
//! never the root itself.

use super::node::{NodeData, NodeId};
use super::tree::Dom;

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// A parsed simple selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

impl Selector {
    /// Parse a selector string. Returns `None` for anything outside the
    /// supported grammar.
    pub fn parse(input: &str) -> Option<Selector> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let mut selector = Selector::default();
        let mut chars = input.char_indices().peekable();

        // Optional leading tag or universal.
        if let Some(&(_, c)) = chars.peek() {
            if c == '*' {
                chars.next();
            } else if c.is_ascii_alphabetic() || c == '_' {
                let mut tag = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if is_name_char(c) {
                        tag.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                selector.tag = Some(tag);
            }
        }

        while let Some((_, c)) = chars.next() {
            match c {
                '#' | '.' => {
                    let mut name = String::new();
                    while let Some(&(_, nc)) = chars.peek() {
                        if is_name_char(nc) {
                            name.push(nc);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    if name.is_empty() {
                        return None;
                    }
                    if c == '#' {
                        selector.id = Some(name);
                    } else {
                        selector.classes.push(name);
                    }
                }
                '[' => {
                    let mut name = String::new();
                    while let Some(&(_, nc)) = chars.peek() {
                        if is_name_char(nc) {
                            name.push(nc);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    if name.is_empty() {
                        return None;
                    }
                    match chars.next() {
                        Some((_, ']')) => selector.attrs.push((name, None)),
                        Some((_, '=')) => {
                            let mut value = String::new();
                            let quote = match chars.peek() {
                                Some(&(_, q)) if q == '"' || q == '\'' => {
                                    chars.next();
                                    Some(q)
                                }
                                _ => None,
                            };
                            loop {
                                match chars.next() {
                                    Some((_, ']')) if quote.is_none() => break,
                                    Some((_, q)) if Some(q) == quote => {
                                        match chars.next() {
                                            Some((_, ']')) => break,
                                            _ => return None,
                                        }
                                    }
                                    Some((_, vc)) => value.push(vc),
                                    None => return None,
                                }
                            }
                            selector.attrs.push((name, Some(value)));
                        }
                        _ => return None,
                    }
                }
                _ => return None,
            }
        }

        if selector == Selector::default() {
            // Bare "*" parses to the empty (match-all) selector; anything
            // else that produced nothing is invalid input.
            if input == "*" {
                return Some(selector);
            }
            return None;
        }
        Some(selector)
    }

    /// Whether a node's data satisfies every part of this selector.
    pub fn matches(&self, data: &NodeData) -> bool {
        if let Some(tag) = &self.tag {
            if &data.tag != tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if data.attribute("id") != Some(id) {
                return false;
            }
        }
        for class in &self.classes {
            let found = data
                .attribute("class")
                .is_some_and(|c| c.split_whitespace().any(|word| word == class));
            if !found {
                return false;
            }
        }
        for (name, value) in &self.attrs {
            match value {
                None => {
                    if !data.has_attribute(name) {
                        return false;
                    }
                }
                Some(v) => {
                    if data.attribute(name) != Some(v) {
                        return false;
                    }
                }
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Scoped queries
// ---------------------------------------------------------------------------

impl Dom {
    /// All descendants of `root` matching `selector`, in document order.
    /// `root` itself is never included.
    pub fn query_within(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.walk_depth_first(root)
            .into_iter()
            .skip(1)
            .filter(|&id| self.get(id).is_some_and(|data| selector.matches(data)))
            .collect()
    }

    /// The first descendant of `root` matching `selector`, in document order.
    pub fn query_first_within(&self, root: NodeId, selector: &Selector) -> Option<NodeId> {
        self.walk_depth_first(root)
            .into_iter()
            .skip(1)
            .find(|&id| self.get(id).is_some_and(|data| selector.matches(data)))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
