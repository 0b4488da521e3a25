//! Tree operations: insert, remove, reparent, walk, text content.

use std::collections::VecDeque;
use std::rc::Rc;

use slotmap::{SecondaryMap, SlotMap};

use crate::event::EventBus;

use super::node::{NodeData, NodeId};

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// The node arena shared by every component built from one [`Builder`].
///
/// All nodes live in a single `SlotMap`; parent/child links are stored in
/// secondary maps so removal is O(subtree size) and lookup is O(1). There is
/// no single root: each parsed template hangs off its own synthetic container
/// node until (and unless) it is attached to a host.
///
/// [`Builder`]: crate::component::Builder
pub struct Dom {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    buses: SecondaryMap<NodeId, Rc<EventBus>>,
}

impl Dom {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            buses: SecondaryMap::new(),
        }
    }

    /// Insert a detached node (no parent).
    pub fn insert(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        id
    }

    /// Insert a node as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics (debug) if `parent` does not exist.
    pub fn insert_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        debug_assert!(self.nodes.contains_key(parent), "parent node does not exist");
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.parent.insert(id, parent);
        self.children
            .get_mut(parent)
            .expect("parent must have children vec")
            .push(id);
        id
    }

    /// Remove a node and all its descendants, along with any per-node buses.
    ///
    /// Returns the `NodeData` for the removed node, or `None` if it didn't
    /// exist.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        if !self.nodes.contains_key(id) {
            return None;
        }

        // Detach from parent's children list.
        if let Some(parent_id) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != id);
            }
        }

        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);
        let mut removed_root_data = None;

        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                for &child in &kids {
                    to_remove.push_back(child);
                }
            }
            self.parent.remove(current);
            self.buses.remove(current);
            let data = self.nodes.remove(current);
            if current == id {
                removed_root_data = data;
            }
        }

        removed_root_data
    }

    /// Move `node` to become the last child of `new_parent`, keeping its
    /// subtree intact. A detached node is simply attached.
    ///
    /// # Panics
    ///
    /// Panics (debug) if either node does not exist.
    pub fn reparent(&mut self, node: NodeId, new_parent: NodeId) {
        debug_assert!(self.nodes.contains_key(node), "node does not exist");
        debug_assert!(
            self.nodes.contains_key(new_parent),
            "new_parent does not exist"
        );

        if let Some(old_parent) = self.parent.remove(node) {
            if let Some(siblings) = self.children.get_mut(old_parent) {
                siblings.retain(|&child| child != node);
            }
        }

        self.parent.insert(node, new_parent);
        self.children
            .get_mut(new_parent)
            .expect("new_parent must have children vec")
            .push(node);
    }

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a node, in document order. Returns an empty slice
    /// if the node has no children or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Walk from `id` up to its topmost ancestor, collecting ancestor ids.
    /// Does not include `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Immutable access to a node's data.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// Mutable access to a node's data.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    /// Whether the arena contains a node with the given id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order depth-first traversal starting from `start` (document order).
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Concatenated text of `id` and its descendants, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.walk_depth_first(id) {
            if let Some(text) = self.nodes.get(node).and_then(|d| d.text.as_deref()) {
                out.push_str(text);
            }
        }
        out
    }

    /// The per-node event bus for `id`, created lazily on first use.
    ///
    /// This is the "native" event stream an [`ElementHandle`] binds to,
    /// independent of any component's bus.
    ///
    /// [`ElementHandle`]: crate::component::ElementHandle
    pub fn node_bus(&mut self, id: NodeId) -> Rc<EventBus> {
        debug_assert!(self.nodes.contains_key(id), "node does not exist");
        if let Some(bus) = self.buses.get(id) {
            return Rc::clone(bus);
        }
        let bus = Rc::new(EventBus::new());
        self.buses.insert(id, Rc::clone(&bus));
        bus
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}
