//! ElementHandle: a capability-limited wrapper around one node.
//!
//! Lookups are scoped to the wrapped node's descendants only. Event
//! registration binds to the node's own bus (see
//! [`Dom::node_bus`](crate::dom::Dom::node_bus)), bypassing any component's
//! bus entirely.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::dom::{Dom, NodeId, Selector};
use crate::event::{Callback, EventData};

/// A queryable wrapper around one node of the arena.
#[derive(Clone)]
pub struct ElementHandle {
    dom: Rc<RefCell<Dom>>,
    node: NodeId,
}

impl ElementHandle {
    /// Wrap a node.
    pub fn new(dom: Rc<RefCell<Dom>>, node: NodeId) -> Self {
        Self { dom, node }
    }

    /// The wrapped node's id.
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    /// The first descendant matching `selector`, in document order. Returns
    /// `None` for no match or an unparseable selector.
    pub fn find(&self, selector: &str) -> Option<ElementHandle> {
        let selector = Selector::parse(selector)?;
        let id = self.dom.borrow().query_first_within(self.node, &selector)?;
        Some(ElementHandle::new(Rc::clone(&self.dom), id))
    }

    /// All descendants matching `selector`, in document order.
    pub fn find_all(&self, selector: &str) -> Vec<ElementHandle> {
        let Some(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        self.dom
            .borrow()
            .query_within(self.node, &selector)
            .into_iter()
            .map(|id| ElementHandle::new(Rc::clone(&self.dom), id))
            .collect()
    }

    /// Register a listener on this node's own event stream.
    pub fn on(&self, event_type: &str, callback: Callback) {
        let bus = self.dom.borrow_mut().node_bus(self.node);
        bus.on(event_type, callback);
    }

    /// Remove a listener from this node's event stream.
    pub fn off(&self, event_type: &str, callback: &Callback) {
        let bus = self.dom.borrow_mut().node_bus(self.node);
        bus.off(event_type, callback);
    }

    /// Emit an event on this node's own event stream.
    pub fn fire(&self, event_type: &str, data: EventData) {
        let bus = self.dom.borrow_mut().node_bus(self.node);
        bus.emit(event_type, data);
    }

    /// Look up an attribute on the wrapped node.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.dom
            .borrow()
            .get(self.node)
            .and_then(|data| data.attribute(name).map(str::to_owned))
    }

    /// Set an attribute on the wrapped node.
    pub fn set_attribute(&self, name: &str, value: &str) {
        if let Some(data) = self.dom.borrow_mut().get_mut(self.node) {
            data.set_attribute(name, value);
        }
    }

    /// The wrapped node's tag.
    pub fn tag(&self) -> String {
        self.dom
            .borrow()
            .get(self.node)
            .map(|data| data.tag.clone())
            .unwrap_or_default()
    }

    /// Concatenated text content of the node and its descendants.
    pub fn text(&self) -> String {
        self.dom.borrow().text_content(self.node)
    }
}

impl fmt::Debug for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementHandle")
            .field("node", &self.node)
            .field("tag", &self.tag())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeData;
    use crate::markup::parse_fragment;
    use std::cell::Cell;

    fn fragment(input: &str) -> (Rc<RefCell<Dom>>, NodeId) {
        let mut dom = Dom::new();
        let container = parse_fragment(&mut dom, input).expect("fragment should parse");
        (Rc::new(RefCell::new(dom)), container)
    }

    #[test]
    fn find_is_scoped_to_descendants() {
        let (dom, container) = fragment("<div class='outer'><span class='outer'></span></div>");
        let root = dom.borrow().children(container)[0];
        let handle = ElementHandle::new(Rc::clone(&dom), root);

        // The wrapped div matches ".outer" but only its descendant is found.
        let hit = handle.find(".outer").expect("descendant should match");
        assert_eq!(hit.tag(), "span");
    }

    #[test]
    fn find_returns_none_for_no_match_or_bad_selector() {
        let (dom, container) = fragment("<div></div>");
        let root = dom.borrow().children(container)[0];
        let handle = ElementHandle::new(dom, root);
        assert!(handle.find("span").is_none());
        assert!(handle.find("not a selector").is_none());
    }

    #[test]
    fn find_all_in_document_order() {
        let (dom, container) =
            fragment("<ul><li id='one'></li><li id='two'></li><li id='three'></li></ul>");
        let ul = dom.borrow().children(container)[0];
        let handle = ElementHandle::new(dom, ul);

        let items = handle.find_all("li");
        let ids: Vec<Option<String>> = items.iter().map(|h| h.attribute("id")).collect();
        assert_eq!(
            ids,
            vec![
                Some("one".to_owned()),
                Some("two".to_owned()),
                Some("three".to_owned())
            ]
        );
    }

    #[test]
    fn attributes_read_write() {
        let (dom, container) = fragment("<div handle='a'></div>");
        let div = dom.borrow().children(container)[0];
        let handle = ElementHandle::new(dom, div);

        assert_eq!(handle.attribute("handle"), Some("a".to_owned()));
        assert_eq!(handle.attribute("missing"), None);

        handle.set_attribute("class", "active");
        assert_eq!(handle.attribute("class"), Some("active".to_owned()));
    }

    #[test]
    fn text_content() {
        let (dom, container) = fragment("<div>Hi <span>World</span></div>");
        let div = dom.borrow().children(container)[0];
        let handle = ElementHandle::new(dom, div);
        assert_eq!(handle.text(), "Hi World");
    }

    #[test]
    fn on_and_fire_use_the_node_bus() {
        let dom = Rc::new(RefCell::new(Dom::new()));
        let node = dom.borrow_mut().insert(NodeData::element("button"));
        let handle = ElementHandle::new(dom, node);

        let hits = Rc::new(Cell::new(0));
        let hits_clone = Rc::clone(&hits);
        handle.on(
            "click",
            Callback::new(move |_| hits_clone.set(hits_clone.get() + 1)),
        );

        handle.fire("click", EventData::new());
        handle.fire("click", EventData::new());
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn two_handles_same_node_share_the_bus() {
        let dom = Rc::new(RefCell::new(Dom::new()));
        let node = dom.borrow_mut().insert(NodeData::element("button"));
        let a = ElementHandle::new(Rc::clone(&dom), node);
        let b = ElementHandle::new(dom, node);

        let hits = Rc::new(Cell::new(0));
        let hits_clone = Rc::clone(&hits);
        a.on(
            "click",
            Callback::new(move |_| hits_clone.set(hits_clone.get() + 1)),
        );
        b.fire("click", EventData::new());
        assert_eq!(hits.get(), 1);
    }
}
