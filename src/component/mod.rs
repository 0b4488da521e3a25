//! Components: live object graphs built from markup templates.
//!
//! A [`Component`] is what [`Builder::build`] produces: a set of root nodes
//! mounted in the shared arena, a named table mapping `handle` markers to
//! raw nodes or child widgets, a localization catalog stamped with the build
//! locale, and an [`EventBus`] of its own for component-level events.
//!
//! The surrounding pieces live in submodules: the [`Registry`] resolving
//! `widget` markers to factories, the [`Widget`] capability trait, the
//! [`Builder`] running the construction protocol, and [`ElementHandle`] for
//! per-node access.

mod builder;
mod handle;
mod registry;
mod widget;

pub use builder::{Blueprint, BuildError, Builder, Options};
pub use handle::ElementHandle;
pub use registry::{Factory, Registry, RegistryError};
pub use widget::Widget;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::dom::{Dom, NodeId};
use crate::event::{BusId, Callback, EventBus, EventData};
use crate::nls::{NlsError, ResourceCatalog};

// ---------------------------------------------------------------------------
// NamedEntry
// ---------------------------------------------------------------------------

/// One entry in a component's named table: a raw template node, or a child
/// widget built from a `widget` marker.
pub enum NamedEntry {
    Node(NodeId),
    Widget(Box<dyn Widget>),
}

impl NamedEntry {
    /// The node id, when this entry is a raw node.
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            NamedEntry::Node(id) => Some(*id),
            NamedEntry::Widget(_) => None,
        }
    }

    /// The widget, when this entry is one.
    pub fn as_widget(&self) -> Option<&dyn Widget> {
        match self {
            NamedEntry::Node(_) => None,
            NamedEntry::Widget(widget) => Some(widget.as_ref()),
        }
    }

    /// Mutable access to the widget, when this entry is one.
    pub fn as_widget_mut(&mut self) -> Option<&mut dyn Widget> {
        match self {
            NamedEntry::Node(_) => None,
            NamedEntry::Widget(widget) => Some(widget.as_mut()),
        }
    }
}

impl fmt::Debug for NamedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamedEntry::Node(id) => f.debug_tuple("Node").field(id).finish(),
            NamedEntry::Widget(_) => f.write_str("Widget(..)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// A built component. Roots and the named table are fixed at construction;
/// only attachment (via [`Component::place`]) changes afterwards.
pub struct Component {
    pub(crate) bus: EventBus,
    pub(crate) dom: Rc<RefCell<Dom>>,
    pub(crate) catalog: ResourceCatalog,
    /// Synthetic parse container; roots were snapshotted from its children.
    pub(crate) container: NodeId,
    pub(crate) roots: Vec<NodeId>,
    pub(crate) named: HashMap<String, NamedEntry>,
    /// Child widgets whose markers carried no `handle`. Kept alive so their
    /// listeners and state survive as long as the parent does.
    pub(crate) anonymous: Vec<Box<dyn Widget>>,
    pub(crate) host: Option<NodeId>,
}

impl Component {
    /// The host this component is attached to, or `None` while detached.
    pub fn container(&self) -> Option<NodeId> {
        self.host
    }

    /// The synthetic container the template was parsed under. Detached roots
    /// hang off it until [`Component::place`] moves them out and drops it.
    pub fn container_node(&self) -> NodeId {
        self.container
    }

    /// Top-level template nodes, in document order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// The shared node arena.
    pub fn dom(&self) -> Rc<RefCell<Dom>> {
        Rc::clone(&self.dom)
    }

    /// The full named table.
    pub fn names(&self) -> &HashMap<String, NamedEntry> {
        &self.named
    }

    /// The named entry under `name`, node or widget.
    pub fn elem(&self, name: &str) -> Option<&NamedEntry> {
        self.named.get(name)
    }

    /// Like [`Component::elem`], for several names at once.
    pub fn elems(&self, names: &[&str]) -> Vec<Option<&NamedEntry>> {
        names.iter().map(|name| self.elem(name)).collect()
    }

    /// A handle to the named raw node. `None` when the name is unknown or
    /// the entry is a widget.
    pub fn node(&self, name: &str) -> Option<ElementHandle> {
        self.named
            .get(name)
            .and_then(NamedEntry::as_node)
            .map(|id| ElementHandle::new(Rc::clone(&self.dom), id))
    }

    /// Like [`Component::node`], for several names at once.
    pub fn nodes(&self, names: &[&str]) -> Vec<Option<ElementHandle>> {
        names.iter().map(|name| self.node(name)).collect()
    }

    /// Attach a detached component: reparent every root to `host`, in order.
    /// Re-placing an attached component moves it.
    pub fn place(&mut self, host: NodeId) {
        let mut dom = self.dom.borrow_mut();
        for &root in &self.roots {
            dom.reparent(root, host);
        }
        // The parse container is done once the roots move out; dropping it
        // keeps the shared arena from accumulating empty nodes.
        if dom.children(self.container).is_empty() {
            dom.remove(self.container);
        }
        self.host = Some(host);
    }

    /// Assign `css` as the `class` attribute on every root node.
    pub fn set_css(&self, css: &str) {
        let mut dom = self.dom.borrow_mut();
        for &root in &self.roots {
            if let Some(data) = dom.get_mut(root) {
                data.set_attribute("class", css);
            }
        }
    }

    /// Localized string lookup in this component's catalog, at its locale.
    pub fn resource(&self, id: &str, subs: &[&str]) -> Result<String, NlsError> {
        self.catalog.resource(id, subs, None)
    }

    /// The component's catalog.
    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    /// Mutable catalog access, for late string additions.
    pub fn catalog_mut(&mut self) -> &mut ResourceCatalog {
        &mut self.catalog
    }

    // --- Event delegation ---------------------------------------------

    /// Subscribe to a component-level event.
    pub fn on(&self, event_type: &str, callback: Callback) {
        self.bus.on(event_type, callback);
    }

    /// Subscribe for a single delivery.
    pub fn once(&self, event_type: &str, callback: Callback) {
        self.bus.once(event_type, callback);
    }

    /// Remove every registration of `callback` for `event_type`.
    pub fn off(&self, event_type: &str, callback: &Callback) {
        self.bus.off(event_type, callback);
    }

    /// Emit a component-level event to this component's own listeners.
    pub fn emit(&self, event_type: &str, data: EventData) {
        self.bus.emit(event_type, data);
    }

    /// The component's own bus.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// The bus identity stamped as `target` on emitted envelopes.
    pub fn bus_id(&self) -> BusId {
        self.bus.id()
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.named.keys().collect();
        names.sort();
        f.debug_struct("Component")
            .field("bus", &self.bus.id())
            .field("roots", &self.roots)
            .field("names", &names)
            .field("host", &self.host)
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
