//! Widget capability trait.
//!
//! Every type registered in the [`Registry`](super::Registry) produces an
//! object implementing `Widget`: a thin capability interface over the
//! [`Component`](super::Component) the factory built. The trait is
//! object-safe and supports downcasting via `Any`, so a host that knows the
//! concrete type can get it back out of a named-node table.

use std::any::Any;

use crate::dom::NodeId;

use super::Component;

/// Capability interface implemented by all registered widget types.
pub trait Widget {
    /// The component this widget was built from.
    fn component(&self) -> &Component;

    /// Mutable access to the underlying component.
    fn component_mut(&mut self) -> &mut Component;

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to `&mut dyn Any` for mutable runtime type inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// The host container this widget is mounted in, if attached.
    fn container(&self) -> Option<NodeId> {
        self.component().container()
    }

    /// The widget's top-level nodes, in document order.
    fn roots(&self) -> &[NodeId] {
        self.component().roots()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
