//! EventBus: per-instance ordered listener lists with synchronous dispatch.
//!
//! Dispatch snapshots the listener list for the event type before invoking
//! anything, so a listener that adds or removes listeners mid-dispatch never
//! perturbs the pass in progress. `once` listeners are removed after the full
//! forward pass, scanning the snapshot in reverse, which guarantees they
//! observe exactly one dispatch even when other listeners mutate the list.
//! Re-entrant dispatch of the *same* type from inside a listener is
//! supported (a listener may re-emit its own type and be re-invoked while
//! its outer call is still on the stack); only infinite recursion is not
//! guarded against.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::envelope::{BusId, Envelope, EventData};

// ---------------------------------------------------------------------------
// Callback
// ---------------------------------------------------------------------------

/// A clonable handle to a listener closure.
///
/// Cloning shares the underlying closure; identity (for removal) is the
/// shared allocation, compared with `Rc::ptr_eq`. Registering one callback
/// twice for the same type means it fires once per registration.
///
/// The closure is `Fn`, so re-entrant dispatch may re-invoke it while an
/// outer call is still running. State the closure mutates lives in the
/// caller's own `Cell`/`RefCell`.
pub struct Callback(Rc<dyn Fn(&Envelope)>);

impl Callback {
    /// Wrap a closure as a callback.
    pub fn new(f: impl Fn(&Envelope) + 'static) -> Self {
        Self(Rc::new(f))
    }

    fn invoke(&self, envelope: &Envelope) {
        (self.0)(envelope);
    }

    fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Clone for Callback {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Rc::as_ptr(&self.0))
    }
}

// ---------------------------------------------------------------------------
// ListenerRecord
// ---------------------------------------------------------------------------

/// One registration on a bus. Released on explicit removal, or after firing
/// if `once`.
#[derive(Debug, Clone)]
struct ListenerRecord {
    callback: Callback,
    once: bool,
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Per-instance publish/subscribe primitive.
///
/// Listener lists live behind a `RefCell` so listeners may add, remove, and
/// dispatch re-entrantly from inside a callback.
pub struct EventBus {
    id: BusId,
    listeners: RefCell<HashMap<String, Vec<ListenerRecord>>>,
}

impl EventBus {
    /// Create a bus with a fresh process-unique id.
    pub fn new() -> Self {
        Self {
            id: BusId::next(),
            listeners: RefCell::new(HashMap::new()),
        }
    }

    /// This bus's id. Envelopes emitted here carry it as their target.
    pub fn id(&self) -> BusId {
        self.id
    }

    /// Append a listener for `event_type`. No de-duplication.
    pub fn add_listener(&self, event_type: &str, callback: Callback, once: bool) {
        self.listeners
            .borrow_mut()
            .entry(event_type.to_owned())
            .or_default()
            .push(ListenerRecord { callback, once });
    }

    /// Remove **every** record for `event_type` whose callback is pointer
    /// equal to `callback`, in one filtering pass. Unknown callbacks are a
    /// no-op. Safe to call during an active dispatch of a different type.
    pub fn remove_listener(&self, event_type: &str, callback: &Callback) {
        if let Some(stack) = self.listeners.borrow_mut().get_mut(event_type) {
            stack.retain(|record| !record.callback.ptr_eq(callback));
        }
    }

    /// Synchronously invoke every listener registered for the envelope's
    /// type, in registration order, then drop `once` listeners.
    pub fn dispatch(&self, envelope: &Envelope) {
        let snapshot = {
            let listeners = self.listeners.borrow();
            match listeners.get(envelope.event_type()) {
                Some(stack) if !stack.is_empty() => stack.clone(),
                _ => return,
            }
        };

        for record in &snapshot {
            record.callback.invoke(envelope);
        }

        // Reverse scan so each once record releases exactly one registration.
        for record in snapshot.iter().rev() {
            if record.once {
                self.remove_once(envelope.event_type(), &record.callback);
            }
        }
    }

    /// Build an envelope from `data` and dispatch it. The envelope's type and
    /// target always reflect this call, whatever `data` says.
    pub fn emit(&self, event_type: &str, data: EventData) {
        let envelope = Envelope::new(event_type, self.id, data);
        self.dispatch(&envelope);
    }

    /// Register a persistent listener.
    pub fn on(&self, event_type: &str, callback: Callback) {
        self.add_listener(event_type, callback, false);
    }

    /// Register a listener that is removed after its first dispatch.
    pub fn once(&self, event_type: &str, callback: Callback) {
        self.add_listener(event_type, callback, true);
    }

    /// Remove a listener. See [`EventBus::remove_listener`].
    pub fn off(&self, event_type: &str, callback: &Callback) {
        self.remove_listener(event_type, callback);
    }

    /// Number of live registrations for `event_type`.
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.listeners
            .borrow()
            .get(event_type)
            .map_or(0, Vec::len)
    }

    // Remove the first once-flagged record matching the callback. Persistent
    // registrations of the same callback survive.
    fn remove_once(&self, event_type: &str, callback: &Callback) {
        if let Some(stack) = self.listeners.borrow_mut().get_mut(event_type) {
            if let Some(pos) = stack
                .iter()
                .position(|record| record.once && record.callback.ptr_eq(callback))
            {
                stack.remove(pos);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("id", &self.id)
            .field("types", &self.listeners.borrow().len())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
