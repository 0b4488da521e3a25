//! Event envelopes: typed payload values and the per-dispatch envelope.
//!
//! An [`Envelope`] is transient — it is built for one dispatch and dropped
//! afterwards. Its `event_type` and `target` always reflect the emit call that
//! produced it; caller-supplied "type"/"target" fields in the data bag are
//! discarded when the envelope is built.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

// ---------------------------------------------------------------------------
// BusId
// ---------------------------------------------------------------------------

/// Process-unique identifier for an [`EventBus`](crate::event::EventBus).
///
/// Used as the `target` of an envelope, so listeners can tell which bus
/// emitted an event without holding a reference to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BusId(u64);

impl BusId {
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        BusId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// Payload value carried in an envelope's extra fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// The string content, if this value is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean content, if this value is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer content, if this value is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

// ---------------------------------------------------------------------------
// EventData
// ---------------------------------------------------------------------------

/// Builder-style field bag passed to `emit`.
///
/// Fields are shallow-copied into the envelope. The reserved keys "type" and
/// "target" are always discarded; "bubbles" and "cancelable" (booleans) are
/// pulled out into the envelope's flags instead of staying in the field map.
#[derive(Debug, Clone, Default)]
pub struct EventData(pub(crate) HashMap<String, Value>);

impl EventData {
    /// Create an empty data bag.
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Insert a field (chainable).
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_owned(), value.into());
        self
    }

    /// Insert a field.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_owned(), value.into());
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// A dispatched event: type, emitting bus, flags, and extra fields.
#[derive(Debug, Clone)]
pub struct Envelope {
    event_type: String,
    target: BusId,
    bubbles: bool,
    cancelable: bool,
    fields: HashMap<String, Value>,
}

impl Envelope {
    /// Build an envelope for one dispatch.
    ///
    /// Starts from `{bubbles: true, cancelable: true}`, shallow-merges `data`
    /// over it, then forces `event_type` and `target` to the arguments given
    /// here. Non-boolean "bubbles"/"cancelable" fields are dropped.
    pub fn new(event_type: impl Into<String>, target: BusId, data: EventData) -> Self {
        let mut fields = data.0;
        fields.remove("type");
        fields.remove("target");
        let bubbles = match fields.remove("bubbles") {
            Some(Value::Bool(b)) => b,
            _ => true,
        };
        let cancelable = match fields.remove("cancelable") {
            Some(Value::Bool(b)) => b,
            _ => true,
        };
        Self {
            event_type: event_type.into(),
            target,
            bubbles,
            cancelable,
            fields,
        }
    }

    /// The event type this envelope was dispatched as.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// The bus that emitted this envelope.
    pub fn target(&self) -> BusId {
        self.target
    }

    /// Whether this event bubbles.
    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    /// Whether this event is cancelable.
    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    /// Look up an extra field by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_ids_are_unique() {
        let a = BusId::next();
        let b = BusId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn value_accessors() {
        assert_eq!(Value::Str("x".into()).as_str(), Some("x"));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(7).as_int(), Some(7));
        assert_eq!(Value::Null.as_str(), None);
        assert_eq!(Value::Int(1).as_bool(), None);
    }

    #[test]
    fn value_from_conversions() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(3i64), Value::Int(3));
        assert_eq!(Value::from(1.5f64), Value::Float(1.5));
        assert_eq!(Value::from("hi"), Value::Str("hi".into()));
        assert_eq!(Value::from(String::from("hi")), Value::Str("hi".into()));
    }

    #[test]
    fn envelope_defaults() {
        let target = BusId::next();
        let env = Envelope::new("change", target, EventData::new());
        assert_eq!(env.event_type(), "change");
        assert_eq!(env.target(), target);
        assert!(env.bubbles());
        assert!(env.cancelable());
        assert!(env.get("anything").is_none());
    }

    #[test]
    fn envelope_carries_extra_fields() {
        let target = BusId::next();
        let data = EventData::new().with("value", 42i64).with("label", "ok");
        let env = Envelope::new("select", target, data);
        assert_eq!(env.get("value"), Some(&Value::Int(42)));
        assert_eq!(env.get("label"), Some(&Value::Str("ok".into())));
    }

    #[test]
    fn envelope_discards_reserved_type_and_target() {
        let target = BusId::next();
        let data = EventData::new()
            .with("type", "spoofed")
            .with("target", "spoofed");
        let env = Envelope::new("real", target, data);
        assert_eq!(env.event_type(), "real");
        assert_eq!(env.target(), target);
        assert!(env.get("type").is_none());
        assert!(env.get("target").is_none());
    }

    #[test]
    fn envelope_flags_overridable_by_data() {
        let target = BusId::next();
        let data = EventData::new().with("bubbles", false).with("cancelable", false);
        let env = Envelope::new("change", target, data);
        assert!(!env.bubbles());
        assert!(!env.cancelable());
        assert!(env.get("bubbles").is_none());
    }

    #[test]
    fn envelope_non_bool_flag_fields_are_dropped() {
        let target = BusId::next();
        let data = EventData::new().with("bubbles", "yes");
        let env = Envelope::new("change", target, data);
        assert!(env.bubbles());
        assert!(env.get("bubbles").is_none());
    }
}
