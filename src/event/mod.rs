//! Event system: bus, callbacks, envelopes.

pub mod bus;
pub mod envelope;

pub use bus::{Callback, EventBus};
pub use envelope::{BusId, Envelope, EventData, Value};
