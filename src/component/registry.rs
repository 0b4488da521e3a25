//! Widget registry: write-once name → factory table.
//!
//! The registry is an explicitly constructed object handed to the
//! [`Builder`](super::Builder), not a process-wide global. The usage pattern
//! is "register everything at startup, resolve while building": entries are
//! never overwritten or removed.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use regex::Regex;

use crate::dom::NodeId;

use super::builder::{BuildError, Builder};
use super::widget::Widget;

/// Constructs a widget with the given marker node as its host container.
pub type Factory = Rc<dyn Fn(&Builder, NodeId) -> Result<Box<dyn Widget>, BuildError>>;

/// Errors from registration and resolution. Both are fatal configuration
/// defects: an unresolved name aborts the enclosing build entirely.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("widget '{name}' is registered multiple times")]
    DuplicateRegistration { name: String },
    #[error("widget '{name}' is not registered")]
    UndefinedRegistration { name: String },
}

/// Name → factory table resolving `widget` markers to concrete types.
pub struct Registry {
    entries: RefCell<HashMap<String, Factory>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Register a factory under `name`. Fails if the name is taken; entries
    /// live for the registry's lifetime.
    pub fn register<F>(&self, name: &str, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(&Builder, NodeId) -> Result<Box<dyn Widget>, BuildError> + 'static,
    {
        let mut entries = self.entries.borrow_mut();
        if entries.contains_key(name) {
            return Err(RegistryError::DuplicateRegistration {
                name: name.to_owned(),
            });
        }
        entries.insert(name.to_owned(), Rc::new(factory));
        Ok(())
    }

    /// Look up the factory registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<Factory, RegistryError> {
        self.entries
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UndefinedRegistration {
                name: name.to_owned(),
            })
    }

    /// All factories whose name matches `pattern`, a regular expression
    /// matched anywhere in the name. An invalid pattern matches nothing.
    /// Order unspecified.
    pub fn resolve_by_prefix(&self, pattern: &str) -> Vec<Factory> {
        let Ok(pattern) = Regex::new(pattern) else {
            return Vec::new();
        };
        self.entries
            .borrow()
            .iter()
            .filter(|(name, _)| pattern.is_match(name))
            .map(|(_, factory)| Rc::clone(factory))
            .collect()
    }

    /// Whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.borrow().contains_key(name)
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.borrow();
        let mut names: Vec<&String> = entries.keys().collect();
        names.sort();
        f.debug_struct("Registry").field("names", &names).finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
