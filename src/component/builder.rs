//! Component construction: the Builder and its build protocol.
//!
//! A [`Builder`] carries the shared node arena, the widget [`Registry`], and
//! the current locale. [`Builder::build`] runs the whole construction
//! protocol for one component: catalog setup, template resolution, `nls(...)`
//! substitution, parsing, named-node extraction, recursive sub-widget
//! composition, root computation, and optional attachment.
//!
//! Construction is fully synchronous and has no partial-failure recovery: if
//! any step fails, the component was never built, and the error aborts the
//! enclosing ancestor chain.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::OnceLock;

use regex::Regex;

use crate::dom::{Dom, NodeData, NodeId, TEMPLATE_TAG};
use crate::event::EventBus;
use crate::markup::{parse_fragment, ParseError};
use crate::nls::{NlsError, ResourceCatalog};

use super::registry::{Registry, RegistryError};
use super::widget::Widget;
use super::{Component, NamedEntry};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Umbrella error returned by [`Builder::build`]. Every variant is a
/// structural or configuration defect; none are retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Nls(#[from] NlsError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

// ---------------------------------------------------------------------------
// Blueprint / Options
// ---------------------------------------------------------------------------

/// A component type's static hooks: its default template and its initial
/// localization catalog. Factories typically keep one per widget type.
#[derive(Debug, Clone, Default)]
pub struct Blueprint {
    /// Default template markup; `None` means "no template".
    pub template: Option<String>,
    /// Initial localization strings for components of this type.
    pub catalog: ResourceCatalog,
}

impl Blueprint {
    /// A blueprint with no template and an empty catalog.
    pub fn new() -> Self {
        Self {
            template: None,
            catalog: ResourceCatalog::new(),
        }
    }

    /// Set the default template (builder).
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Set the initial catalog (builder).
    pub fn with_catalog(mut self, catalog: ResourceCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Add one localized string to the initial catalog (builder).
    pub fn with_string(mut self, id: &str, locale: &str, text: &str) -> Self {
        self.catalog.add(id, locale, text);
        self
    }
}

/// Per-instance options. A template given here overrides the blueprint's.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Literal template override.
    pub template: Option<String>,
}

impl Options {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the template override (builder).
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }
}

// ---------------------------------------------------------------------------
// nls substitution
// ---------------------------------------------------------------------------

/// Resolve every `nls(IDENTIFIER)` token in `text` against `catalog`.
///
/// The text is trimmed first. After each replacement the **entire** string is
/// re-scanned from the start, so a resolved resource that itself contains the
/// token pattern is substituted again on the next pass. That rescan behavior
/// is deliberate and kept as-is.
fn substitute_nls(text: &str, catalog: &ResourceCatalog) -> Result<String, NlsError> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"nls\((.*?)\)").expect("nls token pattern is valid")
    });

    let mut out = text.trim().to_owned();
    loop {
        let (range, id) = match pattern.captures(&out) {
            Some(caps) => {
                let Some(whole) = caps.get(0) else { break };
                let id = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                (whole.range(), id.to_owned())
            }
            None => break,
        };
        let replacement = catalog.resource(&id, &[], None)?;
        out.replace_range(range, &replacement);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Drives component construction against one shared arena and registry.
pub struct Builder {
    dom: Rc<RefCell<Dom>>,
    registry: Rc<Registry>,
    locale: String,
}

impl Builder {
    /// Create a builder with a fresh arena and the "en" locale.
    pub fn new(registry: Rc<Registry>) -> Self {
        Self {
            dom: Rc::new(RefCell::new(Dom::new())),
            registry,
            locale: "en".to_owned(),
        }
    }

    /// Set the locale stamped on every built component's catalog (builder).
    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = locale.to_owned();
        self
    }

    /// The shared node arena.
    pub fn dom(&self) -> Rc<RefCell<Dom>> {
        Rc::clone(&self.dom)
    }

    /// The widget registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The builder's locale.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Build one component.
    ///
    /// With a `host`, the finished component's roots are appended to it in
    /// order; without one, the component stays fully built but detached, and
    /// the caller may attach it later with [`Component::place`].
    pub fn build(
        &self,
        host: Option<NodeId>,
        blueprint: &Blueprint,
        options: &Options,
    ) -> Result<Component, BuildError> {
        // Catalog setup: the type's strings, stamped with the current locale.
        let mut catalog = blueprint.catalog.clone();
        catalog.set_locale(&self.locale);

        // Template resolution: instance override first, type default second.
        let template = options
            .template
            .as_deref()
            .or(blueprint.template.as_deref());

        let mut named = HashMap::new();
        let mut anonymous = Vec::new();
        let container;
        let roots;

        if let Some(text) = template {
            let substituted = substitute_nls(text, &catalog)?;
            container = parse_fragment(&mut self.dom.borrow_mut(), &substituted)?;

            // A composition failure aborts the build; the parsed subtree is
            // removed so the shared arena does not accumulate orphans.
            if let Err(err) = self.compose(container, &mut named, &mut anonymous) {
                self.dom.borrow_mut().remove(container);
                return Err(err);
            }

            roots = self.dom.borrow().children(container).to_vec();
        } else {
            // No template: empty roots, empty named table.
            container = self
                .dom
                .borrow_mut()
                .insert(NodeData::element(TEMPLATE_TAG));
            roots = Vec::new();
        }

        let mut component = Component {
            bus: EventBus::new(),
            dom: Rc::clone(&self.dom),
            catalog,
            container,
            roots,
            named,
            anonymous,
            host: None,
        };

        if let Some(host) = host {
            component.place(host);
        }

        Ok(component)
    }

    // Steps after parsing: named-node extraction, then sub-widget
    // composition.
    fn compose(
        &self,
        container: NodeId,
        named: &mut HashMap<String, NamedEntry>,
        anonymous: &mut Vec<Box<dyn Widget>>,
    ) -> Result<(), BuildError> {
        // Named nodes: handle markers, document order, last wins.
        for (name, id) in self.marked_nodes(container, "handle") {
            named.insert(name, NamedEntry::Node(id));
        }

        // Sub-widgets: the marker snapshot is taken before any child is
        // built, so nodes a child mounts are not re-visited.
        for (name, marker) in self.marked_nodes(container, "widget") {
            let factory = self.registry.resolve(&name)?;
            let widget = factory(self, marker)?;

            let handle_name = self
                .dom
                .borrow()
                .get(marker)
                .and_then(|data| data.attribute("handle").map(str::to_owned));
            match handle_name {
                // A widget entry always overwrites the raw-node entry
                // recorded for the same marker above.
                Some(handle) => {
                    named.insert(handle, NamedEntry::Widget(widget));
                }
                // Unnamed children still own listeners and state; the
                // parent keeps them alive.
                None => anonymous.push(widget),
            }
        }

        Ok(())
    }

    // All descendants of `container` carrying `attr`, as (value, id) pairs in
    // document order.
    fn marked_nodes(&self, container: NodeId, attr: &str) -> Vec<(String, NodeId)> {
        let dom = self.dom.borrow();
        dom.walk_depth_first(container)
            .into_iter()
            .skip(1)
            .filter_map(|id| {
                dom.get(id)
                    .and_then(|data| data.attribute(attr))
                    .map(|value| (value.to_owned(), id))
            })
            .collect()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
