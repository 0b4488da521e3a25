//! Integration tests for weft.
//!
//! These tests exercise the public API from outside the crate: building
//! nested components from templates, localized substitution, named-node
//! access, and event flow between components and template nodes.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pretty_assertions::assert_eq;

use weft::component::{
    Blueprint, BuildError, Builder, Component, Options, Registry, RegistryError, Widget,
};
use weft::event::{Callback, EventData, Value};
use weft::nls::ResourceCatalog;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

struct Block {
    component: Component,
}

impl Widget for Block {
    fn component(&self) -> &Component {
        &self.component
    }
    fn component_mut(&mut self) -> &mut Component {
        &mut self.component
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn register(registry: &Registry, name: &str, blueprint: Blueprint) {
    registry
        .register(name, move |builder, host| {
            let component = builder.build(Some(host), &blueprint, &Options::new())?;
            Ok(Box::new(Block { component }))
        })
        .unwrap();
}

// ---------------------------------------------------------------------------
// Construction end to end
// ---------------------------------------------------------------------------

#[test]
fn test_nested_widgets_mount_in_place() {
    let registry = Rc::new(Registry::new());
    register(
        &registry,
        "App.Label",
        Blueprint::new().with_template("<span>ready</span>"),
    );
    register(
        &registry,
        "App.Panel",
        Blueprint::new().with_template("<div widget='App.Label' handle='label'></div>"),
    );
    let builder = Builder::new(Rc::clone(&registry));

    let blueprint =
        Blueprint::new().with_template("<main><div widget='App.Panel' handle='panel'></div></main>");
    let app = builder.build(None, &blueprint, &Options::new()).unwrap();

    let panel = app.elem("panel").unwrap().as_widget().unwrap();
    let label = panel.component().elem("label").unwrap().as_widget().unwrap();

    // Each child mounted under its own marker node, all in one arena.
    let dom = builder.dom();
    let dom = dom.borrow();
    assert_eq!(dom.text_content(app.roots()[0]), "ready");
    assert_eq!(dom.children(label.container().unwrap()), label.roots());
}

#[test]
fn test_localized_template_text() {
    let catalog = ResourceCatalog::new()
        .with("title", "en", "Inbox")
        .with("title", "fr", "Boîte de réception");
    let blueprint = Blueprint::new()
        .with_template("<h1 handle='title'>nls(title)</h1>")
        .with_catalog(catalog);

    let english = Builder::new(Rc::new(Registry::new()))
        .build(None, &blueprint, &Options::new())
        .unwrap();
    assert_eq!(english.node("title").unwrap().text(), "Inbox");

    let french = Builder::new(Rc::new(Registry::new()))
        .with_locale("fr")
        .build(None, &blueprint, &Options::new())
        .unwrap();
    assert_eq!(french.node("title").unwrap().text(), "Boîte de réception");
}

#[test]
fn test_runtime_resource_lookup_with_substitutions() {
    let blueprint = Blueprint::new()
        .with_template("<div></div>")
        .with_string("count", "en", "{0} of {1} selected");
    let component = Builder::new(Rc::new(Registry::new()))
        .build(None, &blueprint, &Options::new())
        .unwrap();

    assert_eq!(component.resource("count", &["3", "10"]).unwrap(), "3 of 10 selected");
}

#[test]
fn test_unregistered_widget_fails_the_whole_build() {
    let builder = Builder::new(Rc::new(Registry::new()));
    let blueprint = Blueprint::new().with_template("<main><div widget='Missing'></div></main>");
    let err = builder.build(None, &blueprint, &Options::new()).unwrap_err();
    assert_eq!(
        err,
        BuildError::Registry(RegistryError::UndefinedRegistration { name: "Missing".into() })
    );
}

#[test]
fn test_detached_build_then_place() {
    let builder = Builder::new(Rc::new(Registry::new()));
    let host = builder
        .dom()
        .borrow_mut()
        .insert(weft::dom::NodeData::element("body"));

    let blueprint = Blueprint::new().with_template("<header></header><footer></footer>");
    let mut component = builder.build(None, &blueprint, &Options::new()).unwrap();
    assert_eq!(component.container(), None);

    component.place(host);
    assert_eq!(builder.dom().borrow().children(host), component.roots());
}

// ---------------------------------------------------------------------------
// Events across the graph
// ---------------------------------------------------------------------------

#[test]
fn test_component_event_round_trip() {
    let blueprint = Blueprint::new().with_template("<div></div>");
    let component = Builder::new(Rc::new(Registry::new()))
        .build(None, &blueprint, &Options::new())
        .unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_in = Rc::clone(&seen);
    component.on(
        "select",
        Callback::new(move |envelope| {
            let index = envelope.get("index").and_then(Value::as_int).unwrap_or(-1);
            seen_in.borrow_mut().push((envelope.event_type().to_owned(), index));
        }),
    );

    component.emit("select", EventData::new().with("index", 4i64));
    component.emit("select", EventData::new().with("index", 7i64));
    assert_eq!(
        seen.borrow().as_slice(),
        &[("select".to_owned(), 4), ("select".to_owned(), 7)]
    );
}

#[test]
fn test_once_listener_fires_a_single_time() {
    let blueprint = Blueprint::new().with_template("<div></div>");
    let component = Builder::new(Rc::new(Registry::new()))
        .build(None, &blueprint, &Options::new())
        .unwrap();

    let hits = Rc::new(Cell::new(0));
    let hits_in = Rc::clone(&hits);
    component.once("ready", Callback::new(move |_| hits_in.set(hits_in.get() + 1)));

    component.emit("ready", EventData::new());
    component.emit("ready", EventData::new());
    assert_eq!(hits.get(), 1);
}

#[test]
fn test_node_events_stay_on_their_node() {
    let blueprint = Blueprint::new().with_template("<button handle='ok'></button><button handle='cancel'></button>");
    let component = Builder::new(Rc::new(Registry::new()))
        .build(None, &blueprint, &Options::new())
        .unwrap();

    let clicks = Rc::new(Cell::new(0));
    let clicks_in = Rc::clone(&clicks);
    component
        .node("ok")
        .unwrap()
        .on("click", Callback::new(move |_| clicks_in.set(clicks_in.get() + 1)));

    component.node("cancel").unwrap().fire("click", EventData::new());
    assert_eq!(clicks.get(), 0);

    component.node("ok").unwrap().fire("click", EventData::new());
    assert_eq!(clicks.get(), 1);
}

#[test]
fn test_sibling_components_have_distinct_bus_identities() {
    let blueprint = Blueprint::new().with_template("<div></div>");
    let builder = Builder::new(Rc::new(Registry::new()));
    let a = builder.build(None, &blueprint, &Options::new()).unwrap();
    let b = builder.build(None, &blueprint, &Options::new()).unwrap();
    assert_ne!(a.bus_id(), b.bus_id());
}

// ---------------------------------------------------------------------------
// Handles and queries
// ---------------------------------------------------------------------------

#[test]
fn test_handle_queries_scope_to_descendants() {
    let blueprint = Blueprint::new().with_template(
        "<ul handle='list'>\
           <li class='item'>one</li>\
           <li class='item current'>two</li>\
         </ul>\
         <p class='item'>outside</p>",
    );
    let component = Builder::new(Rc::new(Registry::new()))
        .build(None, &blueprint, &Options::new())
        .unwrap();

    let list = component.node("list").unwrap();
    assert_eq!(list.find_all(".item").len(), 2);
    assert_eq!(list.find("li.current").unwrap().text(), "two");
    assert!(list.find("p").is_none());
}

#[test]
fn test_set_css_restyles_all_roots() {
    let blueprint = Blueprint::new().with_template("<div></div><div></div>");
    let component = Builder::new(Rc::new(Registry::new()))
        .build(None, &blueprint, &Options::new())
        .unwrap();

    component.set_css("pane hidden");
    let dom = component.dom();
    let dom = dom.borrow();
    for &root in component.roots() {
        assert_eq!(dom.get(root).unwrap().attribute("class"), Some("pane hidden"));
    }
}
