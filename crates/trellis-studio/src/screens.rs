//! The demo screens: host types, their schemas and their templates.

use std::any::Any;
use std::rc::Rc;

use trellis::host::{Fields, FieldDecl, Host, HostSchema, Marker, PostSetup};
use trellis::types::{Constructor, FRAME, MOUSE_INPUT_LISTENER, PANEL, TypeInfo, TypeRegistry};
use trellis::{Object, ObjectRef, Value};
use trellis_markup::MemoryLoader;
use trellis_ui::prelude::*;

pub const HELLO: &str = "studio.HelloWorld";
pub const MOUSE: &str = "studio.MouseTracker";
pub const CREW: &str = "studio.CrewRoster";
pub const GROUPS: &str = "studio.LaunchWindow";
pub const FANCY: &str = "studio.FancyPanel";
pub const NESTED: &str = "studio.Nested";

/// Top-level screens in the order the studio shows them.
pub const ALL: [&str; 5] = [HELLO, MOUSE, CREW, GROUPS, NESTED];

// ── Screen ────────────────────────────────────────────────────────────────

/// A host whose fields are declared by a schema and stored by name.
pub struct Screen {
    schema: HostSchema,
    fields: Fields,
    root: Component,
}

impl Screen {
    fn new(ty: &str, kind: WidgetKind, schema: HostSchema) -> Self {
        Self { schema, fields: Fields::new(), root: Component::new(ty, kind) }
    }

    fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields = self.fields.with(field, value);
        self
    }

    pub fn component(&self, field: &str) -> Option<Component> {
        self.fields.component(field)
    }
}

impl Object for Screen {
    fn type_name(&self) -> &str {
        &self.schema.ty
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn field(&self, name: &str) -> Option<Value> {
        self.fields.get(&self.schema, name)
    }

    fn as_component(&self) -> Option<Component> {
        Some(self.root.clone())
    }

    fn as_host(&self) -> Option<&dyn Host> {
        Some(self)
    }
}

impl Host for Screen {
    fn schema(&self) -> &HostSchema {
        &self.schema
    }

    fn set_field(&self, name: &str, value: Value) -> bool {
        self.fields.set(&self.schema, name, value)
    }

    fn post_setup(&self) -> Option<&dyn PostSetup> {
        Some(self)
    }
}

impl PostSetup for Screen {
    fn after_create(&self) {
        log::info!("{} ready", self.schema.ty);
    }
}

pub fn as_screen(obj: &ObjectRef) -> Option<&Screen> {
    obj.as_any().downcast_ref::<Screen>()
}

// ── Screens ───────────────────────────────────────────────────────────────

fn hello() -> Screen {
    let schema = HostSchema::new(HELLO)
        .field(FieldDecl::new("greeting", "Label").marker(Marker::component(["greeting"])))
        .field(FieldDecl::new("wave", "Button"))
        .field(FieldDecl::new("waves", "ActionListener").marker(Marker::listener(["wave"])));
    Screen::new(HELLO, WidgetKind::Frame, schema)
        .with("waves", Listener::new("waves", [ListenerCap::Action], |ev| println!("  wave: {ev:?}")))
}

fn mouse() -> Screen {
    let schema = HostSchema::new(MOUSE)
        .field(FieldDecl::new("position", "Label").marker(Marker::component(["position"])))
        .field(FieldDecl::new("tracker", MOUSE_INPUT_LISTENER).marker(Marker::listener(["pad"])));
    let tracker = Listener::new("tracker", [ListenerCap::Mouse, ListenerCap::MouseMotion], |ev| match ev {
        Event::MouseMotion { x, y, .. } => println!("  pad: pointer at {x},{y}"),
        other => println!("  pad: {other:?}"),
    });
    Screen::new(MOUSE, WidgetKind::Frame, schema).with("tracker", tracker)
}

fn crew() -> Screen {
    let schema = HostSchema::new(CREW)
        .field(FieldDecl::new("crew", "ListModel"))
        .field(FieldDecl::new("roster", "List").marker(Marker::component(["crew"])))
        .field(FieldDecl::new("badge", "ListCellRenderer").marker(Marker::cell_renderer(["crew"])))
        .field(FieldDecl::new("picks", "ListSelectionListener").marker(Marker::listener(["crew"])));
    let model = ListModel::new();
    for name in ["Ada", "Grace", "Katherine"] {
        model.push(name);
    }
    let badge = CellRenderer::new(|name, index, selected| {
        let mark = if selected { '>' } else { ' ' };
        format!("{mark} {}. {name}", index + 1)
    });
    Screen::new(CREW, WidgetKind::Frame, schema)
        .with("crew", model)
        .with("badge", badge)
        .with("picks", Listener::new("picks", [ListenerCap::ListSelection], |ev| println!("  crew: {ev:?}")))
}

fn groups() -> Screen {
    let schema = HostSchema::new(GROUPS).field(FieldDecl::new("leo", "RadioButton"));
    Screen::new(GROUPS, WidgetKind::Frame, schema)
}

fn fancy() -> Screen {
    let schema =
        HostSchema::new(FANCY).field(FieldDecl::new("press", "Button").marker(Marker::component(["fancyButton"])));
    Screen::new(FANCY, WidgetKind::Panel, schema)
}

fn nested() -> Screen {
    let schema = HostSchema::new(NESTED)
        .field(FieldDecl::new("fancy", FANCY))
        .field(FieldDecl::new("submit", "Action").marker(Marker::action(["submit"])));
    Screen::new(NESTED, WidgetKind::Frame, schema)
        .with("submit", Action::new("Submit", |ev| println!("  submitted: {ev:?}")))
}

fn screen_type(name: &'static str, base: &str, template: &str, build: fn() -> Screen) -> TypeInfo {
    TypeInfo::new(name)
        .extends(base)
        .template(template)
        .constructor(Constructor::new(Vec::<String>::new(), move |_| Ok(Rc::new(build()) as ObjectRef)))
}

/// The builtin toolkit plus every studio screen.
pub fn registry() -> TypeRegistry {
    TypeRegistry::builtin()
        .with(screen_type(HELLO, FRAME, "hello", hello))
        .with(screen_type(MOUSE, FRAME, "mouse", mouse))
        .with(screen_type(CREW, FRAME, "crew", crew))
        .with(screen_type(GROUPS, FRAME, "groups", groups))
        .with(screen_type(FANCY, PANEL, "fancy", fancy))
        .with(screen_type(NESTED, FRAME, "nested", nested))
}

pub fn templates() -> MemoryLoader {
    MemoryLoader::new()
        .with("hello", include_str!("../ui/hello.xml"))
        .with("mouse", include_str!("../ui/mouse.xml"))
        .with("crew", include_str!("../ui/crew.xml"))
        .with("groups", include_str!("../ui/groups.xml"))
        .with("fancy", include_str!("../ui/fancy.xml"))
        .with("nested", include_str!("../ui/nested.xml"))
}
