//! The type lattice and registry that stand in for runtime reflection.
//!
//! Every constructible type is registered up front with its supertype, its
//! constructors, its static constants and the single-argument methods a
//! template may name as a listener add function.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use trellis_ui::prelude::*;

use crate::value::{ObjectRef, ResolvedArg, Value};

// ── Type names ────────────────────────────────────────────────────────────

pub const OBJECT: &str = "Object";
pub const NUMBER: &str = "Number";
pub const INTEGER: &str = "Integer";
pub const INT: &str = "int";
pub const BOOLEAN: &str = "Boolean";
pub const BOOL: &str = "boolean";
pub const STRING: &str = "String";

pub const COMPONENT: &str = "trellis.widgets.Component";
pub const CONTAINER: &str = "trellis.widgets.Container";
pub const WINDOW: &str = "trellis.widgets.Window";
pub const FRAME: &str = "trellis.widgets.Frame";
pub const DIALOG: &str = "trellis.widgets.Dialog";
pub const PANEL: &str = "trellis.widgets.Panel";
pub const SCROLL_PANE: &str = "trellis.widgets.ScrollPane";
pub const ABSTRACT_BUTTON: &str = "trellis.widgets.AbstractButton";
pub const BUTTON: &str = "trellis.widgets.Button";
pub const TOGGLE_BUTTON: &str = "trellis.widgets.ToggleButton";
pub const CHECK_BOX: &str = "trellis.widgets.CheckBox";
pub const RADIO_BUTTON: &str = "trellis.widgets.RadioButton";
pub const LABEL: &str = "trellis.widgets.Label";
pub const TEXT_COMPONENT: &str = "trellis.widgets.TextComponent";
pub const TEXT_FIELD: &str = "trellis.widgets.TextField";
pub const TEXT_AREA: &str = "trellis.widgets.TextArea";
pub const LIST: &str = "trellis.widgets.List";
pub const LIST_SELECTION_MODE: &str = "trellis.widgets.List$SelectionMode";
pub const TREE: &str = "trellis.widgets.Tree";
pub const ACTION: &str = "trellis.widgets.Action";
pub const CELL_RENDERER: &str = "trellis.widgets.ListCellRenderer";
pub const LIST_MODEL: &str = "trellis.widgets.ListModel";
pub const BUTTON_GROUP: &str = "trellis.widgets.ButtonGroup";
pub const DIMENSION: &str = "trellis.widgets.Dimension";

pub const LAYOUT_MANAGER: &str = "trellis.layout.LayoutManager";
pub const BORDER_LAYOUT: &str = "trellis.layout.BorderLayout";
pub const FLOW_LAYOUT: &str = "trellis.layout.FlowLayout";
pub const GRID_LAYOUT: &str = "trellis.layout.GridLayout";
pub const BOX_LAYOUT: &str = "trellis.layout.BoxLayout";

pub const EVENT_LISTENER: &str = "trellis.event.EventListener";
pub const MOUSE_INPUT_LISTENER: &str = "trellis.event.MouseInputListener";

/// The listener interface type that receives a capability.
pub fn listener_type(cap: ListenerCap) -> &'static str {
    match cap {
        ListenerCap::Mouse => "trellis.event.MouseListener",
        ListenerCap::MouseMotion => "trellis.event.MouseMotionListener",
        ListenerCap::MouseWheel => "trellis.event.MouseWheelListener",
        ListenerCap::Action => "trellis.event.ActionListener",
        ListenerCap::Key => "trellis.event.KeyListener",
        ListenerCap::TreeExpansion => "trellis.event.TreeExpansionListener",
        ListenerCap::TreeWillExpand => "trellis.event.TreeWillExpandListener",
        ListenerCap::ListSelection => "trellis.event.ListSelectionListener",
    }
}

// ── Constructor / Method ──────────────────────────────────────────────────

type BuildFn = dyn Fn(&[Value]) -> Result<ObjectRef, String>;
type InvokeFn = dyn Fn(&ObjectRef, &Value) -> Result<(), String>;

/// A constructor signature and the function that runs it.
#[derive(Clone)]
pub struct Constructor {
    pub params: Vec<String>,
    build: Rc<BuildFn>,
}

impl Constructor {
    pub fn new<P: Into<String>>(
        params: impl IntoIterator<Item = P>,
        build: impl Fn(&[Value]) -> Result<ObjectRef, String> + 'static,
    ) -> Self {
        Self { params: params.into_iter().map(Into::into).collect(), build: Rc::new(build) }
    }

    /// Invoke with arguments already matched against `params`.
    pub fn invoke(&self, args: &[Value]) -> Result<ObjectRef, String> {
        (self.build)(args)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Constructor({})", self.params.join(", "))
    }
}

/// A single-parameter method, callable by name from a `function(field)`
/// listener binding.
#[derive(Clone)]
pub struct Method {
    pub name: String,
    pub param: String,
    invoke: Rc<InvokeFn>,
}

impl Method {
    pub fn new(
        name: impl Into<String>,
        param: impl Into<String>,
        invoke: impl Fn(&ObjectRef, &Value) -> Result<(), String> + 'static,
    ) -> Self {
        Self { name: name.into(), param: param.into(), invoke: Rc::new(invoke) }
    }

    pub fn invoke(&self, target: &ObjectRef, arg: &Value) -> Result<(), String> {
        (self.invoke)(target, arg)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.param)
    }
}

// ── TypeInfo ──────────────────────────────────────────────────────────────

/// Everything the materializer knows about one type.
///
/// # Example
/// ```rust
/// use trellis::types::{TypeInfo, Constructor, PANEL};
/// use trellis::{Value, ObjectRef};
/// use trellis_ui::{Component, WidgetKind};
/// use std::rc::Rc;
///
/// let info = TypeInfo::new("demo.Sidebar")
///     .extends(PANEL)
///     .constructor(Constructor::new(Vec::<String>::new(), |_| {
///         Ok(Rc::new(Component::new("demo.Sidebar", WidgetKind::Panel)) as ObjectRef)
///     }));
/// assert_eq!(info.superclass.as_deref(), Some(PANEL));
/// ```
#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub name: String,
    pub superclass: Option<String>,
    pub constructors: Vec<Constructor>,
    pub constants: Vec<(String, ResolvedArg)>,
    pub methods: Vec<Method>,
    /// Identifier of the template that builds this type's contents.
    pub template: Option<String>,
    /// Marker types that stand for "whatever the bound field is declared as".
    pub is_abstract: bool,
}

impl TypeInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            superclass: Some(OBJECT.to_string()),
            constructors: Vec::new(),
            constants: Vec::new(),
            methods: Vec::new(),
            template: None,
            is_abstract: false,
        }
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// A root of the lattice, or a primitive with no superclass.
    pub fn root(mut self) -> Self {
        self.superclass = None;
        self
    }

    pub fn constructor(mut self, c: Constructor) -> Self {
        self.constructors.push(c);
        self
    }

    pub fn constant(mut self, name: impl Into<String>, ty: impl Into<String>, value: impl Into<Value>) -> Self {
        self.constants.push((name.into(), ResolvedArg::new(ty, value.into())));
        self
    }

    pub fn method(mut self, m: Method) -> Self {
        self.methods.push(m);
        self
    }

    pub fn template(mut self, identifier: impl Into<String>) -> Self {
        self.template = Some(identifier.into());
        self
    }

    pub fn abstract_marker(mut self) -> Self {
        self.is_abstract = true;
        self
    }
}

// ── TypeRegistry ──────────────────────────────────────────────────────────

/// Registered types plus a short-name alias table.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, TypeInfo>,
    aliases: HashMap<String, String>,
}

/// Boxed type → primitive.
const WRAPPERS: [(&str, &str); 2] = [(INTEGER, INT), (BOOLEAN, BOOL)];

impl TypeRegistry {
    /// An empty registry. Most callers want [`TypeRegistry::builtin`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type, replacing any previous registration of that name.
    pub fn register(&mut self, info: TypeInfo) {
        log::trace!("registering type {}", info.name);
        self.types.insert(info.name.clone(), info);
    }

    pub fn with(mut self, info: TypeInfo) -> Self {
        self.register(info);
        self
    }

    /// Map a short name to a registered type name.
    pub fn alias(&mut self, short: impl Into<String>, full: impl Into<String>) {
        self.aliases.insert(short.into(), full.into());
    }

    pub fn with_alias(mut self, short: impl Into<String>, full: impl Into<String>) -> Self {
        self.alias(short, full);
        self
    }

    pub fn get(&self, name: &str) -> Option<&TypeInfo> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn resolve_alias(&self, short: &str) -> Option<&str> {
        self.aliases.get(short).map(String::as_str)
    }

    /// The registered spelling of `name`: alias target, or `name` itself.
    pub fn canonical<'a>(&'a self, name: &'a str) -> &'a str {
        if self.types.contains_key(name) {
            return name;
        }
        self.resolve_alias(name).unwrap_or(name)
    }

    pub fn superclass(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|t| t.superclass.as_deref())
    }

    /// One step up the lattice. A boxed type steps to its primitive, a
    /// primitive steps to its wrapper's superclass, everything else steps to
    /// its superclass.
    pub fn broaden(&self, name: &str) -> Option<&str> {
        if let Some((_, prim)) = WRAPPERS.iter().find(|(boxed, _)| *boxed == name) {
            return Some(*prim);
        }
        if let Some((boxed, _)) = WRAPPERS.iter().find(|(_, prim)| *prim == name) {
            return self.superclass(boxed);
        }
        self.superclass(name)
    }

    /// Number of [`broaden`](Self::broaden) steps from `from` to `to`.
    pub fn distance(&self, from: &str, to: &str) -> Option<usize> {
        let mut cur = Some(self.canonical(from));
        let to = self.canonical(to);
        let mut steps = 0;
        while let Some(t) = cur {
            if t == to {
                return Some(steps);
            }
            cur = self.broaden(t);
            steps += 1;
        }
        None
    }

    pub fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        self.distance(sub, sup).is_some()
    }

    /// Whether a value can be passed where `param` is declared.
    ///
    /// Listeners satisfy a listener interface by capability, since one
    /// listener value may implement several of them.
    pub fn accepts(&self, param: &str, value: &Value) -> bool {
        let param = self.canonical(param);
        if let Some(listener) = value.downcast_ref::<Listener>() {
            let by_cap = ListenerCap::ALL.iter().any(|&cap| listener_type(cap) == param && listener.handles(cap));
            let mouse_input = param == MOUSE_INPUT_LISTENER
                && listener.handles(ListenerCap::Mouse)
                && listener.handles(ListenerCap::MouseMotion);
            return by_cap || mouse_input || self.is_subtype(EVENT_LISTENER, param);
        }
        if value.is_null() {
            return param != INT && param != BOOL;
        }
        self.is_subtype(value.type_name(), param)
    }

    /// `ty` and its ancestors, nearest first.
    pub fn ancestors(&self, ty: &str) -> Vec<&TypeInfo> {
        let mut out = Vec::new();
        let mut cur = self.get(self.canonical(ty));
        while let Some(info) = cur {
            out.push(info);
            cur = info.superclass.as_deref().and_then(|s| self.get(s));
        }
        out
    }

    /// A static constant declared on `ty` or one of its ancestors.
    pub fn constant(&self, ty: &str, name: &str) -> Option<ResolvedArg> {
        self.ancestors(ty)
            .into_iter()
            .find_map(|t| t.constants.iter().find(|(n, _)| n == name))
            .map(|(_, arg)| arg.clone())
    }

    /// Every method called `name` on `ty` or its ancestors, nearest first.
    pub fn methods(&self, ty: &str, name: &str) -> Vec<&Method> {
        self.ancestors(ty)
            .into_iter()
            .flat_map(|t| t.methods.iter().filter(move |m| m.name == name))
            .collect()
    }

    /// The registered toolkit: primitives, widgets, layouts, listener
    /// interfaces and their short-name aliases.
    pub fn builtin() -> Self {
        crate::builtins::registry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broaden_walks_boxed_then_primitive() {
        let r = TypeRegistry::builtin();
        assert_eq!(r.broaden(INTEGER), Some(INT));
        assert_eq!(r.broaden(INT), Some(NUMBER));
        assert_eq!(r.broaden(NUMBER), Some(OBJECT));
        assert_eq!(r.broaden(OBJECT), None);
        assert_eq!(r.distance(INTEGER, OBJECT), Some(3));
    }

    #[test]
    fn widget_lattice() {
        let r = TypeRegistry::builtin();
        assert!(r.is_subtype(FRAME, CONTAINER));
        assert!(r.is_subtype(CHECK_BOX, ABSTRACT_BUTTON));
        assert!(r.is_subtype(BOX_LAYOUT, LAYOUT_MANAGER));
        assert!(!r.is_subtype(LABEL, ABSTRACT_BUTTON));
        assert_eq!(r.distance(PANEL, CONTAINER), Some(1));
        assert_eq!(r.distance(FRAME, CONTAINER), Some(2));
    }

    #[test]
    fn aliases_canonicalize() {
        let r = TypeRegistry::builtin();
        assert_eq!(r.canonical("Button"), BUTTON);
        assert_eq!(r.canonical(BUTTON), BUTTON);
        assert_eq!(r.canonical("nope"), "nope");
        assert!(r.is_subtype("RadioButton", "AbstractButton"));
    }

    #[test]
    fn constants_are_inherited() {
        let r = TypeRegistry::new()
            .with(TypeInfo::new(OBJECT).root())
            .with(TypeInfo::new("a.Base").constant("K", INT, 7))
            .with(TypeInfo::new("a.Derived").extends("a.Base"));
        assert_eq!(r.constant("a.Derived", "K").and_then(|c| c.value.as_int()), Some(7));
        assert!(r.constant("a.Derived", "Q").is_none());
    }

    #[test]
    fn listeners_accepted_by_capability() {
        let r = TypeRegistry::builtin();
        let both = Value::from(Listener::new("m", [ListenerCap::Mouse, ListenerCap::MouseMotion], |_| {}));
        let keys = Value::from(Listener::new("k", [ListenerCap::Key], |_| {}));
        assert!(r.accepts("MouseListener", &both));
        assert!(r.accepts(MOUSE_INPUT_LISTENER, &both));
        assert!(!r.accepts(MOUSE_INPUT_LISTENER, &keys));
        assert!(r.accepts(EVENT_LISTENER, &keys));
        assert!(!r.accepts("MouseListener", &keys));
    }

    #[test]
    fn methods_include_inherited() {
        let r = TypeRegistry::builtin();
        let found = r.methods(CHECK_BOX, "add_mouse_listener");
        assert_eq!(found.len(), 1);
        assert!(r.methods(LABEL, "add_action_listener").is_empty());
    }
}
