use std::any::Any;
use std::fmt;
use std::rc::Rc;

use trellis_ui::prelude::*;

use crate::host::Host;
use crate::types;

// ── Object ────────────────────────────────────────────────────────────────

/// A live object the materializer can construct, pass as an argument, bind
/// into a host field or read fields from.
///
/// Toolkit handles implement this directly. Host types implement it and
/// return themselves from [`Object::as_host`].
pub trait Object: Any {
    /// Registered type name of the runtime type, e.g. `"trellis.widgets.Button"`.
    fn type_name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;

    /// Read a named field. Used by field-path tokens such as `this.panel`.
    fn field(&self, _name: &str) -> Option<Value> {
        None
    }

    /// The toolkit component this object is, or is rooted at.
    fn as_component(&self) -> Option<Component> {
        self.as_any().downcast_ref::<Component>().cloned()
    }

    fn as_host(&self) -> Option<&dyn Host> {
        None
    }
}

pub type ObjectRef = Rc<dyn Object>;

// ── Value ─────────────────────────────────────────────────────────────────

/// A dynamically typed value: a token result, constructor argument or field
/// content.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i32),
    Str(String),
    Object(ObjectRef),
}

impl Value {
    pub fn object(o: impl Object) -> Self {
        Value::Object(Rc::new(o))
    }

    /// Runtime type name. Scalars report their boxed type.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => types::OBJECT,
            Value::Bool(_) => types::BOOLEAN,
            Value::Int(_) => types::INTEGER,
            Value::Str(_) => types::STRING,
            Value::Object(o) => o.type_name(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<Component> {
        self.as_object().and_then(|o| o.as_component())
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.as_object().and_then(|o| o.as_any().downcast_ref::<T>())
    }

    /// Clone out a handle of concrete type `T`.
    pub fn downcast<T: Clone + 'static>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }

    /// Identity for objects, equality for scalars.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Object(o) => write!(f, "<{}>", o.type_name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}

impl From<Component> for Value {
    fn from(c: Component) -> Self {
        Value::object(c)
    }
}

impl From<Listener> for Value {
    fn from(l: Listener) -> Self {
        Value::object(l)
    }
}

impl From<Action> for Value {
    fn from(a: Action) -> Self {
        Value::object(a)
    }
}

impl From<CellRenderer> for Value {
    fn from(r: CellRenderer) -> Self {
        Value::object(r)
    }
}

impl From<ListModel> for Value {
    fn from(m: ListModel) -> Self {
        Value::object(m)
    }
}

// ── ResolvedArg ───────────────────────────────────────────────────────────

/// A parsed token: the declared type travels with the value so `int` and
/// `Integer` stay distinct until constructor matching.
#[derive(Debug, Clone)]
pub struct ResolvedArg {
    pub ty: String,
    pub value: Value,
}

impl ResolvedArg {
    pub fn new(ty: impl Into<String>, value: Value) -> Self {
        Self { ty: ty.into(), value }
    }
}

// ── Toolkit objects ───────────────────────────────────────────────────────

impl Object for Component {
    fn type_name(&self) -> &str {
        self.class()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "contentPane" => self.content_pane().map(Value::from),
            "parent" => Some(self.parent().map_or(Value::Null, Value::from)),
            "preferredSize" => Some(Value::object(self.preferred_size())),
            "text" => Some(self.text().map_or(Value::Null, Value::from)),
            "title" => Some(self.title().map_or(Value::Null, Value::from)),
            "layout" => Some(self.layout().map_or(Value::Null, Value::object)),
            _ => None,
        }
    }
}

impl Object for LayoutManager {
    fn type_name(&self) -> &str {
        match self {
            LayoutManager::Border { .. } => types::BORDER_LAYOUT,
            LayoutManager::Flow { .. } => types::FLOW_LAYOUT,
            LayoutManager::Grid { .. } => types::GRID_LAYOUT,
            LayoutManager::Box { .. } => types::BOX_LAYOUT,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Object for Dimension {
    fn type_name(&self) -> &str {
        types::DIMENSION
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "width" => Some(Value::Int(self.width)),
            "height" => Some(Value::Int(self.height)),
            _ => None,
        }
    }
}

impl Object for Listener {
    fn type_name(&self) -> &str {
        types::EVENT_LISTENER
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Object for Action {
    fn type_name(&self) -> &str {
        types::ACTION
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(Value::from(self.name())),
            "enabled" => Some(Value::Bool(self.is_enabled())),
            _ => None,
        }
    }
}

impl Object for CellRenderer {
    fn type_name(&self) -> &str {
        types::CELL_RENDERER
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Object for ListModel {
    fn type_name(&self) -> &str {
        types::LIST_MODEL
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "size" => Some(Value::Int(self.len() as i32)),
            _ => None,
        }
    }
}

impl Object for ButtonGroup {
    fn type_name(&self) -> &str {
        types::BUTTON_GROUP
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
