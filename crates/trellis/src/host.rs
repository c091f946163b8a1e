//! Host objects: the user types whose fields receive constructed components
//! and supply listeners, actions and cell renderers.
//!
//! A host describes itself with a [`HostSchema`] instead of being inspected
//! at runtime. Each declared field carries zero or more [`Marker`]s naming
//! the template ids it binds to; [`HostIndex`] turns those into an id lookup
//! table once per materialization.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use trellis_ui::Component;

use crate::error::{Error, Result};
use crate::value::{Object, Value};

// ── Host ──────────────────────────────────────────────────────────────────

/// An object that templates bind into.
///
/// Implementors also implement [`Object`], returning `Some(self)` from
/// [`Object::as_host`] and serving declared fields from [`Object::field`].
pub trait Host: Object {
    fn schema(&self) -> &HostSchema;

    /// Store `value` into the declared field `name`. Returns `false` if the
    /// host does not serve that field.
    fn set_field(&self, name: &str, value: Value) -> bool;

    fn post_setup(&self) -> Option<&dyn PostSetup> {
        None
    }
}

/// Hook run once the whole tree is built, packed and made visible.
pub trait PostSetup {
    fn after_create(&self);
}

// ── Markers ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MarkerKind {
    /// The field receives the component built for the id.
    Component,
    /// The field holds a listener to attach to the component.
    Listener,
    /// The field holds the action of a button.
    Action,
    /// The field holds the cell renderer of a list.
    CellRenderer,
}

/// A field-level marker. An empty id list marks the field for binding by
/// template attribute only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub ids: Vec<String>,
    /// Name of a registered method to call with the listener value.
    pub invoke: Option<String>,
}

impl Marker {
    fn new<S: AsRef<str>>(kind: MarkerKind, ids: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind,
            ids: ids.into_iter().map(|id| id.as_ref().trim().to_string()).filter(|id| !id.is_empty()).collect(),
            invoke: None,
        }
    }

    pub fn component<S: AsRef<str>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self::new(MarkerKind::Component, ids)
    }

    pub fn listener<S: AsRef<str>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self::new(MarkerKind::Listener, ids)
    }

    /// A listener attached by calling the method `invoke` on the component.
    pub fn listener_with<S: AsRef<str>>(invoke: impl Into<String>, ids: impl IntoIterator<Item = S>) -> Self {
        Self { invoke: Some(invoke.into()), ..Self::new(MarkerKind::Listener, ids) }
    }

    pub fn action<S: AsRef<str>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self::new(MarkerKind::Action, ids)
    }

    pub fn cell_renderer<S: AsRef<str>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self::new(MarkerKind::CellRenderer, ids)
    }
}

// ── Schema ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    /// Declared type, registered name or alias.
    pub ty: String,
    pub markers: Vec<Marker>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self { name: name.into(), ty: ty.into(), markers: Vec::new() }
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }
}

/// The declared fields of a host type.
///
/// # Example
/// ```rust
/// use trellis::host::{FieldDecl, HostSchema, Marker};
///
/// let schema = HostSchema::new("demo.Window")
///     .field(FieldDecl::new("ok", "Button").marker(Marker::component(["okButton"])))
///     .field(FieldDecl::new("quit", "Action").marker(Marker::action(["okButton"])));
/// assert_eq!(schema.get("ok").map(|f| f.ty.as_str()), Some("Button"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSchema {
    pub ty: String,
    fields: Vec<FieldDecl>,
}

impl HostSchema {
    pub fn new(ty: impl Into<String>) -> Self {
        Self { ty: ty.into(), fields: Vec::new() }
    }

    pub fn field(mut self, decl: FieldDecl) -> Self {
        self.fields.push(decl);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }
}

// ── Index ─────────────────────────────────────────────────────────────────

/// One field a template node binds to, with the method used to attach it
/// when a listener names one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Binding {
    pub invoke: Option<String>,
    pub field: String,
}

impl Binding {
    pub fn new(field: impl Into<String>) -> Self {
        Self { invoke: None, field: field.into() }
    }

    pub fn invoking(mut self, method: impl Into<String>) -> Self {
        self.invoke = Some(method.into());
        self
    }
}

/// Marker ids → bindings, per marker kind. Built once from a schema.
#[derive(Debug, Clone, Default)]
pub struct HostIndex {
    entries: HashMap<(MarkerKind, String), BTreeSet<Binding>>,
}

impl HostIndex {
    /// Index every marker id of `schema`. Two action fields claiming the same
    /// id is an error even if no template refers to it.
    pub fn build(schema: &HostSchema) -> Result<Self> {
        let mut entries: HashMap<(MarkerKind, String), BTreeSet<Binding>> = HashMap::new();
        for decl in &schema.fields {
            for marker in &decl.markers {
                for id in &marker.ids {
                    let set = entries.entry((marker.kind, id.clone())).or_default();
                    if marker.kind == MarkerKind::Action && set.iter().any(|b| b.field != decl.name) {
                        return Err(Error::DuplicateAction { id: id.clone(), host: schema.ty.clone() });
                    }
                    set.insert(Binding { invoke: marker.invoke.clone(), field: decl.name.clone() });
                }
            }
        }
        log::trace!("indexed {} marker ids for {}", entries.len(), schema.ty);
        Ok(Self { entries })
    }

    pub fn lookup(&self, kind: MarkerKind, id: &str) -> BTreeSet<Binding> {
        self.entries.get(&(kind, id.to_string())).cloned().unwrap_or_default()
    }
}

// ── Field storage ─────────────────────────────────────────────────────────

/// Named field storage for hosts that don't want a struct field per entry.
#[derive(Debug, Default)]
pub struct Fields(RefCell<HashMap<String, Value>>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a field, e.g. with the listener it supplies.
    pub fn with(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.borrow_mut().insert(name.into(), value.into());
        self
    }

    /// Read a field. A declared field that was never written reads as null.
    pub fn get(&self, schema: &HostSchema, name: &str) -> Option<Value> {
        let stored = self.0.borrow().get(name).cloned();
        stored.or_else(|| schema.get(name).map(|_| Value::Null))
    }

    /// Write a field the schema declares.
    pub fn set(&self, schema: &HostSchema, name: &str, value: Value) -> bool {
        if schema.get(name).is_none() {
            return false;
        }
        self.0.borrow_mut().insert(name.to_string(), value);
        true
    }

    pub fn component(&self, name: &str) -> Option<Component> {
        self.0.borrow().get(name).and_then(Value::as_component)
    }

    pub fn downcast<T: Clone + 'static>(&self, name: &str) -> Option<T> {
        self.0.borrow().get(name).and_then(Value::downcast::<T>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types;

    fn schema() -> HostSchema {
        HostSchema::new("demo.Host")
            .field(FieldDecl::new("ok", types::BUTTON).marker(Marker::component([" ok ", ""])))
            .field(FieldDecl::new("mouse", "MouseListener").marker(Marker::listener(["ok", "cancel"])))
            .field(FieldDecl::new("keys", "KeyListener").marker(Marker::listener_with("add_key_listener", ["ok"])))
            .field(FieldDecl::new("submit", types::ACTION).marker(Marker::action(["ok"])))
            .field(FieldDecl::new("plain", types::LABEL))
    }

    #[test]
    fn marker_ids_are_trimmed() {
        assert_eq!(schema().get("ok").unwrap().markers[0].ids, vec!["ok".to_string()]);
    }

    #[test]
    fn index_groups_bindings_by_kind_and_id() {
        let index = HostIndex::build(&schema()).unwrap();
        let listeners: Vec<Binding> = index.lookup(MarkerKind::Listener, "ok").into_iter().collect();
        assert_eq!(listeners, vec![Binding::new("mouse"), Binding::new("keys").invoking("add_key_listener")]);
        assert_eq!(index.lookup(MarkerKind::Listener, "cancel").len(), 1);
        assert_eq!(index.lookup(MarkerKind::Component, "ok").len(), 1);
        assert!(index.lookup(MarkerKind::CellRenderer, "ok").is_empty());
        assert!(index.lookup(MarkerKind::Component, "plain").is_empty());
    }

    #[test]
    fn second_action_claim_is_rejected() {
        let s = schema().field(FieldDecl::new("other", types::ACTION).marker(Marker::action(["ok"])));
        match HostIndex::build(&s) {
            Err(Error::DuplicateAction { id, host }) => {
                assert_eq!(id, "ok");
                assert_eq!(host, "demo.Host");
            }
            other => panic!("expected a duplicate action, got {other:?}"),
        }
    }

    #[test]
    fn fields_only_store_declared_names() {
        let s = schema();
        let f = Fields::new();
        assert!(f.get(&s, "ok").unwrap().is_null());
        assert!(f.get(&s, "nope").is_none());
        assert!(f.set(&s, "ok", Value::Int(1)));
        assert!(!f.set(&s, "nope", Value::Int(1)));
        assert_eq!(f.get(&s, "ok").and_then(|v| v.as_int()), Some(1));
    }
}
