//! Host field, listener, action and cell renderer binding for one node.

use std::collections::BTreeSet;

use trellis_markup::Element;
use trellis_ui::prelude::*;

use crate::error::{Error, Result};
use crate::host::{Binding, Host, HostIndex, MarkerKind};
use crate::types::{self, TypeRegistry};
use crate::value::{ObjectRef, Value};

/// Attribute that binds a node to host fields.
pub const FIELD: &str = "field";
pub const LISTENERS: &str = "listeners";
pub const ACTION: &str = "action";
pub const CELL_RENDERER: &str = "cell-renderer";

pub struct Binder<'a> {
    registry: &'a TypeRegistry,
    host: &'a dyn Host,
    index: &'a HostIndex,
}

impl<'a> Binder<'a> {
    pub fn new(registry: &'a TypeRegistry, host: &'a dyn Host, index: &'a HostIndex) -> Self {
        Self { registry, host, index }
    }

    /// The host fields `element` binds to for `kind`.
    ///
    /// `attribute` lists fields as `field` or `method(field)`. Without it,
    /// the element's `id` is looked up among the host's markers; a node with
    /// neither binds to nothing.
    pub fn find_associated(&self, element: &Element, kind: MarkerKind, attribute: &str) -> Result<BTreeSet<Binding>> {
        if element.attr(attribute).is_none() {
            return Ok(element.attr("id").map(|id| self.index.lookup(kind, id)).unwrap_or_default());
        }
        let schema = self.host.schema();
        let mut out = BTreeSet::new();
        for entry in element.attr_list(attribute) {
            let binding = parse_entry(entry);
            if schema.get(&binding.field).is_none() {
                return Err(Error::MissingField {
                    field: binding.field,
                    host: schema.ty.clone(),
                    element: element.to_string(),
                });
            }
            out.insert(binding);
        }
        Ok(out)
    }

    /// Declared type of a host field, canonicalized.
    pub fn declared_type(&self, field: &str) -> Option<&str> {
        self.host.schema().get(field).map(|f| self.registry.canonical(&f.ty))
    }

    fn read(&self, field: &str) -> Result<Value> {
        self.host.field(field).ok_or_else(|| Error::FieldAccess {
            field: field.to_string(),
            host: self.host.schema().ty.clone(),
        })
    }

    // ── Fields ────────────────────────────────────────────────────────────

    /// Store `object` into every component field bound to `element`.
    pub fn bind_fields(&self, element: &Element, object: &ObjectRef) -> Result<()> {
        let value = Value::Object(object.clone());
        for binding in self.find_associated(element, MarkerKind::Component, FIELD)? {
            let expected = self.declared_type(&binding.field).unwrap_or(types::OBJECT).to_string();
            if !self.registry.accepts(&expected, &value) {
                return Err(Error::FieldType {
                    field: binding.field,
                    expected,
                    found: object.type_name().to_string(),
                    element: element.to_string(),
                });
            }
            if !self.host.set_field(&binding.field, value.clone()) {
                return Err(Error::FieldAccess { field: binding.field, host: self.host.schema().ty.clone() });
            }
            log::trace!("bound {} into {}.{}", object.type_name(), self.host.schema().ty, binding.field);
        }
        Ok(())
    }

    // ── Listeners ─────────────────────────────────────────────────────────

    /// Attach every listener bound to `element`.
    ///
    /// A listener is added once per capability it declares. A named method is
    /// called in addition, with the first registered overload whose parameter
    /// accepts the listener.
    pub fn bind_listeners(&self, element: &Element, target: &ObjectRef, component: &Component) -> Result<()> {
        for binding in self.find_associated(element, MarkerKind::Listener, LISTENERS)? {
            let value = self.read(&binding.field)?;
            let Some(listener) = value.downcast::<Listener>() else {
                return Err(Error::FieldType {
                    field: binding.field,
                    expected: types::EVENT_LISTENER.to_string(),
                    found: value.type_name().to_string(),
                    element: element.to_string(),
                });
            };

            let mut attached = false;
            for &cap in listener.caps() {
                component.add_listener(cap, listener.clone()).map_err(|source| Error::ListenerMismatch {
                    field: binding.field.clone(),
                    source,
                    element: element.to_string(),
                })?;
                attached = true;
            }
            if let Some(method) = &binding.invoke {
                attached |= self.invoke(element, target, method, &value)?;
            }

            if attached {
                log::debug!("attached listener {} to {}", binding.field, target.type_name());
            } else {
                log::warn!(
                    "listener {} matched no capability and was not attached to {}",
                    binding.field,
                    target.type_name()
                );
            }
        }
        Ok(())
    }

    fn invoke(&self, element: &Element, target: &ObjectRef, method: &str, value: &Value) -> Result<bool> {
        let ty = target.type_name();
        let methods = self.registry.methods(ty, method);
        if methods.is_empty() {
            return Err(Error::NoSuchMethod {
                method: method.to_string(),
                ty: ty.to_string(),
                element: element.to_string(),
            });
        }
        // Only the first accepting overload is called.
        let Some(m) = methods.into_iter().find(|m| self.registry.accepts(&m.param, value)) else {
            return Ok(false);
        };
        m.invoke(target, value).map_err(|message| Error::InvokeFailed {
            method: method.to_string(),
            ty: ty.to_string(),
            message,
            element: element.to_string(),
        })?;
        Ok(true)
    }

    // ── Actions / renderers ───────────────────────────────────────────────

    /// Install the action bound to `element`. Ignored on non-buttons.
    pub fn bind_action(&self, element: &Element, component: &Component) -> Result<()> {
        if !component.kind().is_button_like() {
            log::debug!("{} is not a button, actions ignored", component.class());
            return Ok(());
        }
        let Some(binding) = self.single(element, MarkerKind::Action, ACTION)? else {
            return Ok(());
        };
        let value = self.read(&binding.field)?;
        let action = value.downcast::<Action>().ok_or_else(|| Error::FieldType {
            field: binding.field.clone(),
            expected: types::ACTION.to_string(),
            found: value.type_name().to_string(),
            element: element.to_string(),
        })?;
        component.set_action(action).map_err(|source| Error::Toolkit { element: element.to_string(), source })
    }

    /// Install the cell renderer bound to `element`. Ignored on non-lists.
    pub fn bind_renderer(&self, element: &Element, component: &Component) -> Result<()> {
        if !component.kind().is_list_like() {
            log::debug!("{} is not a list, renderers ignored", component.class());
            return Ok(());
        }
        let Some(binding) = self.single(element, MarkerKind::CellRenderer, CELL_RENDERER)? else {
            return Ok(());
        };
        let value = self.read(&binding.field)?;
        let renderer = value.downcast::<CellRenderer>().ok_or_else(|| Error::FieldType {
            field: binding.field.clone(),
            expected: types::CELL_RENDERER.to_string(),
            found: value.type_name().to_string(),
            element: element.to_string(),
        })?;
        component.set_cell_renderer(renderer).map_err(|source| Error::Toolkit { element: element.to_string(), source })
    }

    /// The one field of `kind` bound to `element`. Several are ambiguous and
    /// bind nothing.
    fn single(&self, element: &Element, kind: MarkerKind, attribute: &str) -> Result<Option<Binding>> {
        let mut found = self.find_associated(element, kind, attribute)?;
        if found.len() > 1 {
            let fields: Vec<&str> = found.iter().map(|b| b.field.as_str()).collect();
            log::warn!("{attribute} fields {} all match <{}>, none installed", fields.join(", "), element.name);
            return Ok(None);
        }
        Ok(found.pop_first())
    }
}

/// `field` or `method(field)`.
fn parse_entry(entry: &str) -> Binding {
    match entry.split_once('(') {
        Some((method, rest)) if rest.ends_with(')') => {
            Binding::new(rest[..rest.len() - 1].trim()).invoking(method.trim())
        }
        _ => Binding::new(entry.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{FieldDecl, HostSchema, Marker};
    use crate::types::{Method, TypeInfo};
    use crate::testing::TestHost;
    use std::cell::Cell;
    use std::rc::Rc;

    fn schema() -> HostSchema {
        HostSchema::new("demo.Host")
            .field(FieldDecl::new("ok", "Button").marker(Marker::component(["ok"])))
            .field(FieldDecl::new("label", "Label"))
            .field(FieldDecl::new("mouse", types::MOUSE_INPUT_LISTENER).marker(Marker::listener(["ok"])))
            .field(FieldDecl::new("keys", "KeyListener").marker(Marker::listener_with("attach_any", ["keyed"])))
            .field(FieldDecl::new("wheel", "MouseWheelListener").marker(Marker::listener_with("no_such", ["nosuch"])))
            .field(FieldDecl::new("submit", "Action").marker(Marker::action(["ok"])))
            .field(FieldDecl::new("other", "Action").marker(Marker::action(["two"])))
            .field(FieldDecl::new("cells", "ListCellRenderer").marker(Marker::cell_renderer(["list"])))
            .field(FieldDecl::new("stars", "ListCellRenderer"))
    }

    fn host() -> TestHost {
        TestHost::new(schema(), None)
            .with("mouse", Listener::new("mouse", [ListenerCap::Mouse, ListenerCap::MouseMotion], |_| {}))
            .with("keys", Listener::new("keys", Vec::new(), |_| {}))
            .with("wheel", Listener::new("wheel", [ListenerCap::MouseWheel], |_| {}))
            .with("submit", Action::new("Submit", |_| {}))
            .with("other", Action::new("Other", |_| {}))
            .with("cells", CellRenderer::new(|v, i, _| format!("{i}: {v}")))
            .with("stars", CellRenderer::new(|v, _, _| format!("* {v}")))
    }

    fn element(src: &str) -> Element {
        trellis_markup::parse_str(src).unwrap().root
    }

    fn widget(class: &str, kind: WidgetKind) -> (ObjectRef, Component) {
        let c = Component::new(class, kind);
        (Rc::new(c.clone()), c)
    }

    #[test]
    fn attribute_wins_over_markers() {
        let (r, h) = (TypeRegistry::builtin(), host());
        let index = HostIndex::build(h.schema()).unwrap();
        let b = Binder::new(&r, &h, &index);
        let by_attr = b.find_associated(&element(r#"<label id="ok" field="label"/>"#), MarkerKind::Component, FIELD);
        assert_eq!(by_attr.unwrap().into_iter().collect::<Vec<_>>(), vec![Binding::new("label")]);
        let by_id = b.find_associated(&element(r#"<button id="ok"/>"#), MarkerKind::Component, FIELD);
        assert_eq!(by_id.unwrap().into_iter().collect::<Vec<_>>(), vec![Binding::new("ok")]);
        assert!(b.find_associated(&element("<button/>"), MarkerKind::Component, FIELD).unwrap().is_empty());
    }

    #[test]
    fn function_entries_and_missing_fields() {
        let (r, h) = (TypeRegistry::builtin(), host());
        let index = HostIndex::build(h.schema()).unwrap();
        let b = Binder::new(&r, &h, &index);
        let e = element(r#"<button listeners="mouse, add_key_listener( keys )"/>"#);
        let found = b.find_associated(&e, MarkerKind::Listener, LISTENERS).unwrap();
        assert!(found.contains(&Binding::new("keys").invoking("add_key_listener")));
        assert!(found.contains(&Binding::new("mouse")));
        let err = b.find_associated(&element(r#"<button listeners="ghost"/>"#), MarkerKind::Listener, LISTENERS);
        assert!(matches!(err, Err(Error::MissingField { field, .. }) if field == "ghost"));
    }

    #[test]
    fn fields_are_type_checked() {
        let (r, h) = (TypeRegistry::builtin(), host());
        let index = HostIndex::build(h.schema()).unwrap();
        let b = Binder::new(&r, &h, &index);
        let (button, _) = widget(types::BUTTON, WidgetKind::Button);
        b.bind_fields(&element(r#"<button id="ok"/>"#), &button).unwrap();
        assert!(Rc::ptr_eq(h.value("ok").unwrap().as_object().unwrap(), &button));
        let (label, _) = widget(types::LABEL, WidgetKind::Label);
        let err = b.bind_fields(&element(r#"<label field="ok"/>"#), &label);
        assert!(matches!(err, Err(Error::FieldType { expected, .. }) if expected == types::BUTTON));
    }

    #[test]
    fn mouse_input_listener_attaches_twice() {
        let (r, h) = (TypeRegistry::builtin(), host());
        let index = HostIndex::build(h.schema()).unwrap();
        let b = Binder::new(&r, &h, &index);
        let (obj, button) = widget(types::BUTTON, WidgetKind::Button);
        b.bind_listeners(&element(r#"<button id="ok"/>"#), &obj, &button).unwrap();
        assert_eq!(button.listeners(ListenerCap::Mouse).len(), 1);
        assert_eq!(button.listeners(ListenerCap::MouseMotion).len(), 1);
        assert!(button.listeners(ListenerCap::Key).is_empty());
    }

    #[test]
    fn invoke_function_calls_registered_method() {
        let attach_any = Method::new("attach_any", types::EVENT_LISTENER, |target, arg| {
            let c = target.as_component().ok_or("not a component")?;
            let l = arg.downcast::<Listener>().ok_or("not a listener")?;
            c.add_key_listener(l).map_err(|e| e.to_string())
        });
        let r = TypeRegistry::builtin().with(TypeInfo::new("demo.Keyed").extends(types::TEXT_FIELD).method(attach_any));
        let h = host();
        let index = HostIndex::build(h.schema()).unwrap();
        let b = Binder::new(&r, &h, &index);
        let (obj, field) = widget("demo.Keyed", WidgetKind::TextField);
        // "keys" declares no capability, so only the named method attaches it.
        b.bind_listeners(&element(r#"<text-field id="keyed"/>"#), &obj, &field).unwrap();
        assert_eq!(field.listeners(ListenerCap::Key).len(), 1);
        let err = b.bind_listeners(&element(r#"<text-field id="nosuch"/>"#), &obj, &field);
        assert!(matches!(err, Err(Error::NoSuchMethod { method, .. }) if method == "no_such"));
    }

    #[test]
    fn only_the_first_accepting_overload_runs() {
        let calls = Rc::new(Cell::new((0, 0)));
        let (first, second) = (calls.clone(), calls.clone());
        let r = TypeRegistry::builtin().with(
            TypeInfo::new("demo.Keyed")
                .extends(types::TEXT_FIELD)
                .method(Method::new("attach_any", types::ACTION, |_, _| Err("not an action".into())))
                .method(Method::new("attach_any", types::EVENT_LISTENER, move |_, _| {
                    first.set((first.get().0 + 1, first.get().1));
                    Ok(())
                }))
                .method(Method::new("attach_any", types::EVENT_LISTENER, move |_, _| {
                    second.set((second.get().0, second.get().1 + 1));
                    Ok(())
                })),
        );
        let h = host();
        let index = HostIndex::build(h.schema()).unwrap();
        let b = Binder::new(&r, &h, &index);
        let (obj, field) = widget("demo.Keyed", WidgetKind::TextField);
        b.bind_listeners(&element(r#"<text-field id="keyed"/>"#), &obj, &field).unwrap();
        assert_eq!(calls.get(), (1, 0));
    }

    #[test]
    fn action_listener_on_a_label_is_fatal() {
        let r = TypeRegistry::builtin();
        let fired = Rc::new(Cell::new(0));
        let f = fired.clone();
        let h = host().with("mouse", Listener::new("act", [ListenerCap::Action], move |_| f.set(f.get() + 1)));
        let index = HostIndex::build(h.schema()).unwrap();
        let b = Binder::new(&r, &h, &index);
        let (obj, label) = widget(types::LABEL, WidgetKind::Label);
        let err = b.bind_listeners(&element(r#"<label id="ok"/>"#), &obj, &label);
        assert!(matches!(err, Err(Error::ListenerMismatch { .. })));
        let (obj, button) = widget(types::BUTTON, WidgetKind::Button);
        b.bind_listeners(&element(r#"<button id="ok"/>"#), &obj, &button).unwrap();
        button.click();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn actions_and_renderers() {
        let (r, h) = (TypeRegistry::builtin(), host());
        let index = HostIndex::build(h.schema()).unwrap();
        let b = Binder::new(&r, &h, &index);
        let (_, button) = widget(types::BUTTON, WidgetKind::Button);
        b.bind_action(&element(r#"<button id="ok"/>"#), &button).unwrap();
        assert_eq!(button.action().unwrap().name(), "Submit");
        let (_, label) = widget(types::LABEL, WidgetKind::Label);
        b.bind_action(&element(r#"<label id="ok"/>"#), &label).unwrap();

        let (_, list) = widget(types::LIST, WidgetKind::List);
        let model = ListModel::new();
        model.push("a");
        list.set_model(model).unwrap();
        b.bind_renderer(&element(r#"<list id="list"/>"#), &list).unwrap();
        assert_eq!(list.rendered_cells(), vec!["0: a".to_string()]);
    }

    #[test]
    fn ambiguous_actions_and_renderers_install_nothing() {
        let (r, h) = (TypeRegistry::builtin(), host());
        let index = HostIndex::build(h.schema()).unwrap();
        let b = Binder::new(&r, &h, &index);

        let (_, button) = widget(types::BUTTON, WidgetKind::Button);
        b.bind_action(&element(r#"<button action="submit, other"/>"#), &button).unwrap();
        assert!(button.action().is_none());
        b.bind_action(&element(r#"<button id="ok"/>"#), &button).unwrap();
        b.bind_action(&element(r#"<button action="other, submit"/>"#), &button).unwrap();
        assert_eq!(button.action().unwrap().name(), "Submit");

        // The kind is checked before any field is looked up.
        let (_, label) = widget(types::LABEL, WidgetKind::Label);
        b.bind_action(&element(r#"<label action="submit, other"/>"#), &label).unwrap();
        b.bind_action(&element(r#"<label action="ghost"/>"#), &label).unwrap();
        b.bind_renderer(&element(r#"<label cell-renderer="ghost"/>"#), &label).unwrap();

        let (_, list) = widget(types::LIST, WidgetKind::List);
        b.bind_renderer(&element(r#"<list cell-renderer="cells, stars"/>"#), &list).unwrap();
        assert!(list.cell_renderer().is_none());
        b.bind_renderer(&element(r#"<list cell-renderer="stars"/>"#), &list).unwrap();
        let model = ListModel::new();
        model.push("a");
        list.set_model(model).unwrap();
        assert_eq!(list.rendered_cells(), vec!["* a".to_string()]);
    }

    #[test]
    fn tree_and_list_listeners_need_matching_components() {
        let r = TypeRegistry::builtin();
        let cases = [
            (ListenerCap::TreeExpansion, types::TREE, WidgetKind::Tree, "tree"),
            (ListenerCap::ListSelection, types::LIST, WidgetKind::List, "list"),
        ];
        for (cap, class, kind, tag) in cases {
            let h = host().with("mouse", Listener::new("picky", [cap], |_| {}));
            let index = HostIndex::build(h.schema()).unwrap();
            let b = Binder::new(&r, &h, &index);

            let (obj, button) = widget(types::BUTTON, WidgetKind::Button);
            let err = b.bind_listeners(&element(r#"<button id="ok"/>"#), &obj, &button);
            assert!(matches!(err, Err(Error::ListenerMismatch { field, .. }) if field == "mouse"), "{cap:?}");
            assert!(button.listeners(cap).is_empty());

            let (obj, target) = widget(class, kind);
            b.bind_listeners(&element(&format!(r#"<{tag} id="ok"/>"#)), &obj, &target).unwrap();
            assert_eq!(target.listeners(cap).len(), 1, "{cap:?}");
        }
    }

    #[test]
    fn unset_listener_field_is_a_type_error() {
        let r = TypeRegistry::builtin();
        let h = TestHost::new(schema(), None);
        let index = HostIndex::build(h.schema()).unwrap();
        let b = Binder::new(&r, &h, &index);
        let (obj, button) = widget(types::BUTTON, WidgetKind::Button);
        // A declared but unset field reads as null, which is not a listener.
        let err = b.bind_listeners(&element(r#"<button id="ok"/>"#), &obj, &button);
        assert!(matches!(err, Err(Error::FieldType { found, .. }) if found == types::OBJECT));
    }
}
