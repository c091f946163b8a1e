use std::collections::HashMap;
use std::fmt;

use trellis_ui::group::ButtonGroup;

use crate::value::ObjectRef;

/// Objects registered by template `id`.
pub type IdRegistry = HashMap<String, ObjectRef>;

/// Identifies one template instantiation; button groups are scoped to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeKey(usize);

/// State shared by one top-level `create`/`render` call and every nested
/// template it instantiates.
#[derive(Default)]
pub struct Context {
    ids: IdRegistry,
    groups: HashMap<(ScopeKey, String), ButtonGroup>,
    scopes: usize,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh group scope for the next template instantiation.
    pub fn open_scope(&mut self) -> ScopeKey {
        self.scopes += 1;
        ScopeKey(self.scopes)
    }

    pub fn ids(&self) -> &IdRegistry {
        &self.ids
    }

    pub fn lookup(&self, id: &str) -> Option<&ObjectRef> {
        self.ids.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// Register `object` under `id`. On a duplicate, returns the type name of
    /// the object registered first and leaves it in place.
    pub fn register(&mut self, id: &str, object: ObjectRef) -> Result<(), String> {
        if let Some(first) = self.ids.get(id) {
            return Err(first.type_name().to_string());
        }
        log::trace!("registered id {id} -> {}", object.type_name());
        self.ids.insert(id.to_string(), object);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The group called `name` in `scope`, created on first use.
    pub fn group(&mut self, scope: ScopeKey, name: &str) -> ButtonGroup {
        self.groups
            .entry((scope, name.to_string()))
            .or_insert_with(|| {
                log::debug!("creating button group \"{name}\"");
                ButtonGroup::new()
            })
            .clone()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.ids.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("Context").field("ids", &ids).field("groups", &self.groups.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use trellis_ui::{Component, WidgetKind};

    #[test]
    fn ids_are_unique() {
        let mut ctx = Context::new();
        let a: ObjectRef = Rc::new(Component::new("Button", WidgetKind::Button));
        let b: ObjectRef = Rc::new(Component::new("Label", WidgetKind::Label));
        ctx.register("x", a.clone()).unwrap();
        assert_eq!(ctx.register("x", b), Err("Button".to_string()));
        assert!(Rc::ptr_eq(ctx.lookup("x").unwrap(), &a));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn groups_are_per_scope() {
        let mut ctx = Context::new();
        let outer = ctx.open_scope();
        let inner = ctx.open_scope();
        assert_ne!(outer, inner);
        assert!(ctx.group(outer, "size").ptr_eq(&ctx.group(outer, "size")));
        assert!(!ctx.group(outer, "size").ptr_eq(&ctx.group(inner, "size")));
        assert_eq!(ctx.group_count(), 2);
    }
}
