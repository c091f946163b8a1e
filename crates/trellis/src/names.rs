//! Tag → registered type name.

use trellis_markup::names::{is_qualified, type_name_for_tag};

use crate::types::TypeRegistry;

/// Resolve a tag (or a type name written in an attribute) to a registered
/// type.
///
/// Qualified names are used verbatim. Short names are camel-cased, then
/// tried against the alias table, then under each namespace in order, then
/// as-is.
pub fn resolve_type_name(registry: &TypeRegistry, namespaces: &[String], tag: &str) -> Option<String> {
    let name = type_name_for_tag(tag.trim());
    if is_qualified(&name) {
        return registry.contains(&name).then_some(name);
    }
    if let Some(full) = registry.resolve_alias(&name) {
        return Some(full.to_string());
    }
    let qualified = namespaces.iter().map(|ns| format!("{ns}.{name}")).find(|full| registry.contains(full));
    if qualified.is_some() {
        return qualified;
    }
    registry.contains(&name).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{self, TypeInfo};

    fn namespaces() -> Vec<String> {
        vec!["trellis.widgets".into(), "trellis.layout".into()]
    }

    #[test]
    fn short_dashed_tags() {
        let r = TypeRegistry::builtin();
        assert_eq!(resolve_type_name(&r, &namespaces(), "text-field").as_deref(), Some(types::TEXT_FIELD));
        assert_eq!(resolve_type_name(&r, &namespaces(), "frame").as_deref(), Some(types::FRAME));
        assert_eq!(resolve_type_name(&r, &namespaces(), "string").as_deref(), Some(types::STRING));
    }

    #[test]
    fn namespaces_after_aliases() {
        let r = TypeRegistry::builtin()
            .with(TypeInfo::new("app.Sidebar"))
            .with(TypeInfo::new("app.Panel"));
        let ns = vec!["app".to_string()];
        assert_eq!(resolve_type_name(&r, &ns, "sidebar").as_deref(), Some("app.Sidebar"));
        assert_eq!(resolve_type_name(&r, &ns, "panel").as_deref(), Some(types::PANEL));
    }

    #[test]
    fn qualified_tags_are_verbatim() {
        let r = TypeRegistry::builtin().with(TypeInfo::new("demo.FancyPanel"));
        assert_eq!(resolve_type_name(&r, &[], "demo.FancyPanel").as_deref(), Some("demo.FancyPanel"));
        assert_eq!(resolve_type_name(&r, &[], "demo.fancy-panel"), None);
        assert_eq!(resolve_type_name(&r, &namespaces(), "gizmo"), None);
    }
}
