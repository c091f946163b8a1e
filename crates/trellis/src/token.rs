//! Argument tokens: `constructor-args`, `layout-constructor-args` and
//! `constraints` entries all go through [`parse_token`].

use std::collections::HashMap;

use crate::context::IdRegistry;
use crate::error::TokenError;
use crate::types::{self, TypeRegistry};
use crate::value::{ObjectRef, ResolvedArg, Value};

/// Caller-supplied `{NAME}` substitutions, keyed by the full braced token.
pub type Keywords = HashMap<String, ResolvedArg>;

/// Parse one token. The first grammar that matches wins:
///
/// 1. `'text'` or `"text"`: a string
/// 2. `{id:NAME}`: an object registered under NAME
/// 3. `{NAME}`: a keyword
/// 4. an `i32` literal
/// 5. `Type.CONSTANT` or `Outer.Inner.CONSTANT`, also tried under each namespace
/// 6. a field path on `context`, e.g. `this.panel.preferredSize`
///
/// A constant that does not resolve is not an error; the token is retried as
/// a field path, and only that failure is reported.
pub fn parse_token(
    registry: &TypeRegistry,
    context: Option<&ObjectRef>,
    keywords: Option<&Keywords>,
    ids: &IdRegistry,
    namespaces: &[String],
    token: &str,
) -> Result<ResolvedArg, TokenError> {
    let token = token.trim();
    if let Some(s) = quoted(token) {
        return Ok(ResolvedArg::new(types::STRING, Value::from(s)));
    }
    if let Some(id) = token.strip_prefix("{id:").and_then(|t| t.strip_suffix('}')) {
        let obj = ids.get(id.trim()).ok_or_else(|| TokenError::UnknownId(id.trim().to_string()))?;
        return Ok(ResolvedArg::new(registry.canonical(obj.type_name()), Value::Object(obj.clone())));
    }
    if is_keyword(token) {
        let table = keywords.ok_or_else(|| TokenError::NoKeywords(token.to_string()))?;
        return table.get(token).cloned().ok_or_else(|| TokenError::UnknownKeyword(token.to_string()));
    }
    if let Ok(i) = token.parse::<i32>() {
        return Ok(ResolvedArg::new(types::INT, Value::Int(i)));
    }
    if let Some(constant) = parse_constant(registry, namespaces, token) {
        return Ok(constant);
    }
    parse_field_path(registry, context, token)
}

fn quoted(token: &str) -> Option<&str> {
    ['\'', '"'].into_iter().find_map(|q| {
        let inner = token.strip_prefix(q)?.strip_suffix(q)?;
        (!inner.contains(q)).then_some(inner)
    })
}

fn is_keyword(token: &str) -> bool {
    token.len() >= 2
        && token.starts_with('{')
        && token.ends_with('}')
        && !token[1..token.len() - 1].contains(['{', '}', ':'])
}

// ── Constants ─────────────────────────────────────────────────────────────

fn parse_constant(registry: &TypeRegistry, namespaces: &[String], token: &str) -> Option<ResolvedArg> {
    lookup_constant(registry, token)
        .or_else(|| namespaces.iter().find_map(|ns| lookup_constant(registry, &format!("{ns}.{token}"))))
}

/// Truncate at successive dots until a registered type is found; segments
/// between it and the last one name nested types.
fn lookup_constant(registry: &TypeRegistry, path: &str) -> Option<ResolvedArg> {
    let (pos, _) = path.match_indices('.').find(|(i, _)| registry.contains(&path[..*i]))?;
    let last = path.rfind('.')?;
    let mut ty = path[..pos].to_string();
    if last != pos {
        ty.push('$');
        ty.push_str(&path[pos + 1..last].replace('.', "$"));
    }
    let found = registry.constant(&ty, &path[last + 1..]);
    if let Some(c) = &found {
        log::trace!("{path} -> {ty}.{} = {:?}", &path[last + 1..], c.value);
    }
    found
}

// ── Field paths ───────────────────────────────────────────────────────────

fn parse_field_path(
    registry: &TypeRegistry,
    context: Option<&ObjectRef>,
    token: &str,
) -> Result<ResolvedArg, TokenError> {
    let missing = |field: &str, object: &str| TokenError::MissingField {
        field: field.to_string(),
        object: object.to_string(),
    };
    let Some(context) = context else {
        return Err(missing(token, "<no context>"));
    };
    let mut current = Value::Object(context.clone());
    let mut ty = registry.canonical(context.type_name()).to_string();
    for (i, step) in token.split('.').map(str::trim).enumerate() {
        if i == 0 && step == "this" {
            continue;
        }
        let Some(obj) = current.as_object().cloned() else {
            return Err(missing(step, &format!("{current:?}")));
        };
        let value = obj.field(step).ok_or_else(|| missing(step, obj.type_name()))?;
        let declared = obj.as_host().and_then(|h| h.schema().get(step)).map(|f| registry.canonical(&f.ty).to_string());
        ty = declared.unwrap_or_else(|| registry.canonical(value.type_name()).to_string());
        current = value;
    }
    Ok(ResolvedArg::new(ty, current))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_ui::{Component, WidgetKind};

    fn parse(token: &str) -> Result<ResolvedArg, TokenError> {
        let r = TypeRegistry::builtin();
        parse_token(&r, None, None, &IdRegistry::new(), &["trellis.layout".to_string()], token)
    }

    #[test]
    fn quoted_strings_stay_strings() {
        for t in ["'hello'", "\"hello\""] {
            let a = parse(t).unwrap();
            assert_eq!(a.ty, types::STRING);
            assert_eq!(a.value.as_str(), Some("hello"));
        }
        let a = parse("\"42\"").unwrap();
        assert_eq!(a.ty, types::STRING);
        assert_eq!(a.value.as_str(), Some("42"));
    }

    #[test]
    fn bare_integers_are_primitive() {
        let a = parse("42").unwrap();
        assert_eq!(a.ty, types::INT);
        assert_eq!(a.value.as_int(), Some(42));
        assert_eq!(parse(" -7 ").unwrap().value.as_int(), Some(-7));
    }

    #[test]
    fn ids_resolve_registered_objects() {
        let r = TypeRegistry::builtin();
        let mut ids = IdRegistry::new();
        let panel: ObjectRef = std::rc::Rc::new(Component::new(types::PANEL, WidgetKind::Panel));
        ids.insert("p1".into(), panel.clone());
        let a = parse_token(&r, None, None, &ids, &[], "{id:p1}").unwrap();
        assert_eq!(a.ty, types::PANEL);
        assert!(std::rc::Rc::ptr_eq(a.value.as_object().unwrap(), &panel));
        assert_eq!(parse_token(&r, None, None, &ids, &[], "{id:p2}").unwrap_err(), TokenError::UnknownId("p2".into()));
    }

    #[test]
    fn keywords_need_a_table() {
        assert_eq!(parse("{contentPane}").unwrap_err(), TokenError::NoKeywords("{contentPane}".into()));
        let r = TypeRegistry::builtin();
        let mut kw = Keywords::new();
        kw.insert("{answer}".into(), ResolvedArg::new(types::INT, Value::Int(42)));
        let a = parse_token(&r, None, Some(&kw), &IdRegistry::new(), &[], "{answer}").unwrap();
        assert_eq!(a.value.as_int(), Some(42));
        let e = parse_token(&r, None, Some(&kw), &IdRegistry::new(), &[], "{question}").unwrap_err();
        assert_eq!(e, TokenError::UnknownKeyword("{question}".into()));
    }

    #[test]
    fn constants_with_and_without_namespace() {
        let a = parse("BoxLayout.Y_AXIS").unwrap();
        assert_eq!((a.ty.as_str(), a.value.as_int()), (types::INT, Some(1)));
        let a = parse("trellis.layout.BorderLayout.NORTH").unwrap();
        assert_eq!(a.value.as_str(), Some("North"));
        let a = parse("Boolean.TRUE").unwrap();
        assert_eq!((a.ty.as_str(), a.value.as_bool()), (types::BOOLEAN, Some(true)));
    }

    #[test]
    fn nested_type_constants() {
        let r = TypeRegistry::builtin();
        let ns = vec!["trellis.widgets".to_string()];
        let a = parse_token(&r, None, None, &IdRegistry::new(), &ns, "List.SelectionMode.SINGLE_INTERVAL").unwrap();
        assert_eq!(a.value.as_int(), Some(1));
    }

    #[test]
    fn unknown_constant_falls_through_to_field_path() {
        assert_eq!(
            parse("BoxLayout.Z_AXIS").unwrap_err(),
            TokenError::MissingField { field: "BoxLayout.Z_AXIS".into(), object: "<no context>".into() }
        );
    }

    #[test]
    fn field_paths_walk_objects() {
        let r = TypeRegistry::builtin();
        let frame: ObjectRef = std::rc::Rc::new(Component::new(types::FRAME, WidgetKind::Frame));
        let ids = IdRegistry::new();
        let a = parse_token(&r, Some(&frame), None, &ids, &[], "this.contentPane").unwrap();
        assert_eq!(a.ty, types::PANEL);
        let a = parse_token(&r, Some(&frame), None, &ids, &[], "contentPane . preferredSize.width").unwrap();
        assert_eq!(a.value.as_int(), Some(0));
        let a = parse_token(&r, Some(&frame), None, &ids, &[], "this").unwrap();
        assert_eq!(a.ty, types::FRAME);
        let e = parse_token(&r, Some(&frame), None, &ids, &[], "contentPane.bogus").unwrap_err();
        assert_eq!(e, TokenError::MissingField { field: "bogus".into(), object: "Panel".into() });
    }
}
