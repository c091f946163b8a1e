//! Layout managers from a type name and argument tokens.

use trellis_ui::layout::LayoutManager;

use crate::construct::resolve_constructor;
use crate::context::IdRegistry;
use crate::error::LayoutError;
use crate::names::resolve_type_name;
use crate::token::{Keywords, parse_token};
use crate::types::{CONTAINER, LAYOUT_MANAGER, TypeRegistry};
use crate::value::{ObjectRef, ResolvedArg, Value};

/// Keyword bound to the container that receives the layout.
pub const CONTENT_PANE: &str = "{contentPane}";

/// Build the layout named `layout_name` for `target`.
///
/// `{contentPane}` in `arg_tokens` stands for the content pane of a
/// window-like target and for the target itself otherwise; it is matched as
/// a `Container`. Other tokens are parsed with `target` as context.
pub fn build_layout(
    registry: &TypeRegistry,
    ids: &IdRegistry,
    namespaces: &[String],
    layout_name: &str,
    target: &ObjectRef,
    arg_tokens: &[&str],
) -> Result<ObjectRef, LayoutError> {
    let ty = resolve_type_name(registry, namespaces, layout_name)
        .ok_or_else(|| LayoutError::UnknownType(layout_name.to_string()))?;
    if !registry.is_subtype(&ty, LAYOUT_MANAGER) {
        return Err(LayoutError::NotLayout(ty));
    }

    let mut keywords = Keywords::new();
    keywords.insert(CONTENT_PANE.to_string(), ResolvedArg::new(CONTAINER, content_pane(target)));

    let args = arg_tokens
        .iter()
        .map(|t| parse_token(registry, Some(target), Some(&keywords), ids, namespaces, t))
        .collect::<Result<Vec<_>, _>>()?;
    let arg_types: Vec<String> = args.iter().map(|a| a.ty.clone()).collect();
    let ctor = resolve_constructor(registry, &ty, &arg_types)
        .ok_or_else(|| LayoutError::NoConstructor { ty: ty.clone(), args: arg_types.join(", ") })?;
    let values: Vec<Value> = args.into_iter().map(|a| a.value).collect();
    let layout = ctor.invoke(&values).map_err(|message| LayoutError::Construct { ty: ty.clone(), message })?;
    log::debug!("built {ty}({}) for {}", arg_types.join(", "), target.type_name());
    Ok(layout)
}

/// The toolkit layout behind a built layout object.
pub fn as_layout_manager(layout: &ObjectRef) -> Result<LayoutManager, LayoutError> {
    layout
        .as_any()
        .downcast_ref::<LayoutManager>()
        .cloned()
        .ok_or_else(|| LayoutError::NotLayout(layout.type_name().to_string()))
}

fn content_pane(target: &ObjectRef) -> Value {
    match target.as_component() {
        Some(c) => Value::from(c.content_pane().unwrap_or(c)),
        None => Value::Object(target.clone()),
    }
}
