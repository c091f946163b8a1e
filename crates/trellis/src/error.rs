use thiserror::Error;
use trellis_markup::LoadError;
use trellis_ui::ToolkitError;

/// A single argument token that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("no object registered under id `{0}`")]
    UnknownId(String),
    #[error("keyword `{0}` is not available here")]
    NoKeywords(String),
    #[error("unknown keyword `{0}`")]
    UnknownKeyword(String),
    #[error("can't find field `{field}` in {object}")]
    MissingField { field: String, object: String },
}

/// Failure to build a layout manager from a name and argument tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("unable to find layout type `{0}`")]
    UnknownType(String),
    #[error("{0} is not a layout manager")]
    NotLayout(String),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("unable to find a constructor for {ty} with the signature ({args})")]
    NoConstructor { ty: String, args: String },
    #[error("constructing {ty} failed: {message}")]
    Construct { ty: String, message: String },
}

/// Every way a `create` or `render` call can fail. Variants that concern a
/// template node carry the node pretty-printed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load the template for {ty}: {source}")]
    Load {
        ty: String,
        #[source]
        source: LoadError,
    },
    #[error("{ty} is not registered")]
    UnregisteredType { ty: String },
    #[error("{ty} has no template")]
    NoTemplate { ty: String },
    #[error("{ty} does not expose a host schema")]
    NotAHost { ty: String },
    #[error("unable to find type `{name}` from element:\n{element}")]
    UnknownType { name: String, element: String },
    #[error("{source} in element:\n{element}")]
    Layout {
        element: String,
        #[source]
        source: LayoutError,
    },
    #[error("unable to find a constructor for {ty} with the signature ({args}) in element:\n{element}")]
    NoConstructor { ty: String, args: String, element: String },
    #[error("constructing {ty} failed: {message} in element:\n{element}")]
    Construct { ty: String, message: String, element: String },
    #[error("{source} in element:\n{element}")]
    Token {
        element: String,
        #[source]
        source: TokenError,
    },
    #[error("id \"{id}\" duplicated; first used for {first}, duplicate:\n{element}")]
    DuplicateId { id: String, first: String, element: String },
    #[error("can't find member \"{field}\" in {host}, referenced from:\n{element}")]
    MissingField { field: String, host: String, element: String },
    #[error(
        "when using {ty} in a template, bind a field of a concrete type by attribute or marker id:\n{element}"
    )]
    NoBoundField { ty: String, element: String },
    #[error("all fields bound to a {ty} element must share one declared type:\n{element}")]
    MixedFieldTypes { ty: String, element: String },
    #[error("{concrete} does not extend {marker}:\n{element}")]
    NotADescendant { concrete: String, marker: String, element: String },
    #[error("{ty} is not a component:\n{element}")]
    NotAComponent { ty: String, element: String },
    #[error("the title attribute is not supported on {ty}:\n{element}")]
    InvalidTitle { ty: String, element: String },
    #[error("text is not supported on {ty}:\n{element}")]
    InvalidText { ty: String, element: String },
    #[error("error parsing preferred-size \"{value}\", expected \"W,H\":\n{element}")]
    InvalidPreferredSize { value: String, element: String },
    #[error("text \"{text}\" can't sit next to child elements:\n{element}")]
    StrayText { text: String, element: String },
    #[error("field `{field}` holds a {found}, expected {expected}:\n{element}")]
    FieldType { field: String, expected: String, found: String, element: String },
    #[error("listener `{field}` can't be attached: {source}\n{element}")]
    ListenerMismatch {
        field: String,
        #[source]
        source: ToolkitError,
        element: String,
    },
    #[error("no method {method} in {ty}:\n{element}")]
    NoSuchMethod { method: String, ty: String, element: String },
    #[error("{method} on {ty} failed: {message}\n{element}")]
    InvokeFailed { method: String, ty: String, message: String, element: String },
    #[error("only one action can be associated with id \"{id}\"; several action fields claim it in {host}")]
    DuplicateAction { id: String, host: String },
    #[error("button-group is not allowed on {ty}:\n{element}")]
    InvalidButtonGroup { ty: String, element: String },
    #[error("{source} in element:\n{element}")]
    Toolkit {
        element: String,
        #[source]
        source: ToolkitError,
    },
    #[error("template rejected: {message}\n{element}")]
    Rejected { message: String, element: String },
    #[error("{host} declares field `{field}` but does not serve it")]
    FieldAccess { field: String, host: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_point_at_the_element() {
        let e = Error::InvalidTitle { ty: "Panel".into(), element: "<panel title=\"x\"/>".into() };
        assert_eq!(e.to_string(), "the title attribute is not supported on Panel:\n<panel title=\"x\"/>");
    }

    #[test]
    fn token_errors_convert_into_layout_errors() {
        let e: LayoutError = TokenError::UnknownKeyword("{pane}".into()).into();
        assert_eq!(e.to_string(), "unknown keyword `{pane}`");
    }
}
