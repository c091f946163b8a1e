use thiserror::Error;

/// An operation was applied to a component kind that does not support it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} is not supported by {class}")]
pub struct ToolkitError {
    pub operation: &'static str,
    pub class: String,
}

impl ToolkitError {
    pub(crate) fn unsupported(operation: &'static str, class: &str) -> Self {
        Self { operation, class: class.to_string() }
    }
}
