use std::path::PathBuf;

use thiserror::Error;

/// A parse error from an XML template.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("template parse error at {line}:{col}: {message}")]
pub struct ParseError {
    pub message: String,
    /// 1-based source line number where the error occurred.
    pub line: usize,
    /// 1-based source column number where the error occurred.
    pub col: usize,
}

impl ParseError {
    pub(crate) fn new(msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self { message: msg.into(), line, col }
    }
}

/// Failure to produce a [`Document`](crate::Document) from a template identifier.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("template `{0}` is not registered")]
    NotFound(String),
    #[error("failed to read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("in template `{identifier}`: {source}")]
    Parse {
        identifier: String,
        #[source]
        source: ParseError,
    },
}
