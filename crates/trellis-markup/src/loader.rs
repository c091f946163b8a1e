use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::ast::Document;
use crate::error::LoadError;
use crate::parser::parse_str;

/// Produces parsed documents from template identifiers.
///
/// The identifier is whatever a type registers as its template: a relative
/// path for [`FsLoader`], an arbitrary key for [`MemoryLoader`].
pub trait TemplateLoader {
    fn load(&self, identifier: &str) -> Result<Document, LoadError>;
}

// ── FsLoader ──────────────────────────────────────────────────────────────

/// Reads templates from disk, relative to a root directory.
///
/// A leading `/` on the identifier is ignored so classpath-style identifiers
/// (`/template/hello.xml`) resolve under the root.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateLoader for FsLoader {
    fn load(&self, identifier: &str) -> Result<Document, LoadError> {
        let path = self.root.join(identifier.trim_start_matches('/'));
        log::debug!("loading template {}", path.display());
        let src = std::fs::read_to_string(&path)
            .map_err(|source| LoadError::Io { path: path.clone(), source })?;
        parse_str(&src).map_err(|source| LoadError::Parse { identifier: identifier.to_string(), source })
    }
}

// ── MemoryLoader ──────────────────────────────────────────────────────────

/// Serves templates registered up front, typically via `include_str!`.
///
/// ```rust
/// use trellis_markup::{MemoryLoader, TemplateLoader};
///
/// let loader = MemoryLoader::new().with("hello.xml", "<frame><button/></frame>");
/// let doc = loader.load("hello.xml").unwrap();
/// assert_eq!(doc.root.name, "frame");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    sources: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `src` under `identifier`, replacing any previous source.
    pub fn register(&mut self, identifier: impl Into<String>, src: impl Into<String>) {
        self.sources.insert(identifier.into(), src.into());
    }

    pub fn with(mut self, identifier: impl Into<String>, src: impl Into<String>) -> Self {
        self.register(identifier, src);
        self
    }
}

impl TemplateLoader for MemoryLoader {
    fn load(&self, identifier: &str) -> Result<Document, LoadError> {
        let src = self
            .sources
            .get(identifier)
            .ok_or_else(|| LoadError::NotFound(identifier.to_string()))?;
        parse_str(src).map_err(|source| LoadError::Parse { identifier: identifier.to_string(), source })
    }
}
