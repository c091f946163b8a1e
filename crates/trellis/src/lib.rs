//! **Trellis** materializer.
//!
//! Builds live `trellis_ui` component trees from XML templates and binds the
//! interesting nodes into a host object. Everything the materializer can
//! construct is registered up front in a [`TypeRegistry`]: constructors,
//! static constants, listener-attaching methods and the template a host type
//! is built from. Hosts describe their bindable fields through a
//! [`HostSchema`].
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`value`] | `Object`, `Value`, `ResolvedArg` |
//! | [`types`] | `TypeRegistry`, `TypeInfo`, constructors and methods |
//! | [`token`] | argument tokens: literals, ids, keywords, constants, field paths |
//! | [`construct`] | best-constructor selection |
//! | [`layout`] | layout managers from the `layout` attribute |
//! | [`host`] | `Host`, `HostSchema`, field markers |
//! | [`binder`] | fields, listeners, actions and renderers |
//! | [`materialize`] | `Materializer` and the breadth-first build |
//! | [`logging`] | `env_logger` setup for binaries |
//!
//! # Quick start
//!
//! ```rust
//! use trellis::Materializer;
//! use trellis_markup::MemoryLoader;
//!
//! // A template whose root is a plain panel needs no host type, only a host
//! // object to render into.
//! let loader = MemoryLoader::new().with("empty", "<panel/>");
//! let m = Materializer::builder().loader(loader).build();
//! assert!(m.registry().contains("trellis.widgets.Panel"));
//! ```
//!
//! See [`Materializer`] for a complete host.

pub mod binder;
mod builtins;
pub mod construct;
pub mod context;
pub mod error;
pub mod host;
pub mod layout;
pub mod logging;
pub mod materialize;
pub mod names;
pub mod token;
pub mod types;
pub mod value;

#[cfg(test)]
pub(crate) mod testing;

pub use context::Context;
pub use error::{Error, LayoutError, Result, TokenError};
pub use host::{FieldDecl, Host, HostSchema, Marker, PostSetup};
pub use materialize::{Materializer, MaterializerBuilder, MaterializerConfig};
pub use types::{Constructor, Method, TypeInfo, TypeRegistry};
pub use value::{Object, ObjectRef, ResolvedArg, Value};
