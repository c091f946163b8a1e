//! Trellis UI: a headless retained component tree.
//!
//! Components are shared handles into a parent/child tree. Windows carry a
//! content pane, containers carry a layout manager that computes preferred
//! sizes, and buttons, lists and trees dispatch events to attached listeners.
//! Nothing is drawn; the tree is what the `trellis` materializer builds.
//!
//! # Quick start
//!
//! ```rust
//! use trellis_ui::prelude::*;
//!
//! let frame = Component::new("Frame", WidgetKind::Frame);
//! frame.set_title("Hello").unwrap();
//!
//! let pane = frame.content_pane().unwrap();
//! frame.set_layout(LayoutManager::boxed(&pane, Axis::Y)).unwrap();
//!
//! let button = Component::new("Button", WidgetKind::Button);
//! button.set_text("Click").unwrap();
//! button
//!     .add_action_listener(Listener::new("print", [ListenerCap::Action], |ev| println!("{ev:?}")))
//!     .unwrap();
//! frame.add(&button, None).unwrap();
//!
//! frame.pack();
//! frame.set_visible(true);
//! button.click();
//! ```

pub mod action;
pub mod component;
pub mod error;
pub mod geom;
pub mod group;
pub mod kind;
pub mod layout;
pub mod list;
pub mod listener;

pub use component::{Component, Constraint, WeakComponent};
pub use error::ToolkitError;
pub use kind::WidgetKind;

/// The component model in one import.
pub mod prelude {
    pub use crate::action::Action;
    pub use crate::component::{Component, Constraint, WeakComponent};
    pub use crate::error::ToolkitError;
    pub use crate::geom::Dimension;
    pub use crate::group::ButtonGroup;
    pub use crate::kind::WidgetKind;
    pub use crate::layout::{Axis, FlowAlign, LayoutManager, CENTER, EAST, NORTH, SOUTH, WEST};
    pub use crate::list::{CellRenderer, ListModel};
    pub use crate::listener::{Event, Listener, ListenerCap, MouseAction};
}
