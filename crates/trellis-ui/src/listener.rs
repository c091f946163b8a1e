use std::fmt;
use std::rc::Rc;

// ── Event ─────────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MouseAction {
    Pressed,
    Released,
    Clicked,
    Entered,
    Exited,
}

/// Events dispatched to listeners by [`Component::fire`](crate::Component::fire).
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Mouse { action: MouseAction, x: i32, y: i32 },
    /// Pointer moved; `dragging` is set while a button is held.
    MouseMotion { x: i32, y: i32, dragging: bool },
    MouseWheel { rotation: i32 },
    Key { code: u32, pressed: bool },
    /// Button activation. `command` is the button text at the time of firing.
    Action { command: String },
    TreeExpansion { path: String, expanded: bool },
    TreeWillExpand { path: String, expanding: bool },
    ListSelection { first: usize, last: usize },
}

impl Event {
    /// The listener capability that receives this event.
    pub fn capability(&self) -> ListenerCap {
        match self {
            Event::Mouse { .. } => ListenerCap::Mouse,
            Event::MouseMotion { .. } => ListenerCap::MouseMotion,
            Event::MouseWheel { .. } => ListenerCap::MouseWheel,
            Event::Key { .. } => ListenerCap::Key,
            Event::Action { .. } => ListenerCap::Action,
            Event::TreeExpansion { .. } => ListenerCap::TreeExpansion,
            Event::TreeWillExpand { .. } => ListenerCap::TreeWillExpand,
            Event::ListSelection { .. } => ListenerCap::ListSelection,
        }
    }
}

// ── ListenerCap ───────────────────────────────────────────────────────────

/// A listener capability. A listener declares every capability it handles
/// when it is created, and is attached once per capability.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListenerCap {
    Mouse,
    MouseMotion,
    MouseWheel,
    Action,
    Key,
    TreeExpansion,
    TreeWillExpand,
    ListSelection,
}

impl ListenerCap {
    pub const ALL: [ListenerCap; 8] = [
        ListenerCap::Mouse,
        ListenerCap::MouseMotion,
        ListenerCap::MouseWheel,
        ListenerCap::Action,
        ListenerCap::Key,
        ListenerCap::TreeExpansion,
        ListenerCap::TreeWillExpand,
        ListenerCap::ListSelection,
    ];
}

// ── Listener ──────────────────────────────────────────────────────────────

/// A shared event callback with a declared capability set.
///
/// # Example
/// ```rust
/// use trellis_ui::listener::{Listener, ListenerCap};
///
/// // Handles both click and motion events, like a mouse adapter.
/// let l = Listener::new("hover", [ListenerCap::Mouse, ListenerCap::MouseMotion], |ev| {
///     println!("{ev:?}");
/// });
/// assert!(l.handles(ListenerCap::MouseMotion));
/// assert!(!l.handles(ListenerCap::Key));
/// ```
#[derive(Clone)]
pub struct Listener {
    name: Rc<str>,
    caps: Rc<[ListenerCap]>,
    handler: Rc<dyn Fn(&Event)>,
}

impl Listener {
    pub fn new(
        name: impl Into<String>,
        caps: impl IntoIterator<Item = ListenerCap>,
        f: impl Fn(&Event) + 'static,
    ) -> Self {
        let mut caps: Vec<ListenerCap> = caps.into_iter().collect();
        caps.sort();
        caps.dedup();
        Self { name: name.into().into(), caps: caps.into(), handler: Rc::new(f) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn caps(&self) -> &[ListenerCap] {
        &self.caps
    }

    pub fn handles(&self, cap: ListenerCap) -> bool {
        self.caps.contains(&cap)
    }

    pub fn handle(&self, event: &Event) {
        (self.handler)(event)
    }

    /// Identity comparison: two clones of the same listener are equal.
    pub fn ptr_eq(&self, other: &Listener) -> bool {
        Rc::ptr_eq(&self.handler, &other.handler)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").field("name", &self.name).field("caps", &self.caps).finish()
    }
}

// ── Listeners ─────────────────────────────────────────────────────────────

/// Per-component listener lists, one per capability.
#[derive(Default)]
pub(crate) struct Listeners {
    slots: Vec<(ListenerCap, Listener)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, cap: ListenerCap, listener: Listener) {
        self.slots.push((cap, listener));
    }

    pub(crate) fn for_cap(&self, cap: ListenerCap) -> Vec<Listener> {
        self.slots.iter().filter(|(c, _)| *c == cap).map(|(_, l)| l.clone()).collect()
    }
}
