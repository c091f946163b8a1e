use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::listener::Event;

/// A named, shareable command that a button can be bound to.
///
/// Assigning an action to a button takes over its label and its activation
/// callback; disabling the action disables every button bound to it.
#[derive(Clone)]
pub struct Action {
    name: Rc<str>,
    enabled: Rc<Cell<bool>>,
    handler: Rc<dyn Fn(&Event)>,
}

impl Action {
    pub fn new(name: impl Into<String>, f: impl Fn(&Event) + 'static) -> Self {
        Self { name: name.into().into(), enabled: Rc::new(Cell::new(true)), handler: Rc::new(f) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    /// Run the action if it is enabled.
    pub fn perform(&self, event: &Event) {
        if self.is_enabled() {
            (self.handler)(event)
        }
    }

    pub fn ptr_eq(&self, other: &Action) -> bool {
        Rc::ptr_eq(&self.handler, &other.handler)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("enabled", &self.enabled.get())
            .finish()
    }
}
