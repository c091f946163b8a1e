use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::component::{Component, WeakComponent};
use crate::error::ToolkitError;

/// Mutually exclusive selection across a set of toggle buttons.
///
/// Selecting one member deselects every other member. Members are held
/// weakly; the component tree owns them.
#[derive(Clone, Default)]
pub struct ButtonGroup(Rc<RefCell<Vec<WeakComponent>>>);

impl ButtonGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a button. A button that arrives selected while the group already
    /// has a selection is deselected.
    pub fn add(&self, button: &Component) -> Result<(), ToolkitError> {
        if !button.kind().is_button_like() {
            return Err(ToolkitError::unsupported("button group membership", button.class()));
        }
        if self.members().iter().any(|m| m.ptr_eq(button)) {
            return Ok(());
        }
        if button.is_selected() && self.selected().is_some() {
            button.set_selected_unchecked(false);
        }
        self.0.borrow_mut().push(button.downgrade());
        button.set_button_group(self.clone());
        Ok(())
    }

    pub fn members(&self) -> Vec<Component> {
        self.0.borrow().iter().filter_map(WeakComponent::upgrade).collect()
    }

    pub fn len(&self) -> usize {
        self.members().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn selected(&self) -> Option<Component> {
        self.members().into_iter().find(Component::is_selected)
    }

    pub(crate) fn select(&self, button: &Component) {
        for m in self.members() {
            m.set_selected_unchecked(m.ptr_eq(button));
        }
    }

    pub fn ptr_eq(&self, other: &ButtonGroup) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ButtonGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ButtonGroup").field("members", &self.len()).finish()
    }
}
