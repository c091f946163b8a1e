use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

// ── ListModel ─────────────────────────────────────────────────────────────

/// Shared, growable backing store for a list component.
#[derive(Clone, Default)]
pub struct ListModel(Rc<RefCell<Vec<String>>>);

impl ListModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, item: impl Into<String>) {
        self.0.borrow_mut().push(item.into());
    }

    pub fn get(&self, index: usize) -> Option<String> {
        self.0.borrow().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn items(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn ptr_eq(&self, other: &ListModel) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ListModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.borrow().iter()).finish()
    }
}

// ── CellRenderer ──────────────────────────────────────────────────────────

/// Turns a list item into the text shown in its cell.
#[derive(Clone)]
pub struct CellRenderer(Rc<dyn Fn(&str, usize, bool) -> String>);

impl CellRenderer {
    /// `f(value, index, selected)` returns the cell text.
    pub fn new(f: impl Fn(&str, usize, bool) -> String + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn render(&self, value: &str, index: usize, selected: bool) -> String {
        (self.0)(value, index, selected)
    }

    pub fn ptr_eq(&self, other: &CellRenderer) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for CellRenderer {
    /// Shows the item as-is.
    fn default() -> Self {
        Self::new(|value, _, _| value.to_string())
    }
}

impl fmt::Debug for CellRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CellRenderer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_is_shared_between_clones() {
        let a = ListModel::new();
        let b = a.clone();
        a.push("blah");
        assert_eq!(b.len(), 1);
        assert_eq!(b.get(0).as_deref(), Some("blah"));
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn default_renderer_is_identity() {
        assert_eq!(CellRenderer::default().render("bleh", 3, true), "bleh");
    }
}
