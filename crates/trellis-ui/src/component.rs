use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::action::Action;
use crate::error::ToolkitError;
use crate::geom::Dimension;
use crate::group::ButtonGroup;
use crate::kind::WidgetKind;
use crate::layout::{is_border_region, LayoutManager};
use crate::list::{CellRenderer, ListModel};
use crate::listener::{Event, Listener, ListenerCap, Listeners};

// ── Constraint ────────────────────────────────────────────────────────────

/// Placement hint passed alongside a child when it is added to a container.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Region or cell name, e.g. a border layout region.
    Name(String),
    Index(i32),
    Object(Rc<dyn Any>),
}

// ── State ─────────────────────────────────────────────────────────────────

struct State {
    title: Option<String>,
    text: Option<String>,
    enabled: bool,
    visible: bool,
    editable: bool,
    selected: bool,
    preferred_size: Option<Dimension>,
    size: Dimension,
    layout: Option<LayoutManager>,
    parent: Option<WeakComponent>,
    children: Vec<(Component, Option<Constraint>)>,
    listeners: Listeners,
    action: Option<Action>,
    cell_renderer: Option<CellRenderer>,
    model: Option<ListModel>,
    group: Option<ButtonGroup>,
}

impl State {
    fn new(kind: WidgetKind) -> Self {
        Self {
            title: None,
            text: None,
            enabled: true,
            visible: kind.visible_by_default(),
            editable: kind.is_text_input_like(),
            selected: false,
            preferred_size: None,
            size: Dimension::zero(),
            layout: LayoutManager::default_for(kind),
            parent: None,
            children: Vec::new(),
            listeners: Listeners::default(),
            action: None,
            cell_renderer: None,
            model: None,
            group: None,
        }
    }
}

struct Inner {
    class: String,
    kind: WidgetKind,
    content_pane: Option<Component>,
    state: RefCell<State>,
}

// ── Component ─────────────────────────────────────────────────────────────

/// A handle to a node in the retained component tree.
///
/// Handles are cheap to clone and compare by identity. A container owns its
/// children through the handles stored in its child list; everything else
/// (host fields, id registries) holds additional clones of the same node.
///
/// # Example
/// ```rust
/// use trellis_ui::{Component, WidgetKind};
///
/// let frame = Component::new("Frame", WidgetKind::Frame);
/// let button = Component::new("Button", WidgetKind::Button);
/// button.set_text("OK").unwrap();
/// frame.add(&button, None).unwrap();
///
/// // Window-like containers delegate children to their content pane.
/// assert!(frame.children()[0].ptr_eq(&button));
/// assert!(button.parent().unwrap().ptr_eq(&frame.content_pane().unwrap()));
/// ```
#[derive(Clone)]
pub struct Component(Rc<Inner>);

/// Non-owning counterpart of [`Component`].
#[derive(Clone)]
pub struct WeakComponent(Weak<Inner>);

impl WeakComponent {
    pub fn upgrade(&self) -> Option<Component> {
        self.0.upgrade().map(Component)
    }
}

impl fmt::Debug for WeakComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(c) => write!(f, "Weak({c:?})"),
            None => f.write_str("Weak(<dropped>)"),
        }
    }
}

impl Component {
    /// Create a component of `kind` with runtime class name `class`.
    ///
    /// Window-like kinds get a content pane with a border layout and start
    /// hidden; everything else starts visible.
    pub fn new(class: impl Into<String>, kind: WidgetKind) -> Self {
        let content_pane = kind.is_window_like().then(|| {
            let pane = Self::node("Panel".to_string(), WidgetKind::Panel, None);
            pane.state_mut().layout = Some(LayoutManager::border());
            pane
        });
        let this = Self::node(class.into(), kind, content_pane);
        if let Some(pane) = &this.0.content_pane {
            pane.state_mut().parent = Some(this.downgrade());
        }
        this
    }

    fn node(class: String, kind: WidgetKind, content_pane: Option<Component>) -> Self {
        Self(Rc::new(Inner { class, kind, content_pane, state: RefCell::new(State::new(kind)) }))
    }

    fn state(&self) -> Ref<'_, State> {
        self.0.state.borrow()
    }

    fn state_mut(&self) -> RefMut<'_, State> {
        self.0.state.borrow_mut()
    }

    fn unsupported(&self, operation: &'static str) -> ToolkitError {
        ToolkitError::unsupported(operation, &self.0.class)
    }

    /// Runtime class name, e.g. `"Button"` or a custom `"FancyPanel"`.
    pub fn class(&self) -> &str {
        &self.0.class
    }

    pub fn kind(&self) -> WidgetKind {
        self.0.kind
    }

    pub fn content_pane(&self) -> Option<Component> {
        self.0.content_pane.clone()
    }

    /// The container that actually holds children and a layout: the content
    /// pane for windows, `self` otherwise.
    fn container(&self) -> Component {
        self.content_pane().unwrap_or_else(|| self.clone())
    }

    pub fn ptr_eq(&self, other: &Component) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn downgrade(&self) -> WeakComponent {
        WeakComponent(Rc::downgrade(&self.0))
    }

    // ── Hierarchy ─────────────────────────────────────────────────────────

    /// Append `child`, moving it out of any previous parent.
    pub fn add(&self, child: &Component, constraint: Option<Constraint>) -> Result<(), ToolkitError> {
        let target = self.container();
        if child.kind().is_window_like() {
            return Err(child.unsupported("adding a window to a container"));
        }
        if child.ptr_eq(&target) || child.is_ancestor_of(&target) {
            return Err(target.unsupported("adding a component to itself"));
        }
        if let (Some(LayoutManager::Border { .. }), Some(Constraint::Name(region))) =
            (target.layout(), &constraint)
        {
            if !is_border_region(region) {
                return Err(target.unsupported("unknown border region"));
            }
        }
        if let Some(old) = child.parent() {
            old.state_mut().children.retain(|(c, _)| !c.ptr_eq(child));
        }
        child.state_mut().parent = Some(target.downgrade());
        target.state_mut().children.push((child.clone(), constraint));
        log::trace!("added {} to {}", child.class(), target.class());
        Ok(())
    }

    fn is_ancestor_of(&self, other: &Component) -> bool {
        let mut cur = other.parent();
        while let Some(p) = cur {
            if p.ptr_eq(self) {
                return true;
            }
            cur = p.parent();
        }
        false
    }

    pub fn children(&self) -> Vec<Component> {
        self.container().state().children.iter().map(|(c, _)| c.clone()).collect()
    }

    pub fn children_with_constraints(&self) -> Vec<(Component, Option<Constraint>)> {
        self.container().state().children.clone()
    }

    pub fn parent(&self) -> Option<Component> {
        self.state().parent.as_ref().and_then(WeakComponent::upgrade)
    }

    // ── Layout and size ───────────────────────────────────────────────────

    /// Install a layout manager. A box layout must be bound to the container
    /// it is installed on.
    pub fn set_layout(&self, layout: LayoutManager) -> Result<(), ToolkitError> {
        let target = self.container();
        if let LayoutManager::Box { .. } = layout {
            match layout.box_target() {
                Some(bound) if bound.ptr_eq(&target) => {}
                _ => return Err(target.unsupported("sharing a BoxLayout")),
            }
        }
        log::trace!("{} layout -> {}", self.class(), layout.name());
        target.state_mut().layout = Some(layout);
        Ok(())
    }

    pub fn layout(&self) -> Option<LayoutManager> {
        self.container().state().layout.clone()
    }

    pub fn set_preferred_size(&self, size: Dimension) {
        self.state_mut().preferred_size = Some(size);
    }

    /// The explicit preferred size if one was set, otherwise computed from
    /// the layout and children, or from the kind for leaves.
    pub fn preferred_size(&self) -> Dimension {
        if let Some(size) = self.state().preferred_size {
            return size;
        }
        if let Some(pane) = self.content_pane() {
            return pane.preferred_size();
        }
        let (layout, children) = {
            let st = self.state();
            (st.layout.clone(), st.children.clone())
        };
        match layout {
            Some(layout) => layout.preferred_size(&children),
            None if !children.is_empty() => LayoutManager::flow().preferred_size(&children),
            None => self.leaf_size(),
        }
    }

    fn leaf_size(&self) -> Dimension {
        let chars = self.state().text.as_deref().map_or(0, |t| t.chars().count()) as i32;
        match self.kind() {
            k if k.is_button_like() => Dimension::new(chars * 7 + 32, 26),
            WidgetKind::Label => Dimension::new(chars * 7, 16),
            WidgetKind::TextField => Dimension::new((chars * 7).max(100), 20),
            WidgetKind::TextArea | WidgetKind::List | WidgetKind::Tree => Dimension::new(100, 100),
            _ => Dimension::zero(),
        }
    }

    /// Size the component to its preferred size.
    pub fn pack(&self) {
        let size = self.preferred_size();
        self.state_mut().size = size;
    }

    pub fn size(&self) -> Dimension {
        self.state().size
    }

    // ── Properties ────────────────────────────────────────────────────────

    pub fn set_title(&self, title: impl Into<String>) -> Result<(), ToolkitError> {
        if !self.kind().has_title() {
            return Err(self.unsupported("set_title"));
        }
        self.state_mut().title = Some(title.into());
        Ok(())
    }

    pub fn title(&self) -> Option<String> {
        self.state().title.clone()
    }

    pub fn set_text(&self, text: impl Into<String>) -> Result<(), ToolkitError> {
        if !self.kind().accepts_text() {
            return Err(self.unsupported("set_text"));
        }
        self.state_mut().text = Some(text.into());
        Ok(())
    }

    pub fn text(&self) -> Option<String> {
        self.state().text.clone()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.state_mut().enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.state().enabled
    }

    pub fn set_visible(&self, visible: bool) {
        self.state_mut().visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.state().visible
    }

    pub fn set_editable(&self, editable: bool) -> Result<(), ToolkitError> {
        if !self.kind().is_text_input_like() {
            return Err(self.unsupported("set_editable"));
        }
        self.state_mut().editable = editable;
        Ok(())
    }

    pub fn is_editable(&self) -> bool {
        self.state().editable
    }

    // ── Listeners ─────────────────────────────────────────────────────────

    /// Attach `listener` for one capability. Action listeners need a button,
    /// tree listeners a tree and selection listeners a list.
    pub fn add_listener(&self, cap: ListenerCap, listener: Listener) -> Result<(), ToolkitError> {
        let kind = self.kind();
        let supported = match cap {
            ListenerCap::Action => kind.is_button_like(),
            ListenerCap::TreeExpansion | ListenerCap::TreeWillExpand => kind.is_tree_like(),
            ListenerCap::ListSelection => kind.is_list_like(),
            ListenerCap::Mouse | ListenerCap::MouseMotion | ListenerCap::MouseWheel | ListenerCap::Key => true,
        };
        if !supported {
            return Err(self.unsupported(adder_name(cap)));
        }
        log::trace!("{} += {} ({cap:?})", self.class(), listener.name());
        self.state_mut().listeners.add(cap, listener);
        Ok(())
    }

    pub fn add_mouse_listener(&self, l: Listener) -> Result<(), ToolkitError> {
        self.add_listener(ListenerCap::Mouse, l)
    }
    pub fn add_mouse_motion_listener(&self, l: Listener) -> Result<(), ToolkitError> {
        self.add_listener(ListenerCap::MouseMotion, l)
    }
    pub fn add_mouse_wheel_listener(&self, l: Listener) -> Result<(), ToolkitError> {
        self.add_listener(ListenerCap::MouseWheel, l)
    }
    pub fn add_action_listener(&self, l: Listener) -> Result<(), ToolkitError> {
        self.add_listener(ListenerCap::Action, l)
    }
    pub fn add_key_listener(&self, l: Listener) -> Result<(), ToolkitError> {
        self.add_listener(ListenerCap::Key, l)
    }
    pub fn add_tree_expansion_listener(&self, l: Listener) -> Result<(), ToolkitError> {
        self.add_listener(ListenerCap::TreeExpansion, l)
    }
    pub fn add_tree_will_expand_listener(&self, l: Listener) -> Result<(), ToolkitError> {
        self.add_listener(ListenerCap::TreeWillExpand, l)
    }
    pub fn add_list_selection_listener(&self, l: Listener) -> Result<(), ToolkitError> {
        self.add_listener(ListenerCap::ListSelection, l)
    }

    pub fn listeners(&self, cap: ListenerCap) -> Vec<Listener> {
        self.state().listeners.for_cap(cap)
    }

    // ── Buttons ───────────────────────────────────────────────────────────

    /// Bind a button to `action`; the button takes the action's name as text.
    pub fn set_action(&self, action: Action) -> Result<(), ToolkitError> {
        if !self.kind().is_button_like() {
            return Err(self.unsupported("set_action"));
        }
        let mut st = self.state_mut();
        st.text = Some(action.name().to_string());
        st.action = Some(action);
        Ok(())
    }

    pub fn action(&self) -> Option<Action> {
        self.state().action.clone()
    }

    /// Select or deselect a toggle button. Selecting a grouped button
    /// deselects the rest of its group.
    pub fn set_selected(&self, selected: bool) -> Result<(), ToolkitError> {
        if !self.kind().is_toggle() {
            return Err(self.unsupported("set_selected"));
        }
        let group = self.button_group();
        match group {
            Some(g) if selected => g.select(self),
            _ => self.state_mut().selected = selected,
        }
        Ok(())
    }

    pub(crate) fn set_selected_unchecked(&self, selected: bool) {
        self.state_mut().selected = selected;
    }

    pub fn is_selected(&self) -> bool {
        self.state().selected
    }

    pub fn button_group(&self) -> Option<ButtonGroup> {
        self.state().group.clone()
    }

    pub(crate) fn set_button_group(&self, group: ButtonGroup) {
        self.state_mut().group = Some(group);
    }

    // ── Lists ─────────────────────────────────────────────────────────────

    pub fn set_model(&self, model: ListModel) -> Result<(), ToolkitError> {
        if !self.kind().is_list_like() {
            return Err(self.unsupported("set_model"));
        }
        self.state_mut().model = Some(model);
        Ok(())
    }

    pub fn model(&self) -> Option<ListModel> {
        self.state().model.clone()
    }

    pub fn set_cell_renderer(&self, renderer: CellRenderer) -> Result<(), ToolkitError> {
        if !self.kind().is_list_like() {
            return Err(self.unsupported("set_cell_renderer"));
        }
        self.state_mut().cell_renderer = Some(renderer);
        Ok(())
    }

    pub fn cell_renderer(&self) -> Option<CellRenderer> {
        self.state().cell_renderer.clone()
    }

    /// Every model item passed through the cell renderer, none selected.
    pub fn rendered_cells(&self) -> Vec<String> {
        let (model, renderer) = {
            let st = self.state();
            (st.model.clone(), st.cell_renderer.clone().unwrap_or_default())
        };
        model
            .map(|m| m.items().iter().enumerate().map(|(i, item)| renderer.render(item, i, false)).collect())
            .unwrap_or_default()
    }

    // ── Events ────────────────────────────────────────────────────────────

    /// Deliver `event` to every listener attached for its capability.
    ///
    /// Action events on a disabled component are dropped. Otherwise they
    /// flip toggle buttons and run the bound action before listeners see
    /// them.
    pub fn fire(&self, event: &Event) {
        if let Event::Action { .. } = event {
            if !self.is_enabled() {
                return;
            }
            if self.kind().is_toggle() {
                let selected = !self.is_selected() || self.button_group().is_some();
                let _ = self.set_selected(selected);
            }
            if let Some(action) = self.action() {
                action.perform(event);
            }
        }
        // Snapshot first: handlers may add listeners or fire again.
        let listeners = self.listeners(event.capability());
        for l in listeners {
            l.handle(event);
        }
    }

    /// Fire an action event carrying the current text as its command.
    pub fn click(&self) {
        let command = self.text().unwrap_or_default();
        self.fire(&Event::Action { command });
    }
}

fn adder_name(cap: ListenerCap) -> &'static str {
    match cap {
        ListenerCap::Mouse => "add_mouse_listener",
        ListenerCap::MouseMotion => "add_mouse_motion_listener",
        ListenerCap::MouseWheel => "add_mouse_wheel_listener",
        ListenerCap::Action => "add_action_listener",
        ListenerCap::Key => "add_key_listener",
        ListenerCap::TreeExpansion => "add_tree_expansion_listener",
        ListenerCap::TreeWillExpand => "add_tree_will_expand_listener",
        ListenerCap::ListSelection => "add_list_selection_listener",
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let st = self.state();
        let mut d = f.debug_struct(&self.0.class);
        if let Some(t) = &st.title {
            d.field("title", t);
        }
        if let Some(t) = &st.text {
            d.field("text", t);
        }
        d.field("children", &st.children.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Axis, NORTH};
    use std::cell::Cell;

    #[test]
    fn windows_start_hidden_with_border_pane() {
        let frame = Component::new("Frame", WidgetKind::Frame);
        assert!(!frame.is_visible());
        assert!(matches!(frame.layout(), Some(LayoutManager::Border { .. })));
        assert!(Component::new("Panel", WidgetKind::Panel).is_visible());
    }

    #[test]
    fn add_moves_child_between_parents() {
        let a = Component::new("Panel", WidgetKind::Panel);
        let b = Component::new("Panel", WidgetKind::Panel);
        let label = Component::new("Label", WidgetKind::Label);
        a.add(&label, None).unwrap();
        b.add(&label, None).unwrap();
        assert!(a.children().is_empty());
        assert!(label.parent().unwrap().ptr_eq(&b));
    }

    #[test]
    fn add_rejects_cycles_and_windows() {
        let outer = Component::new("Panel", WidgetKind::Panel);
        let inner = Component::new("Panel", WidgetKind::Panel);
        outer.add(&inner, None).unwrap();
        assert!(inner.add(&outer, None).is_err());
        assert!(outer.add(&outer, None).is_err());
        let dialog = Component::new("Dialog", WidgetKind::Dialog);
        assert!(outer.add(&dialog, None).is_err());
    }

    #[test]
    fn border_region_is_validated() {
        let frame = Component::new("Frame", WidgetKind::Frame);
        let label = Component::new("Label", WidgetKind::Label);
        assert!(frame.add(&label, Some(Constraint::Name("Middle".into()))).is_err());
        frame.add(&label, Some(Constraint::Name(NORTH.into()))).unwrap();
    }

    #[test]
    fn box_layout_must_target_its_container() {
        let frame = Component::new("Frame", WidgetKind::Frame);
        let other = Component::new("Panel", WidgetKind::Panel);
        assert!(frame.set_layout(LayoutManager::boxed(&other, Axis::Y)).is_err());
        assert!(frame.set_layout(LayoutManager::boxed(&frame, Axis::Y)).is_err());
        let pane = frame.content_pane().unwrap();
        frame.set_layout(LayoutManager::boxed(&pane, Axis::Y)).unwrap();
    }

    #[test]
    fn pack_uses_preferred_size() {
        let frame = Component::new("Frame", WidgetKind::Frame);
        let pane = frame.content_pane().unwrap();
        frame.set_layout(LayoutManager::boxed(&pane, Axis::Y)).unwrap();
        for (w, h) in [(50, 10), (20, 30)] {
            let p = Component::new("Panel", WidgetKind::Panel);
            p.set_preferred_size(Dimension::new(w, h));
            frame.add(&p, None).unwrap();
        }
        frame.pack();
        assert_eq!(frame.size(), Dimension::new(50, 40));
    }

    #[test]
    fn kind_gates_properties() {
        let panel = Component::new("Panel", WidgetKind::Panel);
        assert!(panel.set_text("x").is_err());
        assert!(panel.set_title("x").is_err());
        assert!(panel.set_editable(false).is_err());
        let field = Component::new("TextField", WidgetKind::TextField);
        assert!(field.is_editable());
        field.set_editable(false).unwrap();
        assert!(!field.is_editable());
    }

    #[test]
    fn listener_gating_by_kind() {
        let l = Listener::new("l", ListenerCap::ALL, |_| {});
        let label = Component::new("Label", WidgetKind::Label);
        assert!(label.add_mouse_listener(l.clone()).is_ok());
        let err = label.add_action_listener(l.clone()).unwrap_err();
        assert_eq!(err.operation, "add_action_listener");
        assert!(label.add_list_selection_listener(l.clone()).is_err());
        let tree = Component::new("Tree", WidgetKind::Tree);
        assert!(tree.add_tree_will_expand_listener(l).is_ok());
    }

    #[test]
    fn click_runs_action_then_listeners() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let button = Component::new("Button", WidgetKind::Button);
        let a = log.clone();
        button.set_action(Action::new("Save", move |_| a.borrow_mut().push("action"))).unwrap();
        let b = log.clone();
        button
            .add_action_listener(Listener::new("l", [ListenerCap::Action], move |ev| {
                if let Event::Action { command } = ev {
                    b.borrow_mut().push(if command == "Save" { "listener" } else { "?" });
                }
            }))
            .unwrap();
        assert_eq!(button.text().as_deref(), Some("Save"));
        button.click();
        assert_eq!(*log.borrow(), ["action", "listener"]);
    }

    #[test]
    fn disabled_button_ignores_clicks() {
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let button = Component::new("Button", WidgetKind::Button);
        button.add_action_listener(Listener::new("l", [ListenerCap::Action], move |_| h.set(h.get() + 1))).unwrap();
        button.set_enabled(false);
        button.click();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn checkbox_toggles_on_click() {
        let cb = Component::new("CheckBox", WidgetKind::CheckBox);
        cb.click();
        assert!(cb.is_selected());
        cb.click();
        assert!(!cb.is_selected());
    }

    #[test]
    fn rendered_cells_use_renderer() {
        let list = Component::new("List", WidgetKind::List);
        let model = ListModel::new();
        model.push("a");
        model.push("b");
        list.set_model(model).unwrap();
        assert_eq!(list.rendered_cells(), ["a", "b"]);
        list.set_cell_renderer(CellRenderer::new(|s, i, _| format!("{i}:{s}"))).unwrap();
        assert_eq!(list.rendered_cells(), ["0:a", "1:b"]);
    }
}
