/// The built-in component kinds. Custom component types reuse one of these
/// as their base kind and keep their own class name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Frame,
    Dialog,
    Window,
    Panel,
    ScrollPane,
    Button,
    ToggleButton,
    CheckBox,
    RadioButton,
    Label,
    TextField,
    TextArea,
    List,
    Tree,
}

impl WidgetKind {
    /// Top-level containers with a title and a content pane.
    pub fn is_window_like(self) -> bool {
        matches!(self, Self::Frame | Self::Dialog | Self::Window)
    }

    /// Components that can be titled. Plain windows have no title bar.
    pub fn has_title(self) -> bool {
        matches!(self, Self::Frame | Self::Dialog)
    }

    pub fn is_button_like(self) -> bool {
        matches!(self, Self::Button | Self::ToggleButton | Self::CheckBox | Self::RadioButton)
    }

    /// Buttons that keep a selected state.
    pub fn is_toggle(self) -> bool {
        matches!(self, Self::ToggleButton | Self::CheckBox | Self::RadioButton)
    }

    pub fn is_label_like(self) -> bool {
        self == Self::Label
    }

    pub fn is_text_input_like(self) -> bool {
        matches!(self, Self::TextField | Self::TextArea)
    }

    pub fn is_list_like(self) -> bool {
        self == Self::List
    }

    pub fn is_tree_like(self) -> bool {
        self == Self::Tree
    }

    /// Kinds whose display text can be set.
    pub fn accepts_text(self) -> bool {
        self.is_button_like() || self.is_label_like() || self.is_text_input_like()
    }

    /// Whether a freshly constructed component of this kind is visible.
    pub(crate) fn visible_by_default(self) -> bool {
        !self.is_window_like()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_bearing_kinds() {
        assert!(WidgetKind::Button.accepts_text());
        assert!(WidgetKind::RadioButton.accepts_text());
        assert!(WidgetKind::Label.accepts_text());
        assert!(WidgetKind::TextArea.accepts_text());
        assert!(!WidgetKind::Panel.accepts_text());
        assert!(!WidgetKind::List.accepts_text());
    }

    #[test]
    fn only_frames_and_dialogs_have_titles() {
        assert!(WidgetKind::Frame.has_title());
        assert!(WidgetKind::Dialog.has_title());
        assert!(!WidgetKind::Window.has_title());
        assert!(WidgetKind::Window.is_window_like());
        assert!(!WidgetKind::Panel.has_title());
    }
}
