//! Registrations for the toolkit shipped in `trellis-ui`.

use std::rc::Rc;

use trellis_ui::prelude::*;

use crate::types::*;
use crate::value::{ObjectRef, Value};

// ── Argument helpers ──────────────────────────────────────────────────────

fn arg<'a>(args: &'a [Value], i: usize) -> Result<&'a Value, String> {
    args.get(i).ok_or_else(|| format!("missing argument {i}"))
}

fn int(args: &[Value], i: usize) -> Result<i32, String> {
    let v = arg(args, i)?;
    v.as_int().ok_or_else(|| format!("argument {i} is not an int: {v:?}"))
}

fn boolean(args: &[Value], i: usize) -> Result<bool, String> {
    let v = arg(args, i)?;
    v.as_bool().ok_or_else(|| format!("argument {i} is not a boolean: {v:?}"))
}

fn string(args: &[Value], i: usize) -> Result<String, String> {
    let v = arg(args, i)?;
    v.as_str().map(str::to_string).ok_or_else(|| format!("argument {i} is not a string: {v:?}"))
}

fn component(args: &[Value], i: usize) -> Result<Component, String> {
    let v = arg(args, i)?;
    v.as_component().ok_or_else(|| format!("argument {i} is not a component: {v:?}"))
}

fn downcast<T: Clone + 'static>(args: &[Value], i: usize, what: &str) -> Result<T, String> {
    let v = arg(args, i)?;
    v.downcast::<T>().ok_or_else(|| format!("argument {i} is not a {what}: {v:?}"))
}

fn object(o: impl crate::value::Object) -> Result<ObjectRef, String> {
    Ok(Rc::new(o))
}

fn no_params() -> [&'static str; 0] {
    []
}

// ── Widgets ───────────────────────────────────────────────────────────────

fn widget(name: &'static str, superclass: &'static str, kind: WidgetKind) -> TypeInfo {
    TypeInfo::new(name)
        .extends(superclass)
        .constructor(Constructor::new(no_params(), move |_| object(Component::new(name, kind))))
}

fn titled(name: &'static str, kind: WidgetKind) -> TypeInfo {
    widget(name, WINDOW, kind).constructor(Constructor::new([STRING], move |args| {
        let c = Component::new(name, kind);
        c.set_title(string(args, 0)?).map_err(|e| e.to_string())?;
        object(c)
    }))
}

fn text_bearing(name: &'static str, superclass: &'static str, kind: WidgetKind) -> TypeInfo {
    widget(name, superclass, kind).constructor(Constructor::new([STRING], move |args| {
        let c = Component::new(name, kind);
        c.set_text(string(args, 0)?).map_err(|e| e.to_string())?;
        object(c)
    }))
}

fn toggle(name: &'static str, superclass: &'static str, kind: WidgetKind) -> TypeInfo {
    text_bearing(name, superclass, kind).constructor(Constructor::new([STRING, BOOL], move |args| {
        let c = Component::new(name, kind);
        c.set_text(string(args, 0)?).map_err(|e| e.to_string())?;
        c.set_selected(boolean(args, 1)?).map_err(|e| e.to_string())?;
        object(c)
    }))
}

fn listener_method(name: &'static str, cap: ListenerCap) -> Method {
    Method::new(name, listener_type(cap), move |target, arg| {
        let c = target.as_component().ok_or_else(|| format!("{} is not a component", target.type_name()))?;
        let l = arg.downcast::<Listener>().ok_or_else(|| format!("{arg:?} is not a listener"))?;
        c.add_listener(cap, l).map_err(|e| e.to_string())
    })
}

/// Preferred size for text inputs sized in character cells.
fn cells(cols: i32, rows: i32) -> Dimension {
    Dimension::new(cols.max(1) * 8, rows.max(1) * 16 + 4)
}

fn widgets() -> Vec<TypeInfo> {
    vec![
        TypeInfo::new(COMPONENT)
            .abstract_marker()
            .method(listener_method("add_mouse_listener", ListenerCap::Mouse))
            .method(listener_method("add_mouse_motion_listener", ListenerCap::MouseMotion))
            .method(listener_method("add_mouse_wheel_listener", ListenerCap::MouseWheel))
            .method(listener_method("add_key_listener", ListenerCap::Key)),
        TypeInfo::new(CONTAINER).extends(COMPONENT).abstract_marker(),
        widget(WINDOW, CONTAINER, WidgetKind::Window),
        titled(FRAME, WidgetKind::Frame),
        titled(DIALOG, WidgetKind::Dialog),
        widget(PANEL, CONTAINER, WidgetKind::Panel).constructor(Constructor::new([LAYOUT_MANAGER], |args| {
            let c = Component::new(PANEL, WidgetKind::Panel);
            c.set_layout(downcast::<LayoutManager>(args, 0, "layout manager")?).map_err(|e| e.to_string())?;
            object(c)
        })),
        widget(SCROLL_PANE, CONTAINER, WidgetKind::ScrollPane).constructor(Constructor::new([COMPONENT], |args| {
            let c = Component::new(SCROLL_PANE, WidgetKind::ScrollPane);
            c.add(&component(args, 0)?, None).map_err(|e| e.to_string())?;
            object(c)
        })),
        TypeInfo::new(ABSTRACT_BUTTON)
            .extends(CONTAINER)
            .abstract_marker()
            .method(listener_method("add_action_listener", ListenerCap::Action)),
        text_bearing(BUTTON, ABSTRACT_BUTTON, WidgetKind::Button).constructor(Constructor::new([ACTION], |args| {
            let c = Component::new(BUTTON, WidgetKind::Button);
            c.set_action(downcast::<Action>(args, 0, "action")?).map_err(|e| e.to_string())?;
            object(c)
        })),
        toggle(TOGGLE_BUTTON, ABSTRACT_BUTTON, WidgetKind::ToggleButton),
        toggle(CHECK_BOX, TOGGLE_BUTTON, WidgetKind::CheckBox),
        toggle(RADIO_BUTTON, TOGGLE_BUTTON, WidgetKind::RadioButton),
        text_bearing(LABEL, CONTAINER, WidgetKind::Label),
        TypeInfo::new(TEXT_COMPONENT).extends(CONTAINER).abstract_marker(),
        text_bearing(TEXT_FIELD, TEXT_COMPONENT, WidgetKind::TextField)
            .constructor(Constructor::new([INT], |args| {
                let c = Component::new(TEXT_FIELD, WidgetKind::TextField);
                c.set_preferred_size(cells(int(args, 0)?, 1));
                object(c)
            }))
            .constructor(Constructor::new([STRING, INT], |args| {
                let c = Component::new(TEXT_FIELD, WidgetKind::TextField);
                c.set_text(string(args, 0)?).map_err(|e| e.to_string())?;
                c.set_preferred_size(cells(int(args, 1)?, 1));
                object(c)
            })),
        text_bearing(TEXT_AREA, TEXT_COMPONENT, WidgetKind::TextArea).constructor(Constructor::new([INT, INT], |args| {
            let c = Component::new(TEXT_AREA, WidgetKind::TextArea);
            c.set_preferred_size(cells(int(args, 1)?, int(args, 0)?));
            object(c)
        })),
        widget(LIST, CONTAINER, WidgetKind::List)
            .constructor(Constructor::new([LIST_MODEL], |args| {
                let c = Component::new(LIST, WidgetKind::List);
                c.set_model(downcast::<ListModel>(args, 0, "list model")?).map_err(|e| e.to_string())?;
                object(c)
            }))
            .method(listener_method("add_list_selection_listener", ListenerCap::ListSelection)),
        TypeInfo::new(LIST_SELECTION_MODE)
            .constant("SINGLE", INT, 0)
            .constant("SINGLE_INTERVAL", INT, 1)
            .constant("MULTIPLE_INTERVAL", INT, 2),
        widget(TREE, CONTAINER, WidgetKind::Tree)
            .method(listener_method("add_tree_expansion_listener", ListenerCap::TreeExpansion))
            .method(listener_method("add_tree_will_expand_listener", ListenerCap::TreeWillExpand)),
    ]
}

// ── Layouts ───────────────────────────────────────────────────────────────

fn flow_align(code: i32) -> Result<FlowAlign, String> {
    FlowAlign::from_code(code).ok_or_else(|| format!("invalid flow alignment {code}"))
}

fn layouts() -> Vec<TypeInfo> {
    vec![
        TypeInfo::new(LAYOUT_MANAGER).abstract_marker(),
        TypeInfo::new(BORDER_LAYOUT)
            .extends(LAYOUT_MANAGER)
            .constructor(Constructor::new(no_params(), |_| object(LayoutManager::border())))
            .constructor(Constructor::new([INT, INT], |args| {
                object(LayoutManager::Border { hgap: int(args, 0)?, vgap: int(args, 1)? })
            }))
            .constant("NORTH", STRING, NORTH)
            .constant("SOUTH", STRING, SOUTH)
            .constant("EAST", STRING, EAST)
            .constant("WEST", STRING, WEST)
            .constant("CENTER", STRING, CENTER),
        TypeInfo::new(FLOW_LAYOUT)
            .extends(LAYOUT_MANAGER)
            .constructor(Constructor::new(no_params(), |_| object(LayoutManager::flow())))
            .constructor(Constructor::new([INT], |args| {
                object(LayoutManager::Flow { align: flow_align(int(args, 0)?)?, hgap: 5, vgap: 5 })
            }))
            .constructor(Constructor::new([INT, INT, INT], |args| {
                object(LayoutManager::Flow {
                    align: flow_align(int(args, 0)?)?,
                    hgap: int(args, 1)?,
                    vgap: int(args, 2)?,
                })
            }))
            .constant("LEFT", INT, 0)
            .constant("CENTER", INT, 1)
            .constant("RIGHT", INT, 2),
        TypeInfo::new(GRID_LAYOUT)
            .extends(LAYOUT_MANAGER)
            .constructor(Constructor::new(no_params(), |_| object(LayoutManager::grid(1, 0))))
            .constructor(Constructor::new([INT, INT], |args| object(LayoutManager::grid(int(args, 0)?, int(args, 1)?))))
            .constructor(Constructor::new([INT, INT, INT, INT], |args| {
                object(LayoutManager::Grid {
                    rows: int(args, 0)?,
                    cols: int(args, 1)?,
                    hgap: int(args, 2)?,
                    vgap: int(args, 3)?,
                })
            })),
        TypeInfo::new(BOX_LAYOUT)
            .extends(LAYOUT_MANAGER)
            .constructor(Constructor::new([CONTAINER, INT], |args| {
                let axis = int(args, 1)?;
                let axis = Axis::from_code(axis).ok_or_else(|| format!("invalid box axis {axis}"))?;
                object(LayoutManager::boxed(&component(args, 0)?, axis))
            }))
            .constant("X_AXIS", INT, 0)
            .constant("Y_AXIS", INT, 1)
            .constant("LINE_AXIS", INT, 2)
            .constant("PAGE_AXIS", INT, 3),
    ]
}

// ── Everything else ───────────────────────────────────────────────────────

fn support() -> Vec<TypeInfo> {
    let mut out = vec![
        TypeInfo::new(OBJECT).root(),
        TypeInfo::new(NUMBER),
        TypeInfo::new(INTEGER).extends(NUMBER),
        TypeInfo::new(INT).root(),
        TypeInfo::new(BOOLEAN).constant("TRUE", BOOLEAN, true).constant("FALSE", BOOLEAN, false),
        TypeInfo::new(BOOL).root(),
        TypeInfo::new(STRING),
        TypeInfo::new(ACTION),
        TypeInfo::new(CELL_RENDERER),
        TypeInfo::new(LIST_MODEL).constructor(Constructor::new(no_params(), |_| object(ListModel::new()))),
        TypeInfo::new(BUTTON_GROUP).constructor(Constructor::new(no_params(), |_| object(ButtonGroup::new()))),
        TypeInfo::new(DIMENSION)
            .constructor(Constructor::new([INT, INT], |args| object(Dimension::new(int(args, 0)?, int(args, 1)?)))),
        TypeInfo::new(EVENT_LISTENER).abstract_marker(),
        TypeInfo::new(MOUSE_INPUT_LISTENER).extends(EVENT_LISTENER).abstract_marker(),
    ];
    out.extend(ListenerCap::ALL.iter().map(|&cap| {
        TypeInfo::new(listener_type(cap)).extends(EVENT_LISTENER).abstract_marker()
    }));
    out
}

pub(crate) fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    let all: Vec<TypeInfo> = support().into_iter().chain(widgets()).chain(layouts()).collect();
    let mut short_names = Vec::new();
    for info in all {
        if let Some((_, short)) = info.name.rsplit_once('.') {
            short_names.push((short.to_string(), info.name.clone()));
        }
        registry.register(info);
    }
    for (short, full) in short_names {
        registry.alias(short, full);
    }
    registry
}
