use crate::component::{Component, Constraint, WeakComponent};
use crate::geom::Dimension;
use crate::kind::WidgetKind;

// ── Axis / alignment ──────────────────────────────────────────────────────

/// Box layout axis. Line and page axes follow a left-to-right, top-to-bottom
/// orientation, so they behave like X and Y.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Line,
    Page,
}

impl Axis {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::Line),
            3 => Some(Self::Page),
            _ => None,
        }
    }

    fn is_horizontal(self) -> bool {
        matches!(self, Self::X | Self::Line)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlowAlign {
    Left,
    Center,
    Right,
}

impl FlowAlign {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Left),
            1 => Some(Self::Center),
            2 => Some(Self::Right),
            _ => None,
        }
    }
}

// ── Border regions ────────────────────────────────────────────────────────

pub const NORTH: &str = "North";
pub const SOUTH: &str = "South";
pub const EAST: &str = "East";
pub const WEST: &str = "West";
pub const CENTER: &str = "Center";

pub(crate) fn is_border_region(name: &str) -> bool {
    [NORTH, SOUTH, EAST, WEST, CENTER].contains(&name)
}

// ── LayoutManager ─────────────────────────────────────────────────────────

/// Arranges the children of a container. Only preferred sizes are computed;
/// there is no positioning pass in a headless tree.
#[derive(Debug, Clone)]
pub enum LayoutManager {
    Border { hgap: i32, vgap: i32 },
    Flow { align: FlowAlign, hgap: i32, vgap: i32 },
    Grid { rows: i32, cols: i32, hgap: i32, vgap: i32 },
    /// Bound to the container it lays out; it cannot be shared.
    Box { target: WeakComponent, axis: Axis },
}

impl LayoutManager {
    pub fn border() -> Self {
        Self::Border { hgap: 0, vgap: 0 }
    }

    pub fn flow() -> Self {
        Self::Flow { align: FlowAlign::Center, hgap: 5, vgap: 5 }
    }

    pub fn grid(rows: i32, cols: i32) -> Self {
        Self::Grid { rows, cols, hgap: 0, vgap: 0 }
    }

    pub fn boxed(target: &Component, axis: Axis) -> Self {
        Self::Box { target: target.downgrade(), axis }
    }

    /// The layout a freshly constructed container of `kind` starts with.
    pub(crate) fn default_for(kind: WidgetKind) -> Option<Self> {
        match kind {
            WidgetKind::Panel => Some(Self::flow()),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Border { .. } => "BorderLayout",
            Self::Flow { .. } => "FlowLayout",
            Self::Grid { .. } => "GridLayout",
            Self::Box { .. } => "BoxLayout",
        }
    }

    /// The container a box layout is bound to, if it is still alive.
    pub fn box_target(&self) -> Option<Component> {
        match self {
            Self::Box { target, .. } => target.upgrade(),
            _ => None,
        }
    }

    pub(crate) fn preferred_size(&self, children: &[(Component, Option<Constraint>)]) -> Dimension {
        let sizes = || children.iter().filter(|(c, _)| c.is_visible()).map(|(c, _)| c.preferred_size());
        let count = children.iter().filter(|(c, _)| c.is_visible()).count() as i32;
        match self {
            Self::Flow { hgap, vgap, .. } => {
                let (w, h) = sizes().fold((0, 0), |(w, h), d| (w + d.width + hgap, h.max(d.height)));
                Dimension::new(w + hgap, h + 2 * vgap)
            }
            Self::Box { axis, .. } => sizes().fold(Dimension::zero(), |acc, d| {
                if axis.is_horizontal() {
                    Dimension::new(acc.width + d.width, acc.height.max(d.height))
                } else {
                    Dimension::new(acc.width.max(d.width), acc.height + d.height)
                }
            }),
            Self::Grid { rows, cols, hgap, vgap } => {
                let cell = sizes().fold(Dimension::zero(), Dimension::max);
                let (rows, cols) = grid_shape(*rows, *cols, count);
                Dimension::new(
                    cols * cell.width + (cols - 1).max(0) * hgap,
                    rows * cell.height + (rows - 1).max(0) * vgap,
                )
            }
            Self::Border { hgap, vgap } => {
                let region = |name: &str| {
                    children
                        .iter()
                        .filter(|(c, _)| c.is_visible())
                        .find(|(_, k)| match k {
                            Some(Constraint::Name(n)) => n == name,
                            None => name == CENTER,
                            _ => false,
                        })
                        .map(|(c, _)| c.preferred_size())
                };
                let mut width = 0;
                let mut height = 0;
                let middle = [WEST, CENTER, EAST].map(region);
                for d in middle.iter().flatten() {
                    width += d.width;
                    height = height.max(d.height);
                }
                width += (middle.iter().flatten().count() as i32 - 1).max(0) * hgap;
                for d in [NORTH, SOUTH].map(region).iter().flatten() {
                    width = width.max(d.width);
                    height += d.height + vgap;
                }
                Dimension::new(width, height)
            }
        }
    }
}

/// Rows win when both are set; a zero dimension is derived from the count.
fn grid_shape(rows: i32, cols: i32, count: i32) -> (i32, i32) {
    if rows > 0 {
        (rows, ((count + rows - 1) / rows).max(1))
    } else if cols > 0 {
        (((count + cols - 1) / cols).max(1), cols)
    } else {
        (1, count.max(1))
    }
}
