use std::fmt;

// ── Attribute ─────────────────────────────────────────────────────────────

/// A single `name="value"` pair on an element. Values are stored unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

// ── Node ──────────────────────────────────────────────────────────────────

/// A child of an element: either a nested element or a run of character data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    /// `true` for text nodes that contain only whitespace.
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Node::Text(t) if t.trim().is_empty())
    }
}

// ── Element ───────────────────────────────────────────────────────────────

/// A template node.
///
/// ```xml
/// <button id="ok" field="okButton" listeners="onOk">OK</button>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name as written: `"button"`, `"text-field"`, `"demo.FancyPanel"`.
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
    /// 1-based line of the opening tag.
    pub line: usize,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), attributes: Vec::new(), children: Vec::new(), line: 0 }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute { name: name.into(), value: value.into() });
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Look up an attribute by name. Whitespace-only values count as absent.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.trim())
            .filter(|v| !v.is_empty())
    }

    /// Boolean attribute: `"true"` (any case) is `true`, any other value is `false`.
    pub fn attr_bool(&self, name: &str) -> Option<bool> {
        self.attr(name).map(|v| v.eq_ignore_ascii_case("true"))
    }

    /// Comma-separated attribute with entries trimmed and empty entries removed.
    pub fn attr_list(&self, name: &str) -> Vec<&str> {
        self.attr(name)
            .map(|v| v.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Display text: present only when the sole child is a non-blank text node.
    pub fn text(&self) -> Option<&str> {
        match self.children.as_slice() {
            [Node::Text(t)] if !t.trim().is_empty() => Some(t.trim()),
            _ => None,
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "    ".repeat(indent);
        write!(f, "{pad}<{}", self.name)?;
        for a in &self.attributes {
            write!(f, " {}=\"{}\"", a.name, a.value)?;
        }
        if let Some(text) = self.text() {
            return write!(f, ">{text}</{}>", self.name);
        }
        if self.elements().next().is_none() {
            return write!(f, "/>");
        }
        writeln!(f, ">")?;
        for child in self.elements() {
            child.write_indented(f, indent + 1)?;
            writeln!(f)?;
        }
        write!(f, "{pad}</{}>", self.name)
    }
}

/// Pretty-prints the element and its element descendants, XML-like. Used in
/// error messages to point at the offending node.
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

// ── Document ──────────────────────────────────────────────────────────────

/// The top-level parse result for a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
}
