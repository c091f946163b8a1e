//! Template documents for **Trellis**.
//!
//! This crate only knows about markup: it parses XML templates into a small
//! owned tree and loads them by identifier. Turning that tree into live UI
//! objects is the job of the `trellis` crate.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ast`] | `Document`, `Element`, `Node`, `Attribute` |
//! | [`error`] | `ParseError`, `LoadError` |
//! | [`loader`] | `TemplateLoader`, `FsLoader`, `MemoryLoader` |
//! | [`names`] | tag-name to type-name conventions |
//! | [`parser`] | `parse_str` entry point |
//!
//! # Quick start
//!
//! ```rust
//! use trellis_markup::parse_str;
//!
//! let src = r#"
//!     <frame title="Hello" layout="BoxLayout" layout-constructor-args="{contentPane}, BoxLayout.Y_AXIS">
//!         <button id="b1" field="button">Click</button>
//!     </frame>
//! "#;
//!
//! let doc = parse_str(src).unwrap();
//! assert_eq!(doc.root.name, "frame");
//! assert_eq!(doc.root.elements().next().unwrap().text(), Some("Click"));
//! ```

pub mod ast;
pub mod error;
pub mod loader;
pub mod names;
pub mod parser;

pub use ast::{Attribute, Document, Element, Node};
pub use error::{LoadError, ParseError};
pub use loader::{FsLoader, MemoryLoader, TemplateLoader};
pub use parser::parse_str;

#[cfg(test)]
mod parse_tests {
    use super::*;

    fn ok(src: &str) -> Document { parse_str(src).unwrap() }
    fn err(src: &str) { parse_str(src).unwrap_err(); }

    #[test] fn empty_root() { ok("<frame/>"); }
    #[test] fn declaration_and_comments() {
        ok(r#"<?xml version="1.0"?><!-- top --><frame><!-- inside --></frame>"#);
    }
    #[test] fn nested_elements() {
        let doc = ok("<frame><panel><button/><label/></panel></frame>");
        let panel = doc.root.elements().next().unwrap();
        let names: Vec<_> = panel.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["button", "label"]);
    }
    #[test] fn attribute_helpers() {
        let doc = ok(r#"<panel id=" p1 " visible="TRUE" add="no" listeners="a, b(c) ,, d" title="  "/>"#);
        assert_eq!(doc.root.attr("id"), Some("p1"));
        assert_eq!(doc.root.attr_bool("visible"), Some(true));
        assert_eq!(doc.root.attr_bool("add"), Some(false));
        assert_eq!(doc.root.attr_bool("enabled"), None);
        assert_eq!(doc.root.attr_list("listeners"), ["a", "b(c)", "d"]);
        assert_eq!(doc.root.attr("title"), None);
        assert!(doc.root.attr_list("missing").is_empty());
    }
    #[test] fn escaped_attribute() {
        let doc = ok(r#"<label constructor-args="&quot;hi&quot;"/>"#);
        assert_eq!(doc.root.attr("constructor-args"), Some("\"hi\""));
    }
    #[test] fn text_only_for_single_text_child() {
        let doc = ok("<frame><button> OK </button><panel>\n  <label/>\n</panel><label>  </label></frame>");
        let mut kids = doc.root.elements();
        assert_eq!(kids.next().unwrap().text(), Some("OK"));
        assert_eq!(kids.next().unwrap().text(), None);
        assert_eq!(kids.next().unwrap().text(), None);
    }
    #[test] fn display_points_at_node() {
        let doc = ok(r#"<panel id="p"><button>Go</button><label/></panel>"#);
        assert_eq!(
            doc.root.to_string(),
            "<panel id=\"p\">\n    <button>Go</button>\n    <label/>\n</panel>"
        );
    }
    #[test] fn err_unclosed() { err("<frame><panel></frame>"); }
    #[test] fn err_two_roots() { err("<frame/><frame/>"); }
    #[test] fn err_text_outside_root() { err("hello <frame/>"); }
    #[test] fn err_empty() { err("   "); }
    #[test] fn err_position() {
        let e = parse_str("<frame>\n<panel>\n</frame>").unwrap_err();
        assert!(e.line >= 2, "{e}");
    }
}
