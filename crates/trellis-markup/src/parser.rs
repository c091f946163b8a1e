use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::ast::{Attribute, Document, Element, Node};
use crate::error::ParseError;

// ── Parser ────────────────────────────────────────────────────────────────

/// Builds a [`Document`] from the `quick-xml` event stream.
///
/// Comments, processing instructions, and the XML declaration are dropped.
/// Adjacent text and CDATA runs are merged into a single [`Node::Text`].
pub struct Parser<'s> {
    src: &'s str,
    reader: Reader<&'s [u8]>,
    stack: Vec<Element>,
    root: Option<Element>,
}

impl<'s> Parser<'s> {
    pub fn new(src: &'s str) -> Self {
        let mut reader = Reader::from_str(src);
        reader.config_mut().trim_text(false);
        Self { src, reader, stack: Vec::new(), root: None }
    }

    fn err_at(&self, msg: impl Into<String>, pos: usize) -> ParseError {
        let (line, col) = line_col(self.src, pos);
        ParseError::new(msg, line, col)
    }

    fn position(&self) -> usize {
        self.reader.buffer_position() as usize
    }

    // ── Document ──────────────────────────────────────────────────────────

    pub fn parse_document(mut self) -> Result<Document, ParseError> {
        loop {
            let pos = self.position();
            let event = match self.reader.read_event() {
                Ok(ev) => ev,
                Err(e) => return Err(self.err_at(e.to_string(), self.position())),
            };
            match event {
                Event::Start(start) => {
                    let element = self.open(&start, pos)?;
                    self.stack.push(element);
                }
                Event::Empty(start) => {
                    let element = self.open(&start, pos)?;
                    self.close(element, pos)?;
                }
                Event::End(_) => match self.stack.pop() {
                    Some(element) => self.close(element, pos)?,
                    None => return Err(self.err_at("closing tag without an open element", pos)),
                },
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| self.err_at(e.to_string(), pos))?
                        .into_owned();
                    self.text(text, pos)?;
                }
                Event::CData(data) => {
                    let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    self.text(text, pos)?;
                }
                Event::Eof => break,
                // Declarations, comments, PIs, doctypes.
                _ => {}
            }
        }

        if let Some(open) = self.stack.last() {
            return Err(self.err_at(format!("unclosed element <{}>", open.name), self.src.len()));
        }
        match self.root {
            Some(root) => Ok(Document { root }),
            None => Err(self.err_at("no root element", 0)),
        }
    }

    // ── Elements ──────────────────────────────────────────────────────────

    fn open(&self, start: &BytesStart<'_>, pos: usize) -> Result<Element, ParseError> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| self.err_at(format!("tag name is not UTF-8: {e}"), pos))?
            .to_string();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| self.err_at(e.to_string(), pos))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| self.err_at(format!("attribute name is not UTF-8: {e}"), pos))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| self.err_at(e.to_string(), pos))?
                .into_owned();
            attributes.push(Attribute { name: key, value });
        }

        let (line, _) = line_col(self.src, pos);
        Ok(Element { name, attributes, children: Vec::new(), line })
    }

    fn close(&mut self, element: Element, pos: usize) -> Result<(), ParseError> {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(Node::Element(element));
            Ok(())
        } else if self.root.is_some() {
            Err(self.err_at(format!("second root element <{}>", element.name), pos))
        } else {
            self.root = Some(element);
            Ok(())
        }
    }

    fn text(&mut self, text: String, pos: usize) -> Result<(), ParseError> {
        let Some(parent) = self.stack.last_mut() else {
            if text.trim().is_empty() {
                return Ok(());
            }
            return Err(self.err_at("text outside of the root element", pos));
        };
        match parent.children.last_mut() {
            Some(Node::Text(prev)) => prev.push_str(&text),
            _ => parent.children.push(Node::Text(text)),
        }
        Ok(())
    }
}

/// 1-based (line, column) for a byte offset into `src`.
fn line_col(src: &str, pos: usize) -> (usize, usize) {
    let pos = pos.min(src.len());
    let before = &src.as_bytes()[..pos];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let col = match before.iter().rposition(|&b| b == b'\n') {
        Some(nl) => pos - nl,
        None => pos + 1,
    };
    (line, col)
}

// ── Public parse entry point ──────────────────────────────────────────────

/// Parse an XML template source string into a [`Document`].
pub fn parse_str(src: &str) -> Result<Document, ParseError> {
    Parser::new(src).parse_document()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_counts_from_one() {
        assert_eq!(line_col("abc", 0), (1, 1));
        assert_eq!(line_col("ab\ncd", 3), (2, 1));
        assert_eq!(line_col("ab\ncd", 4), (2, 2));
    }

    #[test]
    fn records_opening_line() {
        let doc = parse_str("<frame>\n  <panel/>\n</frame>").unwrap();
        assert_eq!(doc.root.line, 1);
        assert_eq!(doc.root.elements().next().unwrap().line, 2);
    }

    #[test]
    fn merges_text_and_cdata() {
        let doc = parse_str("<label>a &amp; <![CDATA[<b>]]></label>").unwrap();
        assert_eq!(doc.root.text(), Some("a & <b>"));
    }
}
