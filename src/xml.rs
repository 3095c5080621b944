//! A minimal owned XML element tree.
//!
//! WCS documents are small enough to hold in memory, and the parsers want to
//! navigate them (first child, children by name, attributes) rather than react
//! to a stream of events. This module folds the `quick-xml` event stream into
//! [`Element`]s. Namespace prefixes are dropped: elements and attributes are
//! addressed by their local name only, so `ows:BoundingBox` is `BoundingBox`.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Result, WcsError};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    /// Parses a complete document and returns its root element.
    pub fn parse(bytes: &[u8]) -> Result<Element> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut open: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => open.push(Element::from_start(&e)?),
                Event::Empty(e) => {
                    let element = Element::from_start(&e)?;
                    close(&mut open, &mut root, element);
                }
                Event::End(_) => {
                    if let Some(element) = open.pop() {
                        close(&mut open, &mut root, element);
                    }
                }
                Event::Text(t) => {
                    if let Some(current) = open.last_mut() {
                        current.text.push_str(&t.unescape()?);
                    }
                }
                Event::CData(c) => {
                    if let Some(current) = open.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        root.ok_or_else(|| WcsError::missing("root element", "document"))
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Element> {
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            // xmlns / xmlns:prefix declarations are not data.
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(Element {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    /// Local tag name, without namespace prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text content of this element (not of its descendants), trimmed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Attributes in document order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn first_child(&self) -> Option<&Element> {
        self.children.first()
    }

    /// First direct child called `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children called `name`, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// All elements called `name` below this one, depth first, in document order.
    pub fn descendants<'a>(&'a self, name: &str) -> std::vec::IntoIter<&'a Element> {
        let mut found = Vec::new();
        collect_descendants(self, name, &mut found);
        found.into_iter()
    }

    /// Like [`Element::child`], but a missing child is an error.
    pub fn require_child(&self, name: &str) -> Result<&Element> {
        self.child(name)
            .ok_or_else(|| WcsError::missing(name, self.name.as_str()))
    }

    /// Like [`Element::attr`], but a missing attribute is an error.
    pub fn require_attr(&self, name: &str) -> Result<&str> {
        self.attr(name)
            .ok_or_else(|| WcsError::missing(format!("@{name}"), self.name.as_str()))
    }
}

fn close(open: &mut [Element], root: &mut Option<Element>, element: Element) {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn collect_descendants<'a>(element: &'a Element, name: &str, found: &mut Vec<&'a Element>) {
    for child in &element.children {
        if child.name == name {
            found.push(child);
        }
        collect_descendants(child, name, found);
    }
}
