use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::xml::Element;

/// Free-form coverage metadata, as a tree mirroring the XML it came from.
///
/// An element becomes:
/// - `Text` if it has neither attributes nor children (empty string if empty);
/// - otherwise a `Map` with one entry per child tag, `@name` entries for its
///   attributes and a `#text` entry for non-blank text. Repeated sibling tags
///   share one entry holding a `List` in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Map(Vec<(String, Node)>),
    List(Vec<Node>),
}

impl Node {
    pub fn from_element(element: &Element) -> Node {
        if element.children().is_empty() && element.attributes().is_empty() {
            return Node::Text(element.text().to_string());
        }

        let mut entries: Vec<(String, Node)> = Vec::new();
        for child in element.children() {
            let node = Node::from_element(child);
            if !repeated(element, child.name()) {
                entries.push((child.name().to_string(), node));
                continue;
            }
            match entries.iter_mut().find(|(k, _)| k == child.name()) {
                Some((_, Node::List(items))) => items.push(node),
                _ => entries.push((child.name().to_string(), Node::List(vec![node]))),
            }
        }
        for (key, value) in element.attributes() {
            entries.push((format!("@{key}"), Node::Text(value.clone())));
        }
        if !element.text().is_empty() {
            entries.push(("#text".to_string(), Node::Text(element.text().to_string())));
        }
        Node::Map(entries)
    }

    /// The contents of a `Metadata` element, always a map.
    pub(crate) fn from_metadata(element: &Element) -> Node {
        match Node::from_element(element) {
            Node::Text(text) if text.is_empty() => Node::Map(Vec::new()),
            Node::Text(text) => Node::Map(vec![("#text".to_string(), Node::Text(text))]),
            node => node,
        }
    }

    /// Entry `key` of a map node.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(String, Node)]> {
        match self {
            Node::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// True for an empty map, list or text.
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Text(text) => text.is_empty(),
            Node::Map(entries) => entries.is_empty(),
            Node::List(items) => items.is_empty(),
        }
    }
}

fn repeated(parent: &Element, name: &str) -> bool {
    parent.children_named(name).nth(1).is_some()
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Text(text) => serializer.serialize_str(text),
            Node::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Node::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}
