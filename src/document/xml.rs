//! Owned XML tree for stroke diagrams.
//!
//! Qualified names are kept verbatim (`kvg:element`, `xlink:href`) and namespace
//! declarations stay ordinary attributes, so a parsed document serializes back
//! with its prefixes intact.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::foundation::error::{KanimateError, KanimateResult};

pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub const KVG_NS: &str = "http://kanjivg.tagaini.net";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Set an attribute, keeping its position if it already exists.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|(k, _)| k == key)?;
        Some(self.attributes.remove(pos).1)
    }

    /// Local part of the element name (`svg:g` -> `g`).
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Descendants with the given local name, in document order.
    pub fn descendants_named<'a>(&'a self, local: &str) -> Vec<&'a Element> {
        let mut out = Vec::new();
        self.collect_named(local, &mut out);
        out
    }

    fn collect_named<'a>(&'a self, local: &str, out: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            if child.local_name() == local {
                out.push(child);
            }
            child.collect_named(local, out);
        }
    }

    /// Whether this element or a descendant uses the namespace `prefix`
    /// in its name or in an attribute name.
    pub fn uses_prefix(&self, prefix: &str) -> bool {
        let qualified = |name: &str| name.split_once(':').is_some_and(|(p, _)| p == prefix);
        qualified(&self.name)
            || self.attributes.iter().any(|(k, _)| qualified(k))
            || self.child_elements().any(|c| c.uses_prefix(prefix))
    }

    /// Depth-first search for the element carrying `id`.
    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|n| match n {
            Node::Element(e) => e.find_by_id_mut(id),
            _ => None,
        })
    }

    /// Concatenated text content of direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|n| match n {
                Node::Text(t) | Node::CData(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// A parsed diagram: optional doctype, leading comments, and the root element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub doctype: Option<String>,
    pub prolog: Vec<Node>,
    pub root: Element,
}

fn xml_err(e: impl std::fmt::Display) -> KanimateError {
    KanimateError::document(format!("malformed xml: {e}"))
}

fn utf8(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn start_to_element(e: &BytesStart<'_>) -> KanimateResult<Element> {
    let mut el = Element::new(utf8(e.name().as_ref()));
    for attr in e.attributes() {
        let attr = attr.map_err(xml_err)?;
        let value = attr.unescape_value().map_err(xml_err)?;
        el.attributes
            .push((utf8(attr.key.as_ref()), value.into_owned()));
    }
    Ok(el)
}

impl Document {
    pub fn parse(xml: &str) -> KanimateResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut doctype = None;
        let mut prolog = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                xml_err(format!("{e} at byte {}", reader.buffer_position()))
            })?;
            let node = match event {
                Event::Start(e) => {
                    stack.push(start_to_element(&e)?);
                    continue;
                }
                Event::End(_) => {
                    let done = stack
                        .pop()
                        .ok_or_else(|| xml_err("unbalanced closing tag"))?;
                    Node::Element(done)
                }
                Event::Empty(e) => Node::Element(start_to_element(&e)?),
                Event::Text(e) => Node::Text(e.unescape().map_err(xml_err)?.into_owned()),
                Event::CData(e) => Node::CData(utf8(&e.into_inner())),
                Event::Comment(e) => Node::Comment(utf8(&e)),
                Event::DocType(e) => {
                    doctype = Some(utf8(&e));
                    continue;
                }
                Event::Decl(_) | Event::PI(_) => continue,
                Event::Eof => break,
            };

            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => match node {
                    Node::Element(el) if root.is_none() => root = Some(el),
                    Node::Element(_) => return Err(xml_err("multiple root elements")),
                    Node::Comment(c) if root.is_none() => prolog.push(Node::Comment(c)),
                    _ => {}
                },
            }
        }

        if !stack.is_empty() {
            return Err(xml_err("unexpected end of document"));
        }
        let root = root.ok_or_else(|| xml_err("document has no root element"))?;
        Ok(Self {
            doctype,
            prolog,
            root,
        })
    }

    /// Serialize with an XML declaration and two-space indentation.
    pub fn to_xml_string(&self) -> KanimateResult<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_err)?;
        if let Some(doctype) = &self.doctype {
            writer
                .write_event(Event::DocType(BytesText::from_escaped(doctype.as_str())))
                .map_err(xml_err)?;
        }
        for node in &self.prolog {
            write_node(&mut writer, node)?;
        }
        write_element(&mut writer, &self.root)?;

        let mut out = String::from_utf8(writer.into_inner()).map_err(xml_err)?;
        out.push('\n');
        Ok(out)
    }
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> KanimateResult<()> {
    let event = match node {
        Node::Element(el) => return write_element(writer, el),
        Node::Text(t) => Event::Text(BytesText::new(t)),
        Node::CData(t) => Event::CData(BytesCData::new(t.as_str())),
        Node::Comment(c) => Event::Comment(BytesText::from_escaped(c.as_str())),
    };
    writer.write_event(event).map_err(xml_err)
}

fn write_element(writer: &mut Writer<Vec<u8>>, el: &Element) -> KanimateResult<()> {
    let mut start = BytesStart::new(el.name.as_str());
    for (k, v) in &el.attributes {
        start.push_attribute((k.as_str(), v.as_str()));
    }
    if el.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(xml_err);
    }
    writer.write_event(Event::Start(start)).map_err(xml_err)?;
    for child in &el.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(el.name.as_str())))
        .map_err(xml_err)
}

#[cfg(test)]
#[path = "../../tests/unit/document/xml.rs"]
mod tests;
