//! Minimal namespace-aware element tree over quick-xml, with lookups that
//! accept an ordered list of tag candidates.

use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use crate::error::{TaricError, TaricResult};
use crate::protocol::SERVICE_NS;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub namespace: Option<String>,
    pub name: String,
    pub text: String,
    pub children: Vec<Element>,
}

/// One way a tag may appear in a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag<'a> {
    Qualified(&'a str, &'a str),
    Bare(&'a str),
}

impl Tag<'_> {
    pub fn matches(&self, el: &Element) -> bool {
        match *self {
            Tag::Qualified(ns, name) => el.namespace.as_deref() == Some(ns) && el.name == name,
            Tag::Bare(name) => el.namespace.is_none() && el.name == name,
        }
    }
}

/// Service-namespaced form first, bare form second.
pub fn field(name: &str) -> [Tag<'_>; 2] {
    [Tag::Qualified(SERVICE_NS, name), Tag::Bare(name)]
}

impl Element {
    pub fn find(&self, tags: &[Tag]) -> Option<&Element> {
        tags.iter()
            .find_map(|tag| self.children.iter().find(|c| tag.matches(c)))
    }

    pub fn find_descendant(&self, tags: &[Tag]) -> Option<&Element> {
        tags.iter().find_map(|tag| self.descendant(tag))
    }

    fn descendant(&self, tag: &Tag) -> Option<&Element> {
        for child in &self.children {
            if tag.matches(child) {
                return Some(child);
            }
            if let Some(found) = child.descendant(tag) {
                return Some(found);
            }
        }
        None
    }

    pub fn children_matching(&self, tags: &[Tag]) -> Vec<&Element> {
        self.children
            .iter()
            .filter(|c| tags.iter().any(|t| t.matches(c)))
            .collect()
    }

    /// Trimmed text of the first matching child, empty when absent.
    pub fn child_text(&self, tags: &[Tag]) -> String {
        self.find(tags)
            .map(|c| c.text.trim().to_string())
            .unwrap_or_default()
    }
}

fn utf8(bytes: &[u8]) -> TaricResult<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| TaricError::MalformedResponse(e.to_string()))
}

fn multiple_roots() -> TaricError {
    TaricError::MalformedResponse("multiple root elements".into())
}

pub fn parse_document(xml: &str) -> TaricResult<Element> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let (resolved, event) = reader.read_resolved_event()?;
        let namespace = match resolved {
            ResolveResult::Bound(ns) => Some(utf8(ns.as_ref())?),
            _ => None,
        };

        match event {
            Event::Start(e) => {
                stack.push(Element {
                    namespace,
                    name: utf8(e.local_name().as_ref())?,
                    ..Element::default()
                });
            }
            Event::Empty(e) => {
                let el = Element {
                    namespace,
                    name: utf8(e.local_name().as_ref())?,
                    ..Element::default()
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(el),
                    None if root.is_none() => root = Some(el),
                    None => return Err(multiple_roots()),
                }
            }
            Event::Text(t) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&t.unescape()?);
                }
            }
            Event::CData(c) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&utf8(&c.into_inner())?);
                }
            }
            Event::End(_) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| TaricError::MalformedResponse("unexpected closing tag".into()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(el),
                    None if root.is_none() => root = Some(el),
                    None => return Err(multiple_roots()),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(TaricError::MalformedResponse(format!(
            "unclosed element <{}>",
            stack.last().map(|e| e.name.as_str()).unwrap_or_default()
        )));
    }

    root.ok_or_else(|| TaricError::MalformedResponse("empty document".into()))
}
