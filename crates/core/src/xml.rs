//! Minimal XML element tree
//!
//! `quick-xml` only hands out a stream of events. The Dealmap responses are
//! small, and the transformations need "every `<Deal>` anywhere in the
//! document" plus "the full text of this element", so the events are folded
//! into an owned tree first.
//!
//! Element names are stored without their namespace prefix. The API puts its
//! payload in a default namespace, and lookups are always by local name.

use crate::error::ParseError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    children: Vec<Node>,
}

/// A parsed, well-formed XML document with exactly one root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parse `input`, rejecting anything that is not well-formed.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let mut reader = Reader::from_str(input);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(start)) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(malformed("more than one root element"));
                    }
                    stack.push(Element::new(local_name(&start)?));
                }
                Ok(Event::Empty(start)) => {
                    let element = Element::new(local_name(&start)?);
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| malformed("closing tag without a matching opening tag"))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(text)) => {
                    let text = text
                        .unescape()
                        .map_err(|e| ParseError::MalformedXml(e.to_string()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Text(text.into_owned())),
                        None if text.trim().is_empty() => {}
                        None => return Err(malformed("text outside the root element")),
                    }
                }
                Ok(Event::CData(cdata)) => {
                    let text = std::str::from_utf8(&cdata)
                        .map_err(|e| ParseError::MalformedXml(e.to_string()))?
                        .to_string();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Text(text)),
                        None => return Err(malformed("CDATA outside the root element")),
                    }
                }
                Ok(Event::Eof) => break,
                // Declarations, comments, processing instructions, doctype
                Ok(_) => {}
                Err(e) => return Err(ParseError::MalformedXml(e.to_string())),
            }
        }

        if let Some(open) = stack.last() {
            return Err(ParseError::MalformedXml(format!(
                "unclosed element <{}>",
                open.name
            )));
        }

        root.map(|root| Document { root })
            .ok_or_else(|| malformed("document has no root element"))
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Every element named `name`, in document order.
    pub fn descendants<'a>(&'a self, name: &'a str) -> Descendants<'a> {
        self.root.descendants(name)
    }

    /// First element named `name`, in document order.
    pub fn find<'a>(&'a self, name: &'a str) -> Option<&'a Element> {
        self.descendants(name).next()
    }
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Immediate child elements; text between them is skipped.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// This element (if it matches) and every matching element below it, pre-order.
    pub fn descendants<'a>(&'a self, name: &'a str) -> Descendants<'a> {
        Descendants {
            name,
            stack: vec![self],
        }
    }

    /// Concatenated text of every text node below this element, untrimmed.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

/// Pre-order iterator over elements with a given local name.
pub struct Descendants<'a> {
    name: &'a str,
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(element) = self.stack.pop() {
            self.stack.extend(element.child_elements().collect::<Vec<_>>().into_iter().rev());
            if element.name == self.name {
                return Some(element);
            }
        }
        None
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(element, out),
        }
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_some() => return Err(malformed("more than one root element")),
        None => *root = Some(element),
    }
    Ok(())
}

fn local_name(start: &BytesStart<'_>) -> Result<String, ParseError> {
    let name = start.local_name();
    std::str::from_utf8(name.as_ref())
        .map(str::to_string)
        .map_err(|e| ParseError::MalformedXml(e.to_string()))
}

fn malformed(reason: &str) -> ParseError {
    ParseError::MalformedXml(reason.to_string())
}
