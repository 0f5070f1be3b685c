//! Minimal document tree the page components render into.
//!
//! Only what the carousel and game directory need: elements with ordered
//! attributes, text nodes, a small selector language (`#id`, `.class`,
//! `tag`, compounds such as `div.swiper-slide`, and descendant chains), and
//! HTML serialization. Strings are stored raw and escaped on output, so
//! server-supplied values can never break out of an attribute or inject
//! markup.

use std::fmt::{self, Write as _};

use html_escape::{encode_double_quoted_attribute, encode_text};
use thiserror::Error;

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &["img", "br", "hr", "input", "meta", "link"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("empty selector")]
    EmptySelector,
    #[error("unsupported selector '{0}'")]
    UnsupportedSelector(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn with_attr(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_attr("id", id)
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Sets `name`, keeping its original position when it already exists.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let joined = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {class}", existing.trim())
            }
            _ => class.to_string(),
        };
        self.set_attr("class", joined);
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn push_child(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }

    /// First descendant (or self) matching `selector`, in document order.
    pub fn find(&self, selector: &Selector) -> Option<&Element> {
        let path = self.find_path(selector)?;
        let mut current = self;
        for index in path {
            current = current.children[index].as_element()?;
        }
        Some(current)
    }

    pub fn find_mut(&mut self, selector: &Selector) -> Option<&mut Element> {
        let path = self.find_path(selector)?;
        let mut current = self;
        for index in path {
            current = match &mut current.children[index] {
                Node::Element(element) => element,
                Node::Text(_) => return None,
            };
        }
        Some(current)
    }

    /// All descendants (and self) matching `selector`, in document order.
    pub fn find_all<'a>(&'a self, selector: &Selector) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_matches(&selector.parts, 0, &mut found);
        found
    }

    fn find_path(&self, selector: &Selector) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        self.search(&selector.parts, 0, &mut path).then_some(path)
    }

    // Descendant chains are matched greedily: an ancestor satisfying the next
    // pending compound always consumes it.
    fn search(&self, parts: &[Compound], matched: usize, path: &mut Vec<usize>) -> bool {
        let last = parts.len() - 1;
        if matched == last && parts[last].matches(self) {
            return true;
        }
        let matched = if matched < last && parts[matched].matches(self) {
            matched + 1
        } else {
            matched
        };
        for (index, child) in self.children.iter().enumerate() {
            if let Node::Element(element) = child {
                path.push(index);
                if element.search(parts, matched, path) {
                    return true;
                }
                path.pop();
            }
        }
        false
    }

    fn collect_matches<'a>(
        &'a self,
        parts: &[Compound],
        matched: usize,
        found: &mut Vec<&'a Element>,
    ) {
        let last = parts.len() - 1;
        if matched == last && parts[last].matches(self) {
            found.push(self);
        }
        let matched = if matched < last && parts[matched].matches(self) {
            matched + 1
        } else {
            matched
        };
        for element in self.child_elements() {
            element.collect_matches(parts, matched, found);
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) -> fmt::Result {
        write!(out, "<{}", self.tag)?;
        for (name, value) in &self.attributes {
            write!(out, " {}=\"{}\"", name, encode_double_quoted_attribute(value))?;
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return Ok(());
        }
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(&encode_text(text)),
                Node::Element(element) => element.write_html(out)?,
            }
        }
        write!(out, "</{}>", self.tag)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

/// One compound selector: optional tag, optional id, any number of classes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn parse(raw: &str) -> Result<Self, DomError> {
        let unsupported = || DomError::UnsupportedSelector(raw.to_string());
        let mut compound = Compound::default();
        let mut rest = raw;

        let tag_end = rest.find(['#', '.']).unwrap_or(rest.len());
        if tag_end > 0 {
            compound.tag = Some(rest[..tag_end].to_ascii_lowercase());
        }
        rest = &rest[tag_end..];

        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let end = body.find(['#', '.']).unwrap_or(body.len());
            let name = &body[..end];
            if name.is_empty() || !name.chars().all(is_name_char) {
                return Err(unsupported());
            }
            match marker {
                '#' if compound.id.is_none() => compound.id = Some(name.to_string()),
                '.' => compound.classes.push(name.to_string()),
                _ => return Err(unsupported()),
            }
            rest = &body[end..];
        }

        if let Some(tag) = &compound.tag
            && !tag.chars().all(is_name_char)
        {
            return Err(unsupported());
        }
        Ok(compound)
    }

    fn matches(&self, element: &Element) -> bool {
        self.tag.as_deref().is_none_or(|tag| element.tag.eq_ignore_ascii_case(tag))
            && self.id.as_deref().is_none_or(|id| element.id() == Some(id))
            && self.classes.iter().all(|class| element.has_class(class))
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Parsed selector: compounds joined by descendant combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    parts: Vec<Compound>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, DomError> {
        let parts = source
            .split_whitespace()
            .map(Compound::parse)
            .collect::<Result<Vec<_>, _>>()?;
        if parts.is_empty() {
            return Err(DomError::EmptySelector);
        }
        Ok(Self {
            source: source.trim().to_string(),
            parts,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// `self` followed by a descendant matching `other`.
    pub fn descendant(&self, other: &Selector) -> Selector {
        let mut parts = self.parts.clone();
        parts.extend(other.parts.iter().cloned());
        Selector {
            source: format!("{} {}", self.source, other.source),
            parts,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// A page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    body: Element,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            body: Element::new("body"),
        }
    }

    pub fn from_body(body: Element) -> Self {
        Self { body }
    }

    /// Page skeleton for a banner carousel rooted at `#anchor_id`, with
    /// `default_slides` placed in its wrapper.
    pub fn carousel_shell(anchor_id: &str, default_slides: Vec<Element>) -> Self {
        let mut wrapper = Element::new("div").with_class(crate::render::WRAPPER_CLASS);
        for slide in default_slides {
            wrapper.push_child(slide);
        }
        let root = Element::new("div")
            .with_id(anchor_id)
            .with_class("swiper")
            .with_child(wrapper)
            .with_child(Element::new("div").with_class("swiper-pagination"))
            .with_child(Element::new("div").with_class("swiper-button-prev"))
            .with_child(Element::new("div").with_class("swiper-button-next"));
        Self::from_body(Element::new("body").with_child(root))
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Element {
        &mut self.body
    }

    pub fn find(&self, selector: &Selector) -> Option<&Element> {
        self.body.find(selector)
    }

    pub fn find_mut(&mut self, selector: &Selector) -> Option<&mut Element> {
        self.body.find_mut(selector)
    }

    pub fn query(&self, selector: &str) -> Result<Option<&Element>, DomError> {
        Ok(self.find(&Selector::parse(selector)?))
    }

    pub fn query_all(&self, selector: &str) -> Result<Vec<&Element>, DomError> {
        Ok(self.body.find_all(&Selector::parse(selector)?))
    }

    pub fn to_html(&self) -> String {
        self.body.to_html()
    }
}
