//! HTML parser – converts an HTML string into an owned DOM tree.
//!
//! Parsing is delegated to html5ever. A small [`TreeSink`] collects nodes in
//! an index arena while the tree builder runs (it needs to move nodes around
//! for misnested markup), and the arena is then folded into the owned
//! [`DomNode`] tree the rest of the pipeline mutates.

use std::cell::RefCell;

use html5ever::interface::ElemName;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{parse_document, LocalName, Namespace, ParseOpts, QualName};

// ---------------------------------------------------------------------------
// DOM types
// ---------------------------------------------------------------------------

/// A node in our DOM tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomNode {
    Element(ElementNode),
    Text(String),
    Comment(String),
    Doctype(String),
}

/// A single `name="value"` pair. Order within an element is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// An element node carrying its tag name, attributes, and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    /// Local tag name as produced by the parser (`div`, `td`, `foreignObject`).
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<DomNode>,
}

impl ElementNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing the value in place if it already exists.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                value,
            }),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(idx).value)
    }

    pub fn classes(&self) -> Vec<&str> {
        self.attr("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn inline_style(&self) -> Option<&str> {
        self.attr("style")
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(nodes: &[DomNode], out: &mut String) {
    for node in nodes {
        match node {
            DomNode::Text(t) => out.push_str(t),
            DomNode::Element(e) => collect_text(&e.children, out),
            _ => {}
        }
    }
}

/// A parsed document: the top-level nodes (doctype, comments, `<html>`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub children: Vec<DomNode>,
}

impl Document {
    /// Visit every element in document order (pre-order, parents first).
    pub fn for_each_element_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut ElementNode),
    {
        visit_elements_mut(&mut self.children, &mut f);
    }

    /// Visit every element in document order.
    pub fn for_each_element<'a, F>(&'a self, mut f: F)
    where
        F: FnMut(&'a ElementNode),
    {
        visit_elements(&self.children, &mut f);
    }

    /// First element with the given tag name, in document order.
    pub fn find_element(&self, name: &str) -> Option<&ElementNode> {
        find_in(&self.children, name)
    }

    pub fn find_element_mut(&mut self, name: &str) -> Option<&mut ElementNode> {
        find_in_mut(&mut self.children, name)
    }

    /// Append a node as the last child of `<head>`, creating `<head>` if the
    /// document has none.
    pub fn append_to_head(&mut self, node: DomNode) {
        if self.find_element("head").is_none() {
            let head = DomNode::Element(ElementNode::new("head"));
            match self.find_element_mut("html") {
                Some(html) => html.children.insert(0, head),
                None => self.children.insert(0, head),
            }
        }
        match self.find_element_mut("head") {
            Some(head) => head.children.push(node),
            None => self.children.push(node),
        }
    }
}

fn visit_elements_mut<F>(nodes: &mut [DomNode], f: &mut F)
where
    F: FnMut(&mut ElementNode),
{
    for node in nodes {
        if let DomNode::Element(e) = node {
            f(e);
            visit_elements_mut(&mut e.children, f);
        }
    }
}

fn visit_elements<'a, F>(nodes: &'a [DomNode], f: &mut F)
where
    F: FnMut(&'a ElementNode),
{
    for node in nodes {
        if let DomNode::Element(e) = node {
            f(e);
            visit_elements(&e.children, f);
        }
    }
}

fn find_in<'a>(nodes: &'a [DomNode], name: &str) -> Option<&'a ElementNode> {
    for node in nodes {
        if let DomNode::Element(e) = node {
            if e.name == name {
                return Some(e);
            }
            if let Some(found) = find_in(&e.children, name) {
                return Some(found);
            }
        }
    }
    None
}

fn find_in_mut<'a>(nodes: &'a mut [DomNode], name: &str) -> Option<&'a mut ElementNode> {
    for node in nodes.iter_mut() {
        if let DomNode::Element(e) = node {
            if e.name == name {
                return Some(e);
            }
            if let Some(found) = find_in_mut(&mut e.children, name) {
                return Some(found);
            }
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Parser – html5ever tree sink over an index arena
// ---------------------------------------------------------------------------

/// Parse an HTML string into a [`Document`].
///
/// Parse errors are ignored, matching browser leniency. html5ever always
/// synthesizes `<html>`, `<head>` and `<body>` when they are missing.
pub fn parse_html(html: &str) -> Document {
    let sink = parse_document(ArenaSink::default(), ParseOpts::default()).one(html);
    sink.into_document()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(usize);

#[derive(Debug)]
enum SinkData {
    Document,
    Element { name: QualName, attrs: Vec<Attribute> },
    Text(String),
    Comment(String),
    Doctype(String),
}

#[derive(Debug)]
struct SinkNode {
    data: SinkData,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Element name handed back to the tree builder.
#[derive(Debug)]
struct SinkName(QualName);

impl ElemName for SinkName {
    fn ns(&self) -> &Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

/// TreeSink that records nodes in a flat arena.
///
/// html5ever's TreeSink takes `&self`, so the arena sits behind a RefCell.
struct ArenaSink {
    nodes: RefCell<Vec<SinkNode>>,
}

impl Default for ArenaSink {
    fn default() -> Self {
        Self {
            nodes: RefCell::new(vec![SinkNode {
                data: SinkData::Document,
                parent: None,
                children: Vec::new(),
            }]),
        }
    }
}

impl ArenaSink {
    fn push(&self, data: SinkData) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(SinkNode {
            data,
            parent: None,
            children: Vec::new(),
        });
        NodeId(nodes.len() - 1)
    }

    fn detach(nodes: &mut [SinkNode], id: usize) {
        if let Some(parent) = nodes[id].parent.take() {
            nodes[parent].children.retain(|&c| c != id);
        }
    }

    fn append_child(nodes: &mut Vec<SinkNode>, parent: usize, child: NodeOrText<NodeId>) {
        match child {
            NodeOrText::AppendNode(NodeId(id)) => {
                Self::detach(nodes, id);
                nodes[id].parent = Some(parent);
                nodes[parent].children.push(id);
            }
            NodeOrText::AppendText(text) => {
                if let Some(&last) = nodes[parent].children.last() {
                    if let SinkData::Text(existing) = &mut nodes[last].data {
                        existing.push_str(&text);
                        return;
                    }
                }
                push_child(nodes, parent, SinkData::Text(text.to_string()));
            }
        }
    }

    /// Fold the arena into the owned tree.
    fn into_document(self) -> Document {
        let nodes = self.nodes.into_inner();
        Document {
            children: nodes[0]
                .children
                .iter()
                .filter_map(|&id| build_node(&nodes, id))
                .collect(),
        }
    }
}

fn push_child(nodes: &mut Vec<SinkNode>, parent: usize, data: SinkData) {
    nodes.push(SinkNode {
        data,
        parent: Some(parent),
        children: Vec::new(),
    });
    let id = nodes.len() - 1;
    nodes[parent].children.push(id);
}

fn build_node(nodes: &[SinkNode], id: usize) -> Option<DomNode> {
    let node = &nodes[id];
    match &node.data {
        SinkData::Document => None,
        SinkData::Text(t) => Some(DomNode::Text(t.clone())),
        SinkData::Comment(c) => Some(DomNode::Comment(c.clone())),
        SinkData::Doctype(d) => Some(DomNode::Doctype(d.clone())),
        SinkData::Element { name, attrs } => Some(DomNode::Element(ElementNode {
            name: name.local.to_string(),
            attributes: attrs.clone(),
            children: node
                .children
                .iter()
                .filter_map(|&c| build_node(nodes, c))
                .collect(),
        })),
    }
}

fn attribute_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{}:{}", prefix, name.local),
        None => name.local.to_string(),
    }
}

impl TreeSink for ArenaSink {
    type Handle = NodeId;
    type Output = Self;
    type ElemName<'a>
        = SinkName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self
    }

    fn parse_error(&self, msg: std::borrow::Cow<'static, str>) {
        log::trace!("html parse error: {msg}");
    }

    fn get_document(&self) -> Self::Handle {
        NodeId(0)
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        match &self.nodes.borrow()[target.0].data {
            SinkData::Element { name, .. } => SinkName(name.clone()),
            _ => SinkName(QualName::new(None, Namespace::from(""), LocalName::from(""))),
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<html5ever::Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attrs = attrs
            .into_iter()
            .map(|a| Attribute {
                name: attribute_name(&a.name),
                value: a.value.to_string(),
            })
            .collect();
        self.push(SinkData::Element { name, attrs })
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.push(SinkData::Comment(text.to_string()))
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        self.push(SinkData::Comment(String::new()))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let mut nodes = self.nodes.borrow_mut();
        Self::append_child(&mut nodes, parent.0, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.nodes.borrow()[element.0].parent.is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        let mut nodes = self.nodes.borrow_mut();
        push_child(&mut nodes, 0, SinkData::Doctype(name.to_string()));
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut nodes = self.nodes.borrow_mut();
        let Some(parent) = nodes[sibling.0].parent else {
            return;
        };
        let Some(pos) = nodes[parent].children.iter().position(|&c| c == sibling.0) else {
            return;
        };
        match new_node {
            NodeOrText::AppendNode(NodeId(id)) => {
                Self::detach(&mut nodes, id);
                // Detaching may have shifted the sibling if both share a parent.
                let pos = nodes[parent]
                    .children
                    .iter()
                    .position(|&c| c == sibling.0)
                    .unwrap_or(pos);
                nodes[id].parent = Some(parent);
                nodes[parent].children.insert(pos, id);
            }
            NodeOrText::AppendText(text) => {
                if pos > 0 {
                    let prev = nodes[parent].children[pos - 1];
                    if let SinkData::Text(existing) = &mut nodes[prev].data {
                        existing.push_str(&text);
                        return;
                    }
                }
                nodes.push(SinkNode {
                    data: SinkData::Text(text.to_string()),
                    parent: Some(parent),
                    children: Vec::new(),
                });
                let id = nodes.len() - 1;
                nodes[parent].children.insert(pos, id);
            }
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<html5ever::Attribute>) {
        let mut nodes = self.nodes.borrow_mut();
        if let SinkData::Element {
            attrs: existing, ..
        } = &mut nodes[target.0].data
        {
            for attr in attrs {
                let name = attribute_name(&attr.name);
                if !existing.iter().any(|a| a.name == name) {
                    existing.push(Attribute {
                        name,
                        value: attr.value.to_string(),
                    });
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        let mut nodes = self.nodes.borrow_mut();
        Self::detach(&mut nodes, target.0);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut nodes = self.nodes.borrow_mut();
        let children = std::mem::take(&mut nodes[node.0].children);
        for child in children {
            nodes[child].parent = Some(new_parent.0);
            nodes[new_parent.0].children.push(child);
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience helpers
// ---------------------------------------------------------------------------

/// Return the children of `<body>`, or an empty slice if there is none.
pub fn body_children(doc: &Document) -> &[DomNode] {
    doc.find_element("body")
        .map(|b| b.children.as_slice())
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_body_element(doc: &Document) -> &ElementNode {
        body_children(doc)
            .iter()
            .find_map(|n| match n {
                DomNode::Element(e) => Some(e),
                _ => None,
            })
            .expect("body should contain an element")
    }

    #[test]
    fn parse_simple_div() {
        let doc = parse_html(r#"<div class="flex p-4"><p>Hello</p></div>"#);
        let div = first_body_element(&doc);
        assert_eq!(div.name, "div");
        assert_eq!(div.classes(), vec!["flex", "p-4"]);
        assert_eq!(div.children.len(), 1);
    }

    #[test]
    fn parse_synthesizes_head_and_body() {
        let doc = parse_html("<p>Hi</p>");
        assert!(doc.find_element("html").is_some());
        assert!(doc.find_element("head").is_some());
        assert!(doc.find_element("body").is_some());
    }

    #[test]
    fn parse_keeps_doctype_and_comments() {
        let doc = parse_html("<!DOCTYPE html><html><body><!-- note --><p>x</p></body></html>");
        assert_eq!(doc.children[0], DomNode::Doctype("html".to_string()));
        let body = doc.find_element("body").unwrap();
        assert_eq!(body.children[0], DomNode::Comment(" note ".to_string()));
    }

    #[test]
    fn parse_void_elements_have_no_children() {
        let doc = parse_html(r#"<p>a<br>b<img src="x.png">c</p>"#);
        let p = first_body_element(&doc);
        assert_eq!(p.children.len(), 5);
        assert_eq!(p.text_content(), "abc");
    }

    #[test]
    fn attribute_order_is_preserved() {
        let doc = parse_html(r#"<span id="a" style="color:red" title="t">x</span>"#);
        let span = doc.find_element("span").unwrap();
        let names: Vec<&str> = span.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["id", "style", "title"]);
        assert_eq!(span.inline_style(), Some("color:red"));
    }

    #[test]
    fn misnested_markup_is_repaired() {
        let doc = parse_html("<b>one<i>two</b>three</i>");
        let body = doc.find_element("body").unwrap();
        assert_eq!(body.text_content(), "onetwothree");
    }

    #[test]
    fn table_text_is_foster_parented() {
        let doc = parse_html("<table>stray<tr><td>cell</td></tr></table>");
        let body = doc.find_element("body").unwrap();
        assert!(matches!(&body.children[0], DomNode::Text(t) if t == "stray"));
        assert!(doc.find_element("td").is_some());
    }

    #[test]
    fn set_and_remove_attributes() {
        let mut el = ElementNode::new("div");
        el.set_attr("style", "color:red");
        el.set_attr("class", "x");
        el.set_attr("style", "color:blue");
        assert_eq!(el.attributes.len(), 2);
        assert_eq!(el.inline_style(), Some("color:blue"));
        assert_eq!(el.remove_attr("style"), Some("color:blue".to_string()));
        assert_eq!(el.remove_attr("style"), None);
        assert_eq!(el.attr("class"), Some("x"));
    }

    #[test]
    fn append_to_head_creates_head_when_missing() {
        let mut doc = Document {
            children: vec![DomNode::Element(ElementNode::new("html"))],
        };
        doc.append_to_head(DomNode::Text("x".into()));
        let head = doc.find_element("head").unwrap();
        assert_eq!(head.children, vec![DomNode::Text("x".into())]);
    }

    #[test]
    fn elements_visited_in_document_order() {
        let doc = parse_html("<div><p><span>a</span></p><em>b</em></div>");
        let mut names = Vec::new();
        doc.for_each_element(|e| names.push(e.name.clone()));
        assert_eq!(names, vec!["html", "head", "body", "div", "p", "span", "em"]);
    }
}
