//! In-process document object model.
//!
//! A [`Document`] is an arena of nodes addressed by [`NodeId`]. Handles are
//! cheap to clone and share the same arena.
//!
//! Detaching a node only unlinks it. [`Document::remove`] frees the node and
//! its subtree, as does replacing an element's children through
//! [`Document::set_text_content`]. Freed slots go on a free list and are
//! reused; every slot carries a generation that is bumped on release, so an
//! id handed out before the release stops resolving instead of aliasing the
//! slot's next occupant.
//!
//! Besides the tree, each node carries:
//!
//! - ordered attributes (elements only)
//! - out-of-band properties, the equivalent of expando fields on platform
//!   nodes (`_value` on form controls, for instance)
//! - an optional application marker set by `mount`
//!
//! # Global document
//!
//! The DOM runtime operates on "the" document of the current thread. Install
//! one with [`Document::make_current`] before calling
//! [`DomOps::detect`](super::DomOps::detect).

use super::markup::{self, MarkupNode};
use super::{selector, serialize};
use crate::host::AppMarker;
use indexmap::IndexMap;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_DOCUMENT: AtomicU32 = AtomicU32::new(1);

thread_local! {
    static CURRENT: RefCell<Option<Document>> = const { RefCell::new(None) };
}

/// Element namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Html,
    Svg,
}

impl Namespace {
    /// Returns the namespace URI.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Html => "http://www.w3.org/1999/xhtml",
            Self::Svg => "http://www.w3.org/2000/svg",
        }
    }
}

/// Kind of a node, for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Document,
    Fragment,
    Element,
    Text,
    Comment,
}

/// Handle to a node of one particular [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    document: u32,
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
pub(super) struct ElementData {
    pub(super) tag: String,
    pub(super) namespace: Namespace,
    pub(super) is: Option<String>,
    pub(super) attributes: IndexMap<String, String>,
}

#[derive(Debug, Clone)]
pub(super) enum NodeKind {
    Document,
    Fragment,
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
pub(super) struct NodeData {
    pub(super) kind: NodeKind,
    pub(super) parent: Option<usize>,
    pub(super) children: Vec<usize>,
    pub(super) properties: HashMap<String, Value>,
    generation: u32,
    live: bool,
}

impl NodeData {
    fn new(kind: NodeKind, generation: u32) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            properties: HashMap::new(),
            generation,
            live: true,
        }
    }

    pub(super) fn element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    fn can_have_children(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Document | NodeKind::Fragment | NodeKind::Element(_)
        )
    }
}

/// Arena storage behind a [`Document`] handle.
pub(super) struct DocumentData {
    id: u32,
    pub(super) nodes: Vec<NodeData>,
    pub(super) root: usize,
    body: usize,
    free: Vec<usize>,
    markers: HashMap<usize, AppMarker>,
    markup_parses: usize,
}

impl DocumentData {
    fn push(&mut self, kind: NodeKind) -> usize {
        if let Some(index) = self.free.pop() {
            let generation = self.nodes[index].generation;
            self.nodes[index] = NodeData::new(kind, generation);
            return index;
        }
        self.nodes.push(NodeData::new(kind, 0));
        self.nodes.len() - 1
    }

    /// Unlinks `node` and returns it and its subtree to the free list.
    /// The document node and the ancestors of `<body>` are never released.
    fn release(&mut self, node: usize) -> bool {
        if !self.nodes[node].live || self.is_inclusive_ancestor(node, self.body) {
            return false;
        }
        self.detach(node);
        let mut freed = self.descendants(node);
        freed.push(node);
        for index in freed {
            self.markers.remove(&index);
            let slot = &mut self.nodes[index];
            slot.generation = slot.generation.wrapping_add(1);
            slot.live = false;
            slot.kind = NodeKind::Fragment;
            slot.parent = None;
            slot.children = Vec::new();
            slot.properties = HashMap::new();
            self.free.push(index);
        }
        true
    }

    fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    fn element(&mut self, tag: &str, namespace: Namespace) -> usize {
        self.push(NodeKind::Element(ElementData {
            tag: tag.to_string(),
            namespace,
            is: None,
            attributes: IndexMap::new(),
        }))
    }

    /// Returns `true` if `ancestor` is `node` or one of its ancestors.
    fn is_inclusive_ancestor(&self, ancestor: usize, node: usize) -> bool {
        let mut current = Some(node);
        while let Some(index) = current {
            if index == ancestor {
                return true;
            }
            current = self.nodes[index].parent;
        }
        false
    }

    fn detach(&mut self, child: usize) -> bool {
        let Some(parent) = self.nodes[child].parent.take() else {
            return false;
        };
        self.nodes[parent].children.retain(|&c| c != child);
        true
    }

    fn link(&mut self, parent: usize, child: usize, anchor: Option<usize>) {
        let siblings = &mut self.nodes[parent].children;
        let position = anchor
            .and_then(|a| siblings.iter().position(|&c| c == a))
            .unwrap_or(siblings.len());
        siblings.insert(position, child);
        self.nodes[child].parent = Some(parent);
    }

    pub(super) fn next_sibling(&self, node: usize) -> Option<usize> {
        let parent = self.nodes[node].parent?;
        let siblings = &self.nodes[parent].children;
        let position = siblings.iter().position(|&c| c == node)?;
        siblings.get(position + 1).copied()
    }

    /// Inserts `child` before `anchor` in `parent`. Fragments move their
    /// children instead of themselves. Returns `false` if the insertion would
    /// be illegal (a cycle, a document child, or a childless parent).
    fn insert(&mut self, parent: usize, child: usize, anchor: Option<usize>) -> bool {
        if !self.nodes[parent].can_have_children()
            || matches!(self.nodes[child].kind, NodeKind::Document)
            || self.is_inclusive_ancestor(child, parent)
        {
            return false;
        }
        let anchor = anchor.filter(|&a| self.nodes[a].parent == Some(parent));
        let anchor = if anchor == Some(child) {
            self.next_sibling(child)
        } else {
            anchor
        };

        if matches!(self.nodes[child].kind, NodeKind::Fragment) {
            let moved = std::mem::take(&mut self.nodes[child].children);
            for node in moved {
                self.nodes[node].parent = None;
                self.link(parent, node, anchor);
            }
        } else {
            self.detach(child);
            self.link(parent, child, anchor);
        }
        true
    }

    fn set_text_content(&mut self, node: usize, text: &str) {
        match &mut self.nodes[node].kind {
            NodeKind::Text(value) | NodeKind::Comment(value) => {
                *value = text.to_string();
            }
            NodeKind::Document => {}
            NodeKind::Fragment | NodeKind::Element(_) => {
                let children = std::mem::take(&mut self.nodes[node].children);
                for child in children {
                    self.nodes[child].parent = None;
                    self.release(child);
                }
                if !text.is_empty() {
                    let text_node = self.push(NodeKind::Text(text.to_string()));
                    self.link(node, text_node, None);
                }
            }
        }
    }

    fn text_content(&self, node: usize, out: &mut String) {
        match &self.nodes[node].kind {
            NodeKind::Text(value) => out.push_str(value),
            NodeKind::Comment(_) => {}
            _ => {
                for &child in &self.nodes[node].children {
                    self.text_content(child, out);
                }
            }
        }
    }

    /// Structural deep copy: kind, attributes and children. Properties and
    /// markers are host-side state and are not copied.
    fn clone_deep(&mut self, node: usize) -> usize {
        let kind = self.nodes[node].kind.clone();
        let copy = self.push(kind);
        let children = self.nodes[node].children.clone();
        for child in children {
            let child_copy = self.clone_deep(child);
            self.link(copy, child_copy, None);
        }
        copy
    }

    fn build(&mut self, parent: usize, nodes: Vec<MarkupNode>) {
        for node in nodes {
            let index = match node {
                MarkupNode::Text(text) => self.push(NodeKind::Text(text)),
                MarkupNode::Comment(text) => self.push(NodeKind::Comment(text)),
                MarkupNode::Element {
                    tag,
                    namespace,
                    attributes,
                    children,
                } => {
                    let index = self.element(&tag, namespace);
                    if let NodeKind::Element(element) = &mut self.nodes[index].kind {
                        element.attributes.extend(attributes);
                    }
                    self.build(index, children);
                    index
                }
            };
            self.link(parent, index, None);
        }
    }

    pub(super) fn descendants(&self, node: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.nodes[node].children.iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            out.push(index);
            stack.extend(self.nodes[index].children.iter().rev());
        }
        out
    }
}

/// Shared handle to a document arena.
///
/// # Example
///
/// ```
/// use hostkit::dom::{Document, Namespace};
///
/// let doc = Document::new();
/// let div = doc.create_element("div", Namespace::Html);
/// doc.set_attribute(div, "id", "app");
/// doc.append_child(doc.body(), div);
/// assert_eq!(doc.outer_html(div), r#"<div id="app"></div>"#);
/// ```
#[derive(Clone)]
pub struct Document {
    inner: Rc<RefCell<DocumentData>>,
}

impl Document {
    /// Creates a document with an empty `<html><head></head><body></body></html>`.
    #[must_use]
    pub fn new() -> Self {
        let mut data = DocumentData {
            id: NEXT_DOCUMENT.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::new(),
            free: Vec::new(),
            root: 0,
            body: 0,
            markers: HashMap::new(),
            markup_parses: 0,
        };
        data.root = data.push(NodeKind::Document);
        let html = data.element("html", Namespace::Html);
        let head = data.element("head", Namespace::Html);
        let body = data.element("body", Namespace::Html);
        data.link(data.root, html, None);
        data.link(html, head, None);
        data.link(html, body, None);
        data.body = body;
        Self {
            inner: Rc::new(RefCell::new(data)),
        }
    }

    /// Returns the current thread's global document, if one is installed.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.with(|current| current.borrow().clone())
    }

    /// Installs this document as the current thread's global document.
    pub fn make_current(&self) {
        CURRENT.with(|current| *current.borrow_mut() = Some(self.clone()));
    }

    /// Removes the current thread's global document.
    pub fn clear_current() {
        CURRENT.with(|current| *current.borrow_mut() = None);
    }

    /// Returns `true` if both handles share one arena.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn id_for(&self, index: usize) -> NodeId {
        let data = self.inner.borrow();
        NodeId {
            document: data.id,
            index: u32::try_from(index).unwrap_or(u32::MAX),
            generation: data.nodes.get(index).map_or(0, |n| n.generation),
        }
    }

    fn resolve(&self, node: NodeId) -> Option<usize> {
        let data = self.inner.borrow();
        let index = node.index as usize;
        let slot = data.nodes.get(index)?;
        (node.document == data.id && slot.live && slot.generation == node.generation)
            .then_some(index)
    }

    fn with_node<R>(&self, node: NodeId, f: impl FnOnce(&DocumentData, usize) -> R) -> Option<R> {
        let index = self.resolve(node)?;
        Some(f(&*self.inner.borrow(), index))
    }

    fn with_node_mut<R>(
        &self,
        node: NodeId,
        f: impl FnOnce(&mut DocumentData, usize) -> R,
    ) -> Option<R> {
        let index = self.resolve(node)?;
        Some(f(&mut *self.inner.borrow_mut(), index))
    }

    /// The document node itself.
    #[must_use]
    pub fn root(&self) -> NodeId {
        let root = self.inner.borrow().root;
        self.id_for(root)
    }

    #[must_use]
    pub fn body(&self) -> NodeId {
        let body = self.inner.borrow().body;
        self.id_for(body)
    }

    /// Creates an unattached element. HTML tag names are lower-cased.
    #[must_use]
    pub fn create_element(&self, tag: &str, namespace: Namespace) -> NodeId {
        let tag = match namespace {
            Namespace::Html => tag.to_ascii_lowercase(),
            Namespace::Svg => tag.to_string(),
        };
        let index = self.inner.borrow_mut().element(&tag, namespace);
        self.id_for(index)
    }

    /// Creates an unattached customized built-in element (`is` token).
    #[must_use]
    pub fn create_element_is(&self, tag: &str, namespace: Namespace, is: &str) -> NodeId {
        let node = self.create_element(tag, namespace);
        self.with_node_mut(node, |data, index| {
            if let NodeKind::Element(element) = &mut data.nodes[index].kind {
                element.is = Some(is.to_string());
            }
        });
        node
    }

    #[must_use]
    pub fn create_text(&self, text: &str) -> NodeId {
        let index = self.inner.borrow_mut().push(NodeKind::Text(text.to_string()));
        self.id_for(index)
    }

    #[must_use]
    pub fn create_comment(&self, text: &str) -> NodeId {
        let index = self
            .inner
            .borrow_mut()
            .push(NodeKind::Comment(text.to_string()));
        self.id_for(index)
    }

    #[must_use]
    pub fn create_fragment(&self) -> NodeId {
        let index = self.inner.borrow_mut().push(NodeKind::Fragment);
        self.id_for(index)
    }

    #[must_use]
    pub fn node_type(&self, node: NodeId) -> Option<NodeType> {
        self.with_node(node, |data, index| match data.nodes[index].kind {
            NodeKind::Document => NodeType::Document,
            NodeKind::Fragment => NodeType::Fragment,
            NodeKind::Element(_) => NodeType::Element,
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::Comment(_) => NodeType::Comment,
        })
    }

    #[must_use]
    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        self.with_node(node, |data, index| {
            data.nodes[index].element().map(|e| e.tag.clone())
        })
        .flatten()
    }

    #[must_use]
    pub fn namespace(&self, node: NodeId) -> Option<Namespace> {
        self.with_node(node, |data, index| {
            data.nodes[index].element().map(|e| e.namespace)
        })
        .flatten()
    }

    /// Returns the customized built-in token an element was created with.
    #[must_use]
    pub fn is_token(&self, node: NodeId) -> Option<String> {
        self.with_node(node, |data, index| {
            data.nodes[index].element().and_then(|e| e.is.clone())
        })
        .flatten()
    }

    #[must_use]
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.with_node(node, |data, index| {
            data.nodes[index]
                .element()
                .and_then(|e| e.attributes.get(name).cloned())
        })
        .flatten()
    }

    /// Returns all attributes in insertion order.
    #[must_use]
    pub fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        self.with_node(node, |data, index| {
            data.nodes[index]
                .element()
                .map(|e| {
                    e.attributes
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect()
                })
                .unwrap_or_default()
        })
        .unwrap_or_default()
    }

    /// Sets an attribute; ignored on non-elements.
    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        self.with_node_mut(node, |data, index| {
            if let NodeKind::Element(element) = &mut data.nodes[index].kind {
                element.attributes.insert(name.to_string(), value.to_string());
            }
        });
    }

    /// Removes an attribute, returning `true` if it was present.
    pub fn remove_attribute(&self, node: NodeId, name: &str) -> bool {
        self.with_node_mut(node, |data, index| match &mut data.nodes[index].kind {
            NodeKind::Element(element) => element.attributes.shift_remove(name).is_some(),
            _ => false,
        })
        .unwrap_or(false)
    }

    #[must_use]
    pub fn property(&self, node: NodeId, name: &str) -> Option<Value> {
        self.with_node(node, |data, index| {
            data.nodes[index].properties.get(name).cloned()
        })
        .flatten()
    }

    pub fn set_property(&self, node: NodeId, name: &str, value: Value) {
        self.with_node_mut(node, |data, index| {
            data.nodes[index].properties.insert(name.to_string(), value);
        });
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        let parent = self
            .with_node(node, |data, index| data.nodes[index].parent)
            .flatten()?;
        Some(self.id_for(parent))
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        let children = self
            .with_node(node, |data, index| data.nodes[index].children.clone())
            .unwrap_or_default();
        children.into_iter().map(|c| self.id_for(c)).collect()
    }

    #[must_use]
    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.children(node).first().copied()
    }

    #[must_use]
    pub fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.children(node).last().copied()
    }

    #[must_use]
    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let next = self
            .with_node(node, |data, index| data.next_sibling(index))
            .flatten()?;
        Some(self.id_for(next))
    }

    #[must_use]
    pub fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        let previous = self
            .with_node(node, |data, index| {
                let parent = data.nodes[index].parent?;
                let siblings = &data.nodes[parent].children;
                let position = siblings.iter().position(|&c| c == index)?;
                position.checked_sub(1).map(|p| siblings[p])
            })
            .flatten()?;
        Some(self.id_for(previous))
    }

    /// Returns `true` if `node` is `ancestor` or lies beneath it.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        match (self.resolve(ancestor), self.resolve(node)) {
            (Some(a), Some(n)) => self.inner.borrow().is_inclusive_ancestor(a, n),
            _ => false,
        }
    }

    /// Inserts `child` into `parent` before `anchor`, or appends it when the
    /// anchor is absent or not a child of `parent`.
    ///
    /// Returns `false` and leaves the tree untouched when the insertion is
    /// illegal (foreign nodes, cycles, text parents).
    pub fn insert_before(&self, parent: NodeId, child: NodeId, anchor: Option<NodeId>) -> bool {
        let (Some(parent), Some(child)) = (self.resolve(parent), self.resolve(child)) else {
            return false;
        };
        let anchor = anchor.and_then(|a| self.resolve(a));
        self.inner.borrow_mut().insert(parent, child, anchor)
    }

    pub fn append_child(&self, parent: NodeId, child: NodeId) -> bool {
        self.insert_before(parent, child, None)
    }

    /// Unlinks `node` from its parent. Returns `false` if it had none.
    pub fn detach(&self, node: NodeId) -> bool {
        self.with_node_mut(node, DocumentData::detach)
            .unwrap_or(false)
    }

    /// Unlinks `node` and frees it together with its subtree.
    ///
    /// Ids of freed nodes no longer resolve. Returns `false` for stale or
    /// foreign ids and for the document node and the ancestors of `<body>`.
    pub fn remove(&self, node: NodeId) -> bool {
        self.with_node_mut(node, DocumentData::release)
            .unwrap_or(false)
    }

    /// Nodes from `start` to `end` following sibling links, both included.
    /// `None` unless `end` is reachable from `start`.
    #[must_use]
    pub fn sibling_range(&self, start: NodeId, end: NodeId) -> Option<Vec<NodeId>> {
        let (start, end) = (self.resolve(start)?, self.resolve(end)?);
        let block = {
            let data = self.inner.borrow();
            let mut block = vec![start];
            let mut current = start;
            while current != end {
                current = data.next_sibling(current)?;
                block.push(current);
            }
            block
        };
        Some(block.into_iter().map(|index| self.id_for(index)).collect())
    }

    /// Value of a text or comment node.
    #[must_use]
    pub fn node_value(&self, node: NodeId) -> Option<String> {
        self.with_node(node, |data, index| match &data.nodes[index].kind {
            NodeKind::Text(value) | NodeKind::Comment(value) => Some(value.clone()),
            _ => None,
        })
        .flatten()
    }

    /// Concatenated text of `node` and its descendants.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.with_node(node, |data, index| data.text_content(index, &mut out));
        out
    }

    /// Replaces the children of an element (or the value of a character
    /// node) with `text`. An empty string leaves an element with no children.
    /// The replaced children are freed.
    pub fn set_text_content(&self, node: NodeId, text: &str) {
        self.with_node_mut(node, |data, index| data.set_text_content(index, text));
    }

    /// Structural deep copy of `node`, unattached.
    #[must_use]
    pub fn clone_deep(&self, node: NodeId) -> Option<NodeId> {
        let copy = self.with_node_mut(node, DocumentData::clone_deep)?;
        Some(self.id_for(copy))
    }

    /// Parses `markup` into a new fragment.
    ///
    /// With `svg_context` the markup is parsed as the content of an `<svg>`
    /// element, so its elements land in the SVG namespace.
    #[must_use]
    pub fn parse_fragment(&self, markup: &str, svg_context: bool) -> NodeId {
        let parsed = if svg_context {
            let wrapped = format!("<svg>{markup}</svg>");
            match markup::parse(&wrapped).into_iter().next() {
                Some(MarkupNode::Element { children, .. }) => children,
                _ => Vec::new(),
            }
        } else {
            markup::parse(markup)
        };
        let mut data = self.inner.borrow_mut();
        data.markup_parses += 1;
        let fragment = data.push(NodeKind::Fragment);
        data.build(fragment, parsed);
        drop(data);
        self.id_for(fragment)
    }

    /// How many times markup has been parsed in this document.
    #[must_use]
    pub fn markup_parses(&self) -> usize {
        self.inner.borrow().markup_parses
    }

    /// First element in document order matching `selector`.
    #[must_use]
    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let selector = selector::Selector::parse(selector)?;
        let found = {
            let data = self.inner.borrow();
            data.descendants(data.root)
                .into_iter()
                .find(|&index| selector.matches(&data, index))
        }?;
        Some(self.id_for(found))
    }

    /// Serializes `node` including itself.
    #[must_use]
    pub fn outer_html(&self, node: NodeId) -> String {
        self.with_node(node, serialize::outer_html)
            .unwrap_or_default()
    }

    /// Serializes the children of `node`.
    #[must_use]
    pub fn inner_html(&self, node: NodeId) -> String {
        self.with_node(node, serialize::inner_html)
            .unwrap_or_default()
    }

    pub fn set_app_marker(&self, node: NodeId, marker: Option<AppMarker>) {
        self.with_node_mut(node, |data, index| match marker {
            Some(marker) => {
                data.markers.insert(index, marker);
            }
            None => {
                data.markers.remove(&index);
            }
        });
    }

    #[must_use]
    pub fn app_marker(&self, node: NodeId) -> Option<AppMarker> {
        self.with_node(node, |data, index| data.markers.get(&index).cloned())
            .flatten()
    }

    /// Live nodes in this arena.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.borrow().live_nodes()
    }

    /// Slots allocated in this arena, live or free.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.inner.borrow().nodes.len()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.inner.borrow();
        f.debug_struct("Document")
            .field("id", &data.id)
            .field("nodes", &data.live_nodes())
            .field("free", &data.free.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_before_anchor_and_append_fallback() {
        let doc = Document::new();
        let list = doc.create_element("ul", Namespace::Html);
        let a = doc.create_text("a");
        let b = doc.create_text("b");
        let stray = doc.create_text("stray");

        assert!(doc.append_child(list, a));
        assert!(doc.insert_before(list, b, Some(a)));
        assert_eq!(doc.children(list), vec![b, a]);

        // An anchor that is not a child degrades to append.
        let c = doc.create_text("c");
        assert!(doc.insert_before(list, c, Some(stray)));
        assert_eq!(doc.children(list), vec![b, a, c]);
    }

    #[test]
    fn insertion_moves_nodes_and_rejects_cycles() {
        let doc = Document::new();
        let outer = doc.create_element("div", Namespace::Html);
        let inner = doc.create_element("div", Namespace::Html);
        let other = doc.create_element("div", Namespace::Html);
        doc.append_child(outer, inner);

        assert!(!doc.append_child(inner, outer));
        assert!(!doc.append_child(outer, outer));

        assert!(doc.append_child(other, inner));
        assert!(doc.children(outer).is_empty());
        assert_eq!(doc.parent(inner), Some(other));
    }

    #[test]
    fn fragment_children_are_moved() {
        let doc = Document::new();
        let fragment = doc.parse_fragment("<i>1</i><b>2</b>", false);
        let host = doc.create_element("p", Namespace::Html);
        doc.append_child(host, fragment);
        assert!(doc.children(fragment).is_empty());
        assert_eq!(doc.inner_html(host), "<i>1</i><b>2</b>");
    }

    #[test]
    fn nodes_from_another_document_are_ignored() {
        let one = Document::new();
        let two = Document::new();
        let foreign = two.create_text("x");
        assert!(!one.append_child(one.body(), foreign));
        assert_eq!(one.parent(foreign), None);
        assert!(!one.detach(foreign));
    }

    #[test]
    fn text_content_replaces_children() {
        let doc = Document::new();
        let div = doc.create_element("div", Namespace::Html);
        doc.append_child(div, doc.create_element("span", Namespace::Html));
        doc.set_text_content(div, "hello");
        assert_eq!(doc.inner_html(div), "hello");
        doc.set_text_content(div, "");
        assert!(doc.children(div).is_empty());
    }

    #[test]
    fn removed_subtrees_are_recycled() {
        let doc = Document::new();
        let baseline = doc.node_count();
        for round in 0..50 {
            let list = doc.create_element("ul", Namespace::Html);
            for i in 0..4 {
                let item = doc.create_element("li", Namespace::Html);
                doc.append_child(item, doc.create_text(&format!("{round}.{i}")));
                doc.append_child(list, item);
            }
            doc.append_child(doc.body(), list);
            assert!(doc.remove(list));
        }
        assert_eq!(doc.node_count(), baseline);
        // One list of nine nodes at a time.
        assert_eq!(doc.slot_count(), baseline + 9);
    }

    #[test]
    fn stale_ids_do_not_alias_reused_slots() {
        let doc = Document::new();
        let old = doc.create_text("old");
        doc.set_app_marker(old, Some(AppMarker::new(1, std::rc::Weak::<()>::new())));
        assert!(doc.remove(old));

        let new = doc.create_text("new");
        assert_ne!(old, new);
        assert_eq!(doc.node_type(old), None);
        assert_eq!(doc.node_value(new).as_deref(), Some("new"));
        assert!(doc.app_marker(new).is_none());
        assert!(!doc.remove(old));
    }

    #[test]
    fn replaced_text_children_are_freed() {
        let doc = Document::new();
        let div = doc.create_element("div", Namespace::Html);
        let span = doc.create_element("span", Namespace::Html);
        doc.append_child(div, span);
        let before = doc.node_count();
        doc.set_text_content(div, "x");
        assert_eq!(doc.node_count(), before);
        assert_eq!(doc.parent(span), None);
    }

    #[test]
    fn document_spine_is_never_released() {
        let doc = Document::new();
        let html = doc.parent(doc.body());
        assert!(!doc.remove(doc.root()));
        assert!(html.is_some_and(|html| !doc.remove(html)));
        assert!(!doc.remove(doc.body()));
        assert_eq!(doc.inner_html(doc.root()), "<html><head></head><body></body></html>");
    }

    #[test]
    fn sibling_range_requires_a_linked_end() {
        let doc = Document::new();
        let div = doc.create_element("div", Namespace::Html);
        let items: Vec<NodeId> = ["a", "b", "c"].iter().map(|t| doc.create_text(t)).collect();
        for item in &items {
            doc.append_child(div, *item);
        }
        assert_eq!(doc.sibling_range(items[0], items[2]), Some(items.clone()));
        assert_eq!(doc.sibling_range(items[1], items[1]), Some(vec![items[1]]));
        assert_eq!(doc.sibling_range(items[2], items[0]), None);

        doc.detach(items[2]);
        assert_eq!(doc.sibling_range(items[0], items[2]), None);
    }

    #[test]
    fn current_document_is_thread_local() {
        Document::clear_current();
        assert!(Document::current().is_none());
        let doc = Document::new();
        doc.make_current();
        assert!(Document::current().is_some_and(|d| d.ptr_eq(&doc)));
        Document::clear_current();
    }
}
