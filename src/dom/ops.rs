//! [`HostOps`] implementation over a [`Document`].

use super::document::{Document, Namespace, NodeId, NodeType};
use crate::domain::{Data, HostkitError, Result};
use crate::host::{AppMarker, HostOps};
use crate::shared::{is_html_tag, is_svg_tag};
use serde_json::Value;

/// Out-of-band property that form controls keep their bound value in.
const VALUE_PROPERTY: &str = "_value";

/// Host operations backed by an in-process document.
///
/// Holds nothing but a handle to the document; all state lives in the tree.
///
/// # Example
///
/// ```
/// use hostkit::dom::{Document, DomOps};
/// use hostkit::host::HostOps;
///
/// let doc = Document::new();
/// doc.make_current();
/// let ops = DomOps::detect().unwrap();
///
/// let text = ops.create_text("hello");
/// ops.insert(&text, &doc.body(), None);
/// assert_eq!(ops.parent_node(&text), Some(doc.body()));
/// # hostkit::dom::Document::clear_current();
/// ```
#[derive(Debug, Clone)]
pub struct DomOps {
    document: Document,
}

impl DomOps {
    /// Wraps an explicit document.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Binds to the current thread's global document.
    ///
    /// # Errors
    ///
    /// Returns [`HostkitError::HostUnavailable`] when no document has been
    /// installed with [`Document::make_current`].
    pub fn detect() -> Result<Self> {
        Document::current().map(Self::new).ok_or_else(|| {
            HostkitError::HostUnavailable("no global document installed for this thread".into())
        })
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }
}

/// Attribute text for a creation-time prop value.
fn attribute_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl HostOps for DomOps {
    type Node = NodeId;

    fn insert(&self, child: &NodeId, parent: &NodeId, anchor: Option<&NodeId>) {
        if !self.document.insert_before(*parent, *child, anchor.copied()) {
            tracing::debug!(?child, ?parent, "insert rejected");
        }
    }

    fn remove(&self, child: &NodeId) {
        self.document.remove(*child);
    }

    fn create_element(
        &self,
        tag: &str,
        is_svg: bool,
        is: Option<&str>,
        props: Option<&Data>,
    ) -> NodeId {
        let el = match (is_svg, is) {
            (true, _) => self.document.create_element(tag, Namespace::Svg),
            (false, Some(is)) => self.document.create_element_is(tag, Namespace::Html, is),
            (false, None) => self.document.create_element(tag, Namespace::Html),
        };
        if tag == "select" {
            if let Some(multiple) = props.and_then(|p| p.get("multiple")).filter(|v| !v.is_null()) {
                self.document
                    .set_attribute(el, "multiple", &attribute_text(multiple));
            }
        }
        el
    }

    fn create_text(&self, text: &str) -> NodeId {
        self.document.create_text(text)
    }

    fn create_comment(&self, text: &str) -> NodeId {
        self.document.create_comment(text)
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        if matches!(
            self.document.node_type(*node),
            Some(NodeType::Text | NodeType::Comment)
        ) {
            self.document.set_text_content(*node, text);
        }
    }

    fn set_element_text(&self, el: &NodeId, text: &str) {
        self.document.set_text_content(*el, text);
    }

    fn parent_node(&self, node: &NodeId) -> Option<NodeId> {
        self.document.parent(*node)
    }

    fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
        self.document.next_sibling(*node)
    }

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.document.query_selector(selector)
    }

    fn set_scope_id(&self, el: &NodeId, id: &str) {
        self.document.set_attribute(*el, id, "");
    }

    fn clone_node(&self, el: &NodeId) -> NodeId {
        let Some(cloned) = self.document.clone_deep(*el) else {
            // Foreign node: nothing to copy from, hand back an empty fragment.
            return self.document.create_fragment();
        };
        if let Some(value) = self.document.property(*el, VALUE_PROPERTY) {
            self.document.set_property(cloned, VALUE_PROPERTY, value);
        }
        cloned
    }

    fn insert_static_content(
        &self,
        content: &str,
        parent: &NodeId,
        anchor: Option<&NodeId>,
        is_svg: bool,
        cached: Option<(&NodeId, &NodeId)>,
    ) -> Option<(NodeId, NodeId)> {
        let _span = tracing::debug_span!("insert_static_content", len = content.len(), is_svg).entered();
        let doc = &self.document;
        let parent = *parent;
        let anchor = anchor.copied().filter(|a| doc.parent(*a) == Some(parent));
        let before = match anchor {
            Some(a) => doc.previous_sibling(a),
            None => doc.last_child(parent),
        };

        // Copies are made before any is inserted: the cached block may live
        // in `parent` itself.
        let block = cached.and_then(|(start, end)| doc.sibling_range(*start, *end));
        match block {
            Some(block) => {
                tracing::debug!(nodes = block.len(), "cloning cached static block");
                let copies: Vec<NodeId> = block.iter().filter_map(|n| doc.clone_deep(*n)).collect();
                for copy in copies {
                    doc.insert_before(parent, copy, anchor);
                }
            }
            None => {
                if cached.is_some() {
                    tracing::debug!("cached static block is no longer linked, parsing");
                }
                let fragment = doc.parse_fragment(content, is_svg);
                doc.insert_before(parent, fragment, anchor);
                doc.remove(fragment);
            }
        }

        let first = match before {
            Some(b) => doc.next_sibling(b),
            None => doc.first_child(parent),
        }?;
        if Some(first) == anchor {
            return None;
        }
        let last = match anchor {
            Some(a) => doc.previous_sibling(a),
            None => doc.last_child(parent),
        }?;
        Some((first, last))
    }

    fn set_container_app(&self, container: &NodeId, marker: Option<AppMarker>) {
        self.document.set_app_marker(*container, marker);
    }

    fn container_app(&self, container: &NodeId) -> Option<AppMarker> {
        self.document.app_marker(*container)
    }

    fn is_native_tag(&self, tag: &str) -> bool {
        is_html_tag(tag) || is_svg_tag(tag)
    }
}
