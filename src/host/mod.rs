//! Host Operations Contract.
//!
//! This module defines the [`HostOps`] trait: the fixed set of primitive tree
//! operations a rendering target supplies so one reconciliation engine can
//! drive any output (a document object model, a string buffer, a native widget
//! tree, a test double). The engine and the application layer depend on the
//! trait only, never on a concrete platform.
//!
//! # Implementations
//!
//! - [`crate::dom::DomOps`]: in-process document object model
//!
//! # Container tagging
//!
//! After a successful mount the application tags its container with an
//! [`AppMarker`] so tooling can discover which application owns a given
//! subtree. The tag is removed on unmount. It is a lookup aid only and owns
//! nothing.

use crate::domain::Data;
use std::any::Any;
use std::fmt;
use std::rc::Weak;

/// Discoverable back-reference from a mount container to its application.
///
/// Holds the application weakly; a dropped application leaves a marker that
/// still reports its `uid` but can no longer be upgraded.
#[derive(Clone)]
pub struct AppMarker {
    uid: u64,
    app: Weak<dyn Any>,
}

impl AppMarker {
    /// Creates a marker for the application with id `uid`.
    #[must_use]
    pub fn new(uid: u64, app: Weak<dyn Any>) -> Self {
        Self { uid, app }
    }

    /// Id of the owning application.
    #[must_use]
    pub const fn uid(&self) -> u64 {
        self.uid
    }

    /// Returns the type-erased application, if it is still alive.
    #[must_use]
    pub fn upgrade_any(&self) -> Option<std::rc::Rc<dyn Any>> {
        self.app.upgrade()
    }
}

impl fmt::Debug for AppMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppMarker")
            .field("uid", &self.uid)
            .field("alive", &(self.app.strong_count() > 0))
            .finish()
    }
}

/// Primitive operations a rendering target must implement.
///
/// Every operation is a thin adapter over the platform's native tree and keeps
/// no state of its own. Operations are called from one logical thread per
/// render pass. Passing a detached or foreign node to [`remove`],
/// [`parent_node`] or [`next_sibling`] yields `None` or does nothing.
///
/// [`remove`]: HostOps::remove
/// [`parent_node`]: HostOps::parent_node
/// [`next_sibling`]: HostOps::next_sibling
pub trait HostOps {
    /// Handle to a node of the host tree.
    type Node: Clone + PartialEq + fmt::Debug + 'static;

    /// Places `child` immediately before `anchor` inside `parent`, or at the
    /// end when `anchor` is `None` or not a child of `parent`.
    fn insert(&self, child: &Self::Node, parent: &Self::Node, anchor: Option<&Self::Node>);

    /// Detaches `child` from its parent, if it has one. The renderer never
    /// uses `child` again, so hosts may reclaim it.
    fn remove(&self, child: &Self::Node);

    /// Creates an unattached element.
    ///
    /// `is_svg` selects the SVG namespace, `is` carries a customized built-in
    /// element token, and `props` holds creation-time hints. Elements whose
    /// behavior depends on an attribute at creation (a `select` with
    /// `multiple`) must receive it here.
    fn create_element(
        &self,
        tag: &str,
        is_svg: bool,
        is: Option<&str>,
        props: Option<&Data>,
    ) -> Self::Node;

    /// Creates an unattached text node.
    fn create_text(&self, text: &str) -> Self::Node;

    /// Creates an unattached comment node.
    fn create_comment(&self, text: &str) -> Self::Node;

    /// Replaces the content of a text or comment node.
    fn set_text(&self, node: &Self::Node, text: &str);

    /// Replaces all children of `el` with a single text equivalent to `text`.
    fn set_element_text(&self, el: &Self::Node, text: &str);

    fn parent_node(&self, node: &Self::Node) -> Option<Self::Node>;

    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Returns the first node in the whole document matching `selector`.
    fn query_selector(&self, selector: &str) -> Option<Self::Node>;

    /// Marks `el` with an empty attribute named `id`, used for style scoping.
    fn set_scope_id(&self, el: &Self::Node, id: &str);

    /// Deep-copies `el`, carrying over host-side values that a structural
    /// copy alone would lose.
    fn clone_node(&self, el: &Self::Node) -> Self::Node;

    /// Inserts pre-rendered markup before `anchor` (or at the end of `parent`).
    ///
    /// When `cached` holds the boundary nodes of a block inserted earlier and
    /// that block is still linked, the block is cloned node by node instead of
    /// parsing `content` again. Returns the first and last inserted top-level
    /// nodes, or `None` if nothing was inserted.
    fn insert_static_content(
        &self,
        content: &str,
        parent: &Self::Node,
        anchor: Option<&Self::Node>,
        is_svg: bool,
        cached: Option<(&Self::Node, &Self::Node)>,
    ) -> Option<(Self::Node, Self::Node)>;

    /// Sets (`Some`) or clears (`None`) the application tag on a container.
    fn set_container_app(&self, container: &Self::Node, marker: Option<AppMarker>);

    /// Reads the application tag of a container.
    fn container_app(&self, container: &Self::Node) -> Option<AppMarker>;

    /// Returns `true` if `tag` names a platform-native element.
    ///
    /// Used to warn about components registered under native element names.
    fn is_native_tag(&self, _tag: &str) -> bool {
        false
    }
}
