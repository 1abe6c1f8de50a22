//! Root virtual-node and component-instance carriers.
//!
//! The rendering engine owns the real virtual-node model. The application
//! layer only needs a root node to hand to `render`/`hydrate` and a way to
//! read back the instance the renderer created for it.

use super::context::AppContext;
use crate::domain::{Component, Data};
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Type-erased public surface of a component instance.
pub type PublicInstance = Rc<dyn Any>;

/// What the renderer reports back after mounting a root node.
#[derive(Clone)]
pub struct ComponentInstance {
    uid: u64,
    proxy: PublicInstance,
    exposed: Option<PublicInstance>,
}

impl ComponentInstance {
    /// Creates an instance whose whole proxy is public.
    #[must_use]
    pub fn new(uid: u64, proxy: PublicInstance) -> Self {
        Self {
            uid,
            proxy,
            exposed: None,
        }
    }

    /// Restricts the public surface to `exposed`.
    #[must_use]
    pub fn with_exposed(mut self, exposed: PublicInstance) -> Self {
        self.exposed = Some(exposed);
        self
    }

    #[must_use]
    pub const fn uid(&self) -> u64 {
        self.uid
    }

    #[must_use]
    pub fn proxy(&self) -> PublicInstance {
        Rc::clone(&self.proxy)
    }

    /// Returns the exposed surface if the component declared one, otherwise
    /// the full proxy.
    #[must_use]
    pub fn expose_proxy(&self) -> PublicInstance {
        Rc::clone(self.exposed.as_ref().unwrap_or(&self.proxy))
    }
}

impl fmt::Debug for ComponentInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInstance")
            .field("uid", &self.uid)
            .field("exposed", &self.exposed.is_some())
            .finish_non_exhaustive()
    }
}

/// Root node handed to the renderer. Cloning is shallow.
#[derive(Clone)]
pub struct VNode {
    pub component: Component,
    pub props: Option<Data>,

    /// Context of the application mounting this node; the renderer passes it
    /// on to the root instance.
    pub app_context: Option<Rc<RefCell<AppContext>>>,

    /// Filled in by the renderer once the root instance exists.
    pub component_instance: Option<Rc<ComponentInstance>>,
}

impl VNode {
    #[must_use]
    pub fn new(component: Component, props: Option<Data>) -> Self {
        Self {
            component,
            props,
            app_context: None,
            component_instance: None,
        }
    }
}

impl fmt::Debug for VNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VNode")
            .field("component", &self.component.display_name())
            .field("props", &self.props)
            .field("has_context", &self.app_context.is_some())
            .field("component_instance", &self.component_instance)
            .finish()
    }
}
