//! Application factory bound to a renderer.
//!
//! [`create_app_api`] binds a host, a `render` callback and an optional
//! `hydrate` callback once. The returned [`AppFactory`] then produces any
//! number of independent applications with [`AppFactory::create_app`].
//!
//! # Example
//!
//! ```
//! use hostkit::app::{create_app_api, ComponentInstance, VNode};
//! use hostkit::dom::{Document, DomOps, NodeId};
//! use hostkit::domain::{Component, ComponentDefinition};
//! use std::rc::Rc;
//!
//! let doc = Document::new();
//! let host = Rc::new(DomOps::new(doc.clone()));
//! let factory = create_app_api(
//!     Rc::clone(&host),
//!     |vnode: Option<&mut VNode>, _container: &NodeId, _is_svg: bool| {
//!         if let Some(vnode) = vnode {
//!             vnode.component_instance = Some(Rc::new(ComponentInstance::new(0, Rc::new(()))));
//!         }
//!     },
//!     None,
//! );
//!
//! let app = factory.create_app(Component::new(ComponentDefinition::named("Root")), None);
//! assert!(app.mount(&doc.body(), false, false).is_some());
//! ```

use super::application::{App, AppInner, MountState};
use super::config::AppConfig;
use super::context::AppContext;
use super::devtools::DevtoolsHook;
use super::ids::{IdSource, ProcessIds};
use super::vnode::VNode;
use crate::diagnostics::{DiagnosticSink, Reporter, TracingSink};
use crate::domain::Component;
use crate::host::HostOps;
use crate::{Config, FeatureFlags};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Root render callback: renders `vnode` into the container, or tears the
/// container's tree down when `vnode` is `None`.
pub type RenderFn<H> = Rc<dyn Fn(Option<&mut VNode>, &<H as HostOps>::Node, bool)>;

/// Root hydrate callback: adopts existing markup in the container.
pub type HydrateFn<H> = Rc<dyn Fn(&mut VNode, &<H as HostOps>::Node)>;

/// Produces applications sharing one host and renderer.
pub struct AppFactory<H: HostOps + 'static> {
    host: Rc<H>,
    render: RenderFn<H>,
    hydrate: Option<HydrateFn<H>>,
    flags: FeatureFlags,
    ids: Rc<dyn IdSource>,
    sink: Rc<dyn DiagnosticSink>,
    devtools: Option<Rc<dyn DevtoolsHook<H>>>,
}

/// Binds a host and its root `render`/`hydrate` callbacks into a factory.
///
/// Defaults: feature flags from [`FeatureFlags::default`], process-wide ids,
/// warnings to `tracing`, no devtools hook.
pub fn create_app_api<H: HostOps + 'static>(
    host: Rc<H>,
    render: impl Fn(Option<&mut VNode>, &H::Node, bool) + 'static,
    hydrate: Option<HydrateFn<H>>,
) -> AppFactory<H> {
    AppFactory {
        host,
        render: Rc::new(render),
        hydrate,
        flags: FeatureFlags::default(),
        ids: Rc::new(ProcessIds),
        sink: Rc::new(TracingSink),
        devtools: None,
    }
}

impl<H: HostOps + 'static> AppFactory<H> {
    #[must_use]
    pub fn with_flags(mut self, flags: FeatureFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Takes the feature flags from a runtime [`Config`].
    #[must_use]
    pub fn with_config(self, config: &Config) -> Self {
        self.with_flags(config.features)
    }

    #[must_use]
    pub fn with_ids(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Rc::new(ids);
        self
    }

    /// Sends developer diagnostics to `sink` instead of `tracing`.
    #[must_use]
    pub fn with_diagnostics(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Rc::new(sink);
        self
    }

    #[must_use]
    pub fn with_devtools(mut self, devtools: impl DevtoolsHook<H> + 'static) -> Self {
        self.devtools = Some(Rc::new(devtools));
        self
    }

    #[must_use]
    pub const fn flags(&self) -> FeatureFlags {
        self.flags
    }

    /// Creates an application for `root`.
    ///
    /// `root_props` must be a JSON object (or `null`); anything else is
    /// discarded with a warning.
    pub fn create_app(&self, root: impl Into<Component>, root_props: Option<Value>) -> App<H> {
        let root = root.into();
        let uid = self.ids.next_id();
        let reporter = Reporter::new(self.flags.dev, Rc::clone(&self.sink));

        let root_props = match root_props {
            None | Some(Value::Null) => None,
            Some(Value::Object(props)) => Some(props),
            Some(_) => {
                reporter
                    .clone()
                    .with_trace(format!("at <App uid={uid} root={}>", root.display_name()))
                    .warn("root props passed to app.mount() must be an object.");
                None
            }
        };

        let config = if self.flags.dev {
            let host = Rc::clone(&self.host);
            AppConfig::with_native_tag(Rc::new(move |tag: &str| host.is_native_tag(tag)))
        } else {
            AppConfig::default()
        };
        let context = AppContext::new(uid, root.display_name(), config, reporter);
        tracing::debug!(app = uid, root = root.display_name(), "app created");

        App::from_inner(AppInner {
            uid,
            host: Rc::clone(&self.host),
            render: Rc::clone(&self.render),
            hydrate: self.hydrate.clone(),
            flags: self.flags,
            devtools: self.devtools.clone(),
            root_component: root,
            root_props,
            context: Rc::new(RefCell::new(context)),
            plugins: RefCell::new(Vec::new()),
            state: Cell::new(MountState::Pending),
            container: RefCell::new(None),
            instance: RefCell::new(None),
        })
    }
}

impl<H: HostOps + 'static> fmt::Debug for AppFactory<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppFactory")
            .field("flags", &self.flags)
            .field("hydrate", &self.hydrate.is_some())
            .field("devtools", &self.devtools.is_some())
            .finish_non_exhaustive()
    }
}
