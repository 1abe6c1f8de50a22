//! The application handle and its mount state machine.
//!
//! An [`App`] is produced by [`AppFactory::create_app`](super::AppFactory::create_app)
//! and owns exactly one [`AppContext`]. Its methods configure the context
//! (plugins, mixins, components, directives, provides) and drive the root
//! render through the factory's `render`/`hydrate` callbacks.
//!
//! # Mount lifecycle
//!
//! ```text
//! Pending ──mount──► Mounted ──unmount──► Unmounted
//!    │                  │                     │
//!    └─unmount: warn    └─mount: warn         └─mount/unmount: warn
//! ```
//!
//! An unmounted application stays unmounted; create a fresh application for
//! every mount instead.
//!
//! # Borrowing
//!
//! The context lives in a `RefCell` shared with the renderer. No method holds
//! a borrow while it runs user code (plugins, render callbacks, warning and
//! error handlers, devtools hooks), so that code may call back into the
//! application freely.

use super::config::AppConfig;
use super::context::{AppContext, ProvideKey};
use super::devtools::DevtoolsHook;
use super::factory::{HydrateFn, RenderFn};
use super::plugin::Plugin;
use super::validate::{validate_component_name, validate_directive_name};
use super::vnode::{ComponentInstance, PublicInstance, VNode};
use crate::diagnostics::Reporter;
use crate::domain::{Component, Data, Directive, HostkitError};
use crate::host::{AppMarker, HostOps};
use crate::FeatureFlags;
use serde_json::Value;
use std::any::Any;
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

const ALREADY_MOUNTED: &str = "App has already been mounted.\n\
If you want to remount the same app, move your app creation logic into a factory function \
and create fresh app instances for each mount - e.g. `const createMyApp = () => createApp(App)`";

const ALREADY_UNMOUNTED: &str = "App has already been unmounted and cannot be mounted again.\n\
Create a fresh app instance for each mount - e.g. `const createMyApp = () => createApp(App)`";

/// Where an application is in its mount lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountState {
    /// Created, never mounted.
    Pending,
    Mounted,
    /// Torn down; cannot be mounted again.
    Unmounted,
}

pub(super) struct AppInner<H: HostOps + 'static> {
    pub(super) uid: u64,
    pub(super) host: Rc<H>,
    pub(super) render: RenderFn<H>,
    pub(super) hydrate: Option<HydrateFn<H>>,
    pub(super) flags: FeatureFlags,
    pub(super) devtools: Option<Rc<dyn DevtoolsHook<H>>>,
    pub(super) root_component: Component,
    pub(super) root_props: Option<Data>,
    pub(super) context: Rc<RefCell<AppContext>>,
    pub(super) plugins: RefCell<Vec<Plugin<H>>>,
    pub(super) state: Cell<MountState>,
    pub(super) container: RefCell<Option<H::Node>>,
    pub(super) instance: RefCell<Option<Rc<ComponentInstance>>>,
}

impl<H: HostOps + 'static> Drop for AppInner<H> {
    fn drop(&mut self) {
        // The reload closure holds the root node, which holds the context.
        if let Ok(mut context) = self.context.try_borrow_mut() {
            context.reload = None;
        }
    }
}

/// Handle to one application. Clones refer to the same application.
pub struct App<H: HostOps + 'static> {
    inner: Rc<AppInner<H>>,
}

impl<H: HostOps + 'static> App<H> {
    pub(super) fn from_inner(inner: AppInner<H>) -> Self {
        Self {
            inner: Rc::new(inner),
        }
    }

    /// Finds the application mounted on `container`, if it is still alive.
    pub fn from_container(host: &H, container: &H::Node) -> Option<Self> {
        let marker = host.container_app(container)?;
        let inner = marker.upgrade_any()?.downcast::<AppInner<H>>().ok()?;
        Some(Self { inner })
    }

    fn reporter(&self) -> Reporter {
        self.inner.context.borrow().reporter()
    }

    fn warn(&self, message: impl Into<String>) {
        self.reporter().warn(message);
    }

    #[must_use]
    pub fn uid(&self) -> u64 {
        self.inner.uid
    }

    /// Version of the runtime that created this application.
    #[must_use]
    pub const fn version(&self) -> &'static str {
        crate::VERSION
    }

    #[must_use]
    pub fn root_component(&self) -> &Component {
        &self.inner.root_component
    }

    #[must_use]
    pub fn root_props(&self) -> Option<&Data> {
        self.inner.root_props.as_ref()
    }

    /// The container of the last successful mount.
    #[must_use]
    pub fn container(&self) -> Option<H::Node> {
        self.inner.container.borrow().clone()
    }

    #[must_use]
    pub fn context(&self) -> Rc<RefCell<AppContext>> {
        Rc::clone(&self.inner.context)
    }

    /// Root component instance while mounted (development or devtools
    /// builds only).
    #[must_use]
    pub fn instance(&self) -> Option<Rc<ComponentInstance>> {
        self.inner.instance.borrow().clone()
    }

    #[must_use]
    pub fn host(&self) -> &Rc<H> {
        &self.inner.host
    }

    #[must_use]
    pub fn state(&self) -> MountState {
        self.inner.state.get()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.state() == MountState::Mounted
    }

    /// Returns `true` if both handles refer to the same application.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Shared access to the configuration block.
    ///
    /// # Panics
    ///
    /// Panics if the context is mutably borrowed, e.g. while a
    /// [`config_mut`](Self::config_mut) guard is alive.
    #[must_use]
    pub fn config(&self) -> Ref<'_, AppConfig> {
        Ref::map(self.inner.context.borrow(), |context| &context.config)
    }

    /// Mutable access for editing individual configuration fields.
    ///
    /// # Panics
    ///
    /// Panics if the context is already borrowed.
    #[must_use]
    pub fn config_mut(&self) -> RefMut<'_, AppConfig> {
        RefMut::map(self.inner.context.borrow_mut(), |context| &mut context.config)
    }

    /// Refuses to replace the configuration block; `config` is dropped and
    /// the current block is kept.
    pub fn set_config(&self, config: AppConfig) -> &Self {
        drop(config);
        self.warn("app.config cannot be replaced. Modify individual options instead.");
        self
    }

    /// Number of distinct plugins installed so far.
    #[must_use]
    pub fn installed_plugins(&self) -> usize {
        self.inner.plugins.borrow().len()
    }

    /// Installs `plugin` once; later calls with the same handle only warn.
    ///
    /// The plugin's `install` capability is preferred over calling the
    /// plugin itself. A plugin with neither is rejected with a warning.
    pub fn use_plugin(&self, plugin: &Plugin<H>, options: &[Value]) -> &Self {
        if self.inner.plugins.borrow().iter().any(|p| p.ptr_eq(plugin)) {
            self.warn("Plugin has already been applied to target app.");
            return self;
        }
        let Some(installer) = plugin.installer() else {
            self.warn(
                "A plugin must either be a function or an object with an \"install\" function.",
            );
            return self;
        };
        self.inner.plugins.borrow_mut().push(plugin.clone());
        let _span = tracing::debug_span!(
            "plugin_install",
            app = self.inner.uid,
            plugin = plugin.name().unwrap_or("anonymous")
        )
        .entered();
        installer(self, options);
        self
    }

    /// Adds a global mixin, applied to every component of this application.
    pub fn mixin(&self, mixin: Component) -> &Self {
        if !self.inner.flags.options_api {
            self.warn("Mixins are only available in builds supporting Options API");
            return self;
        }
        let duplicate = self.inner.context.borrow().mixins.contains(&mixin);
        if duplicate {
            let suffix = mixin
                .name
                .as_deref()
                .map(|name| format!(": {name}"))
                .unwrap_or_default();
            self.warn(format!("Mixin has already been applied to target app{suffix}"));
        } else {
            self.inner.context.borrow_mut().mixins.push(mixin);
        }
        self
    }

    /// Returns the component registered under exactly `name`.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<Component> {
        self.inner.context.borrow().components.get(name).cloned()
    }

    /// Registers `component` under `name`, replacing any previous one.
    pub fn register_component(&self, name: &str, component: Component) -> &Self {
        let reporter = self.reporter();
        if reporter.enabled() {
            let is_native_tag = self.inner.context.borrow().config.native_tag_predicate();
            validate_component_name(name, is_native_tag.as_ref(), &reporter);
        }
        let replaced = self
            .inner
            .context
            .borrow_mut()
            .components
            .insert(name.to_string(), component)
            .is_some();
        if replaced {
            reporter.warn(format!(
                "Component \"{name}\" has already been registered in target app."
            ));
        }
        tracing::debug!(app = self.inner.uid, name, "component registered");
        self
    }

    /// Returns the directive registered under exactly `name`.
    #[must_use]
    pub fn directive(&self, name: &str) -> Option<Directive> {
        self.inner.context.borrow().directives.get(name).cloned()
    }

    /// Registers `directive` under `name`, replacing any previous one.
    pub fn register_directive(&self, name: &str, directive: Directive) -> &Self {
        let reporter = self.reporter();
        if reporter.enabled() {
            validate_directive_name(name, &reporter);
        }
        let replaced = self
            .inner
            .context
            .borrow_mut()
            .directives
            .insert(name.to_string(), directive)
            .is_some();
        if replaced {
            reporter.warn(format!(
                "Directive \"{name}\" has already been registered in target app."
            ));
        }
        tracing::debug!(app = self.inner.uid, name, "directive registered");
        self
    }

    /// Provides `value` under `key` to every component of this application.
    pub fn provide<K, T>(&self, key: K, value: T) -> &Self
    where
        K: Into<ProvideKey>,
        T: 'static,
    {
        let key = key.into();
        let value: Rc<dyn Any> = Rc::new(value);
        let replaced = self
            .inner
            .context
            .borrow_mut()
            .provides
            .insert(key.clone(), value)
            .is_some();
        if replaced {
            self.warn(format!(
                "App already provides property with key \"{key}\". It will be overwritten with the new value."
            ));
        }
        self
    }

    fn marker(&self) -> AppMarker {
        let any: Rc<dyn Any> = Rc::clone(&self.inner) as Rc<dyn Any>;
        AppMarker::new(self.inner.uid, Rc::downgrade(&any))
    }

    /// Mounts the root component into `container`.
    ///
    /// Uses the factory's `hydrate` callback when `hydrate` is set and one
    /// was supplied, `render` otherwise. Returns the root instance's exposed
    /// surface (or its full proxy). Returns `None` without rendering when the
    /// application is not in [`MountState::Pending`], and `None` after
    /// rendering when the renderer produced no root instance.
    pub fn mount(&self, container: &H::Node, hydrate: bool, is_svg: bool) -> Option<PublicInstance> {
        match self.state() {
            MountState::Pending => {}
            MountState::Mounted => {
                self.warn(ALREADY_MOUNTED);
                return None;
            }
            MountState::Unmounted => {
                self.warn(ALREADY_UNMOUNTED);
                return None;
            }
        }

        let inner = &self.inner;
        let _span = tracing::debug_span!("app_mount", app = inner.uid, hydrate, is_svg).entered();

        let mut vnode = VNode::new(inner.root_component.clone(), inner.root_props.clone());
        vnode.app_context = Some(Rc::clone(&inner.context));

        match (&inner.hydrate, hydrate) {
            (Some(hydrate_fn), true) => hydrate_fn(&mut vnode, container),
            _ => (inner.render)(Some(&mut vnode), container, is_svg),
        }

        if inner.flags.dev || inner.flags.hot_reload {
            let render = Rc::clone(&inner.render);
            let root = vnode.clone();
            let target = container.clone();
            inner.context.borrow_mut().reload = Some(Rc::new(move || {
                let mut fresh = root.clone();
                render(Some(&mut fresh), &target, is_svg);
            }));
        }

        inner.state.set(MountState::Mounted);
        *inner.container.borrow_mut() = Some(container.clone());
        inner.host.set_container_app(container, Some(self.marker()));
        tracing::debug!(app = inner.uid, container = ?container, "app mounted");

        let instance = vnode.component_instance.clone();
        if inner.flags.dev || inner.flags.prod_devtools {
            inner.instance.borrow_mut().clone_from(&instance);
            if let Some(devtools) = &inner.devtools {
                devtools.app_init(self, crate::VERSION);
            }
        }

        match instance {
            Some(instance) => Some(instance.expose_proxy()),
            None => {
                AppContext::handle_error(
                    &inner.context,
                    &HostkitError::MissingRootInstance { uid: inner.uid },
                    "mount",
                );
                None
            }
        }
    }

    /// Mounts into the first node matching `selector`, as the DOM runtime
    /// does: the container's existing content is cleared first and the
    /// container is marked with a `data-v-app` attribute afterwards.
    pub fn mount_selector(&self, selector: &str, is_svg: bool) -> Option<PublicInstance> {
        let Some(container) = self.inner.host.query_selector(selector) else {
            self.warn(format!(
                "Failed to mount app: mount target selector \"{selector}\" returned null."
            ));
            return None;
        };
        if self.state() != MountState::Pending {
            return self.mount(&container, false, is_svg);
        }
        self.inner.host.set_element_text(&container, "");
        let proxy = self.mount(&container, false, is_svg);
        self.inner.host.set_scope_id(&container, "data-v-app");
        proxy
    }

    /// Tears down the mounted root and removes the container tag.
    pub fn unmount(&self) {
        if self.state() != MountState::Mounted {
            self.warn("Cannot unmount an app that is not mounted.");
            return;
        }
        let inner = &self.inner;
        let _span = tracing::debug_span!("app_unmount", app = inner.uid).entered();

        let container = inner.container.borrow().clone();
        if let Some(container) = container {
            (inner.render)(None, &container, false);
            if inner.flags.dev || inner.flags.prod_devtools {
                *inner.instance.borrow_mut() = None;
                if let Some(devtools) = &inner.devtools {
                    devtools.app_unmount(self, crate::VERSION);
                }
            }
            inner.host.set_container_app(&container, None);
        }
        inner.context.borrow_mut().reload = None;
        inner.state.set(MountState::Unmounted);
        tracing::debug!(app = inner.uid, "app unmounted");
    }

    /// Runs the context's reload callback. Returns `false` if none is
    /// installed.
    pub fn trigger_reload(&self) -> bool {
        let reload = self.inner.context.borrow().reload();
        match reload {
            Some(reload) => {
                reload();
                true
            }
            None => false,
        }
    }
}

impl<H: HostOps + 'static> Clone for App<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<H: HostOps + 'static> fmt::Debug for App<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("uid", &self.inner.uid)
            .field("root", &self.inner.root_component.display_name())
            .field("state", &self.inner.state.get())
            .field("container", &self.inner.container.borrow())
            .field("plugins", &self.inner.plugins.borrow().len())
            .finish_non_exhaustive()
    }
}
