//! Plugins: reusable installers that configure an application.
//!
//! A plugin is either callable itself or carries an `install` capability (or
//! both, in which case `install` wins). Identity is by reference: the same
//! [`Plugin`] handle is installed at most once per application, while two
//! separately built plugins are always distinct.

use super::application::App;
use crate::host::HostOps;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// Installer signature: receives the application and the extra options
/// passed to [`App::use_plugin`].
pub type InstallFn<H> = Rc<dyn Fn(&App<H>, &[Value])>;

struct PluginShape<H: HostOps + 'static> {
    name: Option<String>,
    install: Option<InstallFn<H>>,
    call: Option<InstallFn<H>>,
}

/// Shared plugin handle, compared by identity.
///
/// # Example
///
/// ```
/// use hostkit::app::Plugin;
/// use hostkit::dom::DomOps;
///
/// let router: Plugin<DomOps> = Plugin::with_install("router", |app, _options| {
///     tracing::debug!(uid = app.uid(), "router installed");
/// });
/// assert_eq!(router.name(), Some("router"));
/// ```
pub struct Plugin<H: HostOps + 'static>(Rc<PluginShape<H>>);

impl<H: HostOps + 'static> Plugin<H> {
    /// A callable plugin.
    pub fn from_fn(f: impl Fn(&App<H>, &[Value]) + 'static) -> Self {
        Self::from_parts(None, None, Some(Rc::new(f)))
    }

    /// An object plugin with an `install` capability.
    pub fn with_install(name: impl Into<String>, f: impl Fn(&App<H>, &[Value]) + 'static) -> Self {
        Self::from_parts(Some(name.into()), Some(Rc::new(f)), None)
    }

    /// Builds a plugin from explicit capabilities. A plugin with neither is
    /// accepted here and rejected with a warning at installation.
    #[must_use]
    pub fn from_parts(
        name: Option<String>,
        install: Option<InstallFn<H>>,
        call: Option<InstallFn<H>>,
    ) -> Self {
        Self(Rc::new(PluginShape {
            name,
            install,
            call,
        }))
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// The capability used at installation: `install` first, then the plugin
    /// itself.
    pub(super) fn installer(&self) -> Option<InstallFn<H>> {
        self.0.install.clone().or_else(|| self.0.call.clone())
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<H: HostOps + 'static> Clone for Plugin<H> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<H: HostOps + 'static> PartialEq for Plugin<H> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<H: HostOps + 'static> fmt::Debug for Plugin<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.0.name)
            .field("install", &self.0.install.is_some())
            .field("callable", &self.0.call.is_some())
            .finish()
    }
}
