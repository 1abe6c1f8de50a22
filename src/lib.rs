//! hostkit: application lifecycle core and host operations contract for
//! virtual-node renderers.
//!
//! The crate provides:
//! - An application factory (`create_app_api`) producing independent
//!   applications with their own configuration, registries and provides
//! - Plugin installation, global mixins, component and directive registries
//! - A mount/unmount state machine that hands a root node to a renderer
//! - The `HostOps` contract a rendering target implements
//! - A document-object-model target (`DomOps`) with a static-content fast path

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Lifecycle
//! │  - AppFactory / App                                 │
//! │  - AppContext registries and caches                 │
//! │  - Plugins, provides, devtools hook                 │
//! └─────────────────────────────────────────────────────┘
//!                        │ render(vnode, container)
//! ┌─────────────────────────────────────────────────────┐
//! │  Host Contract (host/)                              │  ← HostOps trait
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ DOM Target    │   │ Domain        │   │ Shared        │
//! │ (dom/)        │   │ (domain/)     │   │ (shared/)     │
//! │ - Document    │   │ - Components  │   │ - Case convs  │
//! │ - Markup      │   │ - Errors      │   │ - Tag tables  │
//! │ - DomOps      │   │ - Weak cache  │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Diagnostics (diagnostics) & Observability          │
//! │  - Developer warnings with app trace                │
//! │  - OpenTelemetry spans to rotating OTLP/JSON files  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application factory, handles and context
//! - [`host`]: The `HostOps` contract and container marker
//! - [`dom`]: In-process document and its `HostOps` implementation
//! - [`domain`]: Component definitions, errors, identity cache
//! - [`diagnostics`]: Warning routing
//! - [`shared`]: String and tag helpers
//! - [`infrastructure`]: Data directory resolution
//! - [`observability`]: OpenTelemetry tracing to local files
//!
//! # Configuration
//!
//! Runtime configuration is a flat table; in TOML:
//!
//! ```toml
//! trace_level = "hostkit=debug"
//! trace_file = "/tmp/hostkit-otlp.json"
//!
//! [features]
//! dev = true
//! options_api = true
//! prod_devtools = false
//! hot_reload = false
//! ```
//!
//! # Example
//!
//! ```rust
//! use hostkit::app::{create_app_api, ComponentInstance, VNode};
//! use hostkit::dom::{Document, DomOps, NodeId};
//! use hostkit::domain::{Component, ComponentDefinition};
//! use hostkit::{Config, FeatureFlags};
//! use std::rc::Rc;
//!
//! let doc = Document::new();
//! let host = Rc::new(DomOps::new(doc.clone()));
//! let config = Config {
//!     features: FeatureFlags { dev: true, ..FeatureFlags::default() },
//!     ..Config::default()
//! };
//!
//! let factory = create_app_api(
//!     host,
//!     |vnode: Option<&mut VNode>, _container: &NodeId, _is_svg: bool| {
//!         if let Some(vnode) = vnode {
//!             vnode.component_instance = Some(Rc::new(ComponentInstance::new(1, Rc::new(()))));
//!         }
//!     },
//!     None,
//! )
//! .with_config(&config);
//!
//! let app = factory.create_app(Component::new(ComponentDefinition::named("Root")), None);
//! assert!(app.mount(&doc.body(), false, false).is_some());
//! app.unmount();
//! ```

pub mod app;
pub mod diagnostics;
pub mod dom;
pub mod domain;
pub mod host;
pub mod infrastructure;
pub mod observability;
pub mod shared;

pub use app::{create_app_api, App, AppConfig, AppContext, AppFactory, Plugin};
pub use domain::{Component, ComponentDefinition, Directive, HostkitError, Result};
pub use host::HostOps;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Crate version, reported to devtools and in exported spans.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compile-time style switches consulted by the application layer.
///
/// `dev` gates every developer warning, name validation and the
/// instance record used by tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Development diagnostics. Default: `cfg!(debug_assertions)`.
    pub dev: bool,
    /// Options-style components and global mixins. Default: `true`.
    pub options_api: bool,
    /// Devtools notifications outside development. Default: `false`.
    pub prod_devtools: bool,
    /// Root reload hook outside development. Default: `false`.
    pub hot_reload: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            dev: cfg!(debug_assertions),
            options_api: true,
            prod_devtools: false,
            hot_reload: false,
        }
    }
}

/// Runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `EnvFilter` directive for exported spans. Default: `"info"`.
    pub trace_level: Option<String>,

    /// Trace output file. Default: `hostkit-otlp.json` in the data directory.
    pub trace_file: Option<PathBuf>,

    pub features: FeatureFlags,
}

impl Config {
    /// Builds a configuration from flat string pairs.
    ///
    /// Recognized keys: `trace_level`, `trace_file`, `dev`, `options_api`,
    /// `prod_devtools`, `hot_reload`. Boolean values that fail to parse keep
    /// their default; unknown keys are ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use hostkit::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("trace_level".to_string(), "debug".to_string());
    /// map.insert("hot_reload".to_string(), "true".to_string());
    /// map.insert("dev".to_string(), "maybe".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.trace_level.as_deref(), Some("debug"));
    /// assert!(config.features.hot_reload);
    /// assert_eq!(config.features.dev, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = FeatureFlags::default();
        let flag = |key: &str, default: bool| {
            map.get(key)
                .and_then(|v| v.trim().parse::<bool>().ok())
                .unwrap_or(default)
        };

        Self {
            trace_level: map.get("trace_level").cloned(),
            trace_file: map
                .get("trace_file")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            features: FeatureFlags {
                dev: flag("dev", defaults.dev),
                options_api: flag("options_api", defaults.options_api),
                prod_devtools: flag("prod_devtools", defaults.prod_devtools),
                hot_reload: flag("hot_reload", defaults.hot_reload),
            },
        }
    }

    /// Parses a TOML document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`HostkitError::Toml`] if the document is malformed or a field
    /// has the wrong type.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`HostkitError::Io`] if the file cannot be read, or
    /// [`HostkitError::Toml`] if it cannot be parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}
