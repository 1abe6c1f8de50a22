//! Application Lifecycle Manager.
//!
//! This layer sits between the host adapters and the rendering engine: it
//! produces applications bound to one `render` callback, gathers their global
//! registrations, and orchestrates mount and unmount.
//!
//! # Architecture
//!
//! ```text
//! create_app_api(host, render, hydrate) ─► AppFactory ─create_app─► App
//!                                                                    │
//!   use_plugin / mixin / register_* / provide ─► AppContext ◄────────┤
//!                                                   │                │
//!   mount ─► VNode { app_context } ─► render ─► HostOps ◄── container tag
//! ```
//!
//! # Modules
//!
//! - [`application`]: The `App` handle and its mount state machine
//! - [`config`]: Per-application configuration block
//! - [`context`]: Registries, provides and normalization caches
//! - [`devtools`]: Tooling notification hook
//! - [`factory`]: `create_app_api` and `AppFactory`
//! - [`ids`]: Application id sources
//! - [`plugin`]: Plugin handles
//! - [`vnode`]: Root node and instance carriers exchanged with the renderer
//!
//! # Example
//!
//! ```rust
//! use hostkit::app::{create_app_api, Plugin};
//! use hostkit::dom::{Document, DomOps};
//! use hostkit::domain::{Component, ComponentDefinition};
//! use std::rc::Rc;
//!
//! let host = Rc::new(DomOps::new(Document::new()));
//! let factory = create_app_api(host, |_vnode, _container, _is_svg| {}, None);
//! let app = factory.create_app(Component::new(ComponentDefinition::named("Root")), None);
//!
//! let plugin: Plugin<DomOps> = Plugin::from_fn(|app, _| {
//!     app.provide("theme", String::from("dark"));
//! });
//! app.use_plugin(&plugin, &[])
//!     .register_component("Card", Component::new(ComponentDefinition::named("Card")));
//! assert_eq!(app.installed_plugins(), 1);
//! ```

pub mod application;
pub mod config;
pub mod context;
pub mod devtools;
pub mod factory;
pub mod ids;
pub mod plugin;
mod validate;
pub mod vnode;

pub use application::{App, MountState};
pub use config::{AppConfig, CompilerOptions, ErrorHandler, NativeTagPredicate, OptionMergeFn, Whitespace};
pub use context::{AppContext, InjectionKey, MergedOptions, NormalizedEmits, NormalizedProps, ProvideKey};
pub use devtools::{DevtoolsEvent, DevtoolsHook, RecordingDevtools};
pub use factory::{create_app_api, AppFactory, HydrateFn, RenderFn};
pub use ids::{IdSource, ProcessIds, SequentialIds};
pub use plugin::{InstallFn, Plugin};
pub use vnode::{ComponentInstance, PublicInstance, VNode};
