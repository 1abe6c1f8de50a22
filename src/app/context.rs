//! Application context: the registries every component of one application
//! shares.
//!
//! The context is created with its application and handed to the renderer on
//! the root virtual node, which passes it down to every component instance.
//! Besides the registries themselves it carries the per-definition caches of
//! normalized options, which only hold their keys weakly.
//!
//! # Contents
//!
//! - **Config**: the [`AppConfig`] block
//! - **Registries**: global mixins, components, directives (insertion ordered)
//! - **Provides**: root of the provide/inject chain
//! - **Caches**: merged options, normalized props, normalized emits
//! - **Reload**: hot-reload callback installed on mount

use super::config::AppConfig;
use crate::diagnostics::Reporter;
use crate::domain::{
    Component, ComponentDefinition, Data, Directive, HostkitError, IdentityCache,
};
use crate::shared::{camelize, capitalize, hyphenate, is_reserved_prop};
use indexmap::{IndexMap, IndexSet};
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SYMBOL: AtomicU64 = AtomicU64::new(1);

/// Key of a provided value: a plain name or a unique symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProvideKey {
    Name(String),
    Symbol { id: u64, description: String },
}

impl fmt::Display for ProvideKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Symbol { description, .. } => write!(f, "Symbol({description})"),
        }
    }
}

impl From<&str> for ProvideKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ProvideKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// Typed, process-unique provide/inject key.
///
/// # Example
///
/// ```
/// use hostkit::app::{InjectionKey, ProvideKey};
///
/// let theme: InjectionKey<String> = InjectionKey::new("theme");
/// let other: InjectionKey<String> = InjectionKey::new("theme");
/// assert_ne!(ProvideKey::from(&theme), ProvideKey::from(&other));
/// ```
pub struct InjectionKey<T> {
    id: u64,
    description: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> InjectionKey<T> {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed),
            description: description.into(),
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for InjectionKey<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            description: self.description.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for InjectionKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InjectionKey({}#{})", self.description, self.id)
    }
}

impl<T> From<&InjectionKey<T>> for ProvideKey {
    fn from(key: &InjectionKey<T>) -> Self {
        Self::Symbol {
            id: key.id,
            description: key.description.clone(),
        }
    }
}

/// Options of a component after applying global mixins, `extends` and local
/// mixins.
#[derive(Debug, Clone, Default)]
pub struct MergedOptions {
    pub name: Option<String>,
    pub data: Data,
    pub expose: Option<Vec<String>>,
}

/// Declared props of a component, camelized, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct NormalizedProps {
    names: IndexSet<String>,
}

impl NormalizedProps {
    /// Returns `true` if `name` (in any case style) is a declared prop.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name) || self.names.contains(&camelize(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Declared events of a component.
#[derive(Debug, Clone, Default)]
pub struct NormalizedEmits {
    events: IndexSet<String>,
}

impl NormalizedEmits {
    #[must_use]
    pub fn declares(&self, event: &str) -> bool {
        self.events.contains(event)
    }

    /// Returns `true` if the listener prop `key` (`onUpdate`, `onUpdateOnce`,
    /// `onUpdate:modelValue`, ...) targets a declared event.
    #[must_use]
    pub fn is_emit_listener(&self, key: &str) -> bool {
        let Some(rest) = key.strip_prefix("on") else {
            return false;
        };
        if !rest.starts_with(|c: char| c.is_ascii_uppercase()) {
            return false;
        }
        let rest = rest.strip_suffix("Once").unwrap_or(rest);
        let mut chars = rest.chars();
        let lowered: String = chars
            .next()
            .map(|c| c.to_ascii_lowercase())
            .into_iter()
            .chain(chars)
            .collect();
        self.declares(&lowered) || self.declares(&hyphenate(rest)) || self.declares(rest)
    }

    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(String::as_str)
    }
}

/// Registries and caches shared by every component of one application.
pub struct AppContext {
    pub config: AppConfig,
    pub mixins: Vec<Component>,
    pub components: IndexMap<String, Component>,
    pub directives: IndexMap<String, Directive>,
    pub provides: HashMap<ProvideKey, Rc<dyn Any>>,
    options_cache: IdentityCache<ComponentDefinition, MergedOptions>,
    props_cache: IdentityCache<ComponentDefinition, NormalizedProps>,
    emits_cache: IdentityCache<ComponentDefinition, NormalizedEmits>,
    pub(super) reload: Option<Rc<dyn Fn()>>,
    app_uid: u64,
    root_name: String,
    reporter: Reporter,
}

impl AppContext {
    /// Creates an empty context for the application `app_uid`.
    #[must_use]
    pub fn new(app_uid: u64, root_name: &str, config: AppConfig, reporter: Reporter) -> Self {
        Self {
            config,
            mixins: Vec::new(),
            components: IndexMap::new(),
            directives: IndexMap::new(),
            provides: HashMap::new(),
            options_cache: IdentityCache::new(),
            props_cache: IdentityCache::new(),
            emits_cache: IdentityCache::new(),
            reload: None,
            app_uid,
            root_name: root_name.to_string(),
            reporter,
        }
    }

    /// Id of the owning application.
    #[must_use]
    pub const fn app_uid(&self) -> u64 {
        self.app_uid
    }

    /// Warning route honoring the current `warn_handler`, tagged with this
    /// application.
    #[must_use]
    pub fn reporter(&self) -> Reporter {
        self.reporter
            .clone()
            .with_handler(self.config.warn_handler.clone())
            .with_trace(format!("at <App uid={} root={}>", self.app_uid, self.root_name))
    }

    /// The hot-reload callback, if one has been installed by `mount`.
    #[must_use]
    pub fn reload(&self) -> Option<Rc<dyn Fn()>> {
        self.reload.clone()
    }

    /// Looks up a provided value by key and type.
    #[must_use]
    pub fn inject<T: Clone + 'static>(&self, key: impl Into<ProvideKey>) -> Option<T> {
        self.provides
            .get(&key.into())
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    fn resolve<'a, V>(registry: &'a IndexMap<String, V>, name: &str) -> Option<&'a V> {
        if let Some(found) = registry.get(name) {
            return Some(found);
        }
        let camelized = camelize(name);
        registry
            .get(&camelized)
            .or_else(|| registry.get(&capitalize(&camelized)))
    }

    /// Finds a registered component by exact, camelized or pascal-cased name.
    #[must_use]
    pub fn resolve_component(&self, name: &str) -> Option<Component> {
        Self::resolve(&self.components, name).cloned()
    }

    /// Finds a registered directive by exact, camelized or pascal-cased name.
    #[must_use]
    pub fn resolve_directive(&self, name: &str) -> Option<Directive> {
        Self::resolve(&self.directives, name).cloned()
    }

    /// Walks global mixins, then `extends`, then local mixins, then the
    /// component itself, in merge order.
    fn merge_chain(&self, component: &Component) -> Vec<Component> {
        fn walk(component: &Component, out: &mut Vec<Component>) {
            if let Some(base) = &component.extends {
                walk(base, out);
            }
            for mixin in &component.mixins {
                walk(mixin, out);
            }
            out.push(component.clone());
        }
        let mut chain = Vec::new();
        for mixin in &self.mixins {
            walk(mixin, &mut chain);
        }
        walk(component, &mut chain);
        chain
    }

    /// Resolves the effective options of `component`. Cached per definition.
    ///
    /// Keys with an entry in `config.option_merge_strategies` are combined
    /// with that function (the parent value is `null` when absent); all other
    /// keys take the later value.
    pub fn merged_options(&mut self, component: &Component) -> Rc<MergedOptions> {
        if let Some(cached) = self.options_cache.get(component.as_rc()) {
            return cached;
        }
        let strategies = self.config.option_merge_strategies.clone();
        let mut merged = MergedOptions::default();
        for source in self.merge_chain(component) {
            if source.name.is_some() {
                merged.name.clone_from(&source.name);
            }
            if source.expose.is_some() {
                merged.expose.clone_from(&source.expose);
            }
            for (key, value) in &source.data {
                let combined = match strategies.get(key) {
                    Some(strategy) => {
                        let parent = merged.data.get(key).cloned().unwrap_or_default();
                        strategy(&parent, value)
                    }
                    None => value.clone(),
                };
                merged.data.insert(key.clone(), combined);
            }
        }
        self.options_cache.insert(component.as_rc(), merged)
    }

    /// Declared props of `component`, inherited ones included. Cached per
    /// definition.
    pub fn normalized_props(&mut self, component: &Component) -> Rc<NormalizedProps> {
        if let Some(cached) = self.props_cache.get(component.as_rc()) {
            return cached;
        }
        let reporter = self.reporter();
        let mut props = NormalizedProps::default();
        for source in self.merge_chain(component) {
            for raw in &source.props {
                let key = camelize(raw);
                if key.starts_with('$') || is_reserved_prop(&key) {
                    reporter.warn(format!(
                        "Invalid prop name: \"{key}\" is a reserved property."
                    ));
                    continue;
                }
                props.names.insert(key);
            }
        }
        self.props_cache.insert(component.as_rc(), props)
    }

    /// Declared events of `component`, inherited ones included. Cached per
    /// definition.
    pub fn normalized_emits(&mut self, component: &Component) -> Rc<NormalizedEmits> {
        if let Some(cached) = self.emits_cache.get(component.as_rc()) {
            return cached;
        }
        let mut emits = NormalizedEmits::default();
        for source in self.merge_chain(component) {
            emits.events.extend(source.emits.iter().cloned());
        }
        self.emits_cache.insert(component.as_rc(), emits)
    }

    /// Routes an error to `config.error_handler`, or logs it.
    ///
    /// Takes the `RefCell` so the handler runs without the context borrowed.
    pub fn handle_error(context: &RefCell<Self>, err: &HostkitError, info: &str) {
        let handler = context.borrow().config.error_handler.clone();
        match handler {
            Some(handler) => handler(err, info),
            None => {
                let reporter = context.borrow().reporter();
                reporter.error(format!("Unhandled error during execution of {info}: {err}"));
            }
        }
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("app_uid", &self.app_uid)
            .field("config", &self.config)
            .field("mixins", &self.mixins)
            .field("components", &self.components.keys().collect::<Vec<_>>())
            .field("directives", &self.directives.keys().collect::<Vec<_>>())
            .field("provides", &self.provides.keys().collect::<Vec<_>>())
            .field("reload", &self.reload.is_some())
            .finish_non_exhaustive()
    }
}
