//! Per-application configuration block.
//!
//! [`AppConfig`] is created together with its application context and can
//! only be edited field by field through
//! [`App::config_mut`](super::App::config_mut). Replacing it wholesale is
//! refused with a warning.

use crate::diagnostics::WarnHandler;
use crate::domain::{Data, HostkitError};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Predicate deciding whether a tag is a platform-native element.
pub type NativeTagPredicate = Rc<dyn Fn(&str) -> bool>;

/// Merges a parent option value with a child option value.
pub type OptionMergeFn = Rc<dyn Fn(&Value, &Value) -> Value>;

/// Application-level error handler: `(error, info)`.
pub type ErrorHandler = Rc<dyn Fn(&HostkitError, &str)>;

/// Whitespace handling for runtime template compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whitespace {
    Preserve,
    Condense,
}

/// Options forwarded to a runtime template compiler. All unset by default.
#[derive(Clone, Default)]
pub struct CompilerOptions {
    pub is_custom_element: Option<NativeTagPredicate>,
    pub whitespace: Option<Whitespace>,
    pub delimiters: Option<(String, String)>,
    pub comments: Option<bool>,
}

impl fmt::Debug for CompilerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompilerOptions")
            .field("is_custom_element", &self.is_custom_element.is_some())
            .field("whitespace", &self.whitespace)
            .field("delimiters", &self.delimiters)
            .field("comments", &self.comments)
            .finish()
    }
}

/// Configuration block of one application.
#[derive(Clone)]
pub struct AppConfig {
    is_native_tag: NativeTagPredicate,

    /// Enables component performance marks in the rendering engine.
    pub performance: bool,

    /// Custom merge functions for option keys, consulted by
    /// [`AppContext::merged_options`](super::AppContext::merged_options).
    pub option_merge_strategies: HashMap<String, OptionMergeFn>,

    /// Values made available on every component instance.
    pub global_properties: Data,

    pub error_handler: Option<ErrorHandler>,

    /// When set, developer warnings go here instead of the diagnostic sink.
    pub warn_handler: Option<WarnHandler>,

    pub compiler_options: CompilerOptions,
}

impl AppConfig {
    /// Creates a configuration whose native-tag predicate is fixed to `is_native_tag`.
    #[must_use]
    pub fn with_native_tag(is_native_tag: NativeTagPredicate) -> Self {
        Self {
            is_native_tag,
            ..Self::default()
        }
    }

    /// Returns `true` if `tag` names a platform-native element.
    #[must_use]
    pub fn is_native_tag(&self, tag: &str) -> bool {
        (self.is_native_tag)(tag)
    }

    /// Shares the native-tag predicate.
    #[must_use]
    pub fn native_tag_predicate(&self) -> NativeTagPredicate {
        Rc::clone(&self.is_native_tag)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            is_native_tag: Rc::new(|_: &str| false),
            performance: false,
            option_merge_strategies: HashMap::new(),
            global_properties: Data::new(),
            error_handler: None,
            warn_handler: None,
            compiler_options: CompilerOptions::default(),
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut strategies: Vec<&String> = self.option_merge_strategies.keys().collect();
        strategies.sort();
        f.debug_struct("AppConfig")
            .field("performance", &self.performance)
            .field("option_merge_strategies", &strategies)
            .field("global_properties", &self.global_properties)
            .field("error_handler", &self.error_handler.is_some())
            .field("warn_handler", &self.warn_handler.is_some())
            .field("compiler_options", &self.compiler_options)
            .finish_non_exhaustive()
    }
}
