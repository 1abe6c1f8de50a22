//! Predicate and string utilities shared by the application core and the DOM target.
//!
//! Everything here is stateless apart from the memo tables behind the string
//! transforms, which are read-mostly and keyed purely by input.
//!
//! # Modules
//!
//! - [`strings`]: memoized case transforms (`camelize`, `hyphenate`, ...)
//! - [`tags`]: HTML/SVG tag tables and reserved-name predicates

pub mod strings;
pub mod tags;

pub use strings::{camelize, capitalize, hyphenate, to_handler_key};
pub use tags::{
    is_builtin_directive, is_builtin_tag, is_html_tag, is_reserved_prop, is_svg_tag, is_void_tag,
};
