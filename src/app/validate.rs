//! Registration-name checks. Failures are warnings only.

use crate::diagnostics::Reporter;
use crate::shared::{is_builtin_directive, is_builtin_tag};

/// `[A-Za-z][A-Za-z0-9_-]*`
fn is_valid_id(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

pub(super) fn validate_component_name(
    name: &str,
    is_native_tag: &dyn Fn(&str) -> bool,
    reporter: &Reporter,
) {
    if !is_valid_id(name) {
        reporter.warn(format!(
            "Invalid component name: \"{name}\". Component names should conform to valid custom element name in html5 specification."
        ));
    }
    if is_builtin_tag(name) || is_native_tag(name) {
        reporter.warn(format!(
            "Do not use built-in or reserved HTML elements as component id: {name}"
        ));
    }
}

pub(super) fn validate_directive_name(name: &str, reporter: &Reporter) {
    if name.is_empty() {
        reporter.warn("Directive id must not be empty.");
        return;
    }
    if !is_valid_id(name) {
        reporter.warn(format!("Invalid directive id: \"{name}\"."));
    }
    if is_builtin_directive(name) {
        reporter.warn(format!(
            "Do not use built-in directive ids as custom directive id: {name}"
        ));
    }
}
