//! Memoized string transforms.
//!
//! Component and event names are normalized over and over during rendering, so
//! each transform keeps a process-wide cache keyed by its input. The transforms
//! are pure functions of their input, which makes the caches safe to share
//! between independent applications.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// A lazily-created, process-wide memo table for one string transform.
struct Memo {
    table: OnceLock<Mutex<HashMap<String, String>>>,
}

impl Memo {
    const fn new() -> Self {
        Self {
            table: OnceLock::new(),
        }
    }

    fn get_or_compute(&self, input: &str, compute: impl FnOnce(&str) -> String) -> String {
        let table = self.table.get_or_init(|| Mutex::new(HashMap::new()));
        if let Some(hit) = table.lock().get(input) {
            return hit.clone();
        }
        let value = compute(input);
        table.lock().insert(input.to_string(), value.clone());
        value
    }

    #[cfg(test)]
    fn contains(&self, input: &str) -> bool {
        self.table
            .get()
            .is_some_and(|table| table.lock().contains_key(input))
    }
}

static CAMELIZE: Memo = Memo::new();
static HYPHENATE: Memo = Memo::new();
static CAPITALIZE: Memo = Memo::new();
static HANDLER_KEY: Memo = Memo::new();

const fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Converts `kebab-case` to `camelCase`.
///
/// A hyphen followed by a word character is dropped and the character is
/// upper-cased; any other hyphen is kept.
///
/// ```
/// use hostkit::shared::camelize;
///
/// assert_eq!(camelize("my-component"), "myComponent");
/// assert_eq!(camelize("on-update-value"), "onUpdateValue");
/// ```
#[must_use]
pub fn camelize(input: &str) -> String {
    CAMELIZE.get_or_compute(input, |s| {
        let mut out = String::with_capacity(s.len());
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            match chars.peek() {
                Some(&next) if c == '-' && is_word_char(next) => {
                    out.extend(next.to_uppercase());
                    chars.next();
                }
                _ => out.push(c),
            }
        }
        out
    })
}

/// Converts `camelCase` or `PascalCase` to `kebab-case`.
///
/// A hyphen is inserted before every upper-case ASCII letter that directly
/// follows a word character, then the whole string is lower-cased.
///
/// ```
/// use hostkit::shared::hyphenate;
///
/// assert_eq!(hyphenate("MyComponent"), "my-component");
/// assert_eq!(hyphenate("fooBarBaz"), "foo-bar-baz");
/// ```
#[must_use]
pub fn hyphenate(input: &str) -> String {
    HYPHENATE.get_or_compute(input, |s| {
        let mut out = String::with_capacity(s.len() + 4);
        let mut prev: Option<char> = None;
        for c in s.chars() {
            if c.is_ascii_uppercase() && prev.is_some_and(is_word_char) {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
            prev = Some(c);
        }
        out.to_lowercase()
    })
}

/// Upper-cases the first character.
#[must_use]
pub fn capitalize(input: &str) -> String {
    CAPITALIZE.get_or_compute(input, |s| {
        let mut chars = s.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    })
}

/// Builds the listener prop name for an event: `click` becomes `onClick`.
///
/// The empty event name maps to the empty string.
#[must_use]
pub fn to_handler_key(event: &str) -> String {
    HANDLER_KEY.get_or_compute(event, |s| {
        if s.is_empty() {
            String::new()
        } else {
            format!("on{}", capitalize(s))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camelize_only_consumes_hyphen_before_word_char() {
        assert_eq!(camelize("foo-bar"), "fooBar");
        assert_eq!(camelize("foo--bar"), "foo-Bar");
        assert_eq!(camelize("trailing-"), "trailing-");
        assert_eq!(camelize("a-1"), "a1");
    }

    #[test]
    fn hyphenate_respects_word_boundaries() {
        assert_eq!(hyphenate("fooBar"), "foo-bar");
        assert_eq!(hyphenate("FooBar"), "foo-bar");
        assert_eq!(hyphenate("foo-Bar"), "foo-bar");
        assert_eq!(hyphenate("plain"), "plain");
    }

    #[test]
    fn capitalize_and_handler_key() {
        assert_eq!(capitalize("click"), "Click");
        assert_eq!(capitalize(""), "");
        assert_eq!(to_handler_key("update:modelValue"), "onUpdate:modelValue");
        assert_eq!(to_handler_key(""), "");
    }

    #[test]
    fn repeated_calls_hit_the_memo_table() {
        assert!(!CAMELIZE.contains("memo-probe-value"));
        let first = camelize("memo-probe-value");
        assert!(CAMELIZE.contains("memo-probe-value"));
        assert_eq!(camelize("memo-probe-value"), first);
    }
}
