//! Component and directive definitions.
//!
//! Definitions are owned by the code that declares them and shared by
//! reference. Identity matters: two definitions with the same name are still
//! different components, so equality on [`Component`] and [`Directive`] is
//! pointer equality.

use serde_json::{Map, Value};
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

/// A key-value record of JSON values, used for props and option data.
pub type Data = Map<String, Value>;

/// Option-style description of a component.
///
/// Only the options the application layer reads are modeled here; render
/// functions, templates and lifecycle hooks belong to the rendering engine.
#[derive(Debug, Clone, Default)]
pub struct ComponentDefinition {
    /// Display name, used in diagnostics and for self-reference.
    pub name: Option<String>,

    /// Declared prop names, in any case style.
    pub props: Vec<String>,

    /// Declared event names.
    pub emits: Vec<String>,

    /// Base component whose options are merged in before local mixins.
    pub extends: Option<Component>,

    /// Local mixins, merged after `extends` and before the component itself.
    pub mixins: Vec<Component>,

    /// Free-form option values merged through the app's merge strategies.
    pub data: Data,

    /// Names of the instance members exposed to parents and `mount` callers.
    ///
    /// `None` means the whole public proxy is visible.
    pub expose: Option<Vec<String>>,
}

impl ComponentDefinition {
    /// Creates an empty definition with a display name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Replaces the declared props.
    #[must_use]
    pub fn with_props<I, S>(mut self, props: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.props = props.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the declared events.
    #[must_use]
    pub fn with_emits<I, S>(mut self, emits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.emits = emits.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the base component.
    #[must_use]
    pub fn with_extends(mut self, base: Component) -> Self {
        self.extends = Some(base);
        self
    }

    /// Appends a local mixin.
    #[must_use]
    pub fn with_mixin(mut self, mixin: Component) -> Self {
        self.mixins.push(mixin);
        self
    }

    /// Sets one option value.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Restricts the exposed surface to the given member names.
    #[must_use]
    pub fn with_expose<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expose = Some(names.into_iter().map(Into::into).collect());
        self
    }
}

/// Shared handle to a [`ComponentDefinition`], compared by identity.
#[derive(Clone)]
pub struct Component(Rc<ComponentDefinition>);

impl Component {
    /// Wraps a definition.
    #[must_use]
    pub fn new(definition: ComponentDefinition) -> Self {
        Self(Rc::new(definition))
    }

    /// Returns the display name, falling back to `Anonymous`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.0.name.as_deref().unwrap_or("Anonymous")
    }

    /// Returns `true` if both handles refer to the same definition.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Borrows the underlying reference-counted definition.
    #[must_use]
    pub const fn as_rc(&self) -> &Rc<ComponentDefinition> {
        &self.0
    }

    /// Creates a weak reference that does not keep the definition alive.
    #[must_use]
    pub fn downgrade(&self) -> Weak<ComponentDefinition> {
        Rc::downgrade(&self.0)
    }
}

impl From<ComponentDefinition> for Component {
    fn from(definition: ComponentDefinition) -> Self {
        Self::new(definition)
    }
}

impl Deref for Component {
    type Target = ComponentDefinition;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Component {}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Component")
            .field(&self.display_name())
            .field(&Rc::as_ptr(&self.0))
            .finish()
    }
}

/// Lifecycle points a custom directive can hook into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveHook {
    Created,
    BeforeMount,
    Mounted,
    BeforeUpdate,
    Updated,
    BeforeUnmount,
    Unmounted,
}

/// Description of a custom directive: which hooks it implements.
#[derive(Debug, Clone, Default)]
pub struct DirectiveDefinition {
    /// Hooks the directive implements, in declaration order.
    pub hooks: Vec<DirectiveHook>,

    /// Whether the bound value should be traversed deeply for change tracking.
    pub deep: bool,
}

/// Shared handle to a [`DirectiveDefinition`], compared by identity.
#[derive(Clone)]
pub struct Directive(Rc<DirectiveDefinition>);

impl Directive {
    /// Wraps a definition.
    #[must_use]
    pub fn new(definition: DirectiveDefinition) -> Self {
        Self(Rc::new(definition))
    }

    /// The function shorthand: a directive that runs on mount and on update.
    #[must_use]
    pub fn function() -> Self {
        Self::new(DirectiveDefinition {
            hooks: vec![DirectiveHook::Mounted, DirectiveHook::Updated],
            deep: false,
        })
    }

    /// Returns `true` if the directive implements `hook`.
    #[must_use]
    pub fn implements(&self, hook: DirectiveHook) -> bool {
        self.0.hooks.contains(&hook)
    }

    /// Returns `true` if both handles refer to the same definition.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for Directive {
    type Target = DirectiveDefinition;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for Directive {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Directive {}

impl fmt::Debug for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Directive")
            .field("hooks", &self.0.hooks)
            .field("deep", &self.0.deep)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_not_structure_decides_equality() {
        let a = Component::new(ComponentDefinition::named("Card"));
        let b = Component::new(ComponentDefinition::named("Card"));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.display_name(), "Card");
        assert_eq!(Component::new(ComponentDefinition::default()).display_name(), "Anonymous");
    }

    #[test]
    fn function_directive_hooks() {
        let d = Directive::function();
        assert!(d.implements(DirectiveHook::Mounted));
        assert!(d.implements(DirectiveHook::Updated));
        assert!(!d.implements(DirectiveHook::Created));
    }
}
