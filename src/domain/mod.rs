//! Domain layer: errors, definitions and the identity cache.
//!
//! These types carry no host or renderer knowledge and are shared by the
//! application layer and the host adapters.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`component`]: Component and directive definitions
//! - [`cache`]: Identity-keyed cache with weak keys
//!
//! # Examples
//!
//! ```
//! use hostkit::domain::{Component, ComponentDefinition};
//!
//! let card = Component::new(ComponentDefinition::named("Card").with_props(["title"]));
//! assert_eq!(card.display_name(), "Card");
//! ```

pub mod cache;
pub mod component;
pub mod error;

pub use cache::IdentityCache;
pub use component::{
    Component, ComponentDefinition, Data, Directive, DirectiveDefinition, DirectiveHook,
};
pub use error::{HostkitError, Result};
