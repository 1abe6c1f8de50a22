//! Document-object-model rendering target.
//!
//! An in-process document ([`Document`]) plus the [`DomOps`] adapter that
//! exposes it through the [`HostOps`](crate::host::HostOps) contract.
//!
//! # Organization
//!
//! - [`document`]: Node arena, thread-local global document, inspection helpers
//! - [`markup`]: Lenient parser for pre-rendered markup
//! - [`selector`]: Selector matching used by `query_selector`
//! - `serialize`: HTML output for inspection
//! - [`ops`]: The `HostOps` implementation

pub mod document;
pub mod markup;
pub mod ops;
pub mod selector;
mod serialize;

pub use document::{Document, Namespace, NodeId, NodeType};
pub use ops::DomOps;
pub use selector::Selector;
