//! Error types for hostkit.
//!
//! Misuse of the application API (duplicate registrations, double mounts and
//! the like) is never reported through this type; it goes to the diagnostics
//! channel instead. [`HostkitError`] covers conditions that genuinely stop an
//! operation: a missing host environment, unreadable configuration, or a
//! renderer that broke its contract.

use thiserror::Error;

/// The main error type for hostkit operations.
///
/// # Examples
///
/// ```
/// use hostkit::HostkitError;
///
/// fn require_host(found: bool) -> Result<(), HostkitError> {
///     if found {
///         Ok(())
///     } else {
///         Err(HostkitError::HostUnavailable("no document installed".to_string()))
///     }
/// }
///
/// assert!(require_host(false).is_err());
/// ```
#[derive(Debug, Error)]
pub enum HostkitError {
    /// No host environment is available.
    ///
    /// Raised when a host adapter is requested outside any host, e.g. asking
    /// for the DOM adapter on a thread with no current document.
    #[error("Host unavailable: {0}")]
    HostUnavailable(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A TOML configuration document could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The render callback returned without attaching a root component instance.
    #[error("Renderer produced no root component instance for app {uid}")]
    MissingRootInstance {
        /// Id of the application being mounted.
        uid: u64,
    },
}

/// A specialized `Result` type for hostkit operations.
pub type Result<T> = std::result::Result<T, HostkitError>;
