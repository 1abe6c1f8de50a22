//! Subscriber setup.

use super::tracer;
use crate::{Config, Result};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use std::path::PathBuf;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default trace file name inside the data directory.
pub const TRACE_FILE_NAME: &str = "hostkit-otlp.json";

/// Where spans go for `config`: `trace_file` if set, otherwise
/// [`TRACE_FILE_NAME`] in [`crate::infrastructure::data_dir`].
#[must_use]
pub fn trace_path(config: &Config) -> PathBuf {
    config
        .trace_file
        .clone()
        .unwrap_or_else(|| crate::infrastructure::data_dir().join(TRACE_FILE_NAME))
}

/// Installs a global subscriber that filters by `config.trace_level`
/// (default `"info"`) and exports spans as OTLP/JSON to [`trace_path`].
///
/// Calling this when a global subscriber already exists is a no-op.
///
/// # Errors
///
/// Returns [`crate::HostkitError::Io`] if the trace directory cannot be
/// created, or [`crate::HostkitError::Config`] if `trace_level` is not a
/// valid filter directive.
///
/// # Example
///
/// ```no_run
/// use hostkit::observability::init_tracing;
/// use hostkit::Config;
///
/// let config = Config {
///     trace_level: Some("hostkit=debug".to_string()),
///     ..Config::default()
/// };
/// init_tracing(&config)?;
/// tracing::debug!("tracing is now active");
/// # Ok::<(), hostkit::HostkitError>(())
/// ```
pub fn init_tracing(config: &Config) -> Result<()> {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_new(level)
        .map_err(|e| crate::HostkitError::Config(format!("invalid trace_level {level:?}: {e}")))?;

    let path = trace_path(config);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }

    let resource = Resource::new(vec![
        KeyValue::new("service.name", "hostkit"),
        KeyValue::new("service.version", crate::VERSION),
    ]);
    let provider = tracer::tracer_provider(path, resource);
    let layer = OpenTelemetryLayer::new(provider.tracer("hostkit"));

    if tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("global subscriber already installed, keeping it");
    }
    Ok(())
}
