//! Span export to local OTLP/JSON files.
//!
//! ```text
//! tracing spans -> tracing-opentelemetry -> OtlpFileExporter -> RotatingFile
//! ```
//!
//! Every finished span is written at once, one OTLP/JSON document per line,
//! to `hostkit-otlp.json` in the [data directory](crate::infrastructure::data_dir)
//! unless [`Config::trace_file`](crate::Config::trace_file) overrides it.
//! Files rotate at 10 MB and three backups are kept.
//!
//! The filter comes from [`Config::trace_level`](crate::Config::trace_level)
//! and defaults to `"info"`.

mod file_writer;
mod init;
mod otlp;
mod tracer;

pub use file_writer::{RotatingFile, RotationPolicy};
pub use init::{init_tracing, trace_path, TRACE_FILE_NAME};
