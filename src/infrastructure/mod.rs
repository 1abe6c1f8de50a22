//! Environment and filesystem helpers.

pub mod paths;

pub use paths::{data_dir, APP_DIR_NAME};
