//! Configuration module
//!
//! YAML configuration with serde defaults for every field, so an empty or
//! missing file yields a working setup against the hosted inference API.

pub mod types;
pub mod loader;

pub use types::*;
pub use loader::*;


use crate::errors::MmdError;
use std::path::Path;

/// Load a configuration from a YAML file, falling back to defaults if it is absent
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<MmdConfig, MmdError> {
    ConfigLoader::from_file_or_default(path).await
}
