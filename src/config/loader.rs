// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{GraphConfig, RawGraphConfig};
use crate::errors::Result;

/// Load a graph declaration file and return the raw `RawGraphConfig`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (graph correctness, etc.). Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawGraphConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawGraphConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a graph declaration file from path and run full validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - empty/duplicate node declarations,
///   - unknown `after` references and self-dependencies,
///   - cycles in the declared edge set.
///
/// The returned [`GraphConfig`] carries the validated
/// [`crate::graph::GraphDef`] plus engine options.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<GraphConfig> {
    let raw_config = load_from_path(&path)?;
    let config = GraphConfig::try_from(raw_config)?;
    Ok(config)
}

/// Helper to resolve a default config path.
///
/// Currently this just returns `Calcdag.toml` in the current working
/// directory, but this function exists so you can later respect an env var
/// (e.g. `CALCDAG_CONFIG`) or support project-local discovery.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Calcdag.toml")
}
