//! Configuration file loading for vesm.
//!
//! Reads `vesm.config.json` from the current working directory. Command-line
//! flags take precedence over every value read here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::BuildError;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = "vesm.config.json";

/// Top-level vesm configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VesmConfig {
    /// JSON Schema reference (for editor autocompletion).
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Build configuration.
    #[serde(default)]
    pub build: BuildConfig,
}

/// Configuration for the `build` command.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    /// Output directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Module whose imports are never returned from setup (e.g. `"vue"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework_module: Option<String>,

    /// Runtime function used to load `.vue` imports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_loader: Option<String>,
}

/// Load `vesm.config.json` from the given directory (or CWD if None).
///
/// A missing file yields the default config; an unreadable or invalid one
/// is reported as a warning and ignored.
pub fn load_config(dir: Option<&Path>) -> VesmConfig {
    let base = dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    let config_path = base.join(CONFIG_FILE);

    if !config_path.exists() {
        return VesmConfig::default();
    }

    read_config(&config_path).unwrap_or_else(|err| {
        warn!("{}", err);
        VesmConfig::default()
    })
}

fn read_config(path: &Path) -> Result<VesmConfig, BuildError> {
    let content = std::fs::read_to_string(path).map_err(|source| BuildError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| BuildError::Config {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_default() {
        let dir = TempDir::new().unwrap();
        let config = load_config(Some(dir.path()));
        assert!(config.build.output.is_none());
        assert!(config.schema.is_none());
    }

    #[test]
    fn test_load_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "build": { "output": "out", "componentLoader": "loadVue" } }"#,
        )
        .unwrap();
        let config = load_config(Some(dir.path()));
        assert_eq!(config.build.output, Some(PathBuf::from("out")));
        assert_eq!(config.build.component_loader.as_deref(), Some("loadVue"));
        assert!(config.build.framework_module.is_none());
    }

    #[test]
    fn test_invalid_config_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(read_config(&path), Err(BuildError::Config { .. })));
        assert!(load_config(Some(dir.path())).build.output.is_none());
    }
}
