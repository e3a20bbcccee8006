//! Tool configuration with layered precedence
//!
//! Loads configuration from the following sources (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. User config (~/.ofire/config.yaml)
//! 3. Environment variables (OFIRE_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::Platform;
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::debug;

#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/config/"]
struct EmbeddedConfig;

const DEFAULTS_FILE: &str = "defaults.yaml";
const USER_CONFIG_FILE: &str = "config.yaml";

/// Runtime configuration for scaffolding, running and docs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ToolConfig {
    /// System Python used to create environments; empty means platform default
    #[serde(default)]
    pub python: String,

    /// Documentation URL opened by `ofire docs`
    pub docs_url: String,

    /// Timeout for the package index lookup
    pub index_timeout_secs: u64,

    /// Query the package index for the latest ofire release
    pub package_index_lookup: bool,

    /// Version used in requirements.txt when the lookup fails
    pub fallback_ofire_version: String,

    /// Minimum streamlit version written to requirements.txt
    pub streamlit_min_version: String,
}

/// Partial config as read from the user file; absent keys keep lower layers
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ToolConfigOverlay {
    python: Option<String>,
    docs_url: Option<String>,
    index_timeout_secs: Option<u64>,
    package_index_lookup: Option<bool>,
    fallback_ofire_version: Option<String>,
    streamlit_min_version: Option<String>,
}

impl ToolConfig {
    /// Load the embedded defaults only
    pub fn defaults() -> Result<Self> {
        let file = EmbeddedConfig::get(DEFAULTS_FILE).ok_or_else(|| {
            Error::invalid_config(format!("Embedded config not found: {}", DEFAULTS_FILE))
        })?;
        let content = std::str::from_utf8(&file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", DEFAULTS_FILE))
        })?;
        Ok(serde_yaml_ng::from_str(content)?)
    }

    /// Python command to use on the given platform
    pub fn python_for(&self, platform: Platform) -> String {
        if self.python.trim().is_empty() {
            platform.default_python().to_string()
        } else {
            self.python.clone()
        }
    }

    pub fn index_timeout(&self) -> Duration {
        Duration::from_secs(self.index_timeout_secs)
    }

    fn merge(mut self, overlay: ToolConfigOverlay) -> Self {
        if let Some(v) = overlay.python {
            self.python = v;
        }
        if let Some(v) = overlay.docs_url {
            self.docs_url = v;
        }
        if let Some(v) = overlay.index_timeout_secs {
            self.index_timeout_secs = v;
        }
        if let Some(v) = overlay.package_index_lookup {
            self.package_index_lookup = v;
        }
        if let Some(v) = overlay.fallback_ofire_version {
            self.fallback_ofire_version = v;
        }
        if let Some(v) = overlay.streamlit_min_version {
            self.streamlit_min_version = v;
        }
        self
    }
}

/// Loads [`ToolConfig`] from all layers
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: Option<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Loader reading the user file from ~/.ofire
    pub fn new() -> Self {
        Self {
            config_dir: default_config_dir(),
        }
    }

    /// Loader with a custom config directory
    pub fn with_dir(config_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            config_dir: Some(config_dir.into()),
        }
    }

    pub fn load(&self) -> Result<ToolConfig> {
        let mut config = ToolConfig::defaults()?;

        if let Some(path) = self.config_dir.as_ref().map(|d| d.join(USER_CONFIG_FILE)) {
            if path.exists() {
                debug!("Loading user config from {}", path);
                config = config.merge(load_overlay(&path)?);
            }
        }

        apply_env_overrides(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the ofire config directory (~/.ofire)
fn default_config_dir() -> Option<Utf8PathBuf> {
    // HOME first so containers that override it are respected
    let home = env::var("HOME")
        .ok()
        .filter(|h| !h.is_empty())
        .map(std::path::PathBuf::from)
        .or_else(dirs::home_dir)?;
    Utf8PathBuf::from_path_buf(home)
        .ok()
        .map(|h| h.join(".ofire"))
}

fn load_overlay(path: &Utf8Path) -> Result<ToolConfigOverlay> {
    let content = std::fs::read_to_string(path)?;
    serde_yaml_ng::from_str(&content)
        .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
}

fn apply_env_overrides(mut config: ToolConfig) -> Result<ToolConfig> {
    if let Ok(val) = env::var("OFIRE_PYTHON") {
        config.python = val;
    }

    if let Ok(val) = env::var("OFIRE_DOCS_URL") {
        config.docs_url = val;
    }

    if let Ok(val) = env::var("OFIRE_INDEX_TIMEOUT_SECS") {
        config.index_timeout_secs = val.parse().map_err(|_| {
            Error::invalid_config("OFIRE_INDEX_TIMEOUT_SECS must be a valid number")
        })?;
    }

    if let Ok(val) = env::var("OFIRE_PACKAGE_INDEX_LOOKUP") {
        config.package_index_lookup = val.parse().map_err(|_| {
            Error::invalid_config("OFIRE_PACKAGE_INDEX_LOOKUP must be true or false")
        })?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    const ENV_VARS: &[&str] = &[
        "OFIRE_PYTHON",
        "OFIRE_DOCS_URL",
        "OFIRE_INDEX_TIMEOUT_SECS",
        "OFIRE_PACKAGE_INDEX_LOOKUP",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            env::remove_var(var);
        }
    }

    fn create_temp_loader() -> (ConfigLoader, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_dir =
            Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).expect("Invalid UTF-8 path");
        (ConfigLoader::with_dir(config_dir), temp_dir)
    }

    #[test]
    fn test_embedded_defaults() {
        let config = ToolConfig::defaults().unwrap();
        assert_eq!(config.docs_url, "https://emberon-tech.github.io/openfire/");
        assert_eq!(config.index_timeout_secs, 10);
        assert!(config.package_index_lookup);
        assert_eq!(config.fallback_ofire_version, "0.1.0");
        assert_eq!(config.streamlit_min_version, "1.28.0");
    }

    #[test]
    fn test_python_for_platform_default() {
        let config = ToolConfig::defaults().unwrap();
        assert_eq!(config.python_for(Platform::Linux), "python3");
        assert_eq!(config.python_for(Platform::Windows), "python");
    }

    #[test]
    #[serial]
    fn test_user_file_overrides_defaults() {
        clear_env();
        let (loader, temp) = create_temp_loader();
        std::fs::write(
            temp.path().join("config.yaml"),
            "python: /opt/python/bin/python3.12\nindex-timeout-secs: 3\n",
        )
        .unwrap();

        let config = loader.load().unwrap();
        assert_eq!(config.python, "/opt/python/bin/python3.12");
        assert_eq!(config.index_timeout(), Duration::from_secs(3));
        // Untouched keys keep their defaults
        assert_eq!(config.docs_url, "https://emberon-tech.github.io/openfire/");
    }

    #[test]
    #[serial]
    fn test_missing_user_file_is_fine() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        let config = loader.load().unwrap();
        assert_eq!(config, ToolConfig::defaults().unwrap());
    }

    #[test]
    #[serial]
    fn test_env_overrides_user_file() {
        clear_env();
        let (loader, temp) = create_temp_loader();
        std::fs::write(temp.path().join("config.yaml"), "docs-url: http://file\n").unwrap();

        env::set_var("OFIRE_DOCS_URL", "http://env");
        env::set_var("OFIRE_PACKAGE_INDEX_LOOKUP", "false");
        let config = loader.load();
        clear_env();

        let config = config.unwrap();
        assert_eq!(config.docs_url, "http://env");
        assert!(!config.package_index_lookup);
    }

    #[test]
    #[serial]
    fn test_invalid_env_timeout() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        env::set_var("OFIRE_INDEX_TIMEOUT_SECS", "soon");
        let result = loader.load();
        clear_env();

        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    #[serial]
    fn test_malformed_user_file() {
        clear_env();
        let (loader, temp) = create_temp_loader();
        std::fs::write(temp.path().join("config.yaml"), "index-timeout-secs: [nope\n").unwrap();
        assert!(loader.load().is_err());
    }
}
