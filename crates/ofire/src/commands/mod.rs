//! CLI command implementations

pub mod docs;
pub mod new;
pub mod run;
pub mod version;

use anyhow::{Context, Result};
use ofire_projects::{ConfigLoader, ToolConfig};

/// Load the layered tool configuration
pub(crate) fn load_config() -> Result<ToolConfig> {
    ConfigLoader::new()
        .load()
        .context("Failed to load ofire configuration")
}
