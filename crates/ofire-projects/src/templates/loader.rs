//! Embedded template assets and the manifest describing them.
//!
//! The manifest (`project-templates.yaml`) lists which files a new project
//! gets and which template renders each one. The template sources are
//! compiled into the binary next to it.

use crate::error::{Error, Result};
use crate::types::Platform;
use rust_embed::RustEmbed;
use serde::Deserialize;

#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/templates/"]
struct ProjectTemplates;

/// Manifest file inside the embedded template folder
pub const MANIFEST_FILE: &str = "project-templates.yaml";

/// Extension marking a file as a Tera template
pub const TEMPLATE_EXTENSION: &str = ".tera";

/// Parsed `project-templates.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateManifest {
    pub version: String,

    /// Files rendered into every project, in write order
    pub files: Vec<TemplateFile>,

    /// Activation helper template per platform family
    pub activation: ActivationTemplates,
}

/// One generated file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateFile {
    /// Destination relative to the project directory
    pub path: String,
    /// Template name within the embedded set
    pub template: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActivationTemplates {
    pub unix: String,
    pub windows: String,
}

impl ActivationTemplates {
    /// Template rendering the activation script for `platform`
    pub fn for_platform(&self, platform: Platform) -> &str {
        if platform.is_windows() {
            &self.windows
        } else {
            &self.unix
        }
    }
}

impl TemplateManifest {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let manifest: Self = serde_yaml_ng::from_str(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        for file in &self.files {
            if file.path.trim().is_empty() {
                return Err(Error::invalid_config(format!(
                    "Template '{}' has an empty destination path",
                    file.template
                )));
            }
        }
        Ok(())
    }

    /// Every template name the manifest refers to
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .map(|f| f.template.as_str())
            .chain([self.activation.unix.as_str(), self.activation.windows.as_str()])
    }
}

/// Access to the embedded template set
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    manifest: TemplateManifest,
}

impl TemplateLoader {
    /// Load the manifest compiled into the binary
    pub fn from_embedded() -> Result<Self> {
        let yaml = embedded_source(MANIFEST_FILE)?;
        Ok(Self {
            manifest: TemplateManifest::from_yaml(&yaml)?,
        })
    }

    pub fn manifest(&self) -> &TemplateManifest {
        &self.manifest
    }

    /// Names and sources of every embedded `.tera` template
    pub fn sources(&self) -> Result<Vec<(String, String)>> {
        ProjectTemplates::iter()
            .filter(|name| name.ends_with(TEMPLATE_EXTENSION))
            .map(|name| {
                let source = embedded_source(&name)?;
                Ok((name.to_string(), source))
            })
            .collect()
    }
}

/// Raw text of an embedded template file
pub fn embedded_source(name: &str) -> Result<String> {
    let file = ProjectTemplates::get(name).ok_or_else(|| Error::template_not_found(name))?;
    String::from_utf8(file.data.into_owned())
        .map_err(|_| Error::invalid_config(format!("Invalid UTF-8 in template: {}", name)))
}
