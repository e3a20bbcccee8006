//! Template rendering with Tera.

use super::loader::{TemplateLoader, TemplateManifest};
use crate::error::Result;
use crate::types::Platform;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tera::Tera;
use tracing::debug;

/// Variables available to every project template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateContext {
    pub project_name: String,
    pub include_notebook: bool,
    /// Full requirement line, e.g. `ofire>=0.3.1`
    pub ofire_requirement: String,
    pub streamlit_min_version: String,
    /// Absolute path of the project's virtual environment
    pub venv_dir: String,
    pub docs_url: String,
    pub platform: String,
    /// Creation date, `YYYY-MM-DD`
    pub date: String,
}

impl TemplateContext {
    pub fn new(project_name: impl Into<String>, ofire_requirement: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            include_notebook: false,
            ofire_requirement: ofire_requirement.into(),
            streamlit_min_version: "1.28.0".to_string(),
            venv_dir: String::new(),
            docs_url: String::new(),
            platform: Platform::Linux.to_string(),
            date: Local::now().format("%Y-%m-%d").to_string(),
        }
    }

    pub fn with_notebook(mut self, include_notebook: bool) -> Self {
        self.include_notebook = include_notebook;
        self
    }

    pub fn with_streamlit_min_version(mut self, version: impl Into<String>) -> Self {
        self.streamlit_min_version = version.into();
        self
    }

    pub fn with_venv_dir(mut self, venv_dir: &Utf8Path) -> Self {
        self.venv_dir = venv_dir.to_string();
        self
    }

    pub fn with_docs_url(mut self, docs_url: impl Into<String>) -> Self {
        self.docs_url = docs_url.into();
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform.to_string();
        self
    }

    fn to_tera(&self) -> Result<tera::Context> {
        Ok(tera::Context::from_serialize(self)?)
    }
}

/// Renders the embedded templates into a project directory
#[derive(Debug)]
pub struct TemplateRenderer {
    tera: Tera,
    manifest: TemplateManifest,
}

impl TemplateRenderer {
    /// Renderer over the templates compiled into the binary
    pub fn new() -> Result<Self> {
        Self::from_loader(&TemplateLoader::from_embedded()?)
    }

    pub fn from_loader(loader: &TemplateLoader) -> Result<Self> {
        let mut tera = Tera::default();
        // Outputs are Python, Markdown and shell, never HTML
        tera.autoescape_on(vec![]);

        for (name, source) in loader.sources()? {
            tera.add_raw_template(&name, &source)?;
        }

        Ok(Self {
            tera,
            manifest: loader.manifest().clone(),
        })
    }

    pub fn manifest(&self) -> &TemplateManifest {
        &self.manifest
    }

    /// Render one template to a string
    pub fn render(&self, template: &str, context: &TemplateContext) -> Result<String> {
        Ok(self.tera.render(template, &context.to_tera()?)?)
    }

    /// Render every manifest file into `project_dir`, overwriting existing files.
    ///
    /// Returns the written paths in manifest order.
    pub fn render_project(
        &self,
        context: &TemplateContext,
        project_dir: &Utf8Path,
    ) -> Result<Vec<Utf8PathBuf>> {
        let tera_context = context.to_tera()?;
        let mut written = Vec::with_capacity(self.manifest.files.len());

        for file in &self.manifest.files {
            let content = self.tera.render(&file.template, &tera_context)?;
            let path = project_dir.join(&file.path);
            write_file(&path, &content)?;
            debug!("Rendered {} -> {}", file.template, path);
            written.push(path);
        }

        Ok(written)
    }

    /// Render the activation helper for `platform`
    pub fn render_activation(&self, context: &TemplateContext, platform: Platform) -> Result<String> {
        self.render(self.manifest.activation.for_platform(platform), context)
    }
}

pub(crate) fn write_file(path: &Utf8Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
