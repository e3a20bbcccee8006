//! Project templates
//!
//! - `loader`: embedded template sources and the `project-templates.yaml` manifest
//! - `renderer`: Tera rendering of the manifest into a project directory
//! - `notebook`: the optional example Jupyter notebook

pub mod loader;
pub mod notebook;
pub mod renderer;

pub use loader::{ActivationTemplates, TemplateFile, TemplateLoader, TemplateManifest};
pub use notebook::{example_notebook, render_notebook, NOTEBOOK_FILE};
pub use renderer::{TemplateContext, TemplateRenderer};
