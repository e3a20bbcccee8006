//! Project scaffolding
//!
//! [`Scaffolder::scaffold`] runs every step in order. The steps are public
//! so a front end can report progress between them:
//!
//! 1. [`Scaffolder::create_structure`]
//! 2. [`Scaffolder::resolve_ofire_requirement`]
//! 3. [`Scaffolder::write_files`]
//! 4. [`Scaffolder::write_notebook`] (only with `include_notebook`)
//! 5. [`Scaffolder::create_environment`]
//! 6. [`Scaffolder::install_requirements`]
//! 7. [`Scaffolder::write_activation_script`]
//!
//! A failing step aborts the run. Whatever was already written stays on disk.

use crate::config::ToolConfig;
use crate::environment;
use crate::error::{Error, Result};
use crate::process::CommandRunner;
use crate::templates::renderer::write_file;
use crate::templates::{render_notebook, TemplateContext, TemplateRenderer, NOTEBOOK_FILE};
use crate::types::{Platform, ProjectDescriptor, ScaffoldReport, VenvLayout, PROJECT_SUBDIRS};
use crate::version_lookup::{ofire_requirement, VersionLookup};
use camino::{Utf8Path, Utf8PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Everything the scaffolder needs from the environment, resolved up front
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldConfig {
    pub platform: Platform,
    /// System interpreter used to create the environment
    pub python: String,
    pub docs_url: String,
    pub streamlit_min_version: String,
    pub fallback_ofire_version: String,
    /// Ask the package index for the newest ofire release
    pub package_index_lookup: bool,
    pub index_timeout: Duration,
}

impl ScaffoldConfig {
    pub fn from_tool_config(config: &ToolConfig, platform: Platform) -> Self {
        Self {
            platform,
            python: config.python_for(platform),
            docs_url: config.docs_url.clone(),
            streamlit_min_version: config.streamlit_min_version.clone(),
            fallback_ofire_version: config.fallback_ofire_version.clone(),
            package_index_lookup: config.package_index_lookup,
            index_timeout: config.index_timeout(),
        }
    }
}

/// Creates OpenFire projects on disk
pub struct Scaffolder<'a> {
    config: ScaffoldConfig,
    runner: &'a dyn CommandRunner,
    renderer: TemplateRenderer,
}

impl<'a> Scaffolder<'a> {
    pub fn new(config: ScaffoldConfig, runner: &'a dyn CommandRunner) -> Result<Self> {
        Ok(Self {
            config,
            runner,
            renderer: TemplateRenderer::new()?,
        })
    }

    pub fn config(&self) -> &ScaffoldConfig {
        &self.config
    }

    /// Run all steps and report what was created
    pub fn scaffold(&self, descriptor: &ProjectDescriptor) -> Result<ScaffoldReport> {
        let project_dir = self.create_structure(descriptor)?;
        let requirement = self.resolve_ofire_requirement();
        let context = self.template_context(descriptor, &project_dir, &requirement);

        let mut files = self.write_files(&context, &project_dir)?;
        if descriptor.include_notebook {
            files.push(self.write_notebook(descriptor, &project_dir)?);
        }

        let venv = self.create_environment(&project_dir)?;
        self.install_requirements(&venv, &project_dir)?;
        files.push(self.write_activation_script(&context, &project_dir)?);

        info!("Project '{}' created at {}", descriptor.name, project_dir);
        Ok(ScaffoldReport {
            project_dir,
            files,
            venv_dir: venv.root,
            ofire_requirement: requirement,
        })
    }

    /// Create the project directory and its standard sub-directories.
    ///
    /// Returns the absolute project path. Existing directories are reused.
    pub fn create_structure(&self, descriptor: &ProjectDescriptor) -> Result<Utf8PathBuf> {
        let project_dir = descriptor.project_dir();
        info!("Creating project structure at {}", project_dir);

        std::fs::create_dir_all(&project_dir)?;
        for sub in PROJECT_SUBDIRS {
            std::fs::create_dir_all(project_dir.join(sub))?;
        }

        absolute_path(&project_dir)
    }

    /// Requirement line for ofire, from the package index when reachable
    pub fn resolve_ofire_requirement(&self) -> String {
        let version = if self.config.package_index_lookup {
            VersionLookup::new(self.runner, &self.config.python, self.config.index_timeout)
                .latest_or(&self.config.fallback_ofire_version)
        } else {
            debug!("Package index lookup disabled");
            self.config.fallback_ofire_version.clone()
        };
        ofire_requirement(&version)
    }

    /// Template variables for this project
    pub fn template_context(
        &self,
        descriptor: &ProjectDescriptor,
        project_dir: &Utf8Path,
        ofire_requirement: &str,
    ) -> TemplateContext {
        let venv = VenvLayout::new(project_dir, self.config.platform);
        TemplateContext::new(&descriptor.name, ofire_requirement)
            .with_notebook(descriptor.include_notebook)
            .with_streamlit_min_version(&self.config.streamlit_min_version)
            .with_venv_dir(&venv.root)
            .with_docs_url(&self.config.docs_url)
            .with_platform(self.config.platform)
    }

    /// Render the project files listed in the template manifest
    pub fn write_files(
        &self,
        context: &TemplateContext,
        project_dir: &Utf8Path,
    ) -> Result<Vec<Utf8PathBuf>> {
        info!("Writing project files");
        self.renderer.render_project(context, project_dir)
    }

    pub fn write_notebook(
        &self,
        descriptor: &ProjectDescriptor,
        project_dir: &Utf8Path,
    ) -> Result<Utf8PathBuf> {
        let path = project_dir.join(NOTEBOOK_FILE);
        info!("Writing example notebook {}", path);
        write_file(&path, &render_notebook(&descriptor.name)?)?;
        Ok(path)
    }

    pub fn create_environment(&self, project_dir: &Utf8Path) -> Result<VenvLayout> {
        environment::create_environment(
            self.runner,
            &self.config.python,
            project_dir,
            self.config.platform,
        )
    }

    pub fn install_requirements(&self, venv: &VenvLayout, project_dir: &Utf8Path) -> Result<()> {
        environment::install_requirements(self.runner, venv, project_dir)
    }

    pub fn write_activation_script(
        &self,
        context: &TemplateContext,
        project_dir: &Utf8Path,
    ) -> Result<Utf8PathBuf> {
        let content = self
            .renderer
            .render_activation(context, self.config.platform)?;
        environment::write_activation_script(project_dir, self.config.platform, &content)
    }
}

/// Absolute form of `path` without resolving symlinks. Never a `\\?\`
/// verbatim path on Windows.
fn absolute_path(path: &Utf8Path) -> Result<Utf8PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let absolute = std::path::absolute(path)?;
    Utf8PathBuf::from_path_buf(absolute)
        .map_err(|p| Error::invalid_config(format!("Path is not valid UTF-8: {}", p.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::testing::RecordingRunner;
    use tempfile::TempDir;

    fn config(lookup: bool) -> ScaffoldConfig {
        ScaffoldConfig {
            platform: Platform::Linux,
            python: "python3".to_string(),
            docs_url: "https://emberon-tech.github.io/openfire/".to_string(),
            streamlit_min_version: "1.28.0".to_string(),
            fallback_ofire_version: "0.1.0".to_string(),
            package_index_lookup: lookup,
            index_timeout: Duration::from_secs(10),
        }
    }

    fn descriptor(temp: &TempDir, notebook: bool) -> ProjectDescriptor {
        let target = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        ProjectDescriptor::new("demo_project", target, notebook).unwrap()
    }

    #[test]
    fn test_from_tool_config() {
        let tool = ToolConfig::defaults().unwrap();
        let config = ScaffoldConfig::from_tool_config(&tool, Platform::Windows);
        assert_eq!(config.python, "python");
        assert_eq!(config.index_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_create_structure_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let scaffolder = Scaffolder::new(config(false), &runner).unwrap();
        let desc = descriptor(&temp, false);

        let first = scaffolder.create_structure(&desc).unwrap();
        let second = scaffolder.create_structure(&desc).unwrap();

        assert_eq!(first, second);
        for sub in PROJECT_SUBDIRS {
            assert!(first.join(sub).is_dir());
        }
    }

    #[test]
    fn test_create_structure_returns_plain_absolute_path() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let scaffolder = Scaffolder::new(config(false), &runner).unwrap();
        let desc = descriptor(&temp, false);

        let dir = scaffolder.create_structure(&desc).unwrap();

        assert_eq!(dir, desc.project_dir());
        assert!(!dir.as_str().starts_with(r"\\?\"));
    }

    #[test]
    fn test_absolute_path_resolves_relative() {
        let relative = Utf8Path::new("some").join("demo_project");
        let resolved = absolute_path(&relative).unwrap();

        assert!(resolved.is_absolute());
        assert!(resolved.ends_with(&relative));
        assert!(!resolved.as_str().starts_with(r"\\?\"));
    }

    #[test]
    fn test_resolve_requirement_without_lookup() {
        let runner = RecordingRunner::new();
        let scaffolder = Scaffolder::new(config(false), &runner).unwrap();
        assert_eq!(scaffolder.resolve_ofire_requirement(), "ofire>=0.1.0");
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_resolve_requirement_from_index() {
        let runner =
            RecordingRunner::new().respond_ok("ofire (0.4.2)\nAvailable versions: 0.4.2, 0.4.1\n");
        let scaffolder = Scaffolder::new(config(true), &runner).unwrap();
        assert_eq!(scaffolder.resolve_ofire_requirement(), "ofire>=0.4.2");
    }

    #[test]
    fn test_scaffold_runs_steps_in_order() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::new().respond_code(1, "index unavailable");
        let scaffolder = Scaffolder::new(config(true), &runner).unwrap();

        let report = scaffolder.scaffold(&descriptor(&temp, false)).unwrap();

        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 3);
        assert!(calls[0].display().ends_with("-m pip index versions ofire"));
        assert!(calls[1].display().starts_with("python3 -m venv "));
        assert!(calls[2].program.ends_with(".venv/bin/pip"));
        assert_eq!(calls[2].cwd.as_ref(), Some(&report.project_dir));

        assert_eq!(report.ofire_requirement, "ofire>=0.1.0");
        assert_eq!(report.venv_dir, report.project_dir.join(".venv"));
        assert!(report.files.contains(&report.project_dir.join("activate.sh")));
        assert!(!report.project_dir.join(NOTEBOOK_FILE).exists());
    }

    #[test]
    fn test_scaffold_with_notebook() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let scaffolder = Scaffolder::new(config(false), &runner).unwrap();

        let report = scaffolder.scaffold(&descriptor(&temp, true)).unwrap();

        let notebook = report.project_dir.join(NOTEBOOK_FILE);
        assert!(report.files.contains(&notebook));
        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(notebook).unwrap()).unwrap();
        assert_eq!(parsed["nbformat"], 4);
    }

    #[test]
    fn test_scaffold_stops_when_venv_fails() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::new().respond_code(1, "No module named venv");
        let scaffolder = Scaffolder::new(config(false), &runner).unwrap();
        let desc = descriptor(&temp, false);

        let err = scaffolder.scaffold(&desc).unwrap_err();

        assert!(matches!(err, Error::EnvironmentCreation { .. }));
        assert_eq!(runner.calls.borrow().len(), 1);
        // Files written before the failure are left in place
        assert!(desc.project_dir().join("main.py").exists());
        assert!(!desc.project_dir().join("activate.sh").exists());
    }

    #[test]
    fn test_activation_script_points_at_absolute_venv() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let scaffolder = Scaffolder::new(config(false), &runner).unwrap();

        let report = scaffolder.scaffold(&descriptor(&temp, false)).unwrap();

        let script = std::fs::read_to_string(report.project_dir.join("activate.sh")).unwrap();
        assert!(report.venv_dir.is_absolute());
        assert!(script.contains(&format!("source \"{}/bin/activate\"", report.venv_dir)));
    }
}
