//! Core types for project scaffolding

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Sub-directories created inside every new project
pub const PROJECT_SUBDIRS: &[&str] = &["data", "results", "scripts"];

/// Name of the isolated environment directory inside a project
pub const VENV_DIR_NAME: &str = ".venv";

/// Requirements file written into every project
pub const REQUIREMENTS_FILE: &str = "requirements.txt";

/// Host platform, passed explicitly into every operation that cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Linux and other non-macOS Unix systems
    Linux,
    /// macOS (Darwin)
    #[serde(rename = "macos")]
    MacOS,
    /// Windows
    Windows,
}

impl Platform {
    /// Detect the platform this binary was built for
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => Self::Windows,
            "macos" => Self::MacOS,
            _ => Self::Linux,
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, Self::Windows)
    }

    /// Directory holding executables inside a virtual environment
    pub fn venv_bin_dir(&self) -> &'static str {
        if self.is_windows() {
            "Scripts"
        } else {
            "bin"
        }
    }

    /// Append the platform executable suffix to a program name
    pub fn executable(&self, name: &str) -> String {
        if self.is_windows() {
            format!("{}.exe", name)
        } else {
            name.to_string()
        }
    }

    /// Default system Python command for this platform
    pub fn default_python(&self) -> &'static str {
        if self.is_windows() {
            "python"
        } else {
            "python3"
        }
    }

    /// File name of the environment activation helper
    pub fn activation_script_name(&self) -> &'static str {
        if self.is_windows() {
            "activate.bat"
        } else {
            "activate.sh"
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::MacOS => "macos",
            Self::Windows => "windows",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything needed to scaffold one project, built from CLI arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    /// Project name, also the directory name
    pub name: String,
    /// Directory the project directory is created in
    pub target_dir: Utf8PathBuf,
    /// Whether to write the example notebook
    pub include_notebook: bool,
}

impl ProjectDescriptor {
    /// Create a validated descriptor
    pub fn new(
        name: impl Into<String>,
        target_dir: impl Into<Utf8PathBuf>,
        include_notebook: bool,
    ) -> Result<Self> {
        let name = name.into();
        validate_project_name(&name)?;
        Ok(Self {
            name,
            target_dir: target_dir.into(),
            include_notebook,
        })
    }

    /// Path of the project directory
    pub fn project_dir(&self) -> Utf8PathBuf {
        self.target_dir.join(&self.name)
    }
}

/// Check that a project name can be used as a single directory name
pub fn validate_project_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_project_name(name, "Name must not be empty"));
    }
    if name == "." || name == ".." {
        return Err(Error::invalid_project_name(
            name,
            "Name must not be a relative directory reference",
        ));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(Error::invalid_project_name(
            name,
            "Name must not contain path separators",
        ));
    }
    Ok(())
}

/// Summary of a completed scaffold
#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldReport {
    /// Absolute project directory
    pub project_dir: Utf8PathBuf,
    /// Files written, in creation order
    pub files: Vec<Utf8PathBuf>,
    /// Virtual environment directory
    pub venv_dir: Utf8PathBuf,
    /// The ofire requirement line written to requirements.txt
    pub ofire_requirement: String,
}

/// Paths inside a project's virtual environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenvLayout {
    pub root: Utf8PathBuf,
    platform: Platform,
}

impl VenvLayout {
    pub fn new(project_dir: &Utf8Path, platform: Platform) -> Self {
        Self {
            root: project_dir.join(VENV_DIR_NAME),
            platform,
        }
    }

    pub fn bin_dir(&self) -> Utf8PathBuf {
        self.root.join(self.platform.venv_bin_dir())
    }

    pub fn python(&self) -> Utf8PathBuf {
        self.bin_dir().join(self.platform.executable("python"))
    }

    pub fn pip(&self) -> Utf8PathBuf {
        self.bin_dir().join(self.platform.executable("pip"))
    }
}
