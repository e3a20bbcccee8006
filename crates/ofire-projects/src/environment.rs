//! Project virtual environment management
//!
//! Creates `.venv` with the system interpreter, installs the project's
//! requirements into it and writes the activation helper.

use crate::error::{Error, Result};
use crate::process::{CommandRunner, CommandSpec};
use crate::types::{Platform, VenvLayout, REQUIREMENTS_FILE};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

/// Create `<project>/.venv` using `python -m venv`.
///
/// Re-running against an existing environment is harmless; venv upgrades
/// it in place.
pub fn create_environment(
    runner: &dyn CommandRunner,
    python: &str,
    project_dir: &Utf8Path,
    platform: Platform,
) -> Result<VenvLayout> {
    let layout = VenvLayout::new(project_dir, platform);
    info!("Creating virtual environment at {}", layout.root);

    let spec = CommandSpec::new(python)
        .args(["-m", "venv"])
        .arg(layout.root.as_str())
        .current_dir(project_dir);
    let output = runner.run(&spec).map_err(|e| match e {
        Error::CommandSpawn { .. } => Error::environment_creation(e.to_string(), ""),
        other => other,
    })?;

    if !output.success() {
        return Err(Error::environment_creation(
            format!("'{}' failed with {}", spec.display(), output.status_text()),
            output.stderr.trim(),
        ));
    }

    Ok(layout)
}

/// Install `requirements.txt` with the environment's own pip
pub fn install_requirements(
    runner: &dyn CommandRunner,
    layout: &VenvLayout,
    project_dir: &Utf8Path,
) -> Result<()> {
    info!("Installing requirements into {}", layout.root);

    let pip = layout.pip();
    let spec = CommandSpec::new(pip.as_str())
        .args(["install", "-r", REQUIREMENTS_FILE])
        .current_dir(project_dir);
    let output = runner.run(&spec).map_err(|e| match e {
        Error::CommandSpawn { .. } => Error::dependency_install(e.to_string(), ""),
        other => other,
    })?;

    if !output.success() {
        return Err(Error::dependency_install(
            format!("'{}' failed with {}", spec.display(), output.status_text()),
            output.stderr.trim(),
        ));
    }

    debug!("pip output:\n{}", output.stdout);
    Ok(())
}

/// Write the activation helper into the project directory.
///
/// The Unix script is made executable.
pub fn write_activation_script(
    project_dir: &Utf8Path,
    platform: Platform,
    content: &str,
) -> Result<Utf8PathBuf> {
    let path = project_dir.join(platform.activation_script_name());
    std::fs::write(&path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if !platform.is_windows() {
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
        }
    }

    debug!("Wrote activation script {}", path);
    Ok(path)
}
