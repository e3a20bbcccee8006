//! Launching a project's Streamlit application
//!
//! [`LaunchPlan::new`] decides what to run without touching any process, so
//! the decision can be inspected and tested. [`launch`] executes a plan with
//! inherited stdio and waits for the child or Ctrl+C, whichever comes first.

use crate::error::{Error, Result, INSTALL_HINT};
use crate::types::{Platform, VenvLayout};
use camino::{Utf8Path, Utf8PathBuf};
use std::process::ExitStatus;
use tracing::{debug, info};
use url::Url;

/// Script run when no target is given
pub const DEFAULT_ENTRY_POINT: &str = "main.py";

/// Exit code Python reports for an unimportable module (e.g. streamlit not installed)
pub const MISSING_DEPENDENCIES_EXIT_CODE: i32 = 1;

#[cfg(unix)]
const SIGINT: i32 = 2;
#[cfg(unix)]
const SIGTERM: i32 = 15;

/// What Streamlit is asked to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchTarget {
    /// Remote script, passed through untouched
    Url(Url),
    /// Local script path, relative to the working directory or absolute
    Path(String),
}

impl LaunchTarget {
    pub fn parse(target: &str) -> Self {
        match Url::parse(target) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Url(url),
            _ => Self::Path(target.to_string()),
        }
    }
}

/// A fully resolved `python -m streamlit run <target>` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Utf8PathBuf,
    pub target: LaunchTarget,
    /// Whether `program` is the project's own `.venv` interpreter
    pub uses_project_env: bool,
}

impl LaunchPlan {
    /// Resolve the interpreter and arguments for running `target` from `cwd`.
    ///
    /// Prefers `<cwd>/.venv`'s interpreter when present, otherwise `python`.
    pub fn new(target: Option<&str>, cwd: &Utf8Path, platform: Platform, python: &str) -> Self {
        let raw = target.unwrap_or(DEFAULT_ENTRY_POINT);
        let target = LaunchTarget::parse(raw);

        let venv_python = VenvLayout::new(cwd, platform).python();
        let (program, uses_project_env) = if venv_python.is_file() {
            (venv_python.to_string(), true)
        } else {
            (python.to_string(), false)
        };

        Self {
            program,
            args: vec![
                "-m".to_string(),
                "streamlit".to_string(),
                "run".to_string(),
                // Url normalises its input, so Streamlit gets the raw text
                raw.to_string(),
            ],
            cwd: cwd.to_path_buf(),
            target,
            uses_project_env,
        }
    }

    /// The script or URL handed to `streamlit run`
    pub fn target_arg(&self) -> &str {
        self.args.last().map(String::as_str).unwrap_or(DEFAULT_ENTRY_POINT)
    }

    /// Command line for display
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How a launched application ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The application exited with status 0
    Completed,
    /// The user stopped the application with Ctrl+C
    Interrupted,
}

/// Run the plan and wait for the application to finish.
///
/// Ctrl+C reaches the child through the terminal's process group. The parent
/// only listens for it so it can report a clean stop instead of dying first.
pub async fn launch(plan: &LaunchPlan) -> Result<LaunchOutcome> {
    info!("Launching: {}", plan.display());

    let mut child = tokio::process::Command::new(&plan.program)
        .args(&plan.args)
        .current_dir(&plan.cwd)
        .spawn()
        .map_err(|e| Error::launch_failed(&plan.program, e.to_string()))?;

    tokio::select! {
        status = child.wait() => outcome(status?),
        _ = tokio::signal::ctrl_c() => {
            debug!("Interrupt received, waiting for the application to stop");
            // Already signalled by the terminal; just reap it
            let _ = child.wait().await;
            Ok(LaunchOutcome::Interrupted)
        }
    }
}

fn outcome(status: ExitStatus) -> Result<LaunchOutcome> {
    match status.code() {
        Some(0) => Ok(LaunchOutcome::Completed),
        Some(code) => {
            let hint = (code == MISSING_DEPENDENCIES_EXIT_CODE).then(|| INSTALL_HINT.to_string());
            Err(Error::app_failed(code, hint))
        }
        None => terminated_by_signal(status),
    }
}

/// An interrupt or termination request is a clean stop; any other signal is a crash
#[cfg(unix)]
fn terminated_by_signal(status: ExitStatus) -> Result<LaunchOutcome> {
    use std::os::unix::process::ExitStatusExt;

    match status.signal() {
        Some(SIGINT | SIGTERM) => {
            debug!("Application stopped by {:?}", status);
            Ok(LaunchOutcome::Interrupted)
        }
        Some(signal) => Err(Error::app_killed(signal)),
        None => Err(Error::app_failed(1, None)),
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_status: ExitStatus) -> Result<LaunchOutcome> {
    Err(Error::app_failed(1, None))
}
