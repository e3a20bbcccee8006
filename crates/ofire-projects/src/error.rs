//! Error types for ofire-projects

use std::time::Duration;
use thiserror::Error;

/// Result type alias using ofire-projects's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Hint shown whenever a launch or app failure looks like missing packages
pub const INSTALL_HINT: &str =
    "Dependencies may be missing. Activate the project environment and run: pip install -r requirements.txt";

/// Project scaffolding error types
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid project name
    #[error("Invalid project name: '{name}'. {reason}")]
    InvalidProjectName { name: String, reason: String },

    /// Virtual environment creation failed
    #[error("Failed to create virtual environment: {message}\nstderr: {stderr}")]
    EnvironmentCreation { message: String, stderr: String },

    /// Requirements installation failed
    #[error("Failed to install requirements: {message}\nstderr: {stderr}")]
    DependencyInstall { message: String, stderr: String },

    /// A child process could not be started
    #[error("Failed to run '{program}': {source}")]
    CommandSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A child process exceeded its time budget
    #[error("'{program}' did not finish within {timeout:?}")]
    CommandTimeout { program: String, timeout: Duration },

    /// The application launcher could not be started
    #[error("Failed to launch '{program}': {reason}\n{hint}")]
    LaunchFailed {
        program: String,
        reason: String,
        hint: String,
    },

    /// The launched application exited with a failure code
    #[error("Application exited with status {code}{}", hint_suffix(.hint))]
    AppFailed { code: i32, hint: Option<String> },

    /// The launched application was killed by a signal other than an interrupt
    #[error("Application terminated by signal {signal}")]
    AppKilled { signal: i32 },

    /// Template not found in the embedded set
    #[error("Template not found: {template}")]
    TemplateNotFound { template: String },

    /// Invalid tool configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Template error from Tera
    #[error("Template error: {0}")]
    Tera(#[from] tera::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn hint_suffix(hint: &Option<String>) -> String {
    hint.as_deref()
        .map(|h| format!("\n{}", h))
        .unwrap_or_default()
}

impl Error {
    /// Create an invalid project name error
    pub fn invalid_project_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProjectName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an environment creation error
    pub fn environment_creation(message: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::EnvironmentCreation {
            message: message.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a dependency installation error
    pub fn dependency_install(message: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::DependencyInstall {
            message: message.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a command spawn error
    pub fn command_spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandSpawn {
            program: program.into(),
            source,
        }
    }

    /// Create a command timeout error
    pub fn command_timeout(program: impl Into<String>, timeout: Duration) -> Self {
        Self::CommandTimeout {
            program: program.into(),
            timeout,
        }
    }

    /// Create a launch failure error carrying the install hint
    pub fn launch_failed(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LaunchFailed {
            program: program.into(),
            reason: reason.into(),
            hint: INSTALL_HINT.to_string(),
        }
    }

    /// Create an app failure error
    pub fn app_failed(code: i32, hint: Option<String>) -> Self {
        Self::AppFailed { code, hint }
    }

    /// Create an app killed error
    pub fn app_killed(signal: i32) -> Self {
        Self::AppKilled { signal }
    }

    /// Create a template not found error
    pub fn template_not_found(template: impl Into<String>) -> Self {
        Self::TemplateNotFound {
            template: template.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Exit code the CLI should report for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AppFailed { code, .. } => *code,
            // Shell convention for signal deaths
            Self::AppKilled { signal } => 128 + signal,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_creation_includes_stderr() {
        let err = Error::environment_creation("exit status 1", "No module named venv");
        let msg = err.to_string();
        assert!(msg.contains("virtual environment"));
        assert!(msg.contains("No module named venv"));
    }

    #[test]
    fn test_app_failed_with_hint() {
        let err = Error::app_failed(1, Some(INSTALL_HINT.to_string()));
        let msg = err.to_string();
        assert!(msg.starts_with("Application exited with status 1"));
        assert!(msg.contains("pip install -r requirements.txt"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_app_failed_without_hint() {
        let err = Error::app_failed(3, None);
        assert_eq!(err.to_string(), "Application exited with status 3");
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_app_killed_uses_shell_exit_code() {
        let err = Error::app_killed(11);
        assert_eq!(err.to_string(), "Application terminated by signal 11");
        assert_eq!(err.exit_code(), 139);
    }

    #[test]
    fn test_launch_failed_carries_hint() {
        let err = Error::launch_failed("/missing/python", "No such file or directory");
        assert!(err.to_string().contains("pip install -r requirements.txt"));
        assert_eq!(err.exit_code(), 1);
    }
}
