//! Blocking command execution
//!
//! Every external tool the scaffolder touches (python, pip, the browser
//! opener) goes through [`CommandRunner`]. `run` spawns the process, waits
//! for it, and hands back the captured output. `spawn_detached` starts it and
//! returns at once. Tests swap in a recording runner so no real interpreter
//! is needed.

use crate::error::{Error, Result};
use camino::Utf8PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tracing::debug;

/// Poll interval while waiting on a command with a timeout
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A command to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<Utf8PathBuf>,
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Render as a shell-like command line for logs
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Short description of the exit status for error messages
    pub fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Synchronous command execution capability
pub trait CommandRunner {
    /// Run a command to completion, capturing stdout and stderr.
    ///
    /// A non-zero exit is not an error here; callers inspect
    /// [`CommandOutput::code`]. Errors mean the process could not be
    /// started or did not finish within its timeout.
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;

    /// Start a command and return without waiting for it.
    ///
    /// Used for openers that may hand off to a long-lived process such as a
    /// browser. Only a failure to start is reported; the exit status is never
    /// observed.
    fn spawn_detached(&self, spec: &CommandSpec) -> Result<()>;
}

/// [`CommandRunner`] backed by duct
#[derive(Debug, Default, Clone, Copy)]
pub struct DuctRunner;

impl DuctRunner {
    pub fn new() -> Self {
        Self
    }

    fn expression(spec: &CommandSpec) -> duct::Expression {
        let mut expr = duct::cmd(spec.program.as_str(), &spec.args)
            .stdin_null()
            .stdout_capture()
            .stderr_capture()
            .unchecked();
        if let Some(cwd) = &spec.cwd {
            expr = expr.dir(cwd.as_std_path());
        }
        expr
    }

    fn wait_with_timeout(spec: &CommandSpec, timeout: Duration) -> Result<std::process::Output> {
        let handle = Self::expression(spec)
            .start()
            .map_err(|e| Error::command_spawn(&spec.program, e))?;
        let deadline = Instant::now() + timeout;

        loop {
            match handle.try_wait() {
                Ok(Some(output)) => return Ok(output.clone()),
                Ok(None) => {}
                Err(e) => return Err(Error::command_spawn(&spec.program, e)),
            }

            if Instant::now() >= deadline {
                debug!("Killing '{}' after {:?}", spec.display(), timeout);
                if let Err(e) = handle.kill() {
                    debug!("Failed to kill '{}': {}", spec.program, e);
                }
                return Err(Error::command_timeout(&spec.program, timeout));
            }

            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

impl CommandRunner for DuctRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        debug!("Running: {}", spec.display());

        let output = match spec.timeout {
            Some(timeout) => Self::wait_with_timeout(spec, timeout)?,
            None => Self::expression(spec)
                .run()
                .map_err(|e| Error::command_spawn(&spec.program, e))?,
        };

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!("'{}' finished with {}", spec.program, result.status_text());
        Ok(result)
    }

    fn spawn_detached(&self, spec: &CommandSpec) -> Result<()> {
        debug!("Spawning detached: {}", spec.display());

        // No pipes: whatever the command hands off to must not hold our output open
        let mut command = std::process::Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(cwd) = &spec.cwd {
            command.current_dir(cwd);
        }

        let mut child = command
            .spawn()
            .map_err(|e| Error::command_spawn(&spec.program, e))?;

        // Reap the opener if it exits before we do
        std::thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}

/// Check if a program can be found on PATH
pub fn is_command_available(program: &str) -> bool {
    which::which(program).is_ok()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_spec_builder() {
        let spec = CommandSpec::new("python3")
            .args(["-m", "venv"])
            .arg("/tmp/p/.venv")
            .current_dir("/tmp/p")
            .timeout(Duration::from_secs(10));

        assert_eq!(spec.display(), "python3 -m venv /tmp/p/.venv");
        assert_eq!(spec.cwd, Some(Utf8PathBuf::from("/tmp/p")));
        assert_eq!(spec.timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_status_text() {
        let out = CommandOutput {
            code: Some(2),
            ..Default::default()
        };
        assert_eq!(out.status_text(), "exit status 2");
        assert!(!out.success());

        let killed = CommandOutput::default();
        assert_eq!(killed.status_text(), "terminated by signal");
    }

    #[test]
    fn test_duct_runner_missing_program() {
        let spec = CommandSpec::new("ofire-definitely-not-a-real-program");
        let err = DuctRunner::new().run(&spec).unwrap_err();
        assert!(matches!(err, Error::CommandSpawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_duct_runner_captures_output() {
        let spec = CommandSpec::new("sh").args(["-c", "echo out; echo err >&2; exit 3"]);
        let out = DuctRunner::new().run(&spec).unwrap();
        assert_eq!(out.code, Some(3));
        assert_eq!(out.stdout.trim(), "out");
        assert_eq!(out.stderr.trim(), "err");
    }

    #[test]
    fn test_spawn_detached_missing_program() {
        let spec = CommandSpec::new("ofire-definitely-not-a-real-program");
        let err = DuctRunner::new().spawn_detached(&spec).unwrap_err();
        assert!(matches!(err, Error::CommandSpawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_spawn_detached_does_not_wait() {
        // Stands in for an opener whose browser outlives it
        let spec = CommandSpec::new("sh").args(["-c", "sleep 6 & sleep 6"]);
        let start = Instant::now();
        DuctRunner::new().spawn_detached(&spec).unwrap();
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[cfg(unix)]
    #[test]
    fn test_duct_runner_timeout_kills_child() {
        let spec = CommandSpec::new("sh")
            .args(["-c", "sleep 5"])
            .timeout(Duration::from_millis(200));
        let start = Instant::now();
        let err = DuctRunner::new().run(&spec).unwrap_err();
        assert!(matches!(err, Error::CommandTimeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(4));
    }
}
