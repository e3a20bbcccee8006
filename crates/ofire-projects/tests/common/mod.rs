//! Shared helpers for integration tests

use camino::Utf8PathBuf;
use ofire_projects::{CommandOutput, CommandRunner, CommandSpec, Result};
use std::cell::RefCell;
use tempfile::TempDir;

/// Command runner that never spawns anything.
///
/// Every command succeeds unless its program ends with `fail_program`, in
/// which case it exits 1 with `fail_stderr`.
#[derive(Default)]
pub struct FakeRunner {
    pub calls: RefCell<Vec<CommandSpec>>,
    pub fail_program: Option<String>,
    pub fail_stderr: String,
    pub index_output: String,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(program_suffix: &str, stderr: &str) -> Self {
        Self {
            fail_program: Some(program_suffix.to_string()),
            fail_stderr: stderr.to_string(),
            ..Self::default()
        }
    }

    pub fn with_index_output(mut self, output: &str) -> Self {
        self.index_output = output.to_string();
        self
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.display()).collect()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        self.calls.borrow_mut().push(spec.clone());

        if let Some(suffix) = &self.fail_program {
            if spec.program.ends_with(suffix.as_str()) {
                return Ok(CommandOutput {
                    code: Some(1),
                    stdout: String::new(),
                    stderr: self.fail_stderr.clone(),
                });
            }
        }

        let stdout = if spec.args.iter().any(|a| a == "index") {
            self.index_output.clone()
        } else {
            String::new()
        };
        Ok(CommandOutput {
            code: Some(0),
            stdout,
            stderr: String::new(),
        })
    }
    fn spawn_detached(&self, spec: &CommandSpec) -> Result<()> {
        self.calls.borrow_mut().push(spec.clone());
        Ok(())
    }
}

/// Temp directory as a UTF-8 path; keep the guard alive for the test
pub fn utf8_temp_dir() -> (TempDir, Utf8PathBuf) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let path = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("Invalid UTF-8 path");
    (temp, path)
}
