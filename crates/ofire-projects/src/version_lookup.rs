//! Best-effort lookup of the latest published ofire version
//!
//! Asks `pip index versions ofire` and scrapes the human-readable output.
//! The format is not a stable interface, so anything unexpected falls back
//! to the configured minimum version. The result only seeds a `>=`
//! constraint and is never treated as authoritative.

use crate::process::{CommandRunner, CommandSpec};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

/// Package name of the calculation library on PyPI
pub const OFIRE_PACKAGE: &str = "ofire";

const AVAILABLE_VERSIONS_MARKER: &str = "Available versions:";

/// Loose PEP 440 shape: release segments plus an optional suffix
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(\.\d+)*[A-Za-z0-9.+!\-]*$").expect("version regex is valid")
});

/// Queries the package index through pip
pub struct VersionLookup<'a> {
    runner: &'a dyn CommandRunner,
    python: String,
    timeout: Duration,
}

impl<'a> VersionLookup<'a> {
    pub fn new(runner: &'a dyn CommandRunner, python: impl Into<String>, timeout: Duration) -> Self {
        Self {
            runner,
            python: python.into(),
            timeout,
        }
    }

    /// Latest version reported by the index, if it could be determined
    pub fn latest(&self) -> Option<String> {
        let spec = CommandSpec::new(&self.python)
            .args(["-m", "pip", "index", "versions", OFIRE_PACKAGE])
            .timeout(self.timeout);

        let output = match self.runner.run(&spec) {
            Ok(output) => output,
            Err(e) => {
                debug!("Package index lookup failed: {}", e);
                return None;
            }
        };

        if !output.success() {
            debug!("Package index lookup returned {}", output.status_text());
            return None;
        }

        let version = parse_latest_version(&output.stdout);
        if version.is_none() {
            debug!("Could not parse package index output");
        }
        version
    }

    /// Latest version, or `fallback` when the lookup fails
    pub fn latest_or(&self, fallback: &str) -> String {
        self.latest().unwrap_or_else(|| fallback.to_string())
    }
}

/// Extract the first entry of the `Available versions:` line
pub fn parse_latest_version(output: &str) -> Option<String> {
    let line = output
        .lines()
        .find(|line| line.contains(AVAILABLE_VERSIONS_MARKER))?;
    let (_, versions) = line.split_once(AVAILABLE_VERSIONS_MARKER)?;
    let latest = versions.split(',').next()?.trim();

    if VERSION_RE.is_match(latest) {
        Some(latest.to_string())
    } else {
        None
    }
}

/// Requirement line for the ofire package
pub fn ofire_requirement(version: &str) -> String {
    let version = version.trim().trim_start_matches(">=").trim();
    format!("{}>={}", OFIRE_PACKAGE, version)
}
