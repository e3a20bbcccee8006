//! Opening the OpenFire documentation in a browser

use crate::process::{CommandRunner, CommandSpec};
use crate::types::Platform;
use tracing::{debug, info};

/// Documentation site, used when no configuration is available
pub const DEFAULT_DOCS_URL: &str = "https://emberon-tech.github.io/openfire/";

/// Result of trying to open the documentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocsOutcome {
    /// The system opener accepted the URL
    Opened { url: String },
    /// No browser could be launched; the user has to visit the URL
    Manual { url: String, reason: String },
}

impl DocsOutcome {
    pub fn url(&self) -> &str {
        match self {
            Self::Opened { url } | Self::Manual { url, .. } => url,
        }
    }

    /// Line telling the user where to go when the browser did not open
    pub fn manual_message(&self) -> Option<String> {
        match self {
            Self::Opened { .. } => None,
            Self::Manual { url, .. } => Some(format!("You can manually visit: {}", url)),
        }
    }
}

/// System command that opens `url` in the default browser
pub fn browser_command(url: &str, platform: Platform) -> CommandSpec {
    match platform {
        Platform::Linux => CommandSpec::new("xdg-open").arg(url),
        Platform::MacOS => CommandSpec::new("open").arg(url),
        // The empty string is start's window title; without it a quoted URL is taken as the title
        Platform::Windows => CommandSpec::new("cmd").args(["/C", "start", "", url]),
    }
}

/// Open `url` in the default browser without waiting for it.
///
/// The opener may run the browser in the foreground, so only a failure to
/// start it degrades to [`DocsOutcome::Manual`].
pub fn open_documentation(
    url: &str,
    platform: Platform,
    runner: &dyn CommandRunner,
) -> DocsOutcome {
    info!("Opening documentation: {}", url);

    let spec = browser_command(url, platform);
    match runner.spawn_detached(&spec) {
        Ok(()) => DocsOutcome::Opened {
            url: url.to_string(),
        },
        Err(e) => {
            debug!("Could not open browser: {}", e);
            DocsOutcome::Manual {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    }
}
