//! `ofire docs` command handler

use anyhow::Result;
use ofire_projects::docs::DEFAULT_DOCS_URL;
use ofire_projects::{open_documentation, DocsOutcome, DuctRunner, Platform};

use crate::output;

/// Open the documentation in the default browser. Always succeeds.
pub fn run() -> Result<()> {
    let url = match super::load_config() {
        Ok(config) => config.docs_url,
        Err(e) => {
            output::warning(&format!("{:#}", e));
            DEFAULT_DOCS_URL.to_string()
        }
    };

    output::info(&format!("Opening documentation: {}", url));

    let outcome = open_documentation(&url, Platform::current(), &DuctRunner::new());
    match &outcome {
        DocsOutcome::Opened { .. } => {
            output::success("Documentation opened in your default browser")
        }
        DocsOutcome::Manual { reason, .. } => {
            output::warning(&format!("Could not open browser: {}", reason))
        }
    }
    if let Some(message) = outcome.manual_message() {
        println!("{}", message);
    }

    Ok(())
}
