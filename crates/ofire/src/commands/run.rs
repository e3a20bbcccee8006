//! `ofire run` command handler

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use ofire_projects::process::is_command_available;
use ofire_projects::{launch, LaunchOutcome, LaunchPlan, Platform};

use crate::cli::RunArgs;
use crate::output;

/// Run a Streamlit app from the current directory
pub async fn run(args: RunArgs) -> Result<()> {
    let config = super::load_config()?;
    let platform = Platform::current();
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let cwd = Utf8PathBuf::from_path_buf(cwd)
        .map_err(|p| anyhow::anyhow!("Current directory is not valid UTF-8: {}", p.display()))?;

    let plan = LaunchPlan::new(
        args.target.as_deref(),
        &cwd,
        platform,
        &config.python_for(platform),
    );

    output::info(&format!("Starting {}", plan.target_arg()));
    if !plan.uses_project_env {
        tracing::debug!("No project environment in {}, using {}", cwd, plan.program);
        if !is_command_available(&plan.program) {
            output::warning(&format!("'{}' was not found on PATH", plan.program));
        }
    }
    output::kv("Command", &plan.display());
    println!("Press Ctrl+C to stop");
    println!();

    match launch(&plan).await? {
        LaunchOutcome::Completed => {}
        LaunchOutcome::Interrupted => {
            println!();
            output::info("Application stopped");
        }
    }

    Ok(())
}
