//! `ofire new` command handler

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use ofire_projects::types::VENV_DIR_NAME;
use ofire_projects::{DuctRunner, Platform, ProjectDescriptor, ScaffoldConfig, Scaffolder};

use crate::cli::NewArgs;
use crate::output;

/// Create a new project with its own environment
pub fn run(args: NewArgs) -> Result<()> {
    let config = super::load_config()?;
    let platform = Platform::current();
    let target_dir = absolute_dir(&args.directory)?;

    let project = ProjectDescriptor::new(&args.name, target_dir, args.notebook)?;
    let scaffold_config = ScaffoldConfig::from_tool_config(&config, platform);
    let runner = DuctRunner::new();
    let scaffolder = Scaffolder::new(scaffold_config, &runner)?;

    output::header("Create New OpenFire Project");
    output::kv("Project name", &project.name);
    output::kv("Target directory", project.target_dir.as_str());
    println!();

    output::info("Creating project structure...");
    let project_dir = scaffolder
        .create_structure(&project)
        .context("Failed to create project directory")?;

    let pb = output::spinner("Checking latest ofire release...");
    let requirement = scaffolder.resolve_ofire_requirement();
    pb.finish_and_clear();
    output::kv("Requirement", &requirement);

    output::info("Writing project files...");
    let context = scaffolder.template_context(&project, &project_dir, &requirement);
    scaffolder.write_files(&context, &project_dir)?;
    if project.include_notebook {
        scaffolder.write_notebook(&project, &project_dir)?;
    }

    let pb = output::spinner("Creating virtual environment...");
    let venv = scaffolder.create_environment(&project_dir);
    pb.finish_and_clear();
    let venv = venv?;
    output::success(&format!("Virtual environment created at {}", venv.root));

    let pb = output::spinner("Installing requirements (this may take a few minutes)...");
    let installed = scaffolder.install_requirements(&venv, &project_dir);
    pb.finish_and_clear();
    installed?;
    output::success("Requirements installed");

    scaffolder.write_activation_script(&context, &project_dir)?;

    println!();
    output::success(&format!("Project '{}' created successfully", project.name));
    output::kv("Location", project_dir.as_str());
    print_next_steps(
        &project_dir,
        platform,
        project.include_notebook,
        &scaffolder.config().docs_url,
    );

    Ok(())
}

fn absolute_dir(dir: &Utf8Path) -> Result<Utf8PathBuf> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let cwd = Utf8PathBuf::from_path_buf(cwd)
        .map_err(|p| anyhow::anyhow!("Current directory is not valid UTF-8: {}", p.display()))?;
    Ok(cwd.join(dir))
}

/// Numbered follow-up instructions for the new project
fn next_steps(project_dir: &Utf8Path, platform: Platform, include_notebook: bool) -> Vec<String> {
    let mut steps = vec![format!("cd {}", project_dir)];
    if platform.is_windows() {
        steps.push("activate.bat".to_string());
    } else {
        steps.push(format!(
            "source activate.sh  # or: source {}/bin/activate",
            VENV_DIR_NAME
        ));
    }
    steps.push("ofire run  # or: streamlit run main.py".to_string());
    steps.push("Open your browser to http://localhost:8501".to_string());
    if include_notebook {
        steps.push("jupyter notebook example_calculations.ipynb".to_string());
    }
    steps
}

fn print_next_steps(project_dir: &Utf8Path, platform: Platform, include_notebook: bool, docs_url: &str) {
    println!();
    output::info("Next steps:");
    for (i, step) in next_steps(project_dir, platform, include_notebook)
        .iter()
        .enumerate()
    {
        output::step(i + 1, step);
    }
    println!();
    println!("Virtual environment created with all dependencies installed.");
    println!("Your fire engineering Streamlit app is ready to run!");
    println!("For documentation, visit: {}", docs_url);
}
