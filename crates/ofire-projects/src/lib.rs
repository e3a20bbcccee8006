//! Project scaffolding and app launching for the OpenFire CLI
//!
//! - [`scaffold`]: create a Streamlit starter project with its own environment
//! - [`runner`]: run a project's app through `python -m streamlit run`
//! - [`docs`]: open the OpenFire documentation
//! - [`config`]: layered tool configuration
//!
//! # Example
//!
//! ```no_run
//! use ofire_projects::{ConfigLoader, DuctRunner, Platform, ProjectDescriptor, ScaffoldConfig, Scaffolder};
//!
//! # fn example() -> ofire_projects::Result<()> {
//! let tool = ConfigLoader::new().load()?;
//! let config = ScaffoldConfig::from_tool_config(&tool, Platform::current());
//! let runner = DuctRunner::new();
//!
//! let project = ProjectDescriptor::new("smoke_study", "/work", false)?;
//! let report = Scaffolder::new(config, &runner)?.scaffold(&project)?;
//! println!("Created {}", report.project_dir);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod docs;
pub mod environment;
pub mod error;
pub mod process;
pub mod runner;
pub mod scaffold;
pub mod templates;
pub mod types;
pub mod version_lookup;

pub use config::{ConfigLoader, ToolConfig};
pub use docs::{open_documentation, DocsOutcome};
pub use error::{Error, Result, INSTALL_HINT};
pub use process::{CommandOutput, CommandRunner, CommandSpec, DuctRunner};
pub use runner::{launch, LaunchOutcome, LaunchPlan, DEFAULT_ENTRY_POINT};
pub use scaffold::{ScaffoldConfig, Scaffolder};
pub use types::{Platform, ProjectDescriptor, ScaffoldReport};
