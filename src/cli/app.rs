//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::output::{Output, OutputFormat};
use super::{blueprint, contract, dashboard};
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "pact")]
#[command(author, version, about = "Local-first contract lifecycle management")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true, env = "PACT_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new pact project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Manage blueprints (reusable field templates)
    #[command(subcommand)]
    Blueprint(blueprint::BlueprintCommands),

    /// Manage contracts
    #[command(subcommand)]
    Contract(contract::ContractCommands),

    /// Show contract counts by category
    Dashboard,
}

/// Installs the stderr log subscriber
///
/// `--verbose` turns on debug events for this crate; otherwise `RUST_LOG`
/// decides, falling back to warnings only.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("pact_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A second init (e.g. in tests) is harmless
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

/// Opens the enclosing project and builds output from its configuration
fn open_project(format: Option<OutputFormat>) -> Result<(Project, Output)> {
    let project = Project::open_current()?;
    let config = project.config();
    let format = format.unwrap_or_else(|| config.global.default_format.into());
    let output = Output::new(format).with_date_format(config.project.date_format.clone());

    tracing::debug!(?format, root = %project.root().display(), "opened project");
    Ok((project, output))
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Init { path } => {
            // Only the global config applies; an enclosing project is irrelevant
            let format = match cli.format {
                Some(format) => format,
                None => Config::load_global()?.default_format.into(),
            };
            let project = Project::init(&path)?;
            tracing::debug!(dir = %project.pact_dir().display(), "created .pact directory");
            Output::new(format).success(&format!(
                "Initialized pact project at {}",
                project.root().display()
            ));
        }

        Commands::Blueprint(cmd) => {
            let (project, output) = open_project(cli.format)?;
            blueprint::run(cmd, &project, &output)?
        }
        Commands::Contract(cmd) => {
            let (project, output) = open_project(cli.format)?;
            contract::run(cmd, &project, &output)?
        }
        Commands::Dashboard => {
            let (project, output) = open_project(cli.format)?;
            dashboard::show(&project, &output)?
        }
    }

    tracing::debug!("command completed successfully");
    Ok(())
}
