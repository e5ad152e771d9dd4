//! Command-line interface for omw
//!
//! This module defines the CLI structure using clap derive macros.
//! Each group of subcommands is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{self, Config};
use crate::error::Result;
use crate::output::OutputOptions;
use crate::render::ReportFormat;
use crate::store::Store;

mod edit;
mod log;
mod report;

/// omw - Out of my way
///
/// Log what you just finished with a timestamp, then report on where the
/// time went.
#[derive(Parser, Debug)]
#[command(name = "omw")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the timesheet (defaults to ~/.omw/omw.toml)
    #[arg(long, global = true, env = "OMW_FILE")]
    pub file: Option<PathBuf>,

    /// Path to the config file (defaults to ~/.omw/config.toml)
    #[arg(long, global = true, env = "OMW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log a finished task with the current time
    ///
    /// End the task with ** to mark a break or *** to ignore the time.
    Add {
        /// Task description
        #[arg(required = true, trailing_var_arg = true)]
        task: Vec<String>,
    },

    /// Log the start of a working day
    Hello,

    /// Log the most recent task again, stretching it to now
    Stretch,

    /// Report hours spent on tasks, breaks and ignored time
    Report {
        /// First day of the report (YYYY-M-D or RFC 3339); defaults to today
        #[arg(long)]
        from: Option<String>,

        /// Last day of the report, inclusive; defaults to --from
        #[arg(long)]
        to: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// Edit the timesheet in $EDITOR with validation and a backup
    Edit,
}

/// Resolved configuration and storage for a command
pub struct Context {
    pub config: Config,
    pub store: Store,
    pub output: OutputOptions,
}

impl Cli {
    fn context(&self) -> Result<Context> {
        let config_path = self
            .config
            .clone()
            .unwrap_or_else(config::default_config_path);
        let mut config = Config::load_or_default(&config_path)?;
        config.apply_env();
        if let Some(file) = &self.file {
            config.storage.file = file.clone();
        }
        let store = Store::from_config(&config);
        Ok(Context {
            config,
            store,
            output: OutputOptions {
                json: self.json,
                quiet: self.quiet,
            },
        })
    }

    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let ctx = self.context()?;
        match self.command {
            Commands::Add { task } => log::run_add(&ctx, &task.join(" ")),
            Commands::Hello => log::run_hello(&ctx),
            Commands::Stretch => log::run_stretch(&ctx),
            Commands::Report { from, to, format } => {
                report::run(&ctx, report::ReportOptions { from, to, format })
            }
            Commands::Edit => edit::run(&ctx),
        }
    }
}
