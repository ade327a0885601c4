// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `scriptjob`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "scriptjob",
    version,
    about = "Run a Lua installer job script against the host API.",
    long_about = None
)]
pub struct CliArgs {
    /// Module directory the script lives in.
    #[arg(long, short = 'w', value_name = "DIR")]
    pub working_dir: PathBuf,

    /// Script file, relative to the working directory.
    ///
    /// Default: `[job].script` from the settings file (`main.lua`).
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// YAML file with the module configuration handed to the job.
    #[arg(long, value_name = "PATH")]
    pub module_config: Option<PathBuf>,

    /// Path to the settings file (TOML).
    ///
    /// Missing default file means built-in defaults.
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Lua file run before the job script, in the same globals.
    ///
    /// Overrides `[job].pre_script`.
    #[arg(long, value_name = "PATH")]
    pub pre_script: Option<PathBuf>,

    /// YAML mapping used to seed the shared store.
    #[arg(long, value_name = "PATH")]
    pub storage: Option<PathBuf>,

    /// Write the shared store as JSON here after the job ran.
    #[arg(long, value_name = "PATH")]
    pub dump_storage: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SCRIPTJOB_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Level for messages logged by the guest script itself.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub guest_log_level: Option<LogLevel>,

    /// Validate settings and configuration, print the job, but don't run it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
