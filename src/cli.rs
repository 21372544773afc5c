// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `calcdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "calcdag",
    version,
    about = "Inspect calculation graphs and resolved recomputation plans.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the graph declaration file (TOML).
    ///
    /// Default: `Calcdag.toml` in the current working directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CALCDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print declared nodes, in declaration order.
    List,
    /// Print the execution order of a run rooted at SOURCE, without
    /// executing any handler.
    Plan {
        /// Source node whose inputs changed.
        #[arg(value_name = "SOURCE")]
        source: String,
    },
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
