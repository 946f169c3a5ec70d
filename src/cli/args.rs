//! CLI argument definitions using clap
//!
//! Commands:
//! - mysql-inspector [serve] --config <path>
//! - mysql-inspector report --config <path> [--limit N] [--demo]
//! - mysql-inspector check --config <path>

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::config::DEFAULT_CONFIG_PATH;
use crate::inspector::DEFAULT_LIMIT;

/// mysql-inspector - structural health reports for a MySQL schema
#[derive(Parser, Debug)]
#[command(name = "mysql-inspector")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Defaults to `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Serve the dashboard and JSON endpoints
    Serve {
        /// Path to configuration file (defaults apply when it does not exist)
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Run every report once and print the results as JSON
    Report {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Rows per ranked report
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: NonZeroUsize,

        /// Use a built-in sample schema instead of connecting
        #[arg(long)]
        demo: bool,
    },

    /// Connect, ping, and print the connection target
    Check {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Serve {
            config: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// The command to run, falling back to `serve`
    pub fn into_command(self) -> Command {
        self.command.unwrap_or_default()
    }
}
