//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Tri-state selection trees: customers, subscriptions, companies, environments
#[derive(Parser, Debug)]
#[command(name = "seltree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Explicit config file (layered over the global one)
    #[arg(short, long, global = true, env = "SELTREE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the demo tree
    Show,

    /// Apply an operation script to the demo tree and print the result
    Run {
        /// Script file, one command per line
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,

        /// Only print the final checked ids instead of the tree
        #[arg(long)]
        ids: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,

    /// Print a commented template config
    Template,

    /// Show config file location
    Path,
}
