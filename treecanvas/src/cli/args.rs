//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Interactive bounded tree editor: fan-out edits, leaf values and shape metrics
#[derive(Parser, Debug)]
#[command(name = "treecanvas")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, env = "TREECANVAS_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the seed tree
    Show,

    /// Print height, width, node count and canvas size
    Metrics,

    /// Apply a script of commands (one per line) and print the result
    Run {
        /// Script file
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,
    },

    /// Edit the tree interactively, reading commands from stdin
    Repl,

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

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Print an annotated config template
    Template,
    /// Print the global config location
    Path,
}
