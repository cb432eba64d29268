//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// AVL-balanced member roster with rank analytics
#[derive(Parser, Debug)]
#[command(name = "ranktree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-d, -dd, -ddd)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a command script
    Run {
        /// Command script file (seed line first, then verbs)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,

        /// Result file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Show the roster hierarchy after executing a script
    Tree {
        /// Command script file
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
