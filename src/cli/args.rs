//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Organizational hierarchy manager: hire, fire, promote and demote employees
#[derive(Parser, Debug)]
#[command(name = "orgtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Roster file (default: `roster` from config)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub roster: Option<PathBuf>,

    /// Seed for random succession when firing
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Directory holding .orgtree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show hierarchy as tree
    Show,

    /// Add an employee under a boss
    Hire {
        /// Name of the new employee
        name: String,
        /// Boss of the new employee
        boss: String,
        /// Job title
        #[arg(short = 't', long, default_value = "")]
        title: String,
        /// Salary
        #[arg(short, long, default_value = "")]
        salary: String,
    },

    /// Remove an employee; one of their reports takes over
    Fire {
        /// Employee to fire
        name: String,
    },

    /// Swap an employee with their boss
    Promote {
        /// Employee to promote
        name: String,
    },

    /// Swap an employee with one of their direct reports
    Demote {
        /// Employee to demote
        employee: String,
        /// Direct report taking over
        subordinate: String,
    },

    /// Show an employee's boss
    Boss {
        /// Employee name
        name: String,
    },

    /// List an employee's direct reports
    Subordinates {
        /// Employee name
        name: String,
    },

    /// Show the lowest-ranking employee and their chain of command
    Lowest,

    /// Apply a reorganization script
    Run {
        /// Script file (TOML, `[[steps]]`)
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,
    },

    /// Validate the roster hierarchy
    Check,

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
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
