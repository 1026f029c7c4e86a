//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::domain::DepthPolicy;

/// Referral network tree engine: rebuild, filter and audit referral hierarchies
#[derive(Parser, Debug)]
#[command(name = "refnet")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output to stderr (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short = 'c', long, global = true, value_hint = ValueHint::FilePath, env = "REFNET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by every command that builds a tree.
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// JSON relation export (array of entries)
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: PathBuf,

    /// Deepest level attached below a root (overrides config)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_depth: Option<u32>,

    /// Depth bound source: reported | path-depth (overrides config)
    #[arg(long)]
    pub depth_policy: Option<DepthPolicy>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the reconstructed referral tree
    Tree {
        #[command(flatten)]
        build: BuildArgs,
        /// Print JSON instead of a tree drawing
        #[arg(long)]
        json: bool,
        /// Print summary figures after the tree
        #[arg(long)]
        stats: bool,
    },

    /// Show the tree pruned to matching entries and their ancestors
    Filter {
        #[command(flatten)]
        build: BuildArgs,
        /// Text searched in display name and email
        #[arg(short, long)]
        search: Option<String>,
        /// Regex searched in display name and email
        #[arg(short, long, conflicts_with = "search")]
        regex: Option<String>,
        /// Keep only entries with this qualification status
        #[arg(short, long)]
        qualifies: Option<bool>,
        /// Match search text with exact case
        #[arg(long)]
        case_sensitive: bool,
        /// Print JSON instead of a tree drawing
        #[arg(long)]
        json: bool,
    },

    /// Cross-check downline counts of an entry (all roots when no id given)
    Audit {
        #[command(flatten)]
        build: BuildArgs,
        /// Entry id to audit
        id: Option<String>,
        /// Print JSON report
        #[arg(long)]
        json: bool,
    },

    /// Report data quality issues in the relation list
    Check {
        /// JSON relation export
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Print JSON report
        #[arg(long)]
        json: bool,
    },

    /// Show all root-to-leaf paths
    Branches {
        #[command(flatten)]
        build: BuildArgs,
    },

    /// List leaf entries
    Leaves {
        #[command(flatten)]
        build: BuildArgs,
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

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings as TOML
    Show,
    /// Show config file locations
    Path,
}
