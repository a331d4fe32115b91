//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

/// Classify repeated block instances in a scene as typical or special
#[derive(Parser, Debug)]
#[command(name = "blockclass")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Local config file (default: ./.blockclass.toml if present)
    #[arg(short, long, global = true, env = "BLOCKCLASS_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify block types and report them
    Analyze {
        /// Scene JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        scene: PathBuf,

        /// Percentage of the mean occurrence count used as cutoff
        #[arg(short, long, allow_negative_numbers = true)]
        percentage: Option<f64>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// List annotated object ids (text format)
        #[arg(long)]
        ids: bool,
    },

    /// List block instances in discovery order
    Instances {
        /// Scene JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        scene: PathBuf,
    },

    /// List block types with occurrence counts
    Groups {
        /// Scene JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        scene: PathBuf,
    },

    /// Show block instance nesting as tree
    Tree {
        /// Scene JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        scene: PathBuf,
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
    /// Show merged config
    Show,

    /// Print config template
    Init,

    /// Show config paths
    Path,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Coloured annotations
    Text,
    /// Run report as JSON
    Json,
}
