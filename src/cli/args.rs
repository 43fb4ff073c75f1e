//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::{ContactId, RenderStyle};

/// Address book backed by a height-balanced tree, persisted as CSV
#[derive(Parser, Debug)]
#[command(name = "addrbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Contacts CSV file (overrides config)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Directory holding a local .addrbook.toml (default: cwd)
    #[arg(short = 'C', long, global = true, env = "ADDRBOOK_CONFIG_DIR", value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    /// Defaults to the interactive menu
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new contact
    #[command(allow_negative_numbers = true)]
    Add {
        /// Unique integer id
        id: ContactId,
        name: String,
        phone: String,
        email: String,
    },

    /// Show a contact by id
    #[command(allow_negative_numbers = true)]
    Search { id: ContactId },

    /// Delete a contact by id
    #[command(allow_negative_numbers = true)]
    Delete { id: ContactId },

    /// List all contacts sorted by id
    List,

    /// Display the current tree structure
    Tree {
        /// Layout (default from config)
        #[arg(short, long, value_enum)]
        style: Option<StyleArg>,
    },

    /// Show data file, size, height and invariant status
    Info,

    /// Interactive menu
    Shell,

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
    /// Print the effective configuration
    Show,
    /// Print a commented config template
    Template,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StyleArg {
    Sideways,
    Ascii,
}

impl From<StyleArg> for RenderStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Sideways => RenderStyle::Sideways,
            StyleArg::Ascii => RenderStyle::Ascii,
        }
    }
}
