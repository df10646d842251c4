//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

use crate::application::services::WalkOrder;

/// Binary hierarchies from parent-referencing records, with weak-side placement
#[derive(Parser, Debug)]
#[command(name = "weakside")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Settings file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Record field holding the parent id
    #[arg(long, global = true)]
    pub parent_field: Option<String>,

    /// Record field used as label
    #[arg(long, global = true)]
    pub label_field: Option<String>,

    /// Parent id marking top-level records
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub start: Option<i64>,

    /// Keep input order instead of sorting records by id
    #[arg(long, global = true)]
    pub no_sort: bool,

    /// Let the build cursor climb to the next record's level in one go
    #[arg(long, global = true)]
    pub ascend_to_level: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the hierarchy and print it
    Build {
        /// Records file (TOML, [[record]] tables)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print labels in traversal order
    Walk {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[arg(short, long, value_enum, default_value_t = Order::Pre)]
        order: Order,
    },

    /// Show size, depth, heights, fullness and completeness
    Stats {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Record id of the subtree root (default: tree root)
        #[arg(long)]
        node: Option<i64>,
    },

    /// Place new members and print the result
    Insert {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Labels of the members to add, placed in order
        #[arg(required = true, num_args = 1..)]
        labels: Vec<String>,
        /// Fill breadth-first instead of preferring the weak region
        #[arg(long)]
        natural: bool,
        /// Record id where the search starts (default: tree root)
        #[arg(long)]
        at: Option<i64>,
    },

    /// Print records breadth-first
    LevelSort {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show effective settings
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Pre,
    In,
    Post,
    Level,
}

impl From<Order> for WalkOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Pre => WalkOrder::Pre,
            Order::In => WalkOrder::In,
            Order::Post => WalkOrder::Post,
            Order::Level => WalkOrder::Level,
        }
    }
}
