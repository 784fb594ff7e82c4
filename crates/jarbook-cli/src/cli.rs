//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Jarbook - Six-jar budgeting with an AI financial coach
#[derive(Parser)]
#[command(name = "jarbook")]
#[command(about = "Six-jar budget, ledger and goals with AI coaching", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Store file path (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Config file overriding the built-in defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Income, expenses and jar allocation
    Budget {
        #[command(subcommand)]
        action: Option<BudgetAction>,

        /// Show yearly amounts instead of monthly
        #[arg(long, global = true)]
        yearly: bool,
    },

    /// Show the seven-level financial pyramid
    Pyramid,

    /// Manage transactions (list, add, delete, coach, due)
    Tx {
        #[command(subcommand)]
        action: Option<TxAction>,
    },

    /// Manage goals (list, add, progress, delete, strategy, reminders)
    Goals {
        #[command(subcommand)]
        action: Option<GoalsAction>,
    },

    /// Ask the coach for a review of the whole budget
    Coach {
        /// Start from what is already going well
        #[arg(long)]
        recognition: bool,

        /// Money already set aside
        #[arg(long, default_value = "0")]
        reserves: String,

        /// What you are working toward
        #[arg(long)]
        goal: Option<String>,
    },

    /// Generate a short-video content idea for a niche
    Content {
        /// Topic or audience, e.g. "personal finance for nurses"
        niche: String,
    },

    /// Manage AI prompts (list, show, path)
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },

    /// Show the effective configuration
    Config,
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Show figures and jar allocation (default)
    Show,

    /// Set monthly income
    Income {
        /// Amount; invalid or negative input counts as 0
        amount: String,
    },

    /// Set monthly expenses
    Expenses {
        /// Amount; invalid or negative input counts as 0
        amount: String,
    },

    /// Set one jar's percentage
    Jar {
        /// Jar: nec, edu, res, inv, play, give
        jar: String,

        /// Percentage, capped at 100
        percent: String,
    },

    /// Go back to the recommended allocation for your income
    Reset,
}

#[derive(Subcommand)]
pub enum TxAction {
    /// List transactions, newest first (default)
    List {
        /// Only show transactions whose notes contain this text
        #[arg(short, long)]
        search: Option<String>,

        /// Maximum number to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Record a transaction
    Add {
        /// Amount (must be greater than zero)
        amount: String,

        /// income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,

        /// Category id (food, shopping, housing, transport, health, salary,
        /// business, investment, gift, other)
        #[arg(short, long)]
        category: Option<String>,

        /// Custom category label, used with category "other"
        #[arg(long)]
        label: Option<String>,

        /// Notes
        #[arg(short, long, default_value = "")]
        notes: String,

        /// need or want (expenses only)
        #[arg(long)]
        class: Option<String>,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Repeats: weekly, monthly or yearly
        #[arg(short, long)]
        repeat: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },

    /// Ask the coach about one transaction
    Coach {
        /// Transaction ID
        id: String,
    },

    /// Recurring transactions that are due
    Due,
}

#[derive(Subcommand)]
pub enum GoalsAction {
    /// List goals with progress (default)
    List,

    /// Create a goal
    Add {
        /// Goal title
        title: String,

        /// Target amount
        #[arg(long)]
        target: String,

        /// Amount already saved or paid
        #[arg(long, default_value = "0")]
        current: String,

        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: String,

        /// saving or debt
        #[arg(short = 't', long = "type", default_value = "saving")]
        kind: String,

        /// Remind this many days before the deadline (0 = off)
        #[arg(long, default_value = "0")]
        remind: u32,
    },

    /// Overwrite the current amount of a goal
    Progress {
        /// Goal ID
        id: String,

        /// New current amount
        amount: String,
    },

    /// Delete a goal
    Delete {
        /// Goal ID
        id: String,
    },

    /// Ask the coach for a plan to reach a goal
    Strategy {
        /// Goal ID
        id: String,
    },

    /// Goals with a deadline inside their reminder window
    Reminders,
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all prompts and their override status (default)
    List,

    /// Show the content of a prompt
    Show {
        /// Prompt ID (e.g. coach_general)
        id: String,
    },

    /// Print the prompt override directory
    Path,
}
