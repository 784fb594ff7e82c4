//! Jarbook CLI - Six-jar budgeting with an AI financial coach
//!
//! Usage:
//!   jarbook budget                  Show income, expenses and jars
//!   jarbook budget income 25000000  Set monthly income
//!   jarbook tx add 50000 -c food    Record a transaction
//!   jarbook goals                   List goals
//!   jarbook coach                   Ask the coach for a review

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use jarbook_core::prompts::PromptLibrary;
use jarbook_core::{Config, ViewMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use commands::{GoalInput, TxInput};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(ref path) = cli.store {
        config.store.path = Some(path.clone());
    }

    match cli.command {
        Commands::Config => commands::cmd_config(&config, cli.config.as_deref()),
        Commands::Pyramid => commands::cmd_pyramid(),
        Commands::Prompts { action } => {
            let mut library = PromptLibrary::new();
            match action {
                None | Some(PromptsAction::List) => commands::cmd_prompts_list(&mut library),
                Some(PromptsAction::Show { id }) => commands::cmd_prompts_show(&mut library, &id),
                Some(PromptsAction::Path) => commands::cmd_prompts_path(),
            }
        }
        Commands::Budget { action, yearly } => {
            let mut session = commands::open_session(config)?;
            let view = if yearly {
                ViewMode::Yearly
            } else {
                ViewMode::Monthly
            };
            match action {
                None | Some(BudgetAction::Show) => commands::cmd_budget_show(&session, view),
                Some(BudgetAction::Income { amount }) => {
                    commands::cmd_budget_income(&mut session, &amount)
                }
                Some(BudgetAction::Expenses { amount }) => {
                    commands::cmd_budget_expenses(&mut session, &amount)
                }
                Some(BudgetAction::Jar { jar, percent }) => {
                    commands::cmd_budget_jar(&mut session, &jar, &percent)
                }
                Some(BudgetAction::Reset) => commands::cmd_budget_reset(&mut session),
            }
        }
        Commands::Tx { action } => {
            let mut session = commands::open_session(config)?;
            match action {
                None => commands::cmd_tx_list(&session, None, 20),
                Some(TxAction::List { search, limit }) => {
                    commands::cmd_tx_list(&session, search.as_deref(), limit)
                }
                Some(TxAction::Add {
                    amount,
                    kind,
                    category,
                    label,
                    notes,
                    class,
                    date,
                    repeat,
                }) => {
                    let draft = TxInput {
                        amount: &amount,
                        kind: &kind,
                        category: category.as_deref(),
                        label: label.as_deref(),
                        notes: &notes,
                        class: class.as_deref(),
                        date: date.as_deref(),
                        repeat: repeat.as_deref(),
                    }
                    .into_draft()?;
                    commands::cmd_tx_add(&mut session, draft).map(|_| ())
                }
                Some(TxAction::Delete { id }) => commands::cmd_tx_delete(&mut session, &id),
                Some(TxAction::Coach { id }) => commands::cmd_tx_coach(&session, &id).await,
                Some(TxAction::Due) => commands::cmd_tx_due(&session, commands::today()),
            }
        }
        Commands::Goals { action } => {
            let mut session = commands::open_session(config)?;
            let today = commands::today();
            match action {
                None | Some(GoalsAction::List) => commands::cmd_goals_list(&session, today),
                Some(GoalsAction::Add {
                    title,
                    target,
                    current,
                    deadline,
                    kind,
                    remind,
                }) => {
                    let draft = GoalInput {
                        title: &title,
                        target: &target,
                        current: &current,
                        deadline: &deadline,
                        kind: &kind,
                        remind,
                    }
                    .into_draft()?;
                    commands::cmd_goals_add(&mut session, draft, today).map(|_| ())
                }
                Some(GoalsAction::Progress { id, amount }) => {
                    commands::cmd_goals_progress(&mut session, &id, &amount, today)
                }
                Some(GoalsAction::Delete { id }) => commands::cmd_goals_delete(&mut session, &id),
                Some(GoalsAction::Strategy { id }) => {
                    commands::cmd_goals_strategy(&session, &id).await
                }
                Some(GoalsAction::Reminders) => commands::cmd_goals_reminders(&session, today),
            }
        }
        Commands::Coach {
            recognition,
            reserves,
            goal,
        } => {
            let session = commands::open_session(config)?;
            commands::cmd_coach(&session, recognition, &reserves, goal).await
        }
        Commands::Content { niche } => {
            let session = commands::open_session(config)?;
            commands::cmd_content(&session, &niche).await
        }
    }
}
