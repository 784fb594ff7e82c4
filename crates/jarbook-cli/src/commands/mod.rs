//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `budget` - Income, expenses and jar allocation
//! - `coach` - AI coaching (overview review, content ideas) and the pyramid
//! - `config` - Effective configuration
//! - `goals` - Goal management and goal strategies
//! - `prompts` - Prompt library management commands
//! - `transactions` - Ledger commands (list, add, delete, coach, due)

pub mod budget;
pub mod coach;
pub mod config;
pub mod goals;
pub mod prompts;
pub mod transactions;

// Re-export command functions for main.rs
pub use budget::*;
pub use coach::*;
pub use config::*;
pub use goals::*;
pub use prompts::*;
pub use transactions::*;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use jarbook_core::config::DisplayConfig;
use jarbook_core::{Config, Money, Session};

/// Open the session named by the config
pub fn open_session(config: Config) -> Result<Session> {
    Session::open(config).context("Failed to open store")
}

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Group digits and append the currency symbol, e.g. `11.000.000 VND`
pub fn format_money(amount: Money, display: &DisplayConfig) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push_str(&display.thousands_separator);
        }
        grouped.push(c);
    }

    let sign = if amount < 0 { "-" } else { "" };
    if display.currency_symbol.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{} {}", sign, grouped, display.currency_symbol)
    }
}

/// Parse a YYYY-MM-DD date argument
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Parse an enum argument through its `FromStr` impl
pub(crate) fn parse_arg<T>(s: &str) -> Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    s.parse::<T>().map_err(|e| anyhow::anyhow!(e))
}

/// Today in local time
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
