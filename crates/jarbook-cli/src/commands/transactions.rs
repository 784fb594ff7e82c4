//! Transaction command implementations

use anyhow::{bail, Result};
use chrono::NaiveDate;
use jarbook_core::budget::parse_amount;
use jarbook_core::{
    Classification, Frequency, KnownCategory, NewTransaction, Session, Transaction,
    TransactionType,
};

use super::{format_money, parse_arg, parse_date, print_coaching_result, truncate};

/// Raw `tx add` arguments
#[derive(Debug, Default, Clone)]
pub struct TxInput<'a> {
    pub amount: &'a str,
    pub kind: &'a str,
    pub category: Option<&'a str>,
    pub label: Option<&'a str>,
    pub notes: &'a str,
    pub class: Option<&'a str>,
    pub date: Option<&'a str>,
    pub repeat: Option<&'a str>,
}

impl TxInput<'_> {
    pub fn into_draft(self) -> Result<NewTransaction> {
        let kind: TransactionType = parse_arg(self.kind)?;
        let category = self
            .category
            .map(|c| parse_arg::<KnownCategory>(&c.to_lowercase()))
            .transpose()?;
        if let Some(category) = category {
            if !KnownCategory::for_type(kind).contains(&category) {
                bail!("Category '{}' is not available for {}", category, kind);
            }
        }
        let classification = self.class.map(parse_arg::<Classification>).transpose()?;
        if kind == TransactionType::Income && classification.is_some() {
            bail!("Need/want classification only applies to expenses");
        }

        Ok(NewTransaction {
            kind,
            amount: parse_amount(self.amount),
            date: self.date.map(parse_date).transpose()?,
            category,
            custom_category: self.label.map(str::to_string),
            notes: self.notes.to_string(),
            classification,
            frequency: self.repeat.map(parse_arg::<Frequency>).transpose()?,
            next_due_date: None,
        })
    }
}

fn amount_str(session: &Session, tx: &Transaction) -> String {
    let amount = format_money(tx.amount, &session.config().display);
    match tx.kind {
        TransactionType::Expense => format!("\x1b[31m-{}\x1b[0m", amount), // Red for expenses
        TransactionType::Income => format!("\x1b[32m+{}\x1b[0m", amount),  // Green for income
    }
}

fn print_row(session: &Session, tx: &Transaction) {
    let tag = match tx.classification {
        Some(c) => format!("{}/{}", tx.category, c),
        None => tx.category.to_string(),
    };
    let repeat = if tx.is_recurring { " 🔁" } else { "" };
    println!(
        "   [{}] {} │ {:>24} │ {:<16} │ {}{}",
        tx.id,
        tx.date,
        amount_str(session, tx),
        truncate(&tag, 16),
        truncate(&tx.notes, 32),
        repeat
    );
}

pub fn cmd_tx_list(session: &Session, search: Option<&str>, limit: usize) -> Result<()> {
    let ledger = session.ledger();
    if ledger.is_empty() {
        println!("No transactions yet. Record one with:");
        println!("  jarbook tx add 50000 --category food --notes \"Lunch\"");
        return Ok(());
    }

    let query = search.unwrap_or_default();
    let matches = ledger.search(query);
    let totals = ledger.totals(query);
    let display = &session.config().display;

    println!();
    if query.is_empty() {
        println!("📝 Transactions ({} total)", matches.len());
    } else {
        println!("📝 Transactions matching \"{}\" ({})", query, matches.len());
    }
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in matches.iter().take(limit) {
        print_row(session, tx);
    }
    if matches.len() > limit {
        println!("   ... {} more", matches.len() - limit);
    }

    println!();
    println!("   Income:  {}", format_money(totals.total_income, display));
    println!("   Expense: {}", format_money(totals.total_expense, display));
    println!("   Balance: {}", format_money(totals.balance, display));

    Ok(())
}

pub fn cmd_tx_add(session: &mut Session, draft: NewTransaction) -> Result<Transaction> {
    let tx = session.ledger_mut().add(draft)?;
    println!("✅ Recorded transaction {}:", tx.id);
    print_row(session, &tx);
    if let Some(next) = tx.next_due_date {
        println!("   Next due: {}", next);
    }
    Ok(tx)
}

pub fn cmd_tx_delete(session: &mut Session, id: &str) -> Result<()> {
    if session.delete_transaction(id)? {
        println!("✅ Deleted transaction {}", id);
    } else {
        println!("Transaction {} not found, nothing deleted.", id);
    }
    Ok(())
}

pub async fn cmd_tx_coach(session: &Session, id: &str) -> Result<()> {
    let Some(tx) = session.ledger().get(id) else {
        bail!("Transaction {} not found", id);
    };
    println!("🧭 Asking the coach about \"{}\"...", truncate(&tx.notes, 40));

    match session.coach_transaction(id).await? {
        Some(result) => print_coaching_result(&result),
        None => println!("   A newer request replaced this one."),
    }
    Ok(())
}

pub fn cmd_tx_due(session: &Session, today: NaiveDate) -> Result<()> {
    let due = session.ledger().due_recurring(today);
    if due.is_empty() {
        println!("✅ No recurring transactions due.");
        return Ok(());
    }

    println!();
    println!("🔁 Recurring transactions due ({})", due.len());
    println!("   ─────────────────────────────────────────────────────────────");
    for tx in due {
        print_row(session, tx);
        if let (Some(next), Some(freq)) = (tx.next_due_date, tx.frequency) {
            println!("        due {} ({})", next, freq);
        }
    }
    Ok(())
}
