//! Transaction ledger
//!
//! Newest-first list of income and expense entries. The whole list is
//! rewritten to the store on every change.

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::ids::timestamp_id;
use crate::models::{
    Category, Classification, LedgerTotals, Money, NewTransaction, Transaction,
    TransactionType,
};
use crate::store::{Store, StoreKey};

/// Transactions whose notes contain `query`, case-insensitively
///
/// An empty query matches everything. Order is preserved.
pub fn filter<'a>(transactions: &'a [Transaction], query: &str) -> Vec<&'a Transaction> {
    let needle = query.to_lowercase();
    transactions
        .iter()
        .filter(|tx| needle.is_empty() || tx.notes.to_lowercase().contains(&needle))
        .collect()
}

/// Income, expense and balance totals
///
/// Sums are taken in `i128` and clamped to the `Money` range.
pub fn aggregate<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> LedgerTotals {
    let (income, expense) = transactions
        .into_iter()
        .fold((0i128, 0i128), |(income, expense), tx| match tx.kind {
            TransactionType::Income => (income + i128::from(tx.amount), expense),
            TransactionType::Expense => (income, expense + i128::from(tx.amount)),
        });
    let total_income = clamp_money(income);
    let total_expense = clamp_money(expense);
    LedgerTotals {
        total_income,
        total_expense,
        balance: total_income.saturating_sub(total_expense),
    }
}

fn clamp_money(value: i128) -> Money {
    Money::try_from(value).unwrap_or(if value < 0 { Money::MIN } else { Money::MAX })
}

pub struct Ledger {
    store: Store,
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn load(store: Store) -> Self {
        let transactions = store.load_json_or(StoreKey::Transactions, Vec::new());
        Self {
            store,
            transactions,
        }
    }

    /// All transactions, newest first
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id == id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn search(&self, query: &str) -> Vec<&Transaction> {
        filter(&self.transactions, query)
    }

    /// Totals over the transactions matching `query`
    pub fn totals(&self, query: &str) -> LedgerTotals {
        aggregate(self.search(query))
    }

    /// Validate a draft and record it at the front of the ledger
    pub fn add(&mut self, draft: NewTransaction) -> Result<Transaction> {
        if draft.amount <= 0 {
            return Err(Error::Validation(
                "Amount must be greater than zero".to_string(),
            ));
        }

        let date = draft.date.unwrap_or_else(|| Local::now().date_naive());
        let classification = match draft.kind {
            TransactionType::Expense => {
                Some(draft.classification.unwrap_or(Classification::Need))
            }
            TransactionType::Income => None,
        };

        let (is_recurring, next_due_date) = match draft.frequency {
            Some(frequency) => {
                let next = draft.next_due_date.or_else(|| frequency.advance(date));
                (true, next)
            }
            None => (false, None),
        };

        let tx = Transaction {
            id: timestamp_id(self.transactions.iter().map(|tx| tx.id.as_str())),
            date,
            amount: draft.amount,
            category: Category::resolve(draft.category, draft.custom_category.as_deref()),
            notes: draft.notes.trim().to_string(),
            kind: draft.kind,
            classification,
            is_recurring,
            frequency: draft.frequency,
            next_due_date,
        };

        let mut updated = self.transactions.clone();
        updated.insert(0, tx.clone());
        self.store.set_json(StoreKey::Transactions, &updated)?;
        self.transactions = updated;

        info!(id = %tx.id, kind = %tx.kind, amount = tx.amount, "Added transaction");
        Ok(tx)
    }

    /// Remove a transaction; returns false when the id is unknown
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let Some(pos) = self.transactions.iter().position(|tx| tx.id == id) else {
            warn!(id, "Delete requested for unknown transaction");
            return Ok(false);
        };

        let mut updated = self.transactions.clone();
        updated.remove(pos);
        self.store.set_json(StoreKey::Transactions, &updated)?;
        self.transactions = updated;

        info!(id, "Deleted transaction");
        Ok(true)
    }

    /// Recurring entries whose next due date is on or before `today`
    pub fn due_recurring(&self, today: NaiveDate) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|tx| tx.is_recurring)
            .filter(|tx| tx.next_due_date.is_some_and(|due| due <= today))
            .collect()
    }
}
