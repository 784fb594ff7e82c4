//! Savings and debt goals

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::ids::timestamp_id;
use crate::models::{FinancialGoal, Money, NewGoal};
use crate::store::{Store, StoreKey};

pub struct GoalTracker {
    store: Store,
    goals: Vec<FinancialGoal>,
}

impl GoalTracker {
    pub fn load(store: Store) -> Self {
        let goals = store.load_json_or(StoreKey::Goals, Vec::new());
        Self { store, goals }
    }

    /// Goals in creation order
    pub fn goals(&self) -> &[FinancialGoal] {
        &self.goals
    }

    pub fn get(&self, id: &str) -> Option<&FinancialGoal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn add(&mut self, draft: NewGoal) -> Result<FinancialGoal> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(Error::Validation("Goal title is required".to_string()));
        }
        if draft.target_amount <= 0 {
            return Err(Error::Validation(
                "Target amount must be greater than zero".to_string(),
            ));
        }
        if draft.current_amount < 0 {
            return Err(Error::Validation(
                "Current amount cannot be negative".to_string(),
            ));
        }

        let goal = FinancialGoal {
            id: timestamp_id(self.goals.iter().map(|g| g.id.as_str())),
            title: title.to_string(),
            target_amount: draft.target_amount,
            current_amount: draft.current_amount,
            deadline: draft.deadline,
            kind: draft.kind,
            reminder_days: draft.reminder_days,
        };

        let mut updated = self.goals.clone();
        updated.push(goal.clone());
        self.persist(updated)?;

        info!(id = %goal.id, title = %goal.title, "Added goal");
        Ok(goal)
    }

    /// Overwrite the saved amount of a goal
    ///
    /// Lower values are accepted; progress may go backwards.
    pub fn update_progress(&mut self, id: &str, amount: Money) -> Result<FinancialGoal> {
        if amount < 0 {
            return Err(Error::Validation(
                "Current amount cannot be negative".to_string(),
            ));
        }
        let pos = self
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| Error::NotFound(format!("Goal {}", id)))?;

        let mut updated = self.goals.clone();
        updated[pos].current_amount = amount;
        let goal = updated[pos].clone();
        self.persist(updated)?;

        info!(id, amount, progress = goal.progress(), "Updated goal progress");
        Ok(goal)
    }

    /// Remove a goal; returns false when the id is unknown
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let Some(pos) = self.goals.iter().position(|g| g.id == id) else {
            warn!(id, "Delete requested for unknown goal");
            return Ok(false);
        };

        let mut updated = self.goals.clone();
        updated.remove(pos);
        self.persist(updated)?;

        info!(id, "Deleted goal");
        Ok(true)
    }

    /// Goals whose deadline is inside their reminder window
    pub fn reminders(&self, today: NaiveDate) -> Vec<&FinancialGoal> {
        self.goals
            .iter()
            .filter(|g| g.is_nearing_deadline(today))
            .collect()
    }

    fn persist(&mut self, goals: Vec<FinancialGoal>) -> Result<()> {
        self.store.set_json(StoreKey::Goals, &goals)?;
        self.goals = goals;
        Ok(())
    }
}
