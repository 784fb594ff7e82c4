//! Application session
//!
//! Owns the budget, ledger and goal services over one store, plus the coach
//! and the board of transient coaching results. Mutations take `&mut self`;
//! coaching calls take `&self` so several can be in flight at once.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info};

use crate::ai::{AIClient, CoachingMode, CoachingResult, ContentIdea, FinancialSnapshot, GoalStrategy};
use crate::budget::BudgetService;
use crate::coach::{Coach, CoachContext, StrategyContext};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::goals::GoalTracker;
use crate::ledger::Ledger;
use crate::models::Money;
use crate::prompts::PromptLibrary;
use crate::store::{FileStore, Store};
use crate::tracker::{CoachOutcome, CoachTarget, InsightBoard};

pub struct Session {
    config: Config,
    budget: BudgetService,
    ledger: Ledger,
    goals: GoalTracker,
    coach: Coach,
    board: InsightBoard,
}

impl Session {
    pub fn new(config: Config, store: Store, coach: Coach) -> Self {
        Self {
            budget: BudgetService::load(store.clone(), &config.budget),
            ledger: Ledger::load(store.clone()),
            goals: GoalTracker::load(store),
            coach,
            board: InsightBoard::new(),
            config,
        }
    }

    /// Open the file store and AI backend named by `config`
    pub fn open(config: Config) -> Result<Self> {
        let path = config
            .store_path()
            .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))?;
        debug!(path = %path.display(), "Opening store");
        let store = Store::new(Arc::new(FileStore::open(path)?), &config.store.namespace);
        let coach = Coach::from_config(&config.ai)?;
        Ok(Self::new(config, store, coach))
    }

    /// Session over a fresh in-memory store with embedded prompts only
    pub fn in_memory(config: Config, client: Option<AIClient>) -> Self {
        let store = Store::in_memory();
        let coach = Coach::new(client, PromptLibrary::embedded_only(), config.ai.clone());
        Self::new(config, store, coach)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn budget(&self) -> &BudgetService {
        &self.budget
    }

    pub fn budget_mut(&mut self) -> &mut BudgetService {
        &mut self.budget
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub fn goals(&self) -> &GoalTracker {
        &self.goals
    }

    pub fn goals_mut(&mut self) -> &mut GoalTracker {
        &mut self.goals
    }

    pub fn coach(&self) -> &Coach {
        &self.coach
    }

    pub fn board(&self) -> &InsightBoard {
        &self.board
    }

    /// Delete a goal and forget any strategy shown for it
    pub fn delete_goal(&mut self, id: &str) -> Result<bool> {
        let removed = self.goals.delete(id)?;
        self.board.invalidate_goal(id);
        Ok(removed)
    }

    /// Delete a transaction and forget any intervention shown for it
    pub fn delete_transaction(&mut self, id: &str) -> Result<bool> {
        let removed = self.ledger.delete(id)?;
        self.board.dismiss(&CoachTarget::Transaction(id.to_string()));
        Ok(removed)
    }

    /// Monthly savings assumed for goal strategies
    pub fn estimated_savings(&self) -> Money {
        let rate = i128::from(self.config.budget.savings_rate_percent);
        (i128::from(self.budget.income()) * rate / 100) as Money
    }

    pub fn snapshot(&self, reserves: Money, goal: Option<String>) -> FinancialSnapshot {
        FinancialSnapshot {
            income: self.budget.income(),
            expenses: self.budget.expenses(),
            reserves: reserves.max(0),
            goal,
        }
    }

    /// Review of the whole budget
    ///
    /// `Ok(None)` means a newer overview request or a dismissal made this
    /// reply stale.
    pub async fn coach_overview(
        &self,
        mode: CoachingMode,
        reserves: Money,
        goal: Option<String>,
    ) -> Result<Option<CoachingResult>> {
        let snapshot = self.snapshot(reserves, goal);
        let context = match mode {
            CoachingMode::General => CoachContext::general(snapshot),
            CoachingMode::Recognition => CoachContext::recognition(snapshot),
        };
        self.tracked(
            CoachTarget::Overview,
            self.coach.get_coach_insight(&context),
            CoachOutcome::Insight,
        )
        .await
    }

    /// Intervention on one recorded transaction
    pub async fn coach_transaction(&self, id: &str) -> Result<Option<CoachingResult>> {
        let transaction = self
            .ledger
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))?;
        let context = CoachContext::Transaction {
            income: self.budget.income(),
            transaction,
        };
        self.tracked(
            CoachTarget::Transaction(id.to_string()),
            self.coach.get_coach_insight(&context),
            CoachOutcome::Insight,
        )
        .await
    }

    pub async fn goal_strategy(&self, id: &str) -> Result<Option<GoalStrategy>> {
        let goal = self
            .goals
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("Goal {}", id)))?;
        let context = StrategyContext {
            income: self.budget.income(),
            savings: self.estimated_savings(),
        };
        self.tracked(
            CoachTarget::Goal(id.to_string()),
            self.coach.get_goal_strategy(goal, context),
            CoachOutcome::Strategy,
        )
        .await
    }

    pub async fn content_idea(&self, niche: &str) -> Result<Option<ContentIdea>> {
        self.tracked(
            CoachTarget::ContentIdea,
            self.coach.generate_content_idea(niche),
            CoachOutcome::Content,
        )
        .await
    }

    async fn tracked<T, F>(
        &self,
        target: CoachTarget,
        call: F,
        wrap: fn(T) -> CoachOutcome,
    ) -> Result<Option<T>>
    where
        T: Clone,
        F: Future<Output = Result<T>>,
    {
        let token = self.board.begin(target.clone());
        match call.await {
            Ok(value) => {
                let accepted = self.board.accept(&target, token, wrap(value.clone()));
                if accepted {
                    info!(%target, "Coaching result ready");
                }
                Ok(accepted.then_some(value))
            }
            Err(e) => {
                self.board.fail(&target, token);
                Err(e)
            }
        }
    }
}
