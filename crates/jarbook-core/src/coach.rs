//! AI coaching gateway
//!
//! Builds the prompt for each coaching operation, sends it to the configured
//! backend with the matching response schema, and validates the reply.
//! Each call is a single round trip with no retry and no caching.
//!
//! Callers only ever see [`Error::CoachingUnavailable`] for a failed call;
//! the underlying cause (network, HTTP status, malformed reply) is logged.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::ai::parsing::{parse_coaching_result, parse_content_idea, parse_goal_strategy};
use crate::ai::{
    AIClient, CoachBackend, CoachingMode, CoachingResult, ContentIdea, FinancialSnapshot,
    GenerationRequest, GoalStrategy, ResponseSchema,
};
use crate::config::AiConfig;
use crate::error::{Error, Result};
use crate::models::{FinancialGoal, Money, Transaction, TransactionType};
use crate::prompts::{PromptId, PromptLibrary, RenderedPrompt};

/// Goal text sent when the user has not named one
pub const DEFAULT_COACHING_GOAL: &str = "Stabilize position";

/// What a coaching request is about
#[derive(Debug, Clone, PartialEq)]
pub enum CoachContext {
    Overview {
        mode: CoachingMode,
        snapshot: FinancialSnapshot,
    },
    Transaction {
        income: Money,
        transaction: Transaction,
    },
}

impl CoachContext {
    pub fn general(snapshot: FinancialSnapshot) -> Self {
        Self::Overview {
            mode: CoachingMode::General,
            snapshot,
        }
    }

    pub fn recognition(snapshot: FinancialSnapshot) -> Self {
        Self::Overview {
            mode: CoachingMode::Recognition,
            snapshot,
        }
    }

    fn prompt_id(&self) -> PromptId {
        match self {
            Self::Overview {
                mode: CoachingMode::General,
                ..
            } => PromptId::CoachGeneral,
            Self::Overview {
                mode: CoachingMode::Recognition,
                ..
            } => PromptId::CoachRecognition,
            Self::Transaction { .. } => PromptId::CoachTransaction,
        }
    }

    fn vars(&self) -> HashMap<&'static str, String> {
        let mut vars = HashMap::new();
        match self {
            Self::Overview { snapshot, .. } => {
                vars.insert("income", snapshot.income.to_string());
                vars.insert("expenses", snapshot.expenses.to_string());
                vars.insert("reserves", snapshot.reserves.to_string());
                vars.insert("surplus", (snapshot.income - snapshot.expenses).to_string());
                let goal = snapshot
                    .goal
                    .as_deref()
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .unwrap_or(DEFAULT_COACHING_GOAL);
                vars.insert("goal", goal.to_string());
            }
            Self::Transaction {
                income,
                transaction,
            } => {
                let classification = match (transaction.kind, transaction.classification) {
                    (TransactionType::Expense, Some(c)) => c.as_str(),
                    (kind, _) => kind.as_str(),
                };
                vars.insert("notes", transaction.notes.clone());
                vars.insert("amount", transaction.amount.to_string());
                vars.insert("classification", classification.to_string());
                vars.insert("income", income.to_string());
                vars.insert("category", transaction.category.to_string());
                let recurring = transaction
                    .frequency
                    .filter(|_| transaction.is_recurring)
                    .map(|f| f.as_str().to_string())
                    .unwrap_or_default();
                vars.insert("recurring", recurring);
            }
        }
        vars
    }
}

/// Figures the goal strategy is judged against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyContext {
    pub income: Money,
    /// Estimated monthly savings
    pub savings: Money,
}

/// Gateway to the AI coaching service
#[derive(Clone)]
pub struct Coach {
    client: Option<AIClient>,
    prompts: Arc<RwLock<PromptLibrary>>,
    config: AiConfig,
}

impl Coach {
    pub fn new(client: Option<AIClient>, prompts: PromptLibrary, config: AiConfig) -> Self {
        Self {
            client,
            prompts: Arc::new(RwLock::new(prompts)),
            config,
        }
    }

    /// Build from configuration, with prompt overrides from the data dir
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        let client = AIClient::from_config(config)?;
        Ok(Self::new(client, PromptLibrary::new(), config.clone()))
    }

    /// Whether a backend is configured
    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    pub fn client(&self) -> Option<&AIClient> {
        self.client.as_ref()
    }

    /// Classify the user on the pyramid and coach on the given context
    pub async fn get_coach_insight(&self, context: &CoachContext) -> Result<CoachingResult> {
        let prompt = self.render(context.prompt_id(), &context.vars())?;
        self.run(&prompt, &ResponseSchema::coaching(), parse_coaching_result)
            .await
    }

    /// Plan for reaching a goal
    pub async fn get_goal_strategy(
        &self,
        goal: &FinancialGoal,
        context: StrategyContext,
    ) -> Result<GoalStrategy> {
        let mut vars = HashMap::new();
        vars.insert("title", goal.title.clone());
        vars.insert("goal_type", goal.kind.as_str().to_string());
        vars.insert("target", goal.target_amount.to_string());
        vars.insert("current", goal.current_amount.to_string());
        vars.insert("deadline", goal.deadline.to_string());
        vars.insert("income", context.income.to_string());
        if context.savings > 0 {
            vars.insert("savings", context.savings.to_string());
        }

        let prompt = self.render(PromptId::GoalStrategy, &vars)?;
        self.run(&prompt, &ResponseSchema::goal_strategy(), parse_goal_strategy)
            .await
    }

    /// Short-video idea for a niche
    ///
    /// A blank niche is rejected before any request is made.
    pub async fn generate_content_idea(&self, niche: &str) -> Result<ContentIdea> {
        let niche = niche.trim();
        if niche.is_empty() {
            return Err(Error::Validation("Niche is required".to_string()));
        }

        let mut vars = HashMap::new();
        vars.insert("niche", niche.to_string());
        let prompt = self.render(PromptId::ContentIdea, &vars)?;
        self.run(&prompt, &ResponseSchema::content_idea(), parse_content_idea)
            .await
    }

    fn render(&self, id: PromptId, vars: &HashMap<&str, String>) -> Result<RenderedPrompt> {
        let mut prompts = self.prompts.write().map_err(|_| {
            warn!("Prompt library lock poisoned");
            Error::CoachingUnavailable
        })?;
        prompts.render(id, vars).map_err(|e| {
            warn!(prompt = id.as_str(), error = %e, "Failed to render prompt");
            Error::CoachingUnavailable
        })
    }

    async fn run<T>(
        &self,
        prompt: &RenderedPrompt,
        schema: &ResponseSchema,
        parse: fn(&str) -> Result<T>,
    ) -> Result<T> {
        let Some(client) = &self.client else {
            warn!("No AI backend configured");
            return Err(Error::CoachingUnavailable);
        };

        let model = self.config.model_for_task(prompt.task);
        let request = GenerationRequest {
            model,
            system: &prompt.system,
            user: &prompt.user,
            schema,
        };
        debug!(backend = client.name(), model, schema = schema.name, "Sending coaching request");

        let raw = client.generate(&request).await.map_err(|e| {
            warn!(backend = client.name(), model, error = %e, "Coaching request failed");
            Error::CoachingUnavailable
        })?;

        parse(&raw).map_err(|e| {
            warn!(model, schema = schema.name, error = %e, "Discarding invalid coaching response");
            Error::CoachingUnavailable
        })
    }
}
