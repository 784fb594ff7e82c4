//! Jarbook Core Library
//!
//! Shared functionality for the Jarbook budgeting and coaching tool:
//! - Six-jar budget allocation with income-tier defaults
//! - Transaction ledger with search, totals and recurrence
//! - Savings and debt goals with deadline reminders
//! - Pluggable AI coaching backends (Gemini, OpenAI-compatible servers)
//! - Prompt library for customizable coaching prompts
//! - Namespaced key-value store (in-memory or JSON file)

pub mod ai;
pub mod budget;
pub mod coach;
pub mod config;
pub mod error;
pub mod goals;
pub mod ids;
pub mod ledger;
pub mod models;
pub mod prompts;
pub mod pyramid;
pub mod session;
pub mod store;
pub mod tracker;

/// Test utilities including a mock Gemini / OpenAI-compatible server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    AIClient, CoachBackend, CoachingMode, CoachingNarrative, CoachingResult, ContentIdea,
    FeasibilityStatus, FinancialSnapshot, GeminiBackend, GoalStrategy, MockBackend,
    OpenAICompatibleBackend,
};
pub use budget::{AllocationStatus, BudgetService};
pub use coach::{Coach, CoachContext, StrategyContext};
pub use config::{BackendKind, Config, TaskType};
pub use error::{Error, Result};
pub use goals::GoalTracker;
pub use ledger::Ledger;
pub use models::*;
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use pyramid::PyramidLevel;
pub use session::Session;
pub use store::{FileStore, KeyValueStore, MemoryStore, Store, StoreKey};
pub use tracker::{CoachOutcome, CoachTarget, InsightBoard, RequestToken, RequestTracker};
