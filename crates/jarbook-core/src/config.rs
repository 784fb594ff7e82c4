//! Layered configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Embedded defaults (compiled into binary from `config/jarbook.toml`)
//! 2. Override file, either passed explicitly or found in the data dir
//!    (~/.local/share/jarbook/config/jarbook.toml)
//!
//! Keys missing from the override keep their default. Environment variables
//! are applied last:
//! - `AI_BACKEND`: gemini, openai_compatible, mock
//! - `GEMINI_HOST`, `GEMINI_MODEL`: Gemini endpoint and model
//! - `OPENAI_COMPATIBLE_HOST`, `OPENAI_COMPATIBLE_MODEL`: OpenAI-compatible
//!   endpoint and model (setting the host also selects that backend)

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::Money;
use crate::store::DEFAULT_NAMESPACE;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/jarbook.toml");

/// Public Gemini API endpoint
pub const GEMINI_DEFAULT_HOST: &str = "https://generativelanguage.googleapis.com";

/// Task types for model selection
///
/// Each prompt declares its task type in frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskType {
    /// General, recognition and per-transaction coaching
    Coaching,
    /// Per-goal strategy
    GoalStrategy,
    /// Content ideation
    ContentIdea,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Coaching => "coaching",
            Self::GoalStrategy => "goal_strategy",
            Self::ContentIdea => "content_idea",
        }
    }

    pub fn all() -> &'static [TaskType] {
        &[Self::Coaching, Self::GoalStrategy, Self::ContentIdea]
    }
}

impl std::str::FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "coaching" => Ok(Self::Coaching),
            "goal_strategy" => Ok(Self::GoalStrategy),
            "content_idea" => Ok(Self::ContentIdea),
            _ => Err(format!("Unknown task type: {}", s)),
        }
    }
}

/// Which AI backend to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Gemini,
    OpenAICompatible,
    Mock,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAICompatible => "openai_compatible",
            Self::Mock => "mock",
        }
    }

    fn default_api_key_env(&self) -> &'static str {
        match self {
            Self::Gemini | Self::Mock => "GEMINI_API_KEY",
            Self::OpenAICompatible => "OPENAI_COMPATIBLE_API_KEY",
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" | "ollama" => {
                Ok(Self::OpenAICompatible)
            }
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown AI backend: {}", s)),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Explicit store file; `None` means the platform default
    pub path: Option<PathBuf>,
    pub namespace: String,
}

#[derive(Debug, Clone)]
pub struct BudgetConfig {
    pub default_income: Money,
    pub default_expenses: Money,
    /// Share of income assumed saved when asking for a goal strategy
    pub savings_rate_percent: u8,
    /// Refuse to persist jar configs that do not add up to 100%
    pub strict_allocation: bool,
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub backend: BackendKind,
    pub host: Option<String>,
    pub api_key_env: Option<String>,
    pub timeout: Duration,
    pub default_model: String,
    pub models: HashMap<TaskType, String>,
}

impl AiConfig {
    /// Model for a task, falling back to the default model
    pub fn model_for_task(&self, task: TaskType) -> &str {
        self.models
            .get(&task)
            .map(String::as_str)
            .unwrap_or(&self.default_model)
    }

    /// Name of the environment variable holding the API key
    pub fn api_key_env(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or_else(|| self.backend.default_api_key_env())
    }

    /// API key read from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(self.api_key_env())
            .ok()
            .filter(|k| !k.trim().is_empty())
    }

    /// Server URL for the selected backend
    pub fn host(&self) -> Option<&str> {
        match (&self.host, self.backend) {
            (Some(host), _) => Some(host.as_str()),
            (None, BackendKind::Gemini) => Some(GEMINI_DEFAULT_HOST),
            (None, _) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub currency_symbol: String,
    pub thousands_separator: String,
}

/// Effective configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub budget: BudgetConfig,
    pub ai: AiConfig,
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                path: None,
                namespace: DEFAULT_NAMESPACE.to_string(),
            },
            budget: BudgetConfig {
                default_income: 20_000_000,
                default_expenses: 15_000_000,
                savings_rate_percent: 20,
                strict_allocation: false,
            },
            ai: AiConfig {
                backend: BackendKind::Gemini,
                host: None,
                api_key_env: None,
                timeout: Duration::from_secs(60),
                default_model: "gemini-3-flash-preview".to_string(),
                models: HashMap::new(),
            },
            display: DisplayConfig {
                currency_symbol: "VND".to_string(),
                thousands_separator: ".".to_string(),
            },
        }
    }
}

impl Config {
    /// Load embedded defaults, then the override file, then the environment
    ///
    /// `override_path` wins over the data-dir override. An explicit path that
    /// does not exist is an error; a missing data-dir override is not.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::embedded()?;

        let override_file = match override_path {
            Some(path) if !path.exists() => {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )))
            }
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };

        if let Some(path) = override_file {
            debug!(path = %path.display(), "Loading config override");
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            config.apply_toml(&content)?;
        }

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Embedded defaults only (no override file, no environment)
    pub fn embedded() -> Result<Self> {
        let mut config = Self::default();
        config.apply_toml(DEFAULT_CONFIG)?;
        Ok(config)
    }

    /// Overlay values present in a TOML document
    pub fn apply_toml(&mut self, content: &str) -> Result<()> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        if let Some(store) = raw.store {
            if let Some(path) = store.path {
                self.store.path = Some(path);
            }
            if let Some(namespace) = store.namespace {
                self.store.namespace = namespace;
            }
        }

        if let Some(budget) = raw.budget {
            if let Some(income) = budget.default_income {
                self.budget.default_income = income.max(0);
            }
            if let Some(expenses) = budget.default_expenses {
                self.budget.default_expenses = expenses.max(0);
            }
            if let Some(rate) = budget.savings_rate_percent {
                self.budget.savings_rate_percent = rate.min(100);
            }
            if let Some(strict) = budget.strict_allocation {
                self.budget.strict_allocation = strict;
            }
        }

        if let Some(ai) = raw.ai {
            if let Some(backend) = ai.backend {
                self.ai.backend = backend.parse().map_err(Error::Config)?;
            }
            if let Some(host) = ai.host {
                self.ai.host = Some(host);
            }
            if let Some(env) = ai.api_key_env {
                self.ai.api_key_env = Some(env);
            }
            if let Some(secs) = ai.timeout_secs {
                self.ai.timeout = Duration::from_secs(secs.max(1));
            }
            if let Some(model) = ai.default_model {
                self.ai.default_model = model;
            }
            for (task_name, model) in ai.models.unwrap_or_default() {
                match task_name.parse::<TaskType>() {
                    Ok(task) => {
                        self.ai.models.insert(task, model);
                    }
                    Err(_) => warn!(task = %task_name, "Skipping unknown task type in config"),
                }
            }
        }

        if let Some(display) = raw.display {
            if let Some(symbol) = display.currency_symbol {
                self.display.currency_symbol = symbol;
            }
            if let Some(sep) = display.thousands_separator {
                self.display.thousands_separator = sep;
            }
        }

        Ok(())
    }

    /// Apply environment overrides through a lookup function
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("OPENAI_COMPATIBLE_HOST") {
            self.ai.backend = BackendKind::OpenAICompatible;
            self.ai.host = Some(host);
            if let Some(model) = lookup("OPENAI_COMPATIBLE_MODEL") {
                self.use_single_model(model);
            }
        }

        if let Some(backend) = lookup("AI_BACKEND") {
            match backend.parse::<BackendKind>() {
                Ok(kind) => self.ai.backend = kind,
                Err(_) => warn!(backend = %backend, "Unknown AI_BACKEND, keeping configured backend"),
            }
        }

        if self.ai.backend == BackendKind::Gemini {
            if let Some(host) = lookup("GEMINI_HOST") {
                self.ai.host = Some(host);
            }
            if let Some(model) = lookup("GEMINI_MODEL") {
                self.use_single_model(model);
            }
        }
    }

    /// Route every task to one model
    fn use_single_model(&mut self, model: String) {
        self.ai.models.clear();
        self.ai.default_model = model;
    }

    /// Store file path (explicit or platform default)
    pub fn store_path(&self) -> Option<PathBuf> {
        self.store
            .path
            .clone()
            .or_else(crate::store::default_store_path)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("jarbook").join("config").join("jarbook.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    store: Option<RawStore>,
    budget: Option<RawBudget>,
    ai: Option<RawAi>,
    display: Option<RawDisplay>,
}

#[derive(Debug, Deserialize)]
struct RawStore {
    path: Option<PathBuf>,
    namespace: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBudget {
    default_income: Option<Money>,
    default_expenses: Option<Money>,
    savings_rate_percent: Option<u8>,
    strict_allocation: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawAi {
    backend: Option<String>,
    host: Option<String>,
    api_key_env: Option<String>,
    timeout_secs: Option<u64>,
    default_model: Option<String>,
    models: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct RawDisplay {
    currency_symbol: Option<String>,
    thousands_separator: Option<String>,
}
