//! Prompt Library for the coaching gateway
//!
//! Prompts are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/jarbook/prompts/overrides/)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Each prompt is Markdown with YAML frontmatter and `# System` / `# User`
//! sections. Coaching and goal prompts are sent with the shared coach persona
//! (`coach_system`) followed by their own system section.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::config::TaskType;
use crate::error::{Error, Result};
use crate::pyramid::describe_levels;

/// Embedded default prompts (compiled into binary)
mod defaults {
    pub const COACH_SYSTEM: &str = include_str!("../../../prompts/coach_system.md");
    pub const COACH_GENERAL: &str = include_str!("../../../prompts/coach_general.md");
    pub const COACH_RECOGNITION: &str = include_str!("../../../prompts/coach_recognition.md");
    pub const COACH_TRANSACTION: &str = include_str!("../../../prompts/coach_transaction.md");
    pub const GOAL_STRATEGY: &str = include_str!("../../../prompts/goal_strategy.md");
    pub const CONTENT_IDEA: &str = include_str!("../../../prompts/content_idea.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Shared coach persona, pyramid and response structure
    CoachSystem,
    CoachGeneral,
    CoachRecognition,
    CoachTransaction,
    GoalStrategy,
    ContentIdea,
}

impl PromptId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoachSystem => "coach_system",
            Self::CoachGeneral => "coach_general",
            Self::CoachRecognition => "coach_recognition",
            Self::CoachTransaction => "coach_transaction",
            Self::GoalStrategy => "goal_strategy",
            Self::ContentIdea => "content_idea",
        }
    }

    pub fn all() -> &'static [PromptId] {
        &[
            Self::CoachSystem,
            Self::CoachGeneral,
            Self::CoachRecognition,
            Self::CoachTransaction,
            Self::GoalStrategy,
            Self::ContentIdea,
        ]
    }

    /// Whether the coach persona is prepended to this prompt's system section
    pub fn uses_coach_persona(&self) -> bool {
        !matches!(self, Self::CoachSystem | Self::ContentIdea)
    }

    fn default_content(&self) -> &'static str {
        match self {
            Self::CoachSystem => defaults::COACH_SYSTEM,
            Self::CoachGeneral => defaults::COACH_GENERAL,
            Self::CoachRecognition => defaults::COACH_RECOGNITION,
            Self::CoachTransaction => defaults::COACH_TRANSACTION,
            Self::GoalStrategy => defaults::GOAL_STRATEGY,
            Self::ContentIdea => defaults::CONTENT_IDEA,
        }
    }
}

impl std::str::FromStr for PromptId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("Unknown prompt: {}", s))
    }
}

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    pub id: String,
    /// Version number for tracking changes
    pub version: u32,
    /// Task type for model selection (coaching, goal_strategy, content_idea)
    pub task_type: String,
}

impl PromptMetadata {
    /// Parsed task type, `None` when the frontmatter names an unknown one
    pub fn task(&self) -> Option<TaskType> {
        self.task_type.parse().ok()
    }
}

/// A loaded prompt with metadata and content
#[derive(Debug, Clone)]
pub struct Prompt {
    pub metadata: PromptMetadata,
    /// The prompt body (system + user sections)
    pub content: String,
    pub is_override: bool,
    pub override_path: Option<PathBuf>,
}

impl Prompt {
    pub fn system_section(&self) -> Option<&str> {
        extract_section(&self.content, "# System")
    }

    pub fn user_section(&self) -> Option<&str> {
        extract_section(&self.content, "# User")
    }

    /// Render the whole body with template variables replaced
    pub fn render(&self, vars: &HashMap<&str, String>) -> String {
        render_template(&self.content, vars)
    }

    /// Render just the user section, or the whole body if there is none
    pub fn render_user(&self, vars: &HashMap<&str, String>) -> String {
        match self.user_section() {
            Some(user) => render_template(user, vars),
            None => self.render(vars),
        }
    }

    /// Render the system section; empty when the prompt has none
    pub fn render_system(&self, vars: &HashMap<&str, String>) -> String {
        self.system_section()
            .map(|system| render_template(system, vars))
            .unwrap_or_default()
    }
}

/// Both halves of a request, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
    pub task: TaskType,
}

/// Prompt library for loading and caching prompts
pub struct PromptLibrary {
    override_dir: Option<PathBuf>,
    cache: HashMap<PromptId, Prompt>,
}

impl PromptLibrary {
    /// Create a new prompt library with default paths
    pub fn new() -> Self {
        Self {
            override_dir: default_prompts_dir(),
            cache: HashMap::new(),
        }
    }

    pub fn with_override_dir(path: PathBuf) -> Self {
        Self {
            override_dir: Some(path),
            cache: HashMap::new(),
        }
    }

    /// Create a prompt library with no override directory (embedded only)
    pub fn embedded_only() -> Self {
        Self {
            override_dir: None,
            cache: HashMap::new(),
        }
    }

    /// Get a prompt by ID, loading from override or default
    pub fn get(&mut self, id: PromptId) -> Result<&Prompt> {
        if !self.cache.contains_key(&id) {
            let prompt = self.load(id)?;
            self.cache.insert(id, prompt);
        }
        self.cache
            .get(&id)
            .ok_or_else(|| Error::InvalidData(format!("Prompt {} not cached", id.as_str())))
    }

    /// Build the system and user text for a request
    ///
    /// `vars` fills the user template. The coach persona always receives the
    /// pyramid taxonomy as `pyramid_levels`.
    pub fn render(&mut self, id: PromptId, vars: &HashMap<&str, String>) -> Result<RenderedPrompt> {
        let mut system_vars = vars.clone();
        system_vars.insert("pyramid_levels", describe_levels());

        let mut system = String::new();
        if id.uses_coach_persona() {
            system.push_str(&self.get(PromptId::CoachSystem)?.render_system(&system_vars));
        }

        let prompt = self.get(id)?;
        let own_system = prompt.render_system(&system_vars);
        if !own_system.is_empty() {
            if !system.is_empty() {
                system.push_str("\n\n");
            }
            system.push_str(&own_system);
        }

        let task = prompt.metadata.task().ok_or_else(|| {
            Error::InvalidData(format!(
                "Prompt {} has unknown task_type: {}",
                id.as_str(),
                prompt.metadata.task_type
            ))
        })?;

        Ok(RenderedPrompt {
            system,
            user: prompt.render_user(vars),
            task,
        })
    }

    /// Load a prompt (checking override first, then default)
    fn load(&self, id: PromptId) -> Result<Prompt> {
        if let Some(ref override_dir) = self.override_dir {
            let override_path = override_dir.join(format!("{}.md", id.as_str()));
            if override_path.exists() {
                let content = fs::read_to_string(&override_path).map_err(|e| {
                    Error::InvalidData(format!("Failed to read prompt override: {}", e))
                })?;
                let (metadata, body) = parse_prompt(&content)?;
                return Ok(Prompt {
                    metadata,
                    content: body,
                    is_override: true,
                    override_path: Some(override_path),
                });
            }
        }

        let (metadata, body) = parse_prompt(id.default_content())?;
        Ok(Prompt {
            metadata,
            content: body,
            is_override: false,
            override_path: None,
        })
    }

    /// List all prompts with their override status
    pub fn list(&mut self) -> Vec<PromptInfo> {
        PromptId::all()
            .iter()
            .map(|&id| {
                let has_override = self.has_override(id);
                let override_path = if has_override {
                    self.override_path(id)
                } else {
                    None
                };
                let prompt = self.get(id).ok();
                PromptInfo {
                    id: id.as_str().to_string(),
                    version: prompt.map(|p| p.metadata.version).unwrap_or(0),
                    task_type: prompt
                        .map(|p| p.metadata.task_type.clone())
                        .unwrap_or_default(),
                    has_override,
                    override_path,
                }
            })
            .collect()
    }

    pub fn has_override(&self, id: PromptId) -> bool {
        self.override_path(id).is_some_and(|p| p.exists())
    }

    fn override_path(&self, id: PromptId) -> Option<PathBuf> {
        self.override_dir
            .as_ref()
            .map(|d| d.join(format!("{}.md", id.as_str())))
    }

    pub fn override_dir(&self) -> Option<&PathBuf> {
        self.override_dir.as_ref()
    }

    /// Clear the cache (useful after editing override files)
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Information about a prompt for listing
#[derive(Debug, Clone)]
pub struct PromptInfo {
    pub id: String,
    pub version: u32,
    pub task_type: String,
    pub has_override: bool,
    pub override_path: Option<PathBuf>,
}

/// Default prompts override directory
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("jarbook").join("prompts").join("overrides"))
}

/// Parse a prompt file into metadata and body
fn parse_prompt(content: &str) -> Result<(PromptMetadata, String)> {
    let content = content.trim();

    if !content.starts_with("---") {
        return Err(Error::InvalidData(
            "Prompt must start with YAML frontmatter (---)".into(),
        ));
    }

    let rest = &content[3..];
    let end = rest.find("---").ok_or_else(|| {
        Error::InvalidData("Prompt frontmatter not closed (missing second ---)".into())
    })?;

    let frontmatter = rest[..end].trim();
    let body = rest[end + 3..].trim();

    let metadata: PromptMetadata = serde_yaml::from_str(frontmatter)
        .map_err(|e| Error::InvalidData(format!("Invalid prompt frontmatter: {}", e)))?;

    Ok((metadata, body.to_string()))
}

/// Extract a top-level section; `## ` subheadings stay inside it
fn extract_section<'a>(content: &'a str, header: &str) -> Option<&'a str> {
    let start = if content.starts_with(header) {
        0
    } else {
        content.find(&format!("\n{}", header))? + 1
    };
    let after_header = &content[start + header.len()..];
    let end = after_header.find("\n# ").unwrap_or(after_header.len());
    Some(after_header[..end].trim())
}

/// Resolve conditionals, then substitute `{{var}}` placeholders
///
/// Conditionals are resolved first so substituted values can never be
/// mistaken for template markup.
fn render_template(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut result = resolve_conditionals(template, vars);
    for (key, value) in vars {
        let pattern = format!("{{{{{}}}}}", key);
        result = result.replace(&pattern, value);
    }
    result
}

/// Keep `{{#if var}}...{{/if}}` blocks whose variable is non-empty
fn resolve_conditionals(content: &str, vars: &HashMap<&str, String>) -> String {
    let mut result = content.to_string();

    while let Some(if_start) = result.find("{{#if ") {
        let var_start = if_start + 6;
        let Some(var_end) = result[var_start..].find("}}") else {
            break;
        };
        let var_name = result[var_start..var_start + var_end].trim();
        let block_start = var_start + var_end + 2;

        let Some(endif_pos) = result[block_start..].find("{{/if}}") else {
            break;
        };
        let block_content = &result[block_start..block_start + endif_pos];
        let full_end = block_start + endif_pos + 7;

        let should_include = vars.get(var_name).is_some_and(|v| !v.is_empty());
        result = if should_include {
            format!(
                "{}{}{}",
                &result[..if_start],
                block_content,
                &result[full_end..]
            )
        } else {
            format!("{}{}", &result[..if_start], &result[full_end..])
        };
    }

    result
}
