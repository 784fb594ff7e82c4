//! Coaching response types
//!
//! These are backend-agnostic. Every required field is validated against the
//! matching [`ResponseSchema`](super::schema::ResponseSchema) before a value of
//! these types is built, so a caller never sees a partial result.

use serde::{Deserialize, Serialize};

use crate::pyramid::PyramidLevel;

/// The five-part narrative every coaching response carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingNarrative {
    /// The facts, stated without judgement
    pub fact_identification: String,
    /// Projected impact over 1, 5 and 10 years
    pub time_impact: String,
    /// Cost in time, health and freedom
    pub price_to_pay: String,
    /// One concrete adjustment
    pub specific_adjustment: String,
    /// Question the user has to answer for themselves
    pub accountability_question: String,
}

/// Result of a general, recognition or transaction coaching request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingResult {
    /// Pyramid level number, 1..=7
    pub current_level: u8,
    #[serde(flatten)]
    pub narrative: CoachingNarrative,
    pub financial_longevity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_warning: Option<String>,
}

impl CoachingResult {
    pub fn level(&self) -> Option<PyramidLevel> {
        PyramidLevel::from_number(i64::from(self.current_level))
    }
}

/// Coarse achievability of a goal as judged by the model
///
/// Values outside the known set degrade to `Unknown` instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "camelCase")]
pub enum FeasibilityStatus {
    Safe,
    Challenging,
    AtRisk,
    Unknown,
}

impl FeasibilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Challenging => "challenging",
            Self::AtRisk => "atRisk",
            Self::Unknown => "unknown",
        }
    }

    /// Badge colour for display
    pub fn badge(&self) -> &'static str {
        match self {
            Self::Safe => "green",
            Self::Challenging => "orange",
            Self::AtRisk => "red",
            Self::Unknown => "gray",
        }
    }
}

impl From<String> for FeasibilityStatus {
    fn from(s: String) -> Self {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "safe" => Self::Safe,
            "challenging" => Self::Challenging,
            "atrisk" => Self::AtRisk,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for FeasibilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Plan for reaching one goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalStrategy {
    #[serde(flatten)]
    pub narrative: CoachingNarrative,
    /// Free text, the model decides the wording
    pub monthly_target: String,
    pub feasibility_status: FeasibilityStatus,
}

/// A short-video content idea
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentIdea {
    pub strategy_tag: String,
    pub content_type: String,
    pub hook: String,
    pub script_outline: Vec<String>,
}

/// Which coaching prompt to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoachingMode {
    General,
    Recognition,
}

/// Figures sent with a coaching request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancialSnapshot {
    pub income: i64,
    pub expenses: i64,
    pub reserves: i64,
    pub goal: Option<String>,
}
