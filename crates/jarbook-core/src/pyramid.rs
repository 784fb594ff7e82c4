//! The seven-level financial pyramid
//!
//! A fixed progression every coaching response classifies the user into.
//! Level numbers are part of the response contract and never change.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PyramidLevel {
    Survival = 1,
    StabilityTrap = 2,
    ComfortableBuffer = 3,
    Accumulation = 4,
    Investment = 5,
    FinancialFreedom = 6,
    Prosperity = 7,
}

impl PyramidLevel {
    pub const ALL: [PyramidLevel; 7] = [
        Self::Survival,
        Self::StabilityTrap,
        Self::ComfortableBuffer,
        Self::Accumulation,
        Self::Investment,
        Self::FinancialFreedom,
        Self::Prosperity,
    ];

    pub fn number(&self) -> u8 {
        *self as u8
    }

    /// Level for a 1-based number, `None` outside 1..=7
    pub fn from_number(n: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|level| i64::from(level.number()) == n)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Survival => "Survival",
            Self::StabilityTrap => "Stability Trap",
            Self::ComfortableBuffer => "Comfortable Buffer",
            Self::Accumulation => "Accumulation",
            Self::Investment => "Investment",
            Self::FinancialFreedom => "Financial Freedom",
            Self::Prosperity => "Prosperity",
        }
    }

    /// Entry condition for the level
    pub fn condition(&self) -> &'static str {
        match self {
            Self::Survival => "Income below expenses",
            Self::StabilityTrap => "Income equals expenses, no reserve",
            Self::ComfortableBuffer => "Reserve of at least 6 months",
            Self::Accumulation => "Reserve of 12 to 24 months plus assets",
            Self::Investment => "At least 2 income streams",
            Self::FinancialFreedom => "Passive income exceeds expenses",
            Self::Prosperity => "Solid finances in service of others",
        }
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_number(i64::from(self.number()) + 1)
    }
}

impl std::fmt::Display for PyramidLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.number(), self.name())
    }
}

/// The taxonomy as numbered lines, as it appears in coaching instructions
pub fn describe_levels() -> String {
    PyramidLevel::ALL
        .iter()
        .map(|level| format!("{}. {} ({})", level.number(), level.name(), level.condition()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_are_one_based_and_ordered() {
        for (i, level) in PyramidLevel::ALL.iter().enumerate() {
            assert_eq!(usize::from(level.number()), i + 1);
            assert_eq!(PyramidLevel::from_number(i as i64 + 1), Some(*level));
        }
        assert_eq!(PyramidLevel::from_number(0), None);
        assert_eq!(PyramidLevel::from_number(8), None);
    }

    #[test]
    fn test_next_level() {
        assert_eq!(
            PyramidLevel::Survival.next(),
            Some(PyramidLevel::StabilityTrap)
        );
        assert_eq!(PyramidLevel::Prosperity.next(), None);
    }

    #[test]
    fn test_describe_levels() {
        let text = describe_levels();
        assert_eq!(text.lines().count(), 7);
        assert!(text.starts_with("1. Survival (Income below expenses)"));
        assert!(text.contains("6. Financial Freedom"));
    }
}
