//! Budget allocation model
//!
//! Jar percentages are derived from the income tier until the user stores an
//! explicit override. Amounts per jar are `base * pct / 100`, truncated, where
//! the base is monthly income or twelve times it for the yearly view.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::config::BudgetConfig;
use crate::error::{Error, Result};
use crate::models::{Jar, JarConfig, Money, ViewMode};
use crate::store::{Store, StoreKey};

/// Income at or above which the wealthy tier applies
pub const HIGH_INCOME_THRESHOLD: Money = 500_000_000;
/// Income at or above which the middle tier applies
pub const MID_INCOME_THRESHOLD: Money = 50_000_000;

const HIGH_TIER: JarConfig = JarConfig::new(20, 10, 10, 50, 5, 5);
const MID_TIER: JarConfig = JarConfig::new(40, 10, 10, 30, 5, 5);
const BASE_TIER: JarConfig = JarConfig::new(55, 10, 10, 15, 5, 5);

/// Jar percentages recommended for a monthly income
pub fn default_jar_config(income: Money) -> JarConfig {
    if income >= HIGH_INCOME_THRESHOLD {
        HIGH_TIER
    } else if income >= MID_INCOME_THRESHOLD {
        MID_TIER
    } else {
        BASE_TIER
    }
}

/// Money per jar for the given income and view
pub fn jar_amounts(income: Money, config: &JarConfig, view: ViewMode) -> BTreeMap<Jar, Money> {
    let base = i128::from(income) * i128::from(view.multiplier());
    config
        .iter()
        .map(|(jar, pct)| {
            let amount = base * i128::from(pct) / 100;
            (jar, Money::try_from(amount).unwrap_or(Money::MAX))
        })
        .collect()
}

/// Lenient amount parsing for form input
///
/// Non-numeric or negative text becomes 0. Decimals are truncated and digit
/// group separators (`,` `.` `_` and spaces) are ignored when the text has no
/// other meaning as a number.
pub fn parse_amount(text: &str) -> Money {
    let trimmed = text.trim();
    if let Ok(value) = trimmed.parse::<Money>() {
        return value.max(0);
    }
    if let Ok(value) = trimmed.parse::<f64>() {
        if value.is_finite() && value > 0.0 {
            return value.trunc().min(Money::MAX as f64) as Money;
        }
        return 0;
    }
    let digits: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ',' | '.' | '_' | ' '))
        .collect();
    if digits.starts_with('-') {
        return 0;
    }
    digits.parse::<Money>().unwrap_or(0)
}

/// Lenient percent parsing: invalid or negative becomes 0, capped at 100
pub fn parse_percent(text: &str) -> u8 {
    let trimmed = text.trim().trim_end_matches('%').trim();
    let value = match trimmed.parse::<i64>() {
        Ok(v) => v,
        Err(_) => match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => v.trunc() as i64,
            _ => 0,
        },
    };
    value.clamp(0, 100) as u8
}

/// Validity of a jar config, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationStatus {
    pub total: u32,
    pub valid: bool,
}

impl AllocationStatus {
    pub fn of(config: &JarConfig) -> Self {
        let total = config.total();
        Self {
            total,
            valid: total == 100,
        }
    }

    /// Percentage points still to allocate (negative when over)
    pub fn remaining(&self) -> i64 {
        100 - i64::from(self.total)
    }
}

/// Income, expenses and jar allocation backed by the store
pub struct BudgetService {
    store: Store,
    income: Money,
    expenses: Money,
    /// Stored jar config; `None` means the income tier decides
    jar_override: Option<JarConfig>,
    strict_allocation: bool,
}

impl BudgetService {
    /// Load persisted figures, falling back to configured defaults
    pub fn load(store: Store, config: &BudgetConfig) -> Self {
        let income = store
            .load_number_or(StoreKey::Income, config.default_income)
            .max(0);
        let expenses = store
            .load_number_or(StoreKey::Expenses, config.default_expenses)
            .max(0);
        let jar_override = store.load_json_or(StoreKey::JarConfig, None);

        Self {
            store,
            income,
            expenses,
            jar_override,
            strict_allocation: config.strict_allocation,
        }
    }

    pub fn income(&self) -> Money {
        self.income
    }

    pub fn expenses(&self) -> Money {
        self.expenses
    }

    /// Monthly surplus, negative when spending exceeds income
    pub fn surplus(&self) -> Money {
        self.income - self.expenses
    }

    /// Effective jar config (stored override or the income-tier default)
    pub fn jar_config(&self) -> JarConfig {
        self.jar_override
            .unwrap_or_else(|| default_jar_config(self.income))
    }

    /// Whether the jar config was customised
    pub fn has_custom_jars(&self) -> bool {
        self.jar_override.is_some()
    }

    pub fn allocation_status(&self) -> AllocationStatus {
        AllocationStatus::of(&self.jar_config())
    }

    pub fn jar_amounts(&self, view: ViewMode) -> BTreeMap<Jar, Money> {
        jar_amounts(self.income, &self.jar_config(), view)
    }

    pub fn set_income(&mut self, income: Money) -> Result<()> {
        let income = income.max(0);
        self.store.set_number(StoreKey::Income, income)?;
        self.income = income;
        info!(income, "Updated income");
        Ok(())
    }

    pub fn set_expenses(&mut self, expenses: Money) -> Result<()> {
        let expenses = expenses.max(0);
        self.store.set_number(StoreKey::Expenses, expenses)?;
        self.expenses = expenses;
        info!(expenses, "Updated expenses");
        Ok(())
    }

    /// Store a full jar config as the override
    ///
    /// An invalid total is persisted as-is unless strict allocation is on.
    pub fn set_jar_config(&mut self, config: JarConfig) -> Result<AllocationStatus> {
        let status = AllocationStatus::of(&config);
        if self.strict_allocation && !status.valid {
            return Err(Error::AllocationMismatch {
                total: status.total,
            });
        }
        if Jar::ALL.iter().any(|jar| config.get(*jar) > 100) {
            return Err(Error::Validation(
                "Jar percentage cannot exceed 100".to_string(),
            ));
        }

        self.store.set_json(StoreKey::JarConfig, &config)?;
        self.jar_override = Some(config);
        info!(total = status.total, valid = status.valid, "Saved jar config");
        Ok(status)
    }

    /// Change a single jar, starting from the effective config
    pub fn set_jar(&mut self, jar: Jar, percent: u8) -> Result<AllocationStatus> {
        let mut config = self.jar_config();
        config.set(jar, percent.min(100));
        self.set_jar_config(config)
    }

    /// Drop the override so the income tier decides again
    pub fn reset_to_default(&mut self) -> Result<JarConfig> {
        self.store.remove(StoreKey::JarConfig)?;
        self.jar_override = None;
        let config = default_jar_config(self.income);
        info!("Reset jar config to income-tier default");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn service() -> BudgetService {
        BudgetService::load(Store::in_memory(), &Config::default().budget)
    }

    fn sample_configs() -> Vec<JarConfig> {
        vec![
            HIGH_TIER,
            MID_TIER,
            BASE_TIER,
            JarConfig::new(100, 0, 0, 0, 0, 0),
            JarConfig::new(33, 17, 11, 19, 13, 7),
        ]
    }

    const INCOMES: [Money; 9] = [
        0,
        1,
        7,
        999,
        20_000_000,
        49_999_999,
        50_000_000,
        500_000_000,
        123_456_789_013,
    ];

    #[test]
    fn test_default_tiers() {
        assert_eq!(default_jar_config(20_000_000), BASE_TIER);
        assert_eq!(default_jar_config(49_999_999), BASE_TIER);
        assert_eq!(default_jar_config(50_000_000), MID_TIER);
        assert_eq!(default_jar_config(499_999_999), MID_TIER);
        assert_eq!(default_jar_config(500_000_000), HIGH_TIER);
    }

    #[test]
    fn test_default_configs_sum_to_100() {
        for income in INCOMES.iter().chain(&[-5, Money::MAX]) {
            assert_eq!(default_jar_config(*income).total(), 100, "income {}", income);
        }
    }

    #[test]
    fn test_monthly_amounts_sum_to_income() {
        for income in INCOMES {
            for config in sample_configs() {
                let sum: Money = jar_amounts(income, &config, ViewMode::Monthly)
                    .values()
                    .sum();
                // Truncation loses at most one unit per jar
                assert!(income - sum >= 0 && income - sum < 6, "income {}", income);
            }
        }
    }

    #[test]
    fn test_yearly_is_twelve_months() {
        for income in INCOMES {
            for config in sample_configs() {
                assert_eq!(
                    jar_amounts(income, &config, ViewMode::Yearly),
                    jar_amounts(income * 12, &config, ViewMode::Monthly)
                );
            }
        }
    }

    #[test]
    fn test_validity_is_stable() {
        let config = JarConfig::new(50, 10, 10, 15, 5, 5);
        assert_eq!(config.is_valid(), config.is_valid());
        assert!(!AllocationStatus::of(&config).valid);
        assert_eq!(AllocationStatus::of(&config).remaining(), 5);
    }

    #[test]
    fn test_default_budget_necessities() {
        let budget = service();
        assert_eq!(budget.income(), 20_000_000);
        assert_eq!(budget.jar_config(), JarConfig::new(55, 10, 10, 15, 5, 5));
        let amounts = budget.jar_amounts(ViewMode::Monthly);
        assert_eq!(amounts[&Jar::Necessities], 11_000_000);
        assert_eq!(budget.surplus(), 5_000_000);
    }

    #[test]
    fn test_surplus_can_be_negative() {
        let mut budget = service();
        budget.set_expenses(25_000_000).unwrap();
        assert_eq!(budget.surplus(), -5_000_000);
    }

    #[test]
    fn test_jars_follow_income_until_overridden() {
        let mut budget = service();
        budget.set_income(60_000_000).unwrap();
        assert_eq!(budget.jar_config(), MID_TIER);

        budget.set_jar(Jar::Play, 10).unwrap();
        budget.set_income(600_000_000).unwrap();
        assert_eq!(budget.jar_config().get(Jar::Play), 10);
        assert_eq!(budget.jar_config().necessities, 40);

        let reset = budget.reset_to_default().unwrap();
        assert_eq!(reset, HIGH_TIER);
        assert_eq!(budget.jar_config(), HIGH_TIER);
        assert!(!budget.has_custom_jars());
    }

    #[test]
    fn test_invalid_config_persists_in_permissive_mode() {
        let store = Store::in_memory();
        let config = Config::default().budget;
        let mut budget = BudgetService::load(store.clone(), &config);

        let status = budget.set_jar(Jar::Necessities, 60).unwrap();
        assert_eq!(status.total, 105);
        assert!(!status.valid);

        let reloaded = BudgetService::load(store, &config);
        assert_eq!(reloaded.jar_config().necessities, 60);
        assert!(!reloaded.allocation_status().valid);
    }

    #[test]
    fn test_strict_mode_rejects_invalid_config() {
        let store = Store::in_memory();
        let mut config = Config::default().budget;
        config.strict_allocation = true;
        let mut budget = BudgetService::load(store.clone(), &config);

        let result = budget.set_jar(Jar::Necessities, 60);
        assert!(matches!(result, Err(Error::AllocationMismatch { total: 105 })));
        assert!(!store.contains(StoreKey::JarConfig).unwrap());
        assert_eq!(budget.jar_config(), BASE_TIER);
    }

    #[test]
    fn test_mutations_write_through() {
        let store = Store::in_memory();
        let config = Config::default().budget;
        let mut budget = BudgetService::load(store.clone(), &config);
        budget.set_income(30_000_000).unwrap();
        budget.set_expenses(-10).unwrap();

        assert_eq!(store.get_raw(StoreKey::Income).unwrap().as_deref(), Some("30000000"));
        assert_eq!(store.get_number(StoreKey::Expenses).unwrap(), Some(0));

        budget.reset_to_default().unwrap();
        assert!(!store.contains(StoreKey::JarConfig).unwrap());
    }

    #[test]
    fn test_corrupt_jar_config_falls_back() {
        let store = Store::in_memory();
        store.set_raw(StoreKey::JarConfig, "not json").unwrap();
        let budget = BudgetService::load(store, &Config::default().budget);
        assert_eq!(budget.jar_config(), BASE_TIER);
    }

    #[test]
    fn test_parse_amount_is_lenient() {
        assert_eq!(parse_amount("20000000"), 20_000_000);
        assert_eq!(parse_amount(" 1500.75 "), 1500);
        assert_eq!(parse_amount("20,000,000"), 20_000_000);
        assert_eq!(parse_amount("abc"), 0);
        assert_eq!(parse_amount("-300"), 0);
        assert_eq!(parse_amount(""), 0);
    }

    #[test]
    fn test_parse_percent_is_lenient() {
        assert_eq!(parse_percent("55"), 55);
        assert_eq!(parse_percent("12%"), 12);
        assert_eq!(parse_percent("150"), 100);
        assert_eq!(parse_percent("-4"), 0);
        assert_eq!(parse_percent("lots"), 0);
        assert_eq!(parse_percent("7.9"), 7);
    }
}
