//! Domain models for Jarbook

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Monetary amount in the smallest whole currency unit
pub type Money = i64;

/// Whether budget figures are shown per month or per year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Monthly,
    Yearly,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Factor applied to a monthly figure
    pub fn multiplier(&self) -> i64 {
        match self {
            Self::Monthly => 1,
            Self::Yearly => 12,
        }
    }
}

impl std::str::FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" | "annual" => Ok(Self::Yearly),
            _ => Err(format!("Unknown view mode: {}", s)),
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One of the six budget jars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Jar {
    Necessities,
    Education,
    Reserve,
    Investment,
    Play,
    Give,
}

impl Jar {
    /// All jars in display order
    pub const ALL: [Jar; 6] = [
        Jar::Necessities,
        Jar::Education,
        Jar::Reserve,
        Jar::Investment,
        Jar::Play,
        Jar::Give,
    ];

    /// Short id used in the persisted jar config
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Necessities => "nec",
            Self::Education => "edu",
            Self::Reserve => "res",
            Self::Investment => "inv",
            Self::Play => "play",
            Self::Give => "give",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Necessities => "Necessities",
            Self::Education => "Education",
            Self::Reserve => "Reserve",
            Self::Investment => "Investment",
            Self::Play => "Play",
            Self::Give => "Give",
        }
    }
}

impl std::str::FromStr for Jar {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nec" | "necessities" => Ok(Self::Necessities),
            "edu" | "education" => Ok(Self::Education),
            "res" | "reserve" => Ok(Self::Reserve),
            "inv" | "investment" => Ok(Self::Investment),
            "play" => Ok(Self::Play),
            "give" => Ok(Self::Give),
            _ => Err(format!("Unknown jar: {}", s)),
        }
    }
}

impl std::fmt::Display for Jar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Percentage of income allocated to each jar
///
/// The six values are expected to add up to 100, but an invalid config is a
/// legal value: edits are staged here before the user fixes the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JarConfig {
    #[serde(rename = "nec")]
    pub necessities: u8,
    #[serde(rename = "edu")]
    pub education: u8,
    #[serde(rename = "res")]
    pub reserve: u8,
    #[serde(rename = "inv")]
    pub investment: u8,
    pub play: u8,
    pub give: u8,
}

impl JarConfig {
    pub const fn new(
        necessities: u8,
        education: u8,
        reserve: u8,
        investment: u8,
        play: u8,
        give: u8,
    ) -> Self {
        Self {
            necessities,
            education,
            reserve,
            investment,
            play,
            give,
        }
    }

    pub fn get(&self, jar: Jar) -> u8 {
        match jar {
            Jar::Necessities => self.necessities,
            Jar::Education => self.education,
            Jar::Reserve => self.reserve,
            Jar::Investment => self.investment,
            Jar::Play => self.play,
            Jar::Give => self.give,
        }
    }

    pub fn set(&mut self, jar: Jar, percent: u8) {
        let slot = match jar {
            Jar::Necessities => &mut self.necessities,
            Jar::Education => &mut self.education,
            Jar::Reserve => &mut self.reserve,
            Jar::Investment => &mut self.investment,
            Jar::Play => &mut self.play,
            Jar::Give => &mut self.give,
        };
        *slot = percent;
    }

    /// Sum of all six percentages
    pub fn total(&self) -> u32 {
        Jar::ALL.iter().map(|jar| u32::from(self.get(*jar))).sum()
    }

    /// A config is valid only when it allocates exactly 100%
    pub fn is_valid(&self) -> bool {
        self.total() == 100
    }

    pub fn iter(&self) -> impl Iterator<Item = (Jar, u8)> + '_ {
        Jar::ALL.iter().map(move |jar| (*jar, self.get(*jar)))
    }
}

/// Direction of money flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expense" | "out" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Need/want classification of an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    #[default]
    Need,
    Want,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Need => "need",
            Self::Want => "want",
        }
    }
}

impl std::str::FromStr for Classification {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "need" => Ok(Self::Need),
            "want" => Ok(Self::Want),
            _ => Err(format!("Unknown classification: {}", s)),
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Built-in transaction categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnownCategory {
    Food,
    Shopping,
    Housing,
    Transport,
    Health,
    Salary,
    Business,
    Investment,
    Gift,
    Other,
}

impl KnownCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Shopping => "shopping",
            Self::Housing => "housing",
            Self::Transport => "transport",
            Self::Health => "health",
            Self::Salary => "salary",
            Self::Business => "business",
            Self::Investment => "investment",
            Self::Gift => "gift",
            Self::Other => "other",
        }
    }

    /// Categories offered for a transaction type
    pub fn for_type(kind: TransactionType) -> &'static [KnownCategory] {
        match kind {
            TransactionType::Expense => &[
                Self::Food,
                Self::Shopping,
                Self::Housing,
                Self::Transport,
                Self::Health,
                Self::Other,
            ],
            TransactionType::Income => &[
                Self::Salary,
                Self::Business,
                Self::Investment,
                Self::Gift,
                Self::Other,
            ],
        }
    }
}

impl std::str::FromStr for KnownCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "food" => Ok(Self::Food),
            "shopping" => Ok(Self::Shopping),
            "housing" => Ok(Self::Housing),
            "transport" => Ok(Self::Transport),
            "health" => Ok(Self::Health),
            "salary" => Ok(Self::Salary),
            "business" => Ok(Self::Business),
            "investment" => Ok(Self::Investment),
            "gift" => Ok(Self::Gift),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for KnownCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction category: a built-in id or a user-supplied label
///
/// Persisted as a plain string. A stored string that matches a built-in id
/// reads back as `Known`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Known(KnownCategory),
    Custom(String),
}

impl Category {
    /// Resolve the submitted category and optional free-text label
    ///
    /// Missing category means `other`. A non-blank label only applies when
    /// the category is `other`.
    pub fn resolve(category: Option<KnownCategory>, custom_label: Option<&str>) -> Self {
        let category = category.unwrap_or(KnownCategory::Other);
        match custom_label.map(str::trim) {
            Some(label) if category == KnownCategory::Other && !label.is_empty() => {
                Self::Custom(label.to_string())
            }
            _ => Self::Known(category),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(known) => known.as_str(),
            Self::Custom(label) => label,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Known(KnownCategory::Other)
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        match s.parse::<KnownCategory>() {
            Ok(known) => Self::Known(known),
            Err(_) => Self::Custom(s),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Known(known) => known.as_str().to_string(),
            Category::Custom(label) => label,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How often a recurring transaction repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Next occurrence after `from`
    ///
    /// Month arithmetic clamps to the last day of shorter months
    /// (Jan 31 -> Feb 28/29).
    pub fn advance(&self, from: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Weekly => from.checked_add_days(chrono::Days::new(7)),
            Self::Monthly => from.checked_add_months(Months::new(1)),
            Self::Yearly => from.checked_add_months(Months::new(12)),
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" | "annual" => Ok(Self::Yearly),
            _ => Err(format!("Unknown frequency: {}", s)),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    /// Positive magnitude; direction comes from `kind`
    pub amount: Money,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub notes: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Only set for expenses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_due_date: Option<NaiveDate>,
}

impl Transaction {
    /// Amount with sign applied (expenses negative)
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// A transaction as submitted, before validation and id assignment
#[derive(Debug, Clone, Default)]
pub struct NewTransaction {
    pub kind: TransactionType,
    pub amount: Money,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    /// Defaults to `other`
    pub category: Option<KnownCategory>,
    /// Free-text label, used when the category is `other`
    pub custom_category: Option<String>,
    pub notes: String,
    /// Ignored for income; defaults to `need` for expenses
    pub classification: Option<Classification>,
    /// Marks the transaction as recurring
    pub frequency: Option<Frequency>,
    /// Defaults to one period after `date` for recurring transactions
    pub next_due_date: Option<NaiveDate>,
}

/// Aggregate totals over a set of transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTotals {
    pub total_income: Money,
    pub total_expense: Money,
    pub balance: Money,
}

/// Kind of financial goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    #[default]
    Saving,
    Debt,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saving => "saving",
            Self::Debt => "debt",
        }
    }
}

impl std::str::FromStr for GoalType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "saving" | "savings" => Ok(Self::Saving),
            "debt" => Ok(Self::Debt),
            _ => Err(format!("Unknown goal type: {}", s)),
        }
    }
}

impl std::fmt::Display for GoalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A savings or debt-payoff goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialGoal {
    pub id: String,
    pub title: String,
    pub target_amount: Money,
    /// May exceed the target; only the displayed progress is clamped
    pub current_amount: Money,
    pub deadline: NaiveDate,
    #[serde(rename = "type")]
    pub kind: GoalType,
    /// Reminder window in days, 0 disables reminders
    #[serde(default)]
    pub reminder_days: u32,
}

impl FinancialGoal {
    /// Completion percentage clamped to 0..=100
    pub fn progress(&self) -> f64 {
        if self.target_amount <= 0 {
            return 0.0;
        }
        let pct = self.current_amount as f64 / self.target_amount as f64 * 100.0;
        pct.clamp(0.0, 100.0)
    }

    /// Amount still missing, never negative
    pub fn remaining(&self) -> Money {
        (self.target_amount - self.current_amount).max(0)
    }

    /// Calendar days from `today` to the deadline (negative when overdue)
    pub fn days_until(&self, today: NaiveDate) -> i64 {
        (self.deadline - today).num_days()
    }

    /// Whether the deadline falls inside the reminder window
    ///
    /// Inclusive at both ends: due today and exactly `reminder_days` out
    /// both count. Past deadlines never do.
    pub fn is_nearing_deadline(&self, today: NaiveDate) -> bool {
        if self.reminder_days == 0 {
            return false;
        }
        let days = self.days_until(today);
        days >= 0 && days <= i64::from(self.reminder_days)
    }
}

/// A goal as submitted, before validation and id assignment
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub title: String,
    pub target_amount: Money,
    pub current_amount: Money,
    pub deadline: NaiveDate,
    pub kind: GoalType,
    pub reminder_days: u32,
}
