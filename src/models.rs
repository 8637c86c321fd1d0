// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown transaction type '{0}' (use income|expense)")]
    UnknownType(String),
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),
    #[error("Category '{category}' is not valid for {kind} transactions")]
    CategoryNotAllowed { category: Category, kind: TxType },
    #[error("Budget amounts must be given for all four categories or none")]
    PartialAmounts,
    #[error("Amount must not be negative (got {0})")]
    NegativeAmount(i64),
    #[error("Amount {0} is too large (max {max})", max = MAX_AMOUNT)]
    AmountTooLarge(i64),
}

/// Largest amount accepted anywhere, in whole rupiah.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

pub fn check_amount(amount: i64) -> Result<i64, ModelError> {
    if amount < 0 {
        Err(ModelError::NegativeAmount(amount))
    } else if amount > MAX_AMOUNT {
        Err(ModelError::AmountTooLarge(amount))
    } else {
        Ok(amount)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Income,
    Expense,
}

impl TxType {
    pub fn as_str(self) -> &'static str {
        match self {
            TxType::Income => "income",
            TxType::Expense => "expense",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TxType::Income => "Income",
            TxType::Expense => "Expense",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TxType::Income),
            "expense" => Ok(TxType::Expense),
            _ => Err(ModelError::UnknownType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Living,
    Saving,
    Playing,
    Emergency,
    Salary,
    Bonus,
    Thr,
    Freelance,
    Investment,
    Other,
}

impl Category {
    /// The four budget buckets, in display order.
    pub const BUCKETS: [Category; 4] = [
        Category::Living,
        Category::Saving,
        Category::Playing,
        Category::Emergency,
    ];

    pub const INCOME: [Category; 7] = [
        Category::Salary,
        Category::Bonus,
        Category::Thr,
        Category::Freelance,
        Category::Investment,
        Category::Saving,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Living => "living",
            Category::Saving => "saving",
            Category::Playing => "playing",
            Category::Emergency => "emergency",
            Category::Salary => "salary",
            Category::Bonus => "bonus",
            Category::Thr => "thr",
            Category::Freelance => "freelance",
            Category::Investment => "investment",
            Category::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Living => "Living",
            Category::Saving => "Saving",
            Category::Playing => "Playing",
            Category::Emergency => "Emergency",
            Category::Salary => "Salary",
            Category::Bonus => "Bonus",
            Category::Thr => "THR",
            Category::Freelance => "Freelance",
            Category::Investment => "Investment",
            Category::Other => "Other",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::Living => "🏠",
            Category::Saving => "💎",
            Category::Playing => "✈️",
            Category::Emergency => "🚨",
            Category::Salary => "💼",
            Category::Bonus => "🎁",
            Category::Thr => "🕌",
            Category::Freelance => "💻",
            Category::Investment => "📈",
            Category::Other => "📦",
        }
    }

    /// Short purpose line for the budget buckets.
    pub fn purpose(self) -> &'static str {
        match self {
            Category::Living => "Essential Needs",
            Category::Saving => "Savings",
            Category::Playing => "Lifestyle & Travel",
            Category::Emergency => "Emergency Fund",
            _ => "Income",
        }
    }

    pub fn is_bucket(self) -> bool {
        Self::BUCKETS.contains(&self)
    }

    pub fn allowed_for(self, kind: TxType) -> bool {
        match kind {
            TxType::Expense => self.is_bucket(),
            TxType::Income => Self::INCOME.contains(&self),
        }
    }

    /// Maps legacy rows onto a legal category: the backend seeds new
    /// accounts with a salary income filed under `living`.
    pub fn normalized_for(self, kind: TxType) -> Category {
        match (kind, self) {
            (TxType::Income, Category::Living) => Category::Salary,
            _ => self,
        }
    }

    pub fn for_type(kind: TxType) -> &'static [Category] {
        match kind {
            TxType::Expense => &Self::BUCKETS,
            TxType::Income => &Self::INCOME,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts either the key (`thr`) or the display label (`THR`), case-insensitively.
impl FromStr for Category {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::BUCKETS
            .iter()
            .chain(Self::INCOME.iter())
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle) || c.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ModelError::UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TxType,
    pub category: Category,
    pub amount: i64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// `YYYY-MM` key of the effective date.
    pub fn month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    pub fn in_month(&self, month: &str) -> bool {
        self.month() == month
    }

    pub fn display_description(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => self.category.label(),
        }
    }
}

/// Fields a user supplies for a new or edited transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub kind: TxType,
    pub category: Category,
    pub amount: i64,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl TransactionDraft {
    pub fn validate(&self) -> Result<(), ModelError> {
        check_amount(self.amount)?;
        if !self.category.allowed_for(self.kind) {
            return Err(ModelError::CategoryNotAllowed {
                category: self.category,
                kind: self.kind,
            });
        }
        Ok(())
    }

    pub fn into_transaction(self, id: i64, created_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            kind: self.kind,
            category: self.category,
            amount: self.amount,
            date: self.date,
            description: self.description.filter(|d| !d.trim().is_empty()),
            created_at,
        }
    }
}

/// Resolved amount per budget bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub living: i64,
    pub saving: i64,
    pub playing: i64,
    pub emergency: i64,
}

impl Allocation {
    pub fn get(&self, category: Category) -> i64 {
        match category {
            Category::Living => self.living,
            Category::Saving => self.saving,
            Category::Playing => self.playing,
            Category::Emergency => self.emergency,
            _ => 0,
        }
    }

    pub fn total(&self) -> i64 {
        self.living
            .saturating_add(self.saving)
            .saturating_add(self.playing)
            .saturating_add(self.emergency)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percentages {
    pub living: i64,
    pub saving: i64,
    pub playing: i64,
    pub emergency: Option<i64>,
}

impl Percentages {
    pub const DEFAULT_EMERGENCY: i64 = 10;

    pub fn emergency_or_default(&self) -> i64 {
        self.emergency.unwrap_or(Self::DEFAULT_EMERGENCY)
    }

    pub fn get(&self, category: Category) -> i64 {
        match category {
            Category::Living => self.living,
            Category::Saving => self.saving,
            Category::Playing => self.playing,
            Category::Emergency => self.emergency_or_default(),
            _ => 0,
        }
    }

    pub fn total(&self) -> i64 {
        self.living
            .saturating_add(self.saving)
            .saturating_add(self.playing)
            .saturating_add(self.emergency_or_default())
    }
}

impl Default for Percentages {
    fn default() -> Self {
        Percentages {
            living: 50,
            saving: 30,
            playing: 10,
            emergency: Some(10),
        }
    }
}

/// A user's monthly budget.
///
/// `amounts`, when present, are the pinned figures and always win over
/// `percentages`, which then only describe the split for display. Changing
/// the salary never touches pinned amounts (see [`BudgetConfig::with_salary`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BudgetRecord", into = "BudgetRecord")]
pub struct BudgetConfig {
    pub salary: i64,
    pub percentages: Percentages,
    pub amounts: Option<Allocation>,
}

pub const DEFAULT_SALARY: i64 = 6_000_000;

impl Default for BudgetConfig {
    fn default() -> Self {
        BudgetConfig {
            salary: DEFAULT_SALARY,
            percentages: Percentages::default(),
            amounts: None,
        }
    }
}

impl BudgetConfig {
    /// Budget driven by percentages; the derived amounts are stored alongside.
    pub fn from_percentages(salary: i64, percentages: Percentages) -> Self {
        let amounts = Allocation {
            living: share_of(salary, percentages.living),
            saving: share_of(salary, percentages.saving),
            playing: share_of(salary, percentages.playing),
            emergency: share_of(salary, percentages.emergency_or_default()),
        };
        BudgetConfig {
            salary,
            percentages,
            amounts: Some(amounts),
        }
    }

    /// Budget with exact amounts; percentages are derived for display.
    pub fn pinned(salary: i64, amounts: Allocation) -> Self {
        BudgetConfig {
            salary,
            percentages: percentages_for(salary, &amounts),
            amounts: Some(amounts),
        }
    }

    /// The "clear all data" budget: 6,000,000 split 50/30/10/10 and pinned.
    pub fn reset_default() -> Self {
        Self::from_percentages(DEFAULT_SALARY, Percentages::default())
    }

    /// Changes the salary. Pinned amounts stay as they are and only the
    /// display percentages follow the new salary.
    pub fn with_salary(&self, salary: i64) -> Self {
        match self.amounts {
            Some(amounts) => Self::pinned(salary, amounts),
            None => BudgetConfig {
                salary,
                ..self.clone()
            },
        }
    }

    pub fn display_percentages(&self) -> Percentages {
        match self.amounts {
            Some(ref amounts) => percentages_for(self.salary, amounts),
            None => self.percentages,
        }
    }

    /// Sum of the split as a share of salary; anything other than 100 deserves a warning.
    pub fn total_percent(&self) -> i64 {
        match self.amounts {
            Some(ref amounts) if self.salary > 0 => round_ratio(i128::from(amounts.total()) * 100, self.salary.into()),
            Some(_) => 0,
            None => self.percentages.total(),
        }
    }
}

/// `round(salary * pct / 100)`, halves rounded away from zero.
pub fn share_of(salary: i64, pct: i64) -> i64 {
    round_ratio(i128::from(salary) * i128::from(pct), 100)
}

fn percentages_for(salary: i64, amounts: &Allocation) -> Percentages {
    let pct = |amt: i64| {
        if salary > 0 {
            round_ratio(i128::from(amt) * 100, salary.into())
        } else {
            0
        }
    };
    Percentages {
        living: pct(amounts.living),
        saving: pct(amounts.saving),
        playing: pct(amounts.playing),
        emergency: Some(pct(amounts.emergency)),
    }
}

/// `num / den` rounded half away from zero, saturating at the `i64` bounds.
fn round_ratio(num: i128, den: i128) -> i64 {
    let q = num / den;
    let r = num % den;
    let rounded = if 2 * r.abs() >= den.abs() {
        if (num < 0) != (den < 0) { q - 1 } else { q + 1 }
    } else {
        q
    };
    i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX })
}

/// Flat JSON shape shared by the backup file and the spreadsheet backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRecord {
    #[serde(rename = "gaji", alias = "salary")]
    pub salary: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub living_amt: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saving_amt: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playing_amt: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_amt: Option<i64>,
    #[serde(default)]
    pub living: i64,
    #[serde(default)]
    pub saving: i64,
    #[serde(default)]
    pub playing: i64,
    #[serde(default)]
    pub emergency: Option<i64>,
}

impl TryFrom<BudgetRecord> for BudgetConfig {
    type Error = ModelError;

    fn try_from(r: BudgetRecord) -> Result<Self, Self::Error> {
        check_amount(r.salary)?;
        let amounts = match (r.living_amt, r.saving_amt, r.playing_amt, r.emergency_amt) {
            (Some(living), Some(saving), Some(playing), Some(emergency)) => Some(Allocation {
                living: check_amount(living)?,
                saving: check_amount(saving)?,
                playing: check_amount(playing)?,
                emergency: check_amount(emergency)?,
            }),
            (None, None, None, None) => None,
            _ => return Err(ModelError::PartialAmounts),
        };
        Ok(BudgetConfig {
            salary: r.salary,
            percentages: Percentages {
                living: r.living,
                saving: r.saving,
                playing: r.playing,
                emergency: r.emergency,
            },
            amounts,
        })
    }
}

impl From<BudgetConfig> for BudgetRecord {
    fn from(b: BudgetConfig) -> Self {
        BudgetRecord {
            salary: b.salary,
            living_amt: b.amounts.map(|a| a.living),
            saving_amt: b.amounts.map(|a| a.saving),
            playing_amt: b.amounts.map(|a| a.playing),
            emergency_amt: b.amounts.map(|a| a.emergency),
            living: b.percentages.living,
            saving: b.percentages.saving,
            playing: b.percentages.playing,
            emergency: b.percentages.emergency,
        }
    }
}

/// Month totals produced by [`crate::analytics::summarize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_income: i64,
    pub total_expense: i64,
    pub living_expense: i64,
    pub saving_expense: i64,
    pub playing_expense: i64,
    pub emergency_expense: i64,
    pub saving_income: i64,
}

impl Summary {
    pub fn balance(&self) -> i64 {
        self.total_income.saturating_sub(self.total_expense)
    }

    pub fn expense_for(&self, category: Category) -> i64 {
        match category {
            Category::Living => self.living_expense,
            Category::Saving => self.saving_expense,
            Category::Playing => self.playing_expense,
            Category::Emergency => self.emergency_expense,
            _ => 0,
        }
    }
}
