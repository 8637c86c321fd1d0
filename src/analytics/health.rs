// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Allocation, BudgetConfig, Category, Summary};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Issue {
    Deficit,
    LivingOver,
    PlayingOver,
    EmergencyUsed,
    NoSaving,
    LowSaving,
}

impl Issue {
    pub fn as_str(self) -> &'static str {
        match self {
            Issue::Deficit => "deficit",
            Issue::LivingOver => "living_over",
            Issue::PlayingOver => "playing_over",
            Issue::EmergencyUsed => "emergency_used",
            Issue::NoSaving => "no_saving",
            Issue::LowSaving => "low_saving",
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Excellent,
    Good,
    NeedsAttention,
    NeedsImprovement,
}

impl HealthStatus {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => HealthStatus::Excellent,
            60..=79 => HealthStatus::Good,
            40..=59 => HealthStatus::NeedsAttention,
            _ => HealthStatus::NeedsImprovement,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HealthStatus::Excellent => "Excellent",
            HealthStatus::Good => "Good",
            HealthStatus::NeedsAttention => "Needs Attention",
            HealthStatus::NeedsImprovement => "Needs Improvement",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            HealthStatus::Excellent => "🌟",
            HealthStatus::Good => "👍",
            HealthStatus::NeedsAttention => "⚠️",
            HealthStatus::NeedsImprovement => "🚨",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthScore {
    pub score: u8,
    pub status: HealthStatus,
    pub issues: Vec<Issue>,
}

/// Logged income for the month, or the nominal salary when nothing was logged.
pub fn effective_income(summary: &Summary, budget: &BudgetConfig) -> i64 {
    if summary.total_income != 0 {
        summary.total_income
    } else {
        budget.salary
    }
}

pub(crate) fn wide(v: i64) -> i128 {
    i128::from(v)
}

/// Point-deduction score, starting at 100 and clamped to 0..=100.
pub fn score(summary: &Summary, budget: &BudgetConfig, targets: &Allocation) -> HealthScore {
    let income = effective_income(summary, budget);
    let mut points: i64 = 100;
    let mut issues = Vec::new();

    let mut deduct = |delta: i64, issue: Issue| {
        points -= delta;
        issues.push(issue);
    };

    if summary.total_expense > income {
        deduct(30, Issue::Deficit);
    }
    if summary.living_expense > targets.living {
        deduct(15, Issue::LivingOver);
    }
    if summary.playing_expense > targets.playing {
        deduct(10, Issue::PlayingOver);
    }
    if summary.emergency_expense > 0 {
        deduct(5, Issue::EmergencyUsed);
    }
    // saving < target * 0.5, kept in integers
    if summary.saving_income == 0 && income > 0 {
        deduct(20, Issue::NoSaving);
    } else if wide(summary.saving_income) * 2 < wide(targets.saving) {
        deduct(10, Issue::LowSaving);
    }

    if summary.saving_income > targets.saving {
        points += 5;
    }
    // expense < income * 0.8
    if wide(summary.total_expense) * 5 < wide(income) * 4 {
        points += 5;
    }

    let score = points.clamp(0, 100) as u8;
    HealthScore {
        score,
        status: HealthStatus::from_score(score),
        issues,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratios {
    /// Saved income as a percentage of effective income, one decimal.
    pub saving_ratio: Decimal,
    pub expense_ratio: Decimal,
    pub budget_remaining: i64,
}

pub fn ratios(summary: &Summary, budget: &BudgetConfig) -> Ratios {
    let income = effective_income(summary, budget);
    let pct = |part: i64| {
        if income > 0 {
            (Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(income))
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        } else {
            Decimal::ZERO
        }
    };
    Ratios {
        saving_ratio: pct(summary.saving_income),
        expense_ratio: pct(summary.total_expense),
        budget_remaining: income.saturating_sub(summary.total_expense),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Good,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStatus {
    pub category: Category,
    pub budget: i64,
    pub used: i64,
    /// `used / budget` in percent, rounded to a whole number.
    pub percent: Decimal,
    pub level: StatusLevel,
    pub note: String,
}

/// Usage of each bucket against its target. Saving is measured by money put
/// in (higher is better); the other buckets by money spent.
pub fn category_status(summary: &Summary, targets: &Allocation) -> Vec<CategoryStatus> {
    Category::BUCKETS
        .iter()
        .map(|&category| {
            let budget = targets.get(category);
            let used = if category == Category::Saving {
                summary.saving_income
            } else {
                summary.expense_for(category)
            };
            let exact = if budget > 0 {
                Decimal::from(used) * Decimal::ONE_HUNDRED / Decimal::from(budget)
            } else {
                Decimal::ZERO
            };
            let shown = exact.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            let (level, note) = if category == Category::Saving {
                if exact >= Decimal::ONE_HUNDRED {
                    (StatusLevel::Good, "Target Reached!".to_string())
                } else if exact >= Decimal::from(50) {
                    (StatusLevel::Warning, format!("{}% of target", shown))
                } else {
                    (StatusLevel::Danger, format!("Only {}%", shown))
                }
            } else if exact <= Decimal::from(80) {
                (StatusLevel::Good, "Safe".to_string())
            } else if exact <= Decimal::ONE_HUNDRED {
                (StatusLevel::Warning, format!("{}% used", shown))
            } else {
                let over = (exact - Decimal::ONE_HUNDRED)
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
                (StatusLevel::Danger, format!("Over {}%!", over))
            };
            CategoryStatus {
                category,
                budget,
                used,
                percent: shown,
                level,
                note,
            }
        })
        .collect()
}
