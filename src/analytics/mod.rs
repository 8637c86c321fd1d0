// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Month analytics over a user's transactions and budget.
//!
//! Everything here is a pure function of its inputs: transactions and a
//! budget go in, plain data for the presenter comes out.

pub mod advice;
pub mod allocation;
pub mod health;
pub mod summary;
pub mod trend;

pub use advice::{Severity, Suggestion, suggestions, tips};
pub use allocation::resolve_targets;
pub use health::{
    CategoryStatus, HealthScore, HealthStatus, Issue, Ratios, StatusLevel, category_status,
    effective_income, ratios, score,
};
pub use summary::{summarize, transactions_in_month};
pub use trend::{MonthlyBalance, month_label, monthly_history, trend};

use crate::models::{Allocation, BudgetConfig, Summary, Transaction};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub month: String,
    pub summary: Summary,
    pub targets: Allocation,
    pub health: HealthScore,
    pub ratios: Ratios,
    pub categories: Vec<CategoryStatus>,
    pub suggestions: Vec<Suggestion>,
    pub tips: Vec<&'static str>,
}

/// Runs every stage for one month.
pub fn analyze(transactions: &[Transaction], budget: &BudgetConfig, month: &str) -> Report {
    let summary = summarize(transactions, month);
    let targets = resolve_targets(budget);
    Report {
        month: month.to_string(),
        health: score(&summary, budget, &targets),
        ratios: ratios(&summary, budget),
        categories: category_status(&summary, &targets),
        suggestions: suggestions(&summary, budget, &targets),
        tips: tips(&summary),
        summary,
        targets,
    }
}
