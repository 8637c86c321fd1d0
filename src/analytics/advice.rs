// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::health::{effective_income, wide};
use crate::models::{Allocation, BudgetConfig, Summary};
use crate::utils::fmt_rupiah;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Danger,
    Warning,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub severity: Severity,
    pub icon: &'static str,
    pub title: String,
    pub message: String,
}

impl Suggestion {
    fn new(severity: Severity, icon: &'static str, title: &str, message: String) -> Self {
        Suggestion {
            severity,
            icon,
            title: title.to_string(),
            message,
        }
    }
}

pub fn suggestions(summary: &Summary, budget: &BudgetConfig, targets: &Allocation) -> Vec<Suggestion> {
    let income = effective_income(summary, budget);
    let mut out = Vec::new();

    if summary.total_expense > income {
        out.push(Suggestion::new(
            Severity::Danger,
            "🚨",
            "Expenses Exceed Income!",
            format!(
                "You have a deficit of {}. Review your expenses and cut unnecessary spending.",
                fmt_rupiah(summary.total_expense.saturating_sub(income))
            ),
        ));
    }

    if summary.living_expense > targets.living {
        out.push(Suggestion::new(
            Severity::Warning,
            "🏠",
            "Living Budget Exceeded",
            format!(
                "Living expenses exceeded budget by {}. Try to track spending details and find areas to reduce.",
                fmt_rupiah(summary.living_expense.saturating_sub(targets.living))
            ),
        ));
    } else if summary.living_expense > 0 && wide(summary.living_expense) * 2 < wide(targets.living) {
        let used = (Decimal::from(summary.living_expense) * Decimal::ONE_HUNDRED
            / Decimal::from(targets.living))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        out.push(Suggestion::new(
            Severity::Success,
            "✨",
            "Saving on Living Expenses",
            format!(
                "Great! You only used {}% of your living budget. The remainder can go to savings.",
                used
            ),
        ));
    }

    if summary.playing_expense > targets.playing {
        out.push(Suggestion::new(
            Severity::Warning,
            "✈️",
            "Lifestyle Budget Exceeded",
            "Lifestyle & travel expenses exceeded budget. Try to limit leisure spending and focus on essentials."
                .to_string(),
        ));
    }

    if summary.saving_income == 0 && income > 0 {
        out.push(Suggestion::new(
            Severity::Danger,
            "💎",
            "No Savings This Month",
            format!(
                "You haven't saved anything this month. Savings target: {}. Try to set aside at least 10-20% of income.",
                fmt_rupiah(targets.saving)
            ),
        ));
    } else if summary.saving_income > 0 && summary.saving_income < targets.saving {
        out.push(Suggestion::new(
            Severity::Warning,
            "💎",
            "Savings Below Target",
            format!(
                "You saved {}, but still {} short of the target.",
                fmt_rupiah(summary.saving_income),
                fmt_rupiah(targets.saving.saturating_sub(summary.saving_income))
            ),
        ));
    } else if summary.saving_income >= targets.saving {
        out.push(Suggestion::new(
            Severity::Success,
            "🎉",
            "Savings Target Reached!",
            format!(
                "Congratulations! You saved {} this month. Keep up the good habit!",
                fmt_rupiah(summary.saving_income)
            ),
        ));
    }

    if summary.emergency_expense > 0 {
        out.push(Suggestion::new(
            Severity::Warning,
            "🚨",
            "Emergency Fund Used",
            format!(
                "You used {} from emergency fund. Make sure to replenish it next month.",
                fmt_rupiah(summary.emergency_expense)
            ),
        ));
    }

    if out.is_empty() {
        out.push(Suggestion::new(
            Severity::Success,
            "🌟",
            "Your Finances are Healthy!",
            "No issues to address. Keep up the good financial management!".to_string(),
        ));
    }
    out
}

pub const MAX_TIPS: usize = 5;

const GENERIC_TIPS: [&str; 5] = [
    "Use the 50/30/10/10 method: 50% living, 30% saving, 10% lifestyle, 10% emergency.",
    "Track every expense, no matter how small. This helps you understand where your money goes.",
    "Set specific savings goals (e.g., emergency fund = 6x monthly expenses).",
    "Make a shopping list before going to the store and stick to it.",
    "Review your finances weekly to stay on budget.",
];

pub const TIP_LIFESTYLE_OVER_SAVING: &str =
    "Lifestyle spending is higher than savings. Try to swap priorities!";
pub const TIP_REPLENISH_EMERGENCY: &str =
    "After using emergency funds, prioritize replenishing them.";

/// Generic advice with up to two contextual tips in front, capped at [`MAX_TIPS`].
pub fn tips(summary: &Summary) -> Vec<&'static str> {
    let mut out = Vec::with_capacity(GENERIC_TIPS.len() + 2);
    if summary.emergency_expense > 0 {
        out.push(TIP_REPLENISH_EMERGENCY);
    }
    if summary.playing_expense > summary.saving_income {
        out.push(TIP_LIFESTYLE_OVER_SAVING);
    }
    out.extend_from_slice(&GENERIC_TIPS);
    out.truncate(MAX_TIPS);
    out
}
