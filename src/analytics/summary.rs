// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, Summary, Transaction, TxType};

pub fn transactions_in_month<'a>(
    transactions: &'a [Transaction],
    month: &'a str,
) -> impl Iterator<Item = &'a Transaction> + 'a {
    transactions.iter().filter(move |t| t.in_month(month))
}

/// Reduces the transactions dated in `month` (`YYYY-MM`) to category totals.
///
/// Income tagged `saving` counts as money put into savings. Expenses outside
/// the four buckets still count toward `total_expense` but land in no bucket.
pub fn summarize(transactions: &[Transaction], month: &str) -> Summary {
    let mut s = Summary::default();
    for tx in transactions_in_month(transactions, month) {
        match tx.kind {
            TxType::Income => {
                s.total_income = s.total_income.saturating_add(tx.amount);
                if tx.category == Category::Saving {
                    s.saving_income = s.saving_income.saturating_add(tx.amount);
                }
            }
            TxType::Expense => {
                s.total_expense = s.total_expense.saturating_add(tx.amount);
                match tx.category {
                    Category::Living => s.living_expense = s.living_expense.saturating_add(tx.amount),
                    Category::Saving => s.saving_expense = s.saving_expense.saturating_add(tx.amount),
                    Category::Playing => s.playing_expense = s.playing_expense.saturating_add(tx.amount),
                    Category::Emergency => s.emergency_expense = s.emergency_expense.saturating_add(tx.amount),
                    _ => {}
                }
            }
        }
    }
    s
}
