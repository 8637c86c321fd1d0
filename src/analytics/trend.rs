// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Transaction, TxType};
use anyhow::{Context, Result};
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBalance {
    pub month: String,
    pub income: i64,
    pub expense: i64,
    pub balance: i64,
    /// Running sum of `balance` up to and including this month.
    pub accumulated: i64,
}

fn totals_by_month(transactions: &[Transaction]) -> BTreeMap<String, (i64, i64)> {
    let mut map: BTreeMap<String, (i64, i64)> = BTreeMap::new();
    for tx in transactions {
        let entry = map.entry(tx.month()).or_insert((0, 0));
        match tx.kind {
            TxType::Income => entry.0 = entry.0.saturating_add(tx.amount),
            TxType::Expense => entry.1 = entry.1.saturating_add(tx.amount),
        }
    }
    map
}

fn with_running_total(rows: impl IntoIterator<Item = (String, i64, i64)>) -> Vec<MonthlyBalance> {
    let mut accumulated: i64 = 0;
    rows.into_iter()
        .map(|(month, income, expense)| {
            let balance = income - expense;
            accumulated = accumulated.saturating_add(balance);
            MonthlyBalance {
                month,
                income,
                expense,
                balance,
                accumulated,
            }
        })
        .collect()
}

/// Every month that has at least one transaction, oldest first.
pub fn monthly_history(transactions: &[Transaction]) -> Vec<MonthlyBalance> {
    with_running_total(
        totals_by_month(transactions)
            .into_iter()
            .map(|(m, (inc, exp))| (m, inc, exp)),
    )
}

/// The `months` calendar months ending at `end_month`, oldest first. Months
/// without transactions are included with zero totals.
pub fn trend(transactions: &[Transaction], end_month: &str, months: usize) -> Result<Vec<MonthlyBalance>> {
    let end = NaiveDate::parse_from_str(&format!("{}-01", end_month), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", end_month))?;
    let totals = totals_by_month(transactions);
    let mut rows = Vec::with_capacity(months);
    for back in (0..months).rev() {
        let d = end
            .checked_sub_months(Months::new(back as u32))
            .with_context(|| format!("Month out of range: {} minus {}", end_month, back))?;
        let key = format!("{:04}-{:02}", d.year(), d.month());
        let (inc, exp) = totals.get(&key).copied().unwrap_or((0, 0));
        rows.push((key, inc, exp));
    }
    Ok(with_running_total(rows))
}

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// `2025-03` -> `Mar 2025`; anything unparseable is returned unchanged.
pub fn month_label(month: &str) -> String {
    let mut parts = month.splitn(2, '-');
    let year = parts.next().unwrap_or_default();
    match parts.next().and_then(|m| m.parse::<usize>().ok()) {
        Some(m @ 1..=12) => format!("{} {}", MONTH_NAMES[m - 1], year),
        _ => month.to_string(),
    }
}
