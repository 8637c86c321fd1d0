// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cache::{load_budget, load_transactions};
use crate::models::{BudgetConfig, Transaction, TxType};
use crate::session::Session;
use crate::utils::{fmt_rupiah, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

/// `[issue, detail]` rows; empty when nothing looks wrong.
pub fn diagnose(budget: &BudgetConfig, transactions: &[Transaction]) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    if budget.salary == 0 {
        rows.push(vec!["zero_salary".into(), "salary is 0".into()]);
    }
    let total = budget.total_percent();
    if total != 100 {
        rows.push(vec!["split_not_100".into(), format!("allocation totals {}%", total)]);
    }
    if let Some(amounts) = budget.amounts {
        if amounts.total() > budget.salary {
            rows.push(vec![
                "pinned_over_salary".into(),
                format!(
                    "{} allocated of {}",
                    fmt_rupiah(amounts.total()),
                    fmt_rupiah(budget.salary)
                ),
            ]);
        }
    }
    for t in transactions {
        if t.category.allowed_for(t.kind) {
            continue;
        }
        let issue = match t.kind {
            TxType::Expense => "expense_outside_buckets",
            TxType::Income => "income_bad_category",
        };
        rows.push(vec![
            issue.into(),
            format!("{} {} {} (id {})", t.date, t.category.as_str(), fmt_rupiah(t.amount), t.id),
        ]);
    }
    rows
}

pub fn handle(conn: &Connection, session: &Session) -> Result<()> {
    let budget = load_budget(conn, &session.username)?;
    let txs = load_transactions(conn, &session.username)?;
    let rows = diagnose(&budget, &txs);
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
