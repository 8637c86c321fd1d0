// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::month_or_current;
use crate::analytics::{self, Report, month_label, monthly_history, resolve_targets, summarize};
use crate::cache::{load_budget, load_transactions};
use crate::models::{BudgetConfig, Category, Transaction};
use crate::session::Session;
use crate::utils::{fmt_rupiah, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("dashboard", sub)) => show_dashboard(conn, session, sub)?,
        Some(("health", sub)) => health(conn, session, sub)?,
        Some(("trend", sub)) => trend(conn, session, sub)?,
        Some(("savings", sub)) => savings(conn, session, sub)?,
        Some(("breakdown", sub)) => breakdown(conn, session, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketUsage {
    pub category: Category,
    pub budget: i64,
    pub used: i64,
    pub remaining: i64,
    /// Share of the budget used, capped at 100.
    pub progress: Decimal,
    pub over: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub month: String,
    pub total_income: i64,
    pub total_expense: i64,
    pub balance: i64,
    pub buckets: Vec<BucketUsage>,
}

/// Per-bucket budget cards. The saving card tracks money put in.
pub fn dashboard(transactions: &[Transaction], budget: &BudgetConfig, month: &str) -> Dashboard {
    let summary = summarize(transactions, month);
    let targets = resolve_targets(budget);
    let buckets = Category::BUCKETS
        .iter()
        .map(|&category| {
            let budget = targets.get(category);
            let used = if category == Category::Saving {
                summary.saving_income
            } else {
                summary.expense_for(category)
            };
            let progress = if budget > 0 {
                (Decimal::from(used) * Decimal::ONE_HUNDRED / Decimal::from(budget))
                    .min(Decimal::ONE_HUNDRED)
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            } else {
                Decimal::ZERO
            };
            BucketUsage {
                category,
                budget,
                used,
                remaining: budget.saturating_sub(used).max(0),
                progress,
                over: category != Category::Saving && used > budget,
            }
        })
        .collect();
    Dashboard {
        month: month.to_string(),
        total_income: summary.total_income,
        total_expense: summary.total_expense,
        balance: summary.balance(),
        buckets,
    }
}

fn show_dashboard(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub)?;
    let txs = load_transactions(conn, &session.username)?;
    let budget = load_budget(conn, &session.username)?;
    let d = dashboard(&txs, &budget, &month);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &d)? {
        return Ok(());
    }
    println!("{} · {}", month_label(&month), session.username);
    println!(
        "{}",
        pretty_table(
            &["Income", "Expense", "Balance"],
            vec![vec![
                fmt_rupiah(d.total_income),
                fmt_rupiah(d.total_expense),
                fmt_rupiah(d.balance),
            ]],
        )
    );
    let rows = d
        .buckets
        .iter()
        .map(|b| {
            vec![
                format!("{} {}", b.category.icon(), b.category.label()),
                fmt_rupiah(b.budget),
                fmt_rupiah(b.used),
                fmt_rupiah(b.remaining),
                if b.over {
                    format!("{}% ⚠️", b.progress)
                } else {
                    format!("{}%", b.progress)
                },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Budget", "Used", "Remaining", "Progress"], rows)
    );
    Ok(())
}

fn print_report(r: &Report) {
    println!("Financial health for {}", month_label(&r.month));
    println!(
        "Score: {}/100 · {} {}",
        r.health.score,
        r.health.status.label(),
        r.health.status.icon()
    );
    println!(
        "{}",
        pretty_table(
            &["Saving ratio", "Expense ratio", "Remaining"],
            vec![vec![
                format!("{}%", r.ratios.saving_ratio),
                format!("{}%", r.ratios.expense_ratio),
                fmt_rupiah(r.ratios.budget_remaining),
            ]],
        )
    );

    let rows = r
        .categories
        .iter()
        .map(|c| {
            vec![
                format!("{} {}", c.category.icon(), c.category.label()),
                c.category.purpose().to_string(),
                fmt_rupiah(c.budget),
                fmt_rupiah(c.used),
                c.note.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Purpose", "Budget", "Used", "Status"], rows)
    );

    println!("Suggestions");
    for s in &r.suggestions {
        println!("  {} {}", s.icon, s.title);
        println!("     {}", s.message);
    }
    println!("Tips");
    for t in &r.tips {
        println!("  • {}", t);
    }
}

fn health(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub)?;
    let txs = load_transactions(conn, &session.username)?;
    let budget = load_budget(conn, &session.username)?;
    let report = analytics::analyze(&txs, &budget, &month);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        print_report(&report);
    }
    Ok(())
}

fn balance_rows(rows: &[analytics::MonthlyBalance]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| {
            vec![
                month_label(&r.month),
                fmt_rupiah(r.income),
                fmt_rupiah(r.expense),
                fmt_rupiah(r.balance),
                fmt_rupiah(r.accumulated),
            ]
        })
        .collect()
}

fn trend(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub)?;
    let months = *sub.get_one::<usize>("months").unwrap_or(&6);
    let txs = load_transactions(conn, &session.username)?;
    let rows = analytics::trend(&txs, &month, months)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        println!(
            "{}",
            pretty_table(
                &["Month", "Income", "Expense", "Balance", "Running"],
                balance_rows(&rows)
            )
        );
    }
    Ok(())
}

fn savings(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let txs = load_transactions(conn, &session.username)?;
    let mut rows = monthly_history(&txs);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    if rows.is_empty() {
        println!("No transaction data yet");
        return Ok(());
    }
    let total = rows.last().map(|r| r.accumulated).unwrap_or_default();
    println!("Accumulated savings: {}", fmt_rupiah(total));
    rows.reverse();
    println!(
        "{}",
        pretty_table(
            &["Month", "Income", "Expense", "Balance", "Accumulated"],
            balance_rows(&rows)
        )
    );
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownRow {
    pub category: Category,
    pub spent: i64,
    /// Share of total expense, one decimal.
    pub share: Decimal,
}

pub fn breakdown_rows(transactions: &[Transaction], month: &str) -> Vec<BreakdownRow> {
    let summary = summarize(transactions, month);
    Category::BUCKETS
        .iter()
        .map(|&category| {
            let spent = summary.expense_for(category);
            let share = if summary.total_expense > 0 {
                (Decimal::from(spent) * Decimal::ONE_HUNDRED / Decimal::from(summary.total_expense))
                    .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
            } else {
                Decimal::ZERO
            };
            BreakdownRow {
                category,
                spent,
                share,
            }
        })
        .collect()
}

fn breakdown(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub)?;
    let txs = load_transactions(conn, &session.username)?;
    let rows = breakdown_rows(&txs, &month);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        let data = rows
            .iter()
            .map(|r| {
                vec![
                    format!("{} {}", r.category.icon(), r.category.label()),
                    fmt_rupiah(r.spent),
                    format!("{}%", r.share),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Share"], data));
    }
    Ok(())
}
