// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{month_or_current, print_sync};
use crate::cache::{
    create_transaction, delete_transaction, find_transaction, load_budget, load_transactions,
    update_transaction,
};
use crate::config::Config;
use crate::models::{BudgetConfig, Category, Transaction, TransactionDraft, TxType};
use crate::remote::best_effort;
use crate::session::Session;
use crate::utils::{current_month, fmt_rupiah, maybe_print_json, parse_amount, parse_date, pretty_table, today};
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;

pub const SALARY_DESCRIPTION: &str = "Monthly Salary";
const SALARY_DESCRIPTION_ID: &str = "Gaji Bulanan";
const RECENT: usize = 5;

pub fn handle(
    conn: &Connection,
    session: &Session,
    config: &Config,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, session, config, sub)?,
        Some(("edit", sub)) => edit(conn, session, sub)?,
        Some(("rm", sub)) => remove(conn, session, config, sub)?,
        Some(("list", sub)) => list(conn, session, sub)?,
        Some(("recent", sub)) => recent(conn, session, sub)?,
        Some(("salary", sub)) => salary(conn, session, config, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_type(s: &str) -> Result<TxType> {
    Ok(s.parse::<TxType>()?)
}

fn parse_category(s: &str) -> Result<Category> {
    Ok(s.parse::<Category>()?)
}

fn draft_from_args(sub: &clap::ArgMatches) -> Result<TransactionDraft> {
    let kind = parse_type(sub.get_one::<String>("type").unwrap())?;
    let category = parse_category(sub.get_one::<String>("category").unwrap())?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let description = sub.get_one::<String>("description").cloned();
    Ok(TransactionDraft {
        kind,
        category,
        amount,
        date,
        description,
    })
}

/// Stores a new transaction locally and pushes it to the backend.
pub fn record(
    conn: &Connection,
    session: &Session,
    config: &Config,
    draft: TransactionDraft,
) -> Result<Transaction> {
    let tx = create_transaction(conn, &session.username, draft, Utc::now())?;
    let outcome = best_effort(config, "transaction", |c| {
        c.add_transaction(&session.username, &tx)
    });
    print_sync(&outcome);
    Ok(tx)
}

fn add(conn: &Connection, session: &Session, config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let draft = draft_from_args(sub)?;
    let tx = record(conn, session, config, draft)?;
    println!(
        "Recorded {} {} {} on {} (id {})",
        tx.kind.label(),
        tx.category.label(),
        fmt_rupiah(tx.amount),
        tx.date,
        tx.id
    );
    Ok(())
}

/// Applies whichever of type/category/amount/date/description were given.
pub fn merge_edit(existing: &Transaction, sub: &clap::ArgMatches) -> Result<TransactionDraft> {
    let kind = match sub.get_one::<String>("type") {
        Some(t) => parse_type(t)?,
        None => existing.kind,
    };
    let category = match sub.get_one::<String>("category") {
        Some(c) => parse_category(c)?,
        None => existing.category,
    };
    let amount = match sub.get_one::<String>("amount") {
        Some(a) => parse_amount(a)?,
        None => existing.amount,
    };
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => existing.date,
    };
    let description = match sub.get_one::<String>("description") {
        Some(d) => Some(d.clone()),
        None => existing.description.clone(),
    };
    Ok(TransactionDraft {
        kind,
        category,
        amount,
        date,
        description,
    })
}

// The backend has no update action, so edits stay in the local cache.
fn edit(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let existing = find_transaction(conn, &session.username, id)?
        .ok_or_else(|| anyhow!("Transaction {} not found", id))?;
    let draft = merge_edit(&existing, sub)?;
    let tx = update_transaction(conn, &session.username, id, draft)?;
    println!(
        "Transaction {} updated: {} {} {} on {}",
        tx.id,
        tx.kind.label(),
        tx.category.label(),
        fmt_rupiah(tx.amount),
        tx.date
    );
    Ok(())
}

fn remove(conn: &Connection, session: &Session, config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if !delete_transaction(conn, &session.username, id)? {
        return Err(anyhow!("Transaction {} not found", id));
    }
    println!("Transaction {} deleted successfully!", id);
    let outcome = best_effort(config, "delete", |c| {
        c.delete_transaction(&session.username, id)
    });
    print_sync(&outcome);
    Ok(())
}

/// Month's transactions after the type/category filters, newest date first.
pub fn query_rows(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let month = month_or_current(sub)?;
    let kind = sub.get_one::<String>("type").map(|s| parse_type(s)).transpose()?;
    let category = sub
        .get_one::<String>("category")
        .map(|s| parse_category(s))
        .transpose()?;
    let mut rows: Vec<Transaction> = load_transactions(conn, &session.username)?
        .into_iter()
        .filter(|t| t.in_month(&month))
        .filter(|t| kind.is_none_or(|k| t.kind == k))
        .filter(|t| category.is_none_or(|c| t.category == c))
        .collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    Ok(rows)
}

fn print_rows(rows: &[Transaction]) {
    if rows.is_empty() {
        println!("No transactions found");
        return;
    }
    let data = rows
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.date.to_string(),
                t.kind.label().to_string(),
                format!("{} {}", t.category.icon(), t.category.label()),
                match t.kind {
                    TxType::Income => format!("+{}", fmt_rupiah(t.amount)),
                    TxType::Expense => format!("-{}", fmt_rupiah(t.amount)),
                },
                t.display_description().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Type", "Category", "Amount", "Description"],
            data
        )
    );
}

fn list(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let rows = query_rows(conn, session, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        print_rows(&rows);
    }
    Ok(())
}

/// The last `RECENT` recorded transactions, newest first.
pub fn recent_rows(conn: &Connection, session: &Session) -> Result<Vec<Transaction>> {
    let all = load_transactions(conn, &session.username)?;
    Ok(all.into_iter().rev().take(RECENT).collect())
}

fn recent(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let rows = recent_rows(conn, session)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        print_rows(&rows);
    }
    Ok(())
}

pub fn has_salary_for(transactions: &[Transaction], month: &str) -> bool {
    transactions.iter().any(|t| {
        t.kind == TxType::Income
            && t.in_month(month)
            && matches!(
                t.description.as_deref(),
                Some(SALARY_DESCRIPTION) | Some(SALARY_DESCRIPTION_ID)
            )
    })
}

/// Adds the month's salary income unless one is already recorded.
///
/// The entry is dated `on` (normally today); returns `None` when nothing was added.
pub fn ensure_monthly_salary(
    conn: &Connection,
    session: &Session,
    budget: &BudgetConfig,
    month: &str,
    on: NaiveDate,
    now: DateTime<Utc>,
) -> Result<Option<Transaction>> {
    let existing = load_transactions(conn, &session.username)?;
    if has_salary_for(&existing, month) {
        return Ok(None);
    }
    let draft = TransactionDraft {
        kind: TxType::Income,
        category: Category::Salary,
        amount: budget.salary,
        date: on,
        description: Some(SALARY_DESCRIPTION.to_string()),
    };
    Ok(Some(create_transaction(conn, &session.username, draft, now)?))
}

fn salary(conn: &Connection, session: &Session, config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub)?;
    let on = if month == current_month() {
        today()
    } else {
        parse_date(&format!("{}-01", month)).context("Salary date")?
    };
    let budget = load_budget(conn, &session.username)?;
    match ensure_monthly_salary(conn, session, &budget, &month, on, Utc::now())? {
        Some(tx) => {
            println!("Recorded salary {} for {}", fmt_rupiah(tx.amount), month);
            let outcome = best_effort(config, "salary", |c| {
                c.add_transaction(&session.username, &tx)
            });
            print_sync(&outcome);
        }
        None => println!("Salary for {} is already recorded.", month),
    }
    Ok(())
}
