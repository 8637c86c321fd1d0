// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local cache of each user's budget and transactions.

use crate::models::{Allocation, BudgetConfig, Percentages, Transaction, TransactionDraft};
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn clear_setting(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key=?1", params![key])?;
    Ok(())
}

/// The cached budget, or `None` if this user has none yet.
pub fn find_budget(conn: &Connection, username: &str) -> Result<Option<BudgetConfig>> {
    conn.query_row(
        "SELECT salary, living_pct, saving_pct, playing_pct, emergency_pct,
                living_amt, saving_amt, playing_amt, emergency_amt
         FROM budgets WHERE username=?1",
        params![username],
        |r| {
            let amts: (Option<i64>, Option<i64>, Option<i64>, Option<i64>) =
                (r.get(5)?, r.get(6)?, r.get(7)?, r.get(8)?);
            let amounts = match amts {
                (Some(living), Some(saving), Some(playing), Some(emergency)) => Some(Allocation {
                    living,
                    saving,
                    playing,
                    emergency,
                }),
                _ => None,
            };
            Ok(BudgetConfig {
                salary: r.get(0)?,
                percentages: Percentages {
                    living: r.get(1)?,
                    saving: r.get(2)?,
                    playing: r.get(3)?,
                    emergency: r.get(4)?,
                },
                amounts,
            })
        },
    )
    .optional()
    .with_context(|| format!("Read budget for '{}'", username))
}

/// The cached budget, falling back to the default 6,000,000 split.
pub fn load_budget(conn: &Connection, username: &str) -> Result<BudgetConfig> {
    Ok(find_budget(conn, username)?.unwrap_or_default())
}

pub fn save_budget(conn: &Connection, username: &str, budget: &BudgetConfig) -> Result<()> {
    let p = &budget.percentages;
    let a = budget.amounts;
    conn.execute(
        "INSERT INTO budgets(username, salary, living_pct, saving_pct, playing_pct, emergency_pct,
                             living_amt, saving_amt, playing_amt, emergency_amt)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)
         ON CONFLICT(username) DO UPDATE SET
            salary=excluded.salary,
            living_pct=excluded.living_pct, saving_pct=excluded.saving_pct,
            playing_pct=excluded.playing_pct, emergency_pct=excluded.emergency_pct,
            living_amt=excluded.living_amt, saving_amt=excluded.saving_amt,
            playing_amt=excluded.playing_amt, emergency_amt=excluded.emergency_amt",
        params![
            username,
            budget.salary,
            p.living,
            p.saving,
            p.playing,
            p.emergency,
            a.map(|x| x.living),
            a.map(|x| x.saving),
            a.map(|x| x.playing),
            a.map(|x| x.emergency),
        ],
    )?;
    tracing::debug!(user = username, salary = budget.salary, "budget cached");
    Ok(())
}

const TX_COLUMNS: &str = "id, type, category, amount, date, description, created_at";

type RawTx = (i64, String, String, i64, String, Option<String>, String);

fn row_to_transaction(r: &Row<'_>) -> rusqlite::Result<RawTx> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
    ))
}

fn decode_transaction(raw: RawTx) -> Result<Transaction> {
    let (id, kind, category, amount, date, description, created_at) = raw;
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' on transaction {}", date, id))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .with_context(|| format!("Invalid created_at '{}' on transaction {}", created_at, id))?
        .with_timezone(&Utc);
    Ok(Transaction {
        id,
        kind: kind.parse()?,
        category: category.parse()?,
        amount,
        date,
        description,
        created_at,
    })
}

/// All of a user's transactions in the order they were created.
pub fn load_transactions(conn: &Connection, username: &str) -> Result<Vec<Transaction>> {
    let sql = format!(
        "SELECT {} FROM transactions WHERE username=?1 ORDER BY created_at, id",
        TX_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![username], row_to_transaction)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(decode_transaction(row?)?);
    }
    Ok(out)
}

pub fn find_transaction(conn: &Connection, username: &str, id: i64) -> Result<Option<Transaction>> {
    let sql = format!(
        "SELECT {} FROM transactions WHERE username=?1 AND id=?2",
        TX_COLUMNS
    );
    let raw = conn
        .query_row(&sql, params![username, id], row_to_transaction)
        .optional()?;
    raw.map(decode_transaction).transpose()
}

/// Millisecond timestamp id, bumped past the user's newest id on collision.
pub fn next_id(conn: &Connection, username: &str, now: DateTime<Utc>) -> Result<i64> {
    let max: Option<i64> = conn.query_row(
        "SELECT MAX(id) FROM transactions WHERE username=?1",
        params![username],
        |r| r.get(0),
    )?;
    let ts = now.timestamp_millis();
    Ok(match max {
        Some(m) if m >= ts => m + 1,
        _ => ts,
    })
}

pub fn insert_transaction(conn: &Connection, username: &str, tx: &Transaction) -> Result<()> {
    conn.execute(
        "INSERT INTO transactions(username, id, type, category, amount, date, description, created_at)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
        params![
            username,
            tx.id,
            tx.kind.as_str(),
            tx.category.as_str(),
            tx.amount,
            tx.date.to_string(),
            tx.description,
            tx.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        ],
    )
    .with_context(|| format!("Insert transaction {}", tx.id))?;
    tracing::debug!(user = username, id = tx.id, "transaction cached");
    Ok(())
}

/// Validates `draft`, assigns an id and stores it.
pub fn create_transaction(
    conn: &Connection,
    username: &str,
    draft: TransactionDraft,
    now: DateTime<Utc>,
) -> Result<Transaction> {
    draft.validate()?;
    // stored with millisecond precision
    let now = now.trunc_subsecs(3);
    let id = next_id(conn, username, now)?;
    let tx = draft.into_transaction(id, now);
    insert_transaction(conn, username, &tx)?;
    Ok(tx)
}

/// Rewrites the editable fields; `id` and `created_at` are kept.
pub fn update_transaction(
    conn: &Connection,
    username: &str,
    id: i64,
    draft: TransactionDraft,
) -> Result<Transaction> {
    draft.validate()?;
    let existing = find_transaction(conn, username, id)?
        .ok_or_else(|| anyhow!("Transaction {} not found", id))?;
    let updated = draft.into_transaction(existing.id, existing.created_at);
    conn.execute(
        "UPDATE transactions SET type=?3, category=?4, amount=?5, date=?6, description=?7
         WHERE username=?1 AND id=?2",
        params![
            username,
            id,
            updated.kind.as_str(),
            updated.category.as_str(),
            updated.amount,
            updated.date.to_string(),
            updated.description,
        ],
    )?;
    Ok(updated)
}

/// Returns whether a row was removed.
pub fn delete_transaction(conn: &Connection, username: &str, id: i64) -> Result<bool> {
    let n = conn.execute(
        "DELETE FROM transactions WHERE username=?1 AND id=?2",
        params![username, id],
    )?;
    Ok(n > 0)
}

/// Swaps the user's whole transaction list for `txs` in one SQLite transaction.
pub fn replace_transactions(conn: &mut Connection, username: &str, txs: &[Transaction]) -> Result<()> {
    let db_tx = conn.transaction()?;
    db_tx.execute("DELETE FROM transactions WHERE username=?1", params![username])?;
    for t in txs {
        insert_transaction(&db_tx, username, t)?;
    }
    db_tx.commit()?;
    tracing::info!(user = username, count = txs.len(), "transaction cache replaced");
    Ok(())
}

pub fn purge_user(conn: &Connection, username: &str) -> Result<()> {
    conn.execute("DELETE FROM transactions WHERE username=?1", params![username])?;
    conn.execute("DELETE FROM budgets WHERE username=?1", params![username])?;
    Ok(())
}
