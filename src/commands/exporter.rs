// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::month_or_current;
use crate::cache::{load_budget, load_transactions};
use crate::models::{BudgetConfig, Transaction};
use crate::session::Session;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

pub const CSV_HEADER: [&str; 5] = ["Date", "Type", "Category", "Amount", "Description"];

/// Everything a user owns, as written by `export backup`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub budget: BudgetConfig,
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub exported_at: Option<DateTime<Utc>>,
}

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("csv", sub)) => export_csv(conn, session, sub),
        Some(("backup", sub)) => export_backup(conn, session, sub),
        _ => Ok(()),
    }
}

/// Writes one row per transaction under [`CSV_HEADER`], using display labels.
pub fn write_csv<W: Write>(out: W, transactions: &[Transaction]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(CSV_HEADER)?;
    for t in transactions {
        wtr.write_record([
            t.date.to_string(),
            t.kind.label().to_string(),
            t.category.label().to_string(),
            t.amount.to_string(),
            t.description.clone().unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn export_csv(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub)?;
    let out = sub.get_one::<String>("out").unwrap();
    let mut rows: Vec<Transaction> = load_transactions(conn, &session.username)?
        .into_iter()
        .filter(|t| t.in_month(&month))
        .collect();
    if rows.is_empty() {
        println!("No data to export");
        return Ok(());
    }
    rows.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
    let file = File::create(out).with_context(|| format!("Create {}", out))?;
    write_csv(file, &rows)?;
    println!("Exported {} transactions for {} to {}", rows.len(), month, out);
    Ok(())
}

pub fn backup(conn: &Connection, session: &Session) -> Result<Backup> {
    Ok(Backup {
        budget: load_budget(conn, &session.username)?,
        transactions: load_transactions(conn, &session.username)?,
        exported_at: Some(Utc::now()),
    })
}

fn export_backup(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let out = sub.get_one::<String>("out").unwrap();
    let data = backup(conn, session)?;
    std::fs::write(out, serde_json::to_string_pretty(&data)?)
        .with_context(|| format!("Write {}", out))?;
    println!(
        "Backed up budget and {} transactions to {}",
        data.transactions.len(),
        out
    );
    Ok(())
}
