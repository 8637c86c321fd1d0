// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::budget::save_and_sync;
use super::exporter::Backup;
use super::print_sync;
use crate::cache::{create_transaction, replace_transactions};
use crate::config::Config;
use crate::models::{Category, TransactionDraft, TxType};
use crate::session::Session;
use crate::utils::{parse_amount, parse_date};
use anyhow::{Context, Result};
use chrono::Utc;
use csv::ReaderBuilder;
use rusqlite::Connection;
use std::io::Read;

pub fn handle(
    conn: &mut Connection,
    session: &Session,
    config: &Config,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("csv", sub)) => import_csv(conn, session, sub),
        Some(("backup", sub)) => import_backup(conn, session, config, sub),
        _ => Ok(()),
    }
}

/// Reads rows in the `export csv` layout: Date,Type,Category,Amount,Description.
///
/// Type and category accept either keys (`expense`, `living`) or labels
/// (`Expense`, `Living`). Every row is validated before anything is returned.
pub fn read_csv<R: Read>(input: R) -> Result<Vec<TransactionDraft>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let mut out = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let line = i + 2;
        let rec = result?;
        let field = |idx: usize, name: &str| -> Result<String> {
            rec.get(idx)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .with_context(|| format!("Line {}: {} missing", line, name))
        };
        let date = parse_date(&field(0, "date")?).with_context(|| format!("Line {}", line))?;
        let kind = field(1, "type")?
            .parse::<TxType>()
            .with_context(|| format!("Line {}", line))?;
        let category = field(2, "category")?
            .parse::<Category>()
            .with_context(|| format!("Line {}", line))?
            .normalized_for(kind);
        let amount = parse_amount(&field(3, "amount")?).with_context(|| format!("Line {}", line))?;
        let description = rec
            .get(4)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());
        let draft = TransactionDraft {
            kind,
            category,
            amount,
            date,
            description,
        };
        draft.validate().with_context(|| format!("Line {}", line))?;
        out.push(draft);
    }
    Ok(out)
}

// Imported rows get fresh ids and stay in the local cache.
fn import_csv(conn: &mut Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let file = std::fs::File::open(path).with_context(|| format!("Open CSV {}", path))?;
    let drafts = read_csv(file)?;

    let db_tx = conn.transaction()?;
    let now = Utc::now();
    for draft in drafts.iter().cloned() {
        create_transaction(&db_tx, &session.username, draft, now)?;
    }
    db_tx.commit()?;
    tracing::info!(user = %session.username, count = drafts.len(), path, "csv imported");
    println!("Imported {} transactions from {}", drafts.len(), path);
    Ok(())
}

pub fn read_backup<R: Read>(input: R) -> Result<Backup> {
    serde_json::from_reader(input).context("Parse backup file")
}

fn import_backup(
    conn: &mut Connection,
    session: &Session,
    config: &Config,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let file = std::fs::File::open(path).with_context(|| format!("Open backup {}", path))?;
    let mut data = read_backup(file)?;
    for t in &mut data.transactions {
        t.category = t.category.normalized_for(t.kind);
        let draft = TransactionDraft {
            kind: t.kind,
            category: t.category,
            amount: t.amount,
            date: t.date,
            description: None,
        };
        draft
            .validate()
            .with_context(|| format!("Transaction {}", t.id))?;
    }
    replace_transactions(conn, &session.username, &data.transactions)?;
    let outcome = save_and_sync(conn, session, config, &data.budget)?;
    println!(
        "Restored budget and {} transactions from {}",
        data.transactions.len(),
        path
    );
    print_sync(&outcome);
    Ok(())
}
