// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("id.keuangan", "Keuangan", "keuangan"));

pub const DB_PATH_ENV: &str = "KEUANGAN_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_PATH_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("keuangan.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    tracing::debug!(path = %path.display(), "local cache opened");
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    -- one row per user; *_amt are NULL together when the budget is percentage-only
    CREATE TABLE IF NOT EXISTS budgets(
        username TEXT PRIMARY KEY,
        salary INTEGER NOT NULL,
        living_pct INTEGER NOT NULL,
        saving_pct INTEGER NOT NULL,
        playing_pct INTEGER NOT NULL,
        emergency_pct INTEGER,
        living_amt INTEGER,
        saving_amt INTEGER,
        playing_amt INTEGER,
        emergency_amt INTEGER
    );

    CREATE TABLE IF NOT EXISTS transactions(
        username TEXT NOT NULL,
        id INTEGER NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        category TEXT NOT NULL,
        amount INTEGER NOT NULL CHECK(amount >= 0),
        date TEXT NOT NULL,
        description TEXT,
        created_at TEXT NOT NULL,
        PRIMARY KEY(username, id)
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(username, date);
    "#,
    )?;
    Ok(())
}
