// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cache::{replace_transactions, save_budget};
use crate::config::Config;
use crate::remote::{RemoteClient, RemoteError};
use crate::session::Session;
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(
    conn: &mut Connection,
    session: &Session,
    config: &Config,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("pull", _)) => {
            let client = RemoteClient::from_config(config)?
                .context("No backend configured. Run `keuangan config set-api-url <url>` first.")?;
            let n = pull(conn, &client, session)?;
            println!("Pulled {} transactions for '{}'.", n, session.username);
        }
        _ => {}
    }
    Ok(())
}

/// Replaces the cached budget and transactions with the backend copy.
///
/// A user without a budget row on the backend keeps the local budget.
/// Returns the number of transactions now cached.
pub fn pull(conn: &mut Connection, client: &RemoteClient, session: &Session) -> Result<usize> {
    match client.get_budget(&session.username) {
        Ok(budget) => save_budget(conn, &session.username, &budget)?,
        Err(RemoteError::Rejected(msg)) => {
            tracing::info!(user = %session.username, reason = %msg, "no budget on backend, keeping local");
        }
        Err(e) => return Err(e).context("Fetch budget"),
    }
    let txs = client
        .get_transactions(&session.username)
        .context("Fetch transactions")?;
    replace_transactions(conn, &session.username, &txs)?;
    Ok(txs.len())
}
