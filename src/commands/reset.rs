// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::budget::save_and_sync;
use super::print_sync;
use crate::cache::{load_transactions, replace_transactions};
use crate::config::Config;
use crate::models::BudgetConfig;
use crate::remote::best_effort;
use crate::session::Session;
use anyhow::{Result, bail};
use rusqlite::Connection;

/// Drops every transaction and restores the default budget.
///
/// Deletions are pushed one by one; the first failure stops the push but the
/// local reset has already happened.
pub fn handle(
    conn: &mut Connection,
    session: &Session,
    config: &Config,
    m: &clap::ArgMatches,
) -> Result<()> {
    if !m.get_flag("yes") {
        bail!("This deletes all transactions for '{}'. Re-run with --yes to confirm.", session.username);
    }
    let ids: Vec<i64> = load_transactions(conn, &session.username)?
        .iter()
        .map(|t| t.id)
        .collect();
    replace_transactions(conn, &session.username, &[])?;
    let outcome = save_and_sync(conn, session, config, &BudgetConfig::reset_default())?;
    println!("All data cleared for '{}'.", session.username);
    print_sync(&outcome);

    if !ids.is_empty() {
        let deleted = best_effort(config, "reset", |c| {
            ids.iter()
                .try_for_each(|id| c.delete_transaction(&session.username, *id))
        });
        print_sync(&deleted);
    }
    Ok(())
}
