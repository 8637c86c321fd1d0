// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{API_URL_ENV, Config, clear_api_url, set_api_url};
use crate::db::db_path;
use crate::session::Session;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-api-url", sub)) => {
            let url = set_api_url(conn, sub.get_one::<String>("url").unwrap())?;
            println!("Backend set to {}", url);
        }
        Some(("clear-api-url", _)) => {
            clear_api_url(conn)?;
            println!("Backend cleared; working locally.");
        }
        _ => show(conn)?,
    }
    Ok(())
}

fn show(conn: &Connection) -> Result<()> {
    let config = Config::load(conn)?;
    let user = Session::current(conn)?.map(|s| s.username);
    let from_env = std::env::var(API_URL_ENV).is_ok_and(|v| !v.trim().is_empty());
    let api = match config.api_url {
        Some(url) if from_env => format!("{} (from {})", url, API_URL_ENV),
        Some(url) => url,
        None => "(none, local only)".to_string(),
    };
    let rows = vec![
        vec!["database".to_string(), db_path()?.display().to_string()],
        vec!["api_url".to_string(), api],
        vec![
            "current_user".to_string(),
            user.unwrap_or_else(|| "(not logged in)".to_string()),
        ],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}
