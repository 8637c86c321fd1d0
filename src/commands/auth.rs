// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::sync::pull;
use crate::cache::purge_user;
use crate::config::Config;
use crate::remote::RemoteClient;
use crate::session::Session;
use crate::utils::parse_amount;
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;

pub fn register(config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let username = sub.get_one::<String>("username").unwrap().trim();
    let password = sub.get_one::<String>("password").unwrap();
    let salary = parse_amount(sub.get_one::<String>("salary").unwrap())?;
    if username.is_empty() {
        return Err(anyhow!("Username must not be empty"));
    }
    let client = RemoteClient::from_config(config)?
        .context("Registration needs a backend. Run `keuangan config set-api-url <url>` first.")?;
    let msg = client
        .register(username, password, salary)
        .context("Registration failed")?;
    println!("{} Please log in.", msg);
    Ok(())
}

pub fn login(conn: &mut Connection, config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let username = sub.get_one::<String>("username").unwrap();
    let Some(client) = RemoteClient::from_config(config)? else {
        let session = Session::start(conn, username)?;
        println!(
            "No backend configured; started a local session for '{}'.",
            session.username
        );
        return Ok(());
    };

    let password = sub
        .get_one::<String>("password")
        .context("--password is required when a backend is configured")?;
    let user = client.login(username, password).context("Login failed")?;
    let session = Session::start(conn, &user.username)?;
    println!("Welcome, {}!", session.username);
    match pull(conn, &client, &session) {
        Ok(n) => println!("Loaded budget and {} transactions from the cloud.", n),
        Err(e) => {
            tracing::warn!(error = %e, "initial pull failed");
            println!("Logged in, but cloud data could not be loaded: {:#}", e);
        }
    }
    Ok(())
}

pub fn logout(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let Some(session) = Session::current(conn)? else {
        println!("Not logged in.");
        return Ok(());
    };
    if sub.get_flag("purge") {
        purge_user(conn, &session.username)?;
        println!("Dropped cached data for '{}'.", session.username);
    }
    Session::end(conn)?;
    println!("Logged out successfully");
    Ok(())
}

pub fn whoami(conn: &Connection, user_override: Option<&str>) -> Result<()> {
    let session = Session::resolve(conn, user_override)?;
    println!("{}", session.username);
    Ok(())
}
