// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use keuangan::config::{Config, LOG_ENV};
use keuangan::session::Session;
use keuangan::{cli, commands, db};

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;
    let config = Config::load(&conn)?;
    let user = matches.get_one::<String>("user").map(String::as_str);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("register", sub)) => commands::auth::register(&config, sub)?,
        Some(("login", sub)) => commands::auth::login(&mut conn, &config, sub)?,
        Some(("logout", sub)) => commands::auth::logout(&conn, sub)?,
        Some(("whoami", _)) => commands::auth::whoami(&conn, user)?,
        Some(("config", sub)) => commands::settings::handle(&conn, sub)?,
        Some(("budget", sub)) => {
            let session = Session::resolve(&conn, user)?;
            commands::budget::handle(&conn, &session, &config, sub)?
        }
        Some(("tx", sub)) => {
            let session = Session::resolve(&conn, user)?;
            commands::transactions::handle(&conn, &session, &config, sub)?
        }
        Some(("report", sub)) => {
            let session = Session::resolve(&conn, user)?;
            commands::reports::handle(&conn, &session, sub)?
        }
        Some(("export", sub)) => {
            let session = Session::resolve(&conn, user)?;
            commands::exporter::handle(&conn, &session, sub)?
        }
        Some(("import", sub)) => {
            let session = Session::resolve(&conn, user)?;
            commands::importer::handle(&mut conn, &session, &config, sub)?
        }
        Some(("sync", sub)) => {
            let session = Session::resolve(&conn, user)?;
            commands::sync::handle(&mut conn, &session, &config, sub)?
        }
        Some(("doctor", _)) => {
            let session = Session::resolve(&conn, user)?;
            commands::doctor::handle(&conn, &session)?
        }
        Some(("reset", sub)) => {
            let session = Session::resolve(&conn, user)?;
            commands::reset::handle(&mut conn, &session, &config, sub)?
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
