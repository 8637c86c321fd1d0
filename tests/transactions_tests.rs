// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, TimeZone, Utc};
use keuangan::cache::{find_transaction, load_transactions};
use keuangan::commands::transactions;
use keuangan::config::Config;
use keuangan::db::init_schema;
use keuangan::models::{BudgetConfig, Category, TxType};
use keuangan::session::Session;
use keuangan::{cli, cache};
use rusqlite::Connection;

fn setup() -> (Connection, Session) {
    let mut conn = Connection::open_in_memory().unwrap();
    init_schema(&mut conn).unwrap();
    (conn, Session::new("ana").unwrap())
}

fn run_tx(conn: &Connection, session: &Session, args: &[&str]) {
    let mut argv = vec!["keuangan", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(conn, session, &Config::default(), tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }
}

fn list_rows(conn: &Connection, session: &Session, args: &[&str]) -> Vec<keuangan::models::Transaction> {
    let mut argv = vec!["keuangan", "tx", "list"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    transactions::query_rows(conn, session, list_m).unwrap()
}

#[test]
fn add_then_list_newest_first() {
    let (conn, session) = setup();
    for (day, amount) in [("2025-03-01", "100.000"), ("2025-03-03", "300000"), ("2025-03-02", "200,000")] {
        run_tx(
            &conn,
            &session,
            &["add", "-t", "expense", "-c", "living", "-a", amount, "-d", day],
        );
    }
    run_tx(
        &conn,
        &session,
        &["add", "-t", "income", "-c", "salary", "-a", "6000000", "-d", "2025-02-25"],
    );

    let rows = list_rows(&conn, &session, &["--month", "2025-03"]);
    let amounts: Vec<i64> = rows.iter().map(|t| t.amount).collect();
    assert_eq!(amounts, vec![300_000, 200_000, 100_000]);

    let limited = list_rows(&conn, &session, &["--month", "2025-03", "--limit", "2"]);
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].date, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
}

#[test]
fn list_filters_by_type_and_category() {
    let (conn, session) = setup();
    run_tx(&conn, &session, &["add", "-t", "expense", "-c", "playing", "-a", "50000", "-d", "2025-04-02"]);
    run_tx(&conn, &session, &["add", "-t", "expense", "-c", "living", "-a", "70000", "-d", "2025-04-03"]);
    run_tx(&conn, &session, &["add", "-t", "income", "-c", "saving", "-a", "90000", "-d", "2025-04-04"]);

    let expenses = list_rows(&conn, &session, &["-m", "2025-04", "--type", "expense"]);
    assert_eq!(expenses.len(), 2);
    let saving = list_rows(&conn, &session, &["-m", "2025-04", "--category", "saving"]);
    assert_eq!(saving.len(), 1);
    assert_eq!(saving[0].kind, TxType::Income);
}

#[test]
fn edit_changes_fields_but_not_identity() {
    let (conn, session) = setup();
    run_tx(&conn, &session, &["add", "-t", "expense", "-c", "living", "-a", "10000", "-d", "2025-03-01"]);
    let original = load_transactions(&conn, &session.username).unwrap().remove(0);
    let id = original.id.to_string();
    run_tx(&conn, &session, &["edit", id.as_str(), "-c", "playing", "--description", "Cinema"]);

    let edited = find_transaction(&conn, &session.username, original.id)
        .unwrap()
        .unwrap();
    assert_eq!(edited.category, Category::Playing);
    assert_eq!(edited.amount, 10_000);
    assert_eq!(edited.description.as_deref(), Some("Cinema"));
    assert_eq!(edited.created_at, original.created_at);
}

#[test]
fn remove_deletes_and_missing_id_errors() {
    let (conn, session) = setup();
    run_tx(&conn, &session, &["add", "-t", "expense", "-c", "living", "-a", "10000", "-d", "2025-03-01"]);
    let id = load_transactions(&conn, &session.username).unwrap()[0].id.to_string();
    run_tx(&conn, &session, &["rm", id.as_str()]);
    assert!(load_transactions(&conn, &session.username).unwrap().is_empty());

    let matches = cli::build_cli().get_matches_from(["keuangan", "tx", "rm", id.as_str()]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    assert!(transactions::handle(&conn, &session, &Config::default(), tx_m).is_err());
}

#[test]
fn recent_returns_last_five_created() {
    let (conn, session) = setup();
    for i in 1..=7 {
        let amount = (i * 1000).to_string();
        run_tx(&conn, &session, &["add", "-t", "expense", "-c", "living", "-a", amount.as_str(), "-d", "2025-03-01"]);
    }
    let rows = transactions::recent_rows(&conn, &session).unwrap();
    let amounts: Vec<i64> = rows.iter().map(|t| t.amount).collect();
    assert_eq!(amounts, vec![7000, 6000, 5000, 4000, 3000]);
}

#[test]
fn monthly_salary_is_added_once() {
    let (conn, session) = setup();
    let budget = BudgetConfig::default();
    let on = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
    let now = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();

    let first = transactions::ensure_monthly_salary(&conn, &session, &budget, "2025-05", on, now)
        .unwrap()
        .unwrap();
    assert_eq!(first.amount, 6_000_000);
    assert_eq!(first.category, Category::Salary);
    assert_eq!(first.description.as_deref(), Some(transactions::SALARY_DESCRIPTION));

    let again = transactions::ensure_monthly_salary(&conn, &session, &budget, "2025-05", on, now).unwrap();
    assert!(again.is_none());
    assert_eq!(cache::load_transactions(&conn, "ana").unwrap().len(), 1);

    let june = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let next = transactions::ensure_monthly_salary(&conn, &session, &budget, "2025-06", june, now).unwrap();
    assert!(next.is_some());
}

#[test]
fn expense_with_income_category_is_rejected() {
    let (conn, session) = setup();
    let matches = cli::build_cli().get_matches_from([
        "keuangan", "tx", "add", "-t", "expense", "-c", "bonus", "-a", "1000",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    assert!(transactions::handle(&conn, &session, &Config::default(), tx_m).is_err());
    assert!(load_transactions(&conn, "ana").unwrap().is_empty());
}
