// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use keuangan::cache::load_budget;
use keuangan::commands::budget;
use keuangan::config::Config;
use keuangan::db::init_schema;
use keuangan::models::{Allocation, BudgetConfig, Percentages};
use keuangan::session::Session;
use keuangan::cli;
use rusqlite::Connection;
use serde_json::json;

fn setup() -> (Connection, Session) {
    let mut conn = Connection::open_in_memory().unwrap();
    init_schema(&mut conn).unwrap();
    (conn, Session::new("ana").unwrap())
}

fn run_budget(conn: &Connection, session: &Session, args: &[&str]) {
    let mut argv = vec!["keuangan", "budget"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("budget", b_m)) = matches.subcommand() {
        budget::handle(conn, session, &Config::default(), b_m).unwrap();
    } else {
        panic!("no budget subcommand");
    }
}

#[test]
fn set_percent_stores_derived_amounts() {
    let (conn, session) = setup();
    run_budget(
        &conn,
        &session,
        &["set-percent", "--living", "40", "--saving", "40", "--playing", "10", "--salary", "10.000.000"],
    );
    let b = load_budget(&conn, "ana").unwrap();
    assert_eq!(b.salary, 10_000_000);
    assert_eq!(b.percentages.emergency, None);
    assert_eq!(
        b.amounts,
        Some(Allocation {
            living: 4_000_000,
            saving: 4_000_000,
            playing: 1_000_000,
            emergency: 1_000_000,
        })
    );
    assert_eq!(budget::view(&b).total_percent, 100);
}

#[test]
fn salary_change_keeps_pinned_amounts() {
    let (conn, session) = setup();
    run_budget(
        &conn,
        &session,
        &[
            "set-amount", "--living", "3000000", "--saving", "1500000", "--playing", "1000000",
            "--emergency", "500000",
        ],
    );
    let before = load_budget(&conn, "ana").unwrap();
    assert_eq!(before.salary, 6_000_000);

    run_budget(&conn, &session, &["salary", "12000000"]);
    let after = load_budget(&conn, "ana").unwrap();
    assert_eq!(after.salary, 12_000_000);
    assert_eq!(after.amounts, before.amounts);
    // percentages follow the new salary for display only
    assert_eq!(after.display_percentages().living, 25);
    assert_eq!(after.total_percent(), 50);
}

#[test]
fn salary_change_on_percentage_budget_rescales_targets() {
    let b = BudgetConfig::default().with_salary(10_000_000);
    assert_eq!(b.amounts, None);
    assert_eq!(keuangan::analytics::resolve_targets(&b).living, 5_000_000);
}

#[test]
fn reset_default_is_pinned_default_split() {
    let b = BudgetConfig::reset_default();
    assert_eq!(b.salary, 6_000_000);
    assert_eq!(b.percentages, Percentages::default());
    assert_eq!(b.amounts.map(|a| a.total()), Some(6_000_000));
}

#[test]
fn budget_wire_shape_uses_gaji() {
    let b = BudgetConfig::pinned(
        4_000_000,
        Allocation {
            living: 2_000_000,
            saving: 1_000_000,
            playing: 500_000,
            emergency: 500_000,
        },
    );
    let v = serde_json::to_value(&b).unwrap();
    assert_eq!(v["gaji"], json!(4_000_000));
    assert_eq!(v["livingAmt"], json!(2_000_000));
    assert_eq!(v["living"], json!(50));

    let back: BudgetConfig = serde_json::from_value(v).unwrap();
    assert_eq!(back, b);
}

#[test]
fn percentage_only_record_has_no_amounts() {
    let b: BudgetConfig = serde_json::from_value(json!({
        "gaji": 6000000, "living": 50, "saving": 30, "playing": 10
    }))
    .unwrap();
    assert_eq!(b.amounts, None);
    assert_eq!(b.percentages.emergency_or_default(), 10);
}

#[test]
fn partial_amounts_are_rejected() {
    let r = serde_json::from_value::<BudgetConfig>(json!({
        "gaji": 6000000, "living": 50, "saving": 30, "playing": 10,
        "livingAmt": 3000000
    }));
    assert!(r.is_err());
}

#[test]
fn percentages_outside_zero_to_hundred_are_rejected() {
    for bad in ["--living=150", "--living=-50"] {
        let r = cli::build_cli().try_get_matches_from([
            "keuangan", "budget", "set-percent", bad, "--saving", "30", "--playing", "10",
        ]);
        assert!(r.is_err(), "{} accepted", bad);
    }
    let r = cli::build_cli().try_get_matches_from([
        "keuangan", "budget", "set-percent", "--living", "50", "--saving", "30", "--playing", "10",
        "--emergency=101",
    ]);
    assert!(r.is_err());
}

#[test]
fn large_shares_do_not_overflow() {
    let b = BudgetConfig::from_percentages(
        6_000_000,
        Percentages {
            living: 10_000_000_000_000,
            saving: 0,
            playing: 0,
            emergency: Some(0),
        },
    );
    assert_eq!(b.amounts.map(|a| a.living), Some(600_000_000_000_000_000));
    assert_eq!(keuangan::models::share_of(i64::MAX, i64::MAX), i64::MAX);
    assert_eq!(keuangan::models::share_of(i64::MAX, -100), -i64::MAX);
}

#[test]
fn oversized_budget_record_is_rejected() {
    let r = serde_json::from_value::<BudgetConfig>(json!({
        "gaji": 2_000_000_000_000_000_000_i64, "living": 50, "saving": 30, "playing": 10
    }));
    assert!(r.is_err());
}
