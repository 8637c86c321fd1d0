// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::print_sync;
use crate::analytics::resolve_targets;
use crate::cache::{load_budget, save_budget};
use crate::config::Config;
use crate::models::{Allocation, BudgetConfig, Category, Percentages};
use crate::remote::{SyncOutcome, best_effort};
use crate::session::Session;
use crate::utils::{fmt_rupiah, maybe_print_json, parse_amount, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(
    conn: &Connection,
    session: &Session,
    config: &Config,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, session, sub)?,
        Some(("set-percent", sub)) => set_percent(conn, session, config, sub)?,
        Some(("set-amount", sub)) => set_amount(conn, session, config, sub)?,
        Some(("salary", sub)) => set_salary(conn, session, config, sub)?,
        _ => {}
    }
    Ok(())
}

/// Writes the budget to the cache, then pushes it to the backend if one is configured.
pub fn save_and_sync(
    conn: &Connection,
    session: &Session,
    config: &Config,
    budget: &BudgetConfig,
) -> Result<SyncOutcome> {
    save_budget(conn, &session.username, budget)?;
    Ok(best_effort(config, "budget", |c| {
        c.save_budget(&session.username, budget)
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetView {
    pub salary: i64,
    pub pinned: bool,
    pub percentages: Percentages,
    pub targets: Allocation,
    pub total_percent: i64,
}

pub fn view(budget: &BudgetConfig) -> BudgetView {
    BudgetView {
        salary: budget.salary,
        pinned: budget.amounts.is_some(),
        percentages: budget.display_percentages(),
        targets: resolve_targets(budget),
        total_percent: budget.total_percent(),
    }
}

fn print_budget(budget: &BudgetConfig) {
    let v = view(budget);
    let rows = Category::BUCKETS
        .iter()
        .map(|&c| {
            vec![
                format!("{} {}", c.icon(), c.label()),
                c.purpose().to_string(),
                format!("{}%", v.percentages.get(c)),
                fmt_rupiah(v.targets.get(c)),
            ]
        })
        .collect();
    println!("Salary: {}", fmt_rupiah(v.salary));
    println!(
        "{}",
        pretty_table(&["Category", "Purpose", "Share", "Target"], rows)
    );
    if v.total_percent != 100 {
        println!("⚠️  Total is {}%, not 100%", v.total_percent);
    } else {
        println!("Total: 100%");
    }
}

fn show(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let budget = load_budget(conn, &session.username)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view(&budget))? {
        print_budget(&budget);
    }
    Ok(())
}

fn salary_or_current(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<i64> {
    match sub.get_one::<String>("salary") {
        Some(s) => parse_amount(s),
        None => Ok(load_budget(conn, &session.username)?.salary),
    }
}

fn set_percent(
    conn: &Connection,
    session: &Session,
    config: &Config,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let salary = salary_or_current(conn, session, sub)?;
    let pct = Percentages {
        living: *sub.get_one::<i64>("living").unwrap(),
        saving: *sub.get_one::<i64>("saving").unwrap(),
        playing: *sub.get_one::<i64>("playing").unwrap(),
        emergency: sub.get_one::<i64>("emergency").copied(),
    };
    let budget = BudgetConfig::from_percentages(salary, pct);
    let outcome = save_and_sync(conn, session, config, &budget)?;
    println!("Budget saved successfully!");
    print_budget(&budget);
    print_sync(&outcome);
    Ok(())
}

fn set_amount(
    conn: &Connection,
    session: &Session,
    config: &Config,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let salary = salary_or_current(conn, session, sub)?;
    let amt = |k: &str| parse_amount(sub.get_one::<String>(k).unwrap());
    let amounts = Allocation {
        living: amt("living")?,
        saving: amt("saving")?,
        playing: amt("playing")?,
        emergency: amt("emergency")?,
    };
    let budget = BudgetConfig::pinned(salary, amounts);
    let outcome = save_and_sync(conn, session, config, &budget)?;
    println!("Budget saved successfully!");
    print_budget(&budget);
    print_sync(&outcome);
    Ok(())
}

fn set_salary(
    conn: &Connection,
    session: &Session,
    config: &Config,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let salary = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let budget = load_budget(conn, &session.username)?.with_salary(salary);
    let outcome = save_and_sync(conn, session, config, &budget)?;
    println!("Salary updated successfully!");
    print_budget(&budget);
    print_sync(&outcome);
    Ok(())
}
