// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::check_amount;
use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};

const UA: &str = concat!("keuangan/", env!("CARGO_PKG_VERSION"));

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<String> {
    let s = s.trim();
    chrono::NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    if s.len() != 7 {
        return Err(anyhow!("Invalid month '{}', expected YYYY-MM", s));
    }
    Ok(s.to_string())
}

/// Whole rupiah up to [`crate::models::MAX_AMOUNT`]. `_`, `.` and `,` are accepted as
/// thousands separators.
pub fn parse_amount(s: &str) -> Result<i64> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '.' | ','))
        .collect();
    let v = cleaned
        .parse::<i64>()
        .with_context(|| format!("Invalid amount '{}'", s))?;
    Ok(check_amount(v)?)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn current_month() -> String {
    today().format("%Y-%m").to_string()
}

/// `1500000` -> `Rp 1.500.000`.
pub fn fmt_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("Rp -{}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
