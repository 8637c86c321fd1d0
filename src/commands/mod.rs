// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod budget;
pub mod doctor;
pub mod exporter;
pub mod importer;
pub mod reports;
pub mod reset;
pub mod settings;
pub mod sync;
pub mod transactions;

use crate::remote::SyncOutcome;
use crate::utils::{current_month, parse_month};
use anyhow::Result;

/// `--month`, or the current month when absent.
pub(crate) fn month_or_current(sub: &clap::ArgMatches) -> Result<String> {
    match sub.get_one::<String>("month") {
        Some(m) => parse_month(m),
        None => Ok(current_month()),
    }
}

pub(crate) fn print_sync(outcome: &SyncOutcome) {
    if let Some(line) = outcome.notice() {
        println!("{}", line);
    }
}
