// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cache::{clear_setting, get_setting, set_setting};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use std::env;

pub const API_URL_ENV: &str = "KEUANGAN_API_URL";
pub const LOG_ENV: &str = "KEUANGAN_LOG";
const API_URL_KEY: &str = "api_url";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Spreadsheet backend endpoint; `None` keeps everything local.
    pub api_url: Option<String>,
}

impl Config {
    /// Stored settings, with `KEUANGAN_API_URL` taking precedence.
    pub fn load(conn: &Connection) -> Result<Self> {
        let api_url = match env::var(API_URL_ENV) {
            Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
            _ => get_setting(conn, API_URL_KEY)?,
        };
        Ok(Config { api_url })
    }

    pub fn is_remote(&self) -> bool {
        self.api_url.is_some()
    }
}

pub fn validate_api_url(url: &str) -> Result<String> {
    let url = url.trim();
    let parsed = reqwest::Url::parse(url).map_err(|e| anyhow!("Invalid API URL '{}': {}", url, e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(url.to_string()),
        other => Err(anyhow!("Unsupported scheme '{}' in API URL", other)),
    }
}

pub fn set_api_url(conn: &Connection, url: &str) -> Result<String> {
    let url = validate_api_url(url)?;
    set_setting(conn, API_URL_KEY, &url)?;
    Ok(url)
}

pub fn clear_api_url(conn: &Connection) -> Result<()> {
    clear_setting(conn, API_URL_KEY)
}
