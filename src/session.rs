// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cache::{clear_setting, get_setting, set_setting};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

const CURRENT_USER_KEY: &str = "current_user";

/// The user every command acts on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
}

impl Session {
    pub fn new(username: &str) -> Result<Self> {
        let username = username.trim();
        if username.is_empty() {
            return Err(anyhow!("Username must not be empty"));
        }
        Ok(Session {
            username: username.to_string(),
        })
    }

    pub fn current(conn: &Connection) -> Result<Option<Self>> {
        Ok(get_setting(conn, CURRENT_USER_KEY)?.map(|username| Session { username }))
    }

    /// `--user` wins over the stored login.
    pub fn resolve(conn: &Connection, user_override: Option<&str>) -> Result<Self> {
        if let Some(u) = user_override {
            return Self::new(u);
        }
        Self::current(conn)?.ok_or_else(|| anyhow!("Not logged in. Run `keuangan login` first."))
    }

    pub fn start(conn: &Connection, username: &str) -> Result<Self> {
        let s = Self::new(username)?;
        set_setting(conn, CURRENT_USER_KEY, &s.username)?;
        Ok(s)
    }

    pub fn end(conn: &Connection) -> Result<()> {
        clear_setting(conn, CURRENT_USER_KEY)
    }
}
