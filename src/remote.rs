// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Client for the spreadsheet backend.
//!
//! Every call is a GET on the deployment URL with `action=<name>` and the
//! action's arguments as query parameters. Replies are JSON envelopes of the
//! form `{"success": bool, "error"?: str, "message"?: str, ...payload}`.

use crate::config::Config;
use crate::models::{BudgetConfig, Category, Transaction, TxType, check_amount};
use crate::utils::http_client;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use reqwest::Url;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("request to backend failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid backend URL: {0}")]
    Url(String),
    #[error("{0}")]
    Rejected(String),
    #[error("malformed response from backend: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Register,
    Login,
    GetBudget,
    SaveBudget,
    GetTransactions,
    AddTransaction,
    DeleteTransaction,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Register => "register",
            Action::Login => "login",
            Action::GetBudget => "getBudget",
            Action::SaveBudget => "saveBudget",
            Action::GetTransactions => "getTransactions",
            Action::AddTransaction => "addTransaction",
            Action::DeleteTransaction => "deleteTransaction",
        }
    }
}

pub fn action_url(base: &str, action: Action, params: &[(&str, String)]) -> Result<Url, RemoteError> {
    let pairs = std::iter::once(("action", action.as_str()))
        .chain(params.iter().map(|(k, v)| (*k, v.as_str())));
    Url::parse_with_params(base, pairs).map_err(|e| RemoteError::Url(e.to_string()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Envelope {
    /// Parses a reply body; `success: false` becomes [`RemoteError::Rejected`].
    pub fn parse(body: &str) -> Result<Self, RemoteError> {
        let env: Envelope =
            serde_json::from_str(body).map_err(|e| RemoteError::Malformed(e.to_string()))?;
        if !env.success {
            return Err(RemoteError::Rejected(
                env.error.unwrap_or_else(|| "request failed".to_string()),
            ));
        }
        Ok(env)
    }

    pub fn take<T: DeserializeOwned>(&mut self, key: &str) -> Result<T, RemoteError> {
        let v = self
            .payload
            .remove(key)
            .ok_or_else(|| RemoteError::Malformed(format!("missing '{}'", key)))?;
        serde_json::from_value(v).map_err(|e| RemoteError::Malformed(format!("{}: {}", key, e)))
    }
}

/// Spreadsheet cells come back as JSON numbers (sometimes fractional) or strings.
fn de_whole<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    match Value::deserialize(d)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .ok_or_else(|| de::Error::custom(format!("number out of range: {}", n))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(|f| f.round() as i64)
            .map_err(|_| de::Error::custom(format!("not a number: '{}'", s))),
        other => Err(de::Error::custom(format!("expected a number, got {}", other))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteUser {
    pub username: String,
    #[serde(rename = "gaji", deserialize_with = "de_whole")]
    pub salary: i64,
}

/// A transaction row as the backend returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTransaction {
    #[serde(deserialize_with = "de_whole")]
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    #[serde(deserialize_with = "de_whole")]
    pub amount: i64,
    pub date: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl TryFrom<WireTransaction> for Transaction {
    type Error = anyhow::Error;

    fn try_from(w: WireTransaction) -> anyhow::Result<Self> {
        // the sheet may hand back a full timestamp; only the date part is kept
        let day = w.date.get(..10).unwrap_or(&w.date);
        let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map_err(|e| anyhow::anyhow!("transaction {}: bad date '{}': {}", w.id, w.date, e))?;
        let created_at = w
            .created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_else(|| date.and_time(NaiveTime::MIN).and_utc());
        let amount = check_amount(w.amount)
            .map_err(|e| anyhow::anyhow!("transaction {}: {}", w.id, e))?;
        let kind: TxType = w.kind.parse()?;
        let category = w.category.parse::<Category>()?.normalized_for(kind);
        Ok(Transaction {
            id: w.id,
            kind,
            category,
            amount,
            date,
            description: w.description.filter(|d| !d.trim().is_empty()),
            created_at,
        })
    }
}

/// Blank sheet cells arrive as `""`; drop them so optional fields read as absent.
fn strip_blank_cells(v: Value) -> Value {
    match v {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !matches!(v, Value::String(s) if s.is_empty()))
                .collect(),
        ),
        other => other,
    }
}

pub struct RemoteClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl RemoteClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Ok(RemoteClient {
            base_url: base_url.to_string(),
            http: http_client()?,
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Option<Self>> {
        config.api_url.as_deref().map(Self::new).transpose()
    }

    pub fn call(&self, action: Action, params: &[(&str, String)]) -> Result<Envelope, RemoteError> {
        let url = action_url(&self.base_url, action, params)?;
        tracing::debug!(action = action.as_str(), "calling backend");
        let body = self.http.get(url).send()?.error_for_status()?.text()?;
        let env = Envelope::parse(&body);
        if let Err(ref e) = env {
            tracing::warn!(action = action.as_str(), error = %e, "backend call failed");
        }
        env
    }

    /// Creates the account; the backend also seeds a 50/30/10/10 budget and a salary entry.
    pub fn register(&self, username: &str, password: &str, salary: i64) -> Result<String, RemoteError> {
        let env = self.call(
            Action::Register,
            &[
                ("username", username.to_string()),
                ("password", password.to_string()),
                ("gaji", salary.to_string()),
            ],
        )?;
        Ok(env.message.unwrap_or_else(|| "Registration successful!".to_string()))
    }

    pub fn login(&self, username: &str, password: &str) -> Result<RemoteUser, RemoteError> {
        let mut env = self.call(
            Action::Login,
            &[
                ("username", username.to_string()),
                ("password", password.to_string()),
            ],
        )?;
        env.take("user")
    }

    pub fn get_budget(&self, username: &str) -> Result<BudgetConfig, RemoteError> {
        let mut env = self.call(Action::GetBudget, &[("username", username.to_string())])?;
        let raw: Value = env.take("budget")?;
        serde_json::from_value(strip_blank_cells(raw))
            .map_err(|e| RemoteError::Malformed(format!("budget: {}", e)))
    }

    pub fn save_budget(&self, username: &str, budget: &BudgetConfig) -> Result<(), RemoteError> {
        let json = serde_json::to_string(budget).map_err(|e| RemoteError::Malformed(e.to_string()))?;
        self.call(
            Action::SaveBudget,
            &[("username", username.to_string()), ("budget", json)],
        )?;
        Ok(())
    }

    /// Rows that cannot be read are logged and skipped.
    pub fn get_transactions(&self, username: &str) -> Result<Vec<Transaction>, RemoteError> {
        let mut env = self.call(Action::GetTransactions, &[("username", username.to_string())])?;
        let rows: Vec<Value> = env.take("transactions")?;
        Ok(decode_rows(rows))
    }

    pub fn add_transaction(&self, username: &str, tx: &Transaction) -> Result<(), RemoteError> {
        let json = serde_json::to_string(tx).map_err(|e| RemoteError::Malformed(e.to_string()))?;
        self.call(
            Action::AddTransaction,
            &[("username", username.to_string()), ("transaction", json)],
        )?;
        Ok(())
    }

    pub fn delete_transaction(&self, username: &str, id: i64) -> Result<(), RemoteError> {
        self.call(
            Action::DeleteTransaction,
            &[
                ("username", username.to_string()),
                ("transactionId", id.to_string()),
            ],
        )?;
        Ok(())
    }
}

pub fn decode_rows(rows: Vec<Value>) -> Vec<Transaction> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let decoded = serde_json::from_value::<WireTransaction>(strip_blank_cells(row))
            .map_err(anyhow::Error::from)
            .and_then(Transaction::try_from);
        match decoded {
            Ok(tx) => out.push(tx),
            Err(e) => tracing::warn!(error = %e, "skipping unreadable transaction row"),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum SyncOutcome {
    Synced,
    Skipped,
    Failed(String),
}

impl SyncOutcome {
    /// Line to show the user, if any. Failures are reported and never retried.
    pub fn notice(&self) -> Option<String> {
        match self {
            SyncOutcome::Synced => Some("Synced to cloud.".to_string()),
            SyncOutcome::Skipped => None,
            SyncOutcome::Failed(e) => Some(format!("Saved locally; cloud sync failed: {}", e)),
        }
    }
}

/// Runs `push` against the backend after a local write has already landed.
pub fn best_effort<F>(config: &Config, what: &str, push: F) -> SyncOutcome
where
    F: FnOnce(&RemoteClient) -> Result<(), RemoteError>,
{
    let client = match RemoteClient::from_config(config) {
        Ok(Some(c)) => c,
        Ok(None) => {
            tracing::debug!(what, "no backend configured, sync skipped");
            return SyncOutcome::Skipped;
        }
        Err(e) => return SyncOutcome::Failed(e.to_string()),
    };
    match push(&client) {
        Ok(()) => {
            tracing::info!(what, "synced to backend");
            SyncOutcome::Synced
        }
        Err(e) => {
            tracing::warn!(what, error = %e, "sync failed, keeping local copy");
            SyncOutcome::Failed(e.to_string())
        }
    }
}
