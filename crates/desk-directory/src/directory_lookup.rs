//! Identity resolution against the directory row store.
//!
//! Resolution order is id, then username (case-insensitive), then normalized
//! phone; the first match wins. Back-fill writes populate only cells that are
//! empty in the matched row, so repeated lookups are harmless.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// One row of the directory table.
pub struct DirectoryRow {
    #[serde(default)]
    pub chat_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub division: String,
    #[serde(default)]
    pub department: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Resolved identity used to pre-fill and skip form steps.
pub struct DirectoryProfile {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub division: String,
    #[serde(default)]
    pub department: String,
}

impl DirectoryProfile {
    fn from_row(row: &DirectoryRow) -> Self {
        Self {
            full_name: row.full_name.trim().to_string(),
            division: row.division.trim().to_string(),
            department: row.department.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates directory cells that back-fill may write.
pub enum DirectoryField {
    ChatId,
    Username,
}

impl DirectoryField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChatId => "chat_id",
            Self::Username => "username",
        }
    }
}

#[async_trait]
/// Trait contract for directory row-store access.
pub trait DirectoryStore: Send + Sync {
    async fn rows(&self) -> Result<Vec<DirectoryRow>>;
    async fn update_cell(&self, row_index: usize, field: DirectoryField, value: &str)
        -> Result<()>;
}

/// Strips the leading `+` and all whitespace from a phone number.
pub fn normalize_phone(raw: &str) -> String {
    raw.trim()
        .strip_prefix('+')
        .unwrap_or(raw.trim())
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .collect()
}

/// Resolves a chat identity to a directory profile, back-filling identity
/// cells the matched row is missing.
pub async fn identify_profile(
    store: &dyn DirectoryStore,
    chat_user_id: &str,
    username: &str,
    phone: &str,
) -> Result<Option<DirectoryProfile>> {
    let rows = store.rows().await?;
    let chat_user_id = chat_user_id.trim();
    let username = username.trim();
    let normalized_phone = normalize_phone(phone);

    if !chat_user_id.is_empty() {
        if let Some(row) = rows.iter().find(|row| row.chat_id.trim() == chat_user_id) {
            return Ok(Some(DirectoryProfile::from_row(row)));
        }
    }

    if !username.is_empty() {
        let matched = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.username.trim().eq_ignore_ascii_case(username));
        if let Some((index, row)) = matched {
            if row.chat_id.trim().is_empty() && !chat_user_id.is_empty() {
                store
                    .update_cell(index, DirectoryField::ChatId, chat_user_id)
                    .await?;
            }
            return Ok(Some(DirectoryProfile::from_row(row)));
        }
    }

    if !normalized_phone.is_empty() {
        let matched = rows
            .iter()
            .enumerate()
            .find(|(_, row)| normalize_phone(&row.phone) == normalized_phone);
        if let Some((index, row)) = matched {
            if row.chat_id.trim().is_empty() && !chat_user_id.is_empty() {
                store
                    .update_cell(index, DirectoryField::ChatId, chat_user_id)
                    .await?;
            }
            if row.username.trim().is_empty() && !username.is_empty() {
                store
                    .update_cell(index, DirectoryField::Username, username)
                    .await?;
            }
            return Ok(Some(DirectoryProfile::from_row(row)));
        }
    }

    Ok(None)
}

#[derive(Debug, Default)]
/// Process-local directory store; rows live behind a mutex, writes are
/// counted so callers can observe back-fill activity.
pub struct InMemoryDirectory {
    rows: Mutex<Vec<DirectoryRow>>,
    update_count: AtomicUsize,
}

impl InMemoryDirectory {
    pub fn new(rows: Vec<DirectoryRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            update_count: AtomicUsize::new(0),
        }
    }

    pub fn update_count(&self) -> usize {
        self.update_count.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<DirectoryRow> {
        self.rows.lock().expect("directory rows lock").clone()
    }
}

#[async_trait]
impl DirectoryStore for InMemoryDirectory {
    async fn rows(&self) -> Result<Vec<DirectoryRow>> {
        Ok(self.rows.lock().expect("directory rows lock").clone())
    }

    async fn update_cell(
        &self,
        row_index: usize,
        field: DirectoryField,
        value: &str,
    ) -> Result<()> {
        let mut rows = self.rows.lock().expect("directory rows lock");
        let Some(row) = rows.get_mut(row_index) else {
            bail!("directory row index {row_index} is out of range");
        };
        match field {
            DirectoryField::ChatId => row.chat_id = value.to_string(),
            DirectoryField::Username => row.username = value.to_string(),
        }
        self.update_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug, Clone)]
/// Settings for the HTTP row-store service backing the directory.
pub struct HttpRowStoreConfig {
    pub base_url: String,
    pub http_timeout_ms: u64,
}

#[derive(Debug, Clone)]
/// Directory backed by the external row-store HTTP service.
pub struct HttpDirectory {
    client: reqwest::Client,
    config: HttpRowStoreConfig,
}

impl HttpDirectory {
    pub fn new(config: HttpRowStoreConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            bail!("directory base url cannot be empty");
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms.max(1)))
            .build()
            .context("failed to build directory http client")?;
        Ok(Self { client, config })
    }

    fn rows_url(&self) -> String {
        format!(
            "{}/directory/rows",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl DirectoryStore for HttpDirectory {
    async fn rows(&self) -> Result<Vec<DirectoryRow>> {
        let response = self
            .client
            .get(self.rows_url())
            .send()
            .await
            .context("directory rows transport error")?;
        let status = response.status();
        if !status.is_success() {
            bail!("directory rows request failed with status {}", status.as_u16());
        }
        let payload = response
            .json::<Value>()
            .await
            .context("directory rows parse error")?;
        let rows = payload
            .get("rows")
            .cloned()
            .unwrap_or_else(|| json!([]));
        serde_json::from_value::<Vec<DirectoryRow>>(rows)
            .context("directory rows must deserialize into row objects")
    }

    async fn update_cell(
        &self,
        row_index: usize,
        field: DirectoryField,
        value: &str,
    ) -> Result<()> {
        let body = json!({ "field": field.as_str(), "value": value });
        let response = self
            .client
            .post(format!("{}/{}", self.rows_url(), row_index))
            .json(&body)
            .send()
            .await
            .context("directory cell update transport error")?;
        let status = response.status();
        if !status.is_success() {
            bail!(
                "directory cell update failed with status {}",
                status.as_u16()
            );
        }
        Ok(())
    }
}
