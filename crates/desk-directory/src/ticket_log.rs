//! Append-only ticket log over the row-store boundary.
//!
//! One row per created ticket; status cells are updated in place by ticket
//! id. Log failures must never break the dialogue, so callers log and move
//! on.

use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use desk_core::{current_unix_timestamp, format_unix_timestamp};

pub const TICKET_LOG_OPEN_STATUS: &str = "Open";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// One row of the ticket log.
pub struct TicketLogRow {
    pub ticket_id: String,
    pub user_id: String,
    pub chat_id: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub username: String,
}

impl TicketLogRow {
    /// Builds a fresh `Open` row stamped with the current UTC time.
    pub fn opened(ticket_id: &str, user_id: &str, chat_id: &str, username: &str) -> Self {
        Self {
            ticket_id: ticket_id.to_string(),
            user_id: user_id.to_string(),
            chat_id: chat_id.to_string(),
            created_at: format_unix_timestamp(current_unix_timestamp()),
            status: TICKET_LOG_OPEN_STATUS.to_string(),
            username: username.to_string(),
        }
    }
}

#[async_trait]
/// Trait contract for ticket-log row-store access.
pub trait TicketLog: Send + Sync {
    async fn append(&self, row: TicketLogRow) -> Result<()>;
    async fn update_status(&self, ticket_id: &str, status: &str) -> Result<()>;
    async fn tickets_for_user(&self, user_id: &str) -> Result<Vec<TicketLogRow>>;
}

#[derive(Debug, Default)]
/// Process-local ticket log.
pub struct InMemoryTicketLog {
    rows: Mutex<Vec<TicketLogRow>>,
}

impl InMemoryTicketLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<TicketLogRow> {
        self.rows.lock().expect("ticket log lock").clone()
    }
}

#[async_trait]
impl TicketLog for InMemoryTicketLog {
    async fn append(&self, row: TicketLogRow) -> Result<()> {
        self.rows.lock().expect("ticket log lock").push(row);
        Ok(())
    }

    async fn update_status(&self, ticket_id: &str, status: &str) -> Result<()> {
        let mut rows = self.rows.lock().expect("ticket log lock");
        let Some(row) = rows
            .iter_mut()
            .find(|row| row.ticket_id.trim() == ticket_id.trim())
        else {
            bail!("ticket id '{ticket_id}' not found in ticket log");
        };
        row.status = status.to_string();
        Ok(())
    }

    async fn tickets_for_user(&self, user_id: &str) -> Result<Vec<TicketLogRow>> {
        let rows = self.rows.lock().expect("ticket log lock");
        Ok(rows
            .iter()
            .filter(|row| row.user_id.trim() == user_id.trim())
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone)]
/// Ticket log backed by the external row-store HTTP service.
pub struct HttpTicketLog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTicketLog {
    pub fn new(base_url: &str, http_timeout_ms: u64) -> Result<Self> {
        if base_url.trim().is_empty() {
            bail!("ticket log base url cannot be empty");
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(http_timeout_ms.max(1)))
            .build()
            .context("failed to build ticket log http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn rows_url(&self) -> String {
        format!("{}/tickets/rows", self.base_url)
    }
}

#[async_trait]
impl TicketLog for HttpTicketLog {
    async fn append(&self, row: TicketLogRow) -> Result<()> {
        let response = self
            .client
            .post(self.rows_url())
            .json(&row)
            .send()
            .await
            .context("ticket log append transport error")?;
        let status = response.status();
        if !status.is_success() {
            bail!("ticket log append failed with status {}", status.as_u16());
        }
        Ok(())
    }

    async fn update_status(&self, ticket_id: &str, status: &str) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/{}/status", self.rows_url(), ticket_id.trim()))
            .json(&json!({ "value": status }))
            .send()
            .await
            .context("ticket log status update transport error")?;
        let http_status = response.status();
        if !http_status.is_success() {
            bail!(
                "ticket log status update failed with status {}",
                http_status.as_u16()
            );
        }
        Ok(())
    }

    async fn tickets_for_user(&self, user_id: &str) -> Result<Vec<TicketLogRow>> {
        let response = self
            .client
            .get(self.rows_url())
            .query(&[("user_id", user_id.trim())])
            .send()
            .await
            .context("ticket log scan transport error")?;
        let status = response.status();
        if !status.is_success() {
            bail!("ticket log scan failed with status {}", status.as_u16());
        }
        let payload = response
            .json::<Value>()
            .await
            .context("ticket log scan parse error")?;
        let rows = payload.get("rows").cloned().unwrap_or_else(|| json!([]));
        serde_json::from_value::<Vec<TicketLogRow>>(rows)
            .context("ticket log rows must deserialize into row objects")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn unit_in_memory_log_appends_and_scans_by_user() {
        let log = InMemoryTicketLog::new();
        log.append(TicketLogRow::opened("SUP-1", "100", "100", "ops"))
            .await
            .expect("append");
        log.append(TicketLogRow::opened("SUP-2", "200", "200", "other"))
            .await
            .expect("append");
        let rows = log.tickets_for_user("100").await.expect("scan");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ticket_id, "SUP-1");
        assert_eq!(rows[0].status, TICKET_LOG_OPEN_STATUS);
        assert!(!rows[0].created_at.is_empty());
    }

    #[tokio::test]
    async fn unit_in_memory_log_updates_status_by_ticket_id() {
        let log = InMemoryTicketLog::new();
        log.append(TicketLogRow::opened("SUP-1", "100", "100", "ops"))
            .await
            .expect("append");
        log.update_status("SUP-1", "Готово").await.expect("update");
        assert_eq!(log.snapshot()[0].status, "Готово");
    }

    #[tokio::test]
    async fn regression_in_memory_log_status_update_requires_known_ticket() {
        let log = InMemoryTicketLog::new();
        let error = log
            .update_status("SUP-404", "Готово")
            .await
            .expect_err("unknown ticket");
        assert!(error.to_string().contains("SUP-404"));
    }

    #[tokio::test]
    async fn integration_http_log_round_trips_rows() {
        let server = MockServer::start();
        let append_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/tickets/rows")
                .json_body_includes(json!({ "ticket_id": "SUP-1", "user_id": "100" }).to_string());
            then.status(200).body("{}");
        });
        let scan_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/tickets/rows")
                .query_param("user_id", "100");
            then.status(200).body(
                r#"{"rows":[{"ticket_id":"SUP-1","user_id":"100","chat_id":"100","created_at":"2025-10-10 12:40:00","status":"Open","username":"ops"}]}"#,
            );
        });

        let log = HttpTicketLog::new(&server.base_url(), 2_000).expect("client");
        log.append(TicketLogRow::opened("SUP-1", "100", "100", "ops"))
            .await
            .expect("append");
        let rows = log.tickets_for_user("100").await.expect("scan");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ticket_id, "SUP-1");
        append_mock.assert();
        scan_mock.assert();
    }
}
