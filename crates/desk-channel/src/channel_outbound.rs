//! Outbound delivery and file retrieval against the Telegram Bot API.
//!
//! Payload shaping is kept in pure builders so tests can assert request
//! bodies without a network; the client applies the bounded timeout and
//! surfaces non-success statuses with their response bodies.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::{json, Value};

pub const TELEGRAM_SAFE_MAX_CHARS: usize = 4096;
const DEFAULT_HTTP_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone)]
/// Connection settings for the Bot API client.
pub struct ChannelOutboundConfig {
    pub api_base: String,
    pub bot_token: String,
    pub http_timeout_ms: u64,
}

impl Default for ChannelOutboundConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org".to_string(),
            bot_token: String::new(),
            http_timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Reply keyboard attached to an outbound message.
pub enum ReplyKeyboard {
    Rows(Vec<Vec<String>>),
    Remove,
    None,
}

pub fn build_send_message_body(chat_id: &str, text: &str, keyboard: &ReplyKeyboard) -> Value {
    let mut body = json!({
        "chat_id": chat_id,
        "text": text,
        "disable_web_page_preview": true
    });
    match keyboard {
        ReplyKeyboard::Rows(rows) => {
            let rendered = rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|label| json!({ "text": label }))
                        .collect::<Vec<Value>>()
                })
                .collect::<Vec<Vec<Value>>>();
            body["reply_markup"] = json!({
                "keyboard": rendered,
                "resize_keyboard": true
            });
        }
        ReplyKeyboard::Remove => {
            body["reply_markup"] = json!({ "remove_keyboard": true });
        }
        ReplyKeyboard::None => {}
    }
    body
}

#[derive(Debug, Clone)]
/// HTTP client for the Bot API with a bounded per-request timeout.
pub struct ChannelClient {
    client: reqwest::Client,
    config: ChannelOutboundConfig,
}

impl ChannelClient {
    pub fn new(config: ChannelOutboundConfig) -> Result<Self> {
        if config.bot_token.trim().is_empty() {
            bail!("channel bot token cannot be empty");
        }
        if config.api_base.trim().is_empty() {
            bail!("channel api base cannot be empty");
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms.max(1)))
            .build()
            .context("failed to build channel http client")?;
        Ok(Self { client, config })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token.trim(),
            method
        )
    }

    fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token.trim(),
            file_path.trim_start_matches('/')
        )
    }

    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        keyboard: &ReplyKeyboard,
    ) -> Result<()> {
        let text_chars = text.chars().count();
        if text_chars > TELEGRAM_SAFE_MAX_CHARS {
            bail!(
                "message of {} chars exceeds the provider limit of {}",
                text_chars,
                TELEGRAM_SAFE_MAX_CHARS
            );
        }
        let body = build_send_message_body(chat_id, text, keyboard);
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .context("sendMessage transport error")?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!(
                "sendMessage failed with status {}: {}",
                status.as_u16(),
                detail
            );
        }
        Ok(())
    }

    /// Fetches pending updates at `offset`, long-polling up to `timeout_secs`.
    pub async fn get_updates(&self, offset: u64, timeout_secs: u64) -> Result<Vec<Value>> {
        let response = self
            .client
            .get(self.method_url("getUpdates"))
            .query(&[
                ("timeout", timeout_secs.to_string()),
                ("offset", offset.to_string()),
            ])
            .send()
            .await
            .context("getUpdates transport error")?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!(
                "getUpdates failed with status {}: {}",
                status.as_u16(),
                detail
            );
        }
        let payload = response
            .json::<Value>()
            .await
            .context("getUpdates response parse error")?;
        let updates = payload
            .get("result")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("getUpdates response missing result[]"))?;
        Ok(updates.clone())
    }

    /// Resolves a `file_id` through `getFile` and downloads its bytes.
    pub async fn download_file(&self, file_id: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .post(self.method_url("getFile"))
            .json(&json!({ "file_id": file_id }))
            .send()
            .await
            .context("getFile transport error")?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("getFile failed with status {}: {}", status.as_u16(), detail);
        }
        let payload = response
            .json::<Value>()
            .await
            .context("getFile response parse error")?;
        let file_path = payload
            .get("result")
            .and_then(|result| result.get("file_path"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| anyhow!("getFile response missing result.file_path"))?;

        let download = self
            .client
            .get(self.file_url(file_path))
            .send()
            .await
            .context("file download transport error")?;
        let status = download.status();
        if !status.is_success() {
            bail!("file download failed with status {}", status.as_u16());
        }
        let bytes = download
            .bytes()
            .await
            .context("file download read error")?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn build_client(base: &str) -> ChannelClient {
        ChannelClient::new(ChannelOutboundConfig {
            api_base: base.to_string(),
            bot_token: "bot-token".to_string(),
            http_timeout_ms: 2_000,
        })
        .expect("client")
    }

    #[test]
    fn unit_build_send_message_body_renders_keyboard_rows() {
        let keyboard = ReplyKeyboard::Rows(vec![
            vec!["Київ".to_string()],
            vec!["Назад".to_string()],
        ]);
        let body = build_send_message_body("chat-1", "Оберіть ваш Підрозділ:", &keyboard);
        assert_eq!(body["chat_id"], "chat-1");
        assert_eq!(body["reply_markup"]["resize_keyboard"], true);
        assert_eq!(body["reply_markup"]["keyboard"][0][0]["text"], "Київ");
        assert_eq!(body["reply_markup"]["keyboard"][1][0]["text"], "Назад");
    }

    #[test]
    fn unit_build_send_message_body_renders_keyboard_removal() {
        let body = build_send_message_body("chat-1", "done", &ReplyKeyboard::Remove);
        assert_eq!(body["reply_markup"]["remove_keyboard"], true);
    }

    #[test]
    fn unit_build_send_message_body_omits_markup_when_no_keyboard() {
        let body = build_send_message_body("chat-1", "plain", &ReplyKeyboard::None);
        assert!(body.get("reply_markup").is_none());
    }

    #[test]
    fn unit_channel_client_rejects_empty_token() {
        let error = ChannelClient::new(ChannelOutboundConfig::default()).expect_err("empty token");
        assert!(error.to_string().contains("bot token"));
    }

    #[tokio::test]
    async fn functional_send_message_posts_body_to_bot_endpoint() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/botbot-token/sendMessage")
                .json_body_includes(json!({ "chat_id": "100", "text": "hello" }).to_string());
            then.status(200).body(r#"{"ok":true,"result":{}}"#);
        });
        let client = build_client(&server.base_url());
        client
            .send_message("100", "hello", &ReplyKeyboard::None)
            .await
            .expect("send");
        mock.assert();
    }

    #[tokio::test]
    async fn functional_download_file_follows_get_file_path() {
        let server = MockServer::start();
        let get_file = server.mock(|when, then| {
            when.method(POST).path("/botbot-token/getFile");
            then.status(200)
                .body(r#"{"ok":true,"result":{"file_id":"f-1","file_path":"documents/trace.log"}}"#);
        });
        let download = server.mock(|when, then| {
            when.method(GET).path("/file/botbot-token/documents/trace.log");
            then.status(200).body("file-bytes");
        });
        let client = build_client(&server.base_url());
        let bytes = client.download_file("f-1").await.expect("download");
        assert_eq!(bytes, b"file-bytes".to_vec());
        get_file.assert();
        download.assert();
    }

    #[tokio::test]
    async fn regression_send_message_surfaces_status_and_body_on_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/botbot-token/sendMessage");
            then.status(403).body(r#"{"ok":false,"description":"bot was blocked"}"#);
        });
        let client = build_client(&server.base_url());
        let error = client
            .send_message("100", "hello", &ReplyKeyboard::None)
            .await
            .expect_err("blocked");
        let message = error.to_string();
        assert!(message.contains("403"));
        assert!(message.contains("bot was blocked"));
    }

    #[tokio::test]
    async fn regression_get_updates_requires_result_array() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/botbot-token/getUpdates");
            then.status(200).body(r#"{"ok":true}"#);
        });
        let client = build_client(&server.base_url());
        let error = client.get_updates(0, 0).await.expect_err("missing result");
        assert!(error.to_string().contains("missing result[]"));
    }
}
