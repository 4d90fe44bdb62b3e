use clap::Parser;

use desk_channel::ChannelConnectorMode;

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum CliConnectorMode {
    Polling,
    Webhook,
}

impl CliConnectorMode {
    pub(crate) fn to_channel_mode(self) -> ChannelConnectorMode {
        match self {
            Self::Polling => ChannelConnectorMode::Polling,
            Self::Webhook => ChannelConnectorMode::Webhook,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "desk-bot",
    about = "Telegram helpdesk bot that files user requests as tracker tickets",
    version
)]
pub(crate) struct CliArgs {
    /// Bot API token used for polling, sending, and file downloads.
    #[arg(long, env = "DESK_TELEGRAM_BOT_TOKEN")]
    pub telegram_bot_token: String,

    #[arg(
        long,
        env = "DESK_TELEGRAM_API_BASE",
        default_value = "https://api.telegram.org"
    )]
    pub telegram_api_base: String,

    #[arg(long, env = "DESK_CONNECTOR_MODE", value_enum, default_value = "polling")]
    pub connector_mode: CliConnectorMode,

    /// Bind address for the webhook listener (tracker route is always served).
    #[arg(long, env = "DESK_WEBHOOK_BIND", default_value = "127.0.0.1:8085")]
    pub webhook_bind: String,

    /// Secret token expected on inbound Telegram webhook calls.
    #[arg(long, env = "DESK_WEBHOOK_SECRET")]
    pub webhook_secret: Option<String>,

    #[arg(long, env = "DESK_POLL_TIMEOUT_SECS", default_value_t = 25)]
    pub poll_timeout_secs: u64,

    #[arg(long, env = "DESK_POLL_INTERVAL_MS", default_value_t = 500, value_parser = parse_positive_u64)]
    pub poll_interval_ms: u64,

    /// Bounded timeout applied to every outbound network call.
    #[arg(long, env = "DESK_HTTP_TIMEOUT_MS", default_value_t = 15_000, value_parser = parse_positive_u64)]
    pub http_timeout_ms: u64,

    #[arg(long, env = "DESK_TRACKER_BASE_URL")]
    pub tracker_base_url: String,

    #[arg(long, env = "DESK_TRACKER_EMAIL")]
    pub tracker_email: String,

    #[arg(long, env = "DESK_TRACKER_API_TOKEN")]
    pub tracker_api_token: String,

    #[arg(long, env = "DESK_TRACKER_PROJECT_KEY")]
    pub tracker_project_key: String,

    #[arg(long, env = "DESK_TRACKER_ISSUE_TYPE", default_value = "tgtask")]
    pub tracker_issue_type: String,

    #[arg(long, env = "DESK_TRACKER_REPORTER_ACCOUNT_ID")]
    pub tracker_reporter_account_id: Option<String>,

    /// Base URL of the directory row-store service; identity lookups are
    /// disabled when unset.
    #[arg(long, env = "DESK_DIRECTORY_BASE_URL")]
    pub directory_base_url: Option<String>,

    /// Base URL of the ticket-log row-store service; falls back to the
    /// process-local log when unset.
    #[arg(long, env = "DESK_TICKET_LOG_BASE_URL")]
    pub ticket_log_base_url: Option<String>,
}
