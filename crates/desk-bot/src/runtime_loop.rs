//! The long-running event loop: poll or accept webhooks, route each signal
//! through the dialogue state machine, execute the planned side effect, and
//! reply. Unexpected errors are logged and answered with a generic failure
//! message; the loop itself never dies on a handler error.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use desk_channel::{
    poll_channel_updates, run_webhook_listener, ChannelClient, ChannelConnectorConfig,
    ChannelEventKind, ChannelInboundEvent, ChannelOutboundConfig, ChannelWebhookState,
    InboundSignal, ReplyKeyboard, TrackerCommentEvent,
};
use desk_dialog::dialog_texts as texts;
use desk_dialog::{
    apply_status_result, apply_ticket_created, apply_ticket_list, route_event, OutboundReply,
    RouterCommand, SessionRepository,
};
use desk_directory::{
    identify_profile, DirectoryProfile, DirectoryStore, HttpDirectory, HttpRowStoreConfig,
    HttpTicketLog, InMemoryTicketLog, TicketLog, TicketLogRow,
};
use desk_tracker::{TrackerClient, TrackerConfig};

use crate::cli_args::CliArgs;

/// Everything one inbound signal needs: transport, gateway, stores, sessions.
pub(crate) struct BotRuntime {
    channel: ChannelClient,
    tracker: TrackerClient,
    directory: Option<Arc<dyn DirectoryStore>>,
    ticket_log: Arc<dyn TicketLog>,
    sessions: SessionRepository,
}

impl BotRuntime {
    pub(crate) fn new(
        channel: ChannelClient,
        tracker: TrackerClient,
        directory: Option<Arc<dyn DirectoryStore>>,
        ticket_log: Arc<dyn TicketLog>,
    ) -> Self {
        Self {
            channel,
            tracker,
            directory,
            ticket_log,
            sessions: SessionRepository::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn sessions(&self) -> &SessionRepository {
        &self.sessions
    }

    /// Top-level per-signal handler; recovers every error into a log line and
    /// a generic failure message so the loop keeps running.
    pub(crate) async fn handle_signal(&self, signal: InboundSignal) {
        match signal {
            InboundSignal::Chat(event) => {
                if let Err(error) = self.handle_chat_event(&event).await {
                    tracing::error!(
                        chat_id = event.chat_id.as_str(),
                        "chat event handler failed: {error:#}"
                    );
                    let _ = self
                        .channel
                        .send_message(
                            &event.chat_id,
                            texts::GENERIC_FAILURE_TEXT,
                            &ReplyKeyboard::None,
                        )
                        .await;
                }
            }
            InboundSignal::TrackerComment(event) => {
                if let Err(error) = self.handle_tracker_comment(&event).await {
                    tracing::error!(
                        ticket_id = event.ticket_id.as_str(),
                        "tracker comment relay failed: {error:#}"
                    );
                }
            }
        }
    }

    async fn handle_chat_event(&self, event: &ChannelInboundEvent) -> Result<()> {
        let mut session = self.sessions.load_or_default(&event.user_id).await;
        if session.profile.is_none() && event.kind == ChannelEventKind::Command {
            session.profile = self
                .try_identify(&event.user_id, &event.username, "")
                .await;
        }

        let plan = route_event(&mut session, event);
        self.send_replies(&event.chat_id, &plan.replies).await?;
        if let Some(command) = plan.command {
            self.execute_command(&mut session, event, command).await?;
        }
        self.sessions.store(&event.user_id, session).await;
        Ok(())
    }

    async fn execute_command(
        &self,
        session: &mut desk_dialog::Session,
        event: &ChannelInboundEvent,
        command: RouterCommand,
    ) -> Result<()> {
        match command {
            RouterCommand::CreateTicket { fields } => {
                match self.tracker.create_ticket(&fields).await {
                    Ok(ticket_id) => {
                        tracing::info!(
                            ticket_id = ticket_id.as_str(),
                            user_id = event.user_id.as_str(),
                            "ticket created"
                        );
                        if let Err(error) = self
                            .ticket_log
                            .append(TicketLogRow::opened(
                                &ticket_id,
                                &event.user_id,
                                &event.chat_id,
                                &event.username,
                            ))
                            .await
                        {
                            tracing::warn!("ticket log append failed: {error:#}");
                        }
                        let replies = apply_ticket_created(session, &ticket_id);
                        self.send_replies(&event.chat_id, &replies).await?;
                    }
                    Err(error) => {
                        tracing::warn!("ticket creation rejected: {error}");
                        self.send_replies(
                            &event.chat_id,
                            &[OutboundReply::plain(texts::create_failed_text(
                                &error.to_string(),
                            ))],
                        )
                        .await?;
                    }
                }
            }
            RouterCommand::AddComment { ticket_id, text } => {
                let reply = match self.tracker.add_comment(&ticket_id, &text).await {
                    Ok(()) => OutboundReply::plain(texts::COMMENT_ADDED_TEXT),
                    Err(error) => {
                        tracing::warn!("comment rejected: {error}");
                        OutboundReply::plain(texts::comment_failed_text(&error.to_string()))
                    }
                };
                self.send_replies(&event.chat_id, &[reply]).await?;
            }
            RouterCommand::AttachFile { ticket_id, media } => {
                let reply = match self.channel.download_file(&media.file_id).await {
                    Ok(bytes) => match self
                        .tracker
                        .attach_file(&ticket_id, &media.file_name, bytes)
                        .await
                    {
                        Ok(()) => OutboundReply::plain(texts::attach_ok_text(&media.file_name)),
                        Err(error) => {
                            tracing::warn!("attachment rejected: {error}");
                            OutboundReply::plain(texts::attach_failed_text(&error.to_string()))
                        }
                    },
                    Err(error) => {
                        tracing::warn!("file download failed: {error:#}");
                        OutboundReply::plain(texts::attach_failed_text(&error.to_string()))
                    }
                };
                self.send_replies(&event.chat_id, &[reply]).await?;
            }
            RouterCommand::CheckStatus { ticket_id } => {
                match self.tracker.ticket_status(&ticket_id).await {
                    Ok(label) => {
                        if let Err(error) = self.ticket_log.update_status(&ticket_id, &label).await
                        {
                            tracing::debug!("ticket log status update skipped: {error:#}");
                        }
                        let replies = apply_status_result(session, &ticket_id, &label);
                        self.send_replies(&event.chat_id, &replies).await?;
                    }
                    Err(error) => {
                        tracing::warn!("status lookup failed: {error}");
                        self.send_replies(
                            &event.chat_id,
                            &[OutboundReply::plain(texts::status_failed_text(
                                &error.to_string(),
                            ))],
                        )
                        .await?;
                    }
                }
            }
            RouterCommand::ListTickets { user_id } => {
                match self.ticket_log.tickets_for_user(&user_id).await {
                    Ok(rows) => {
                        let ticket_ids = rows.into_iter().map(|row| row.ticket_id).collect();
                        let replies = apply_ticket_list(session, ticket_ids);
                        self.send_replies(&event.chat_id, &replies).await?;
                    }
                    Err(error) => {
                        tracing::warn!("ticket log scan failed: {error:#}");
                        self.send_replies(
                            &event.chat_id,
                            &[OutboundReply::plain(texts::GENERIC_FAILURE_TEXT)],
                        )
                        .await?;
                    }
                }
            }
            RouterCommand::IdentifyContact { phone } => {
                let profile = self
                    .try_identify(&event.user_id, &event.username, &phone)
                    .await;
                let reply = match profile {
                    Some(profile) => {
                        session.profile = Some(profile.clone());
                        OutboundReply::plain(texts::contact_saved_text(&profile.full_name))
                    }
                    None => OutboundReply::plain(texts::CONTACT_UNKNOWN_TEXT),
                };
                self.send_replies(&event.chat_id, &[reply]).await?;
            }
        }
        Ok(())
    }

    async fn try_identify(
        &self,
        user_id: &str,
        username: &str,
        phone: &str,
    ) -> Option<DirectoryProfile> {
        let directory = self.directory.as_ref()?;
        match identify_profile(directory.as_ref(), user_id, username, phone).await {
            Ok(profile) => profile,
            Err(error) => {
                tracing::warn!("directory lookup failed: {error:#}");
                None
            }
        }
    }

    async fn handle_tracker_comment(&self, event: &TrackerCommentEvent) -> Result<()> {
        let chats = self.sessions.chats_linked_to_ticket(&event.ticket_id).await;
        if chats.is_empty() {
            tracing::debug!(
                ticket_id = event.ticket_id.as_str(),
                "tracker comment has no linked chats"
            );
            return Ok(());
        }
        let text =
            texts::tracker_comment_notification_text(&event.ticket_id, &event.comment_body);
        for chat_id in chats {
            if let Err(error) = self
                .channel
                .send_message(&chat_id, &text, &ReplyKeyboard::None)
                .await
            {
                tracing::warn!(
                    chat_id = chat_id.as_str(),
                    "comment notification failed: {error:#}"
                );
            }
        }
        Ok(())
    }

    async fn send_replies(&self, chat_id: &str, replies: &[OutboundReply]) -> Result<()> {
        for reply in replies {
            self.channel
                .send_message(chat_id, &reply.text, &reply.keyboard)
                .await?;
        }
        Ok(())
    }
}

pub(crate) async fn run_bot(args: CliArgs) -> Result<()> {
    let connector = ChannelConnectorConfig {
        mode: args.connector_mode.to_channel_mode(),
        webhook_bind: args.webhook_bind.clone(),
        webhook_secret: args.webhook_secret.clone(),
        poll_timeout_secs: args.poll_timeout_secs,
        poll_interval_ms: args.poll_interval_ms,
    };
    let channel = ChannelClient::new(ChannelOutboundConfig {
        api_base: args.telegram_api_base.clone(),
        bot_token: args.telegram_bot_token.clone(),
        http_timeout_ms: args.http_timeout_ms,
    })
    .context("failed to initialize channel client")?;
    let tracker = TrackerClient::new(TrackerConfig {
        base_url: args.tracker_base_url.clone(),
        email: args.tracker_email.clone(),
        api_token: args.tracker_api_token.clone(),
        project_key: args.tracker_project_key.clone(),
        issue_type: args.tracker_issue_type.clone(),
        reporter_account_id: args.tracker_reporter_account_id.clone(),
        request_timeout_ms: args.http_timeout_ms,
    })
    .context("failed to initialize tracker client")?;
    let directory: Option<Arc<dyn DirectoryStore>> = match args.directory_base_url.as_deref() {
        Some(base_url) => Some(Arc::new(
            HttpDirectory::new(HttpRowStoreConfig {
                base_url: base_url.to_string(),
                http_timeout_ms: args.http_timeout_ms,
            })
            .context("failed to initialize directory client")?,
        )),
        None => None,
    };
    let ticket_log: Arc<dyn TicketLog> = match args.ticket_log_base_url.as_deref() {
        Some(base_url) => Arc::new(
            HttpTicketLog::new(base_url, args.http_timeout_ms)
                .context("failed to initialize ticket log client")?,
        ),
        None => Arc::new(InMemoryTicketLog::new()),
    };
    let runtime = Arc::new(BotRuntime::new(
        channel.clone(),
        tracker,
        directory,
        ticket_log,
    ));

    let (sender, mut receiver) = mpsc::channel::<InboundSignal>(64);
    let webhook_state = Arc::new(ChannelWebhookState {
        telegram_enabled: connector.mode.is_webhook(),
        telegram_secret: connector.webhook_secret.clone(),
        sender: sender.clone(),
    });
    let webhook_bind = connector.webhook_bind.clone();
    tokio::spawn(async move {
        if let Err(error) = run_webhook_listener(&webhook_bind, webhook_state).await {
            tracing::error!("webhook listener failed: {error:#}");
        }
    });

    if !connector.mode.is_webhook() {
        let poll_client = channel.clone();
        let poll_sender = sender.clone();
        let poll_timeout_secs = connector.poll_timeout_secs;
        let poll_interval_ms = connector.poll_interval_ms;
        tokio::spawn(async move {
            let mut offset = 0u64;
            loop {
                match poll_channel_updates(&poll_client, offset, poll_timeout_secs).await {
                    Ok((events, next_offset)) => {
                        offset = next_offset;
                        for event in events {
                            if poll_sender.send(InboundSignal::Chat(event)).await.is_err() {
                                return;
                            }
                        }
                    }
                    Err(error) => {
                        tracing::warn!("poll cycle failed: {error:#}");
                    }
                }
                tokio::time::sleep(Duration::from_millis(poll_interval_ms)).await;
            }
        });
    }
    drop(sender);

    tracing::info!(mode = connector.mode.as_str(), "deskbot runtime started");
    loop {
        tokio::select! {
            maybe_signal = receiver.recv() => match maybe_signal {
                Some(signal) => runtime.handle_signal(signal).await,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown requested");
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use desk_channel::{ChannelMedia, ChannelMediaKind};
    use desk_dialog::dialog_steps::{CONFIRM_LABEL, STATUS_LABEL};
    use desk_dialog::SessionState;
    use httpmock::prelude::*;

    fn build_runtime(
        telegram_base: &str,
        tracker_base: &str,
        directory: Option<Arc<dyn DirectoryStore>>,
        ticket_log: Arc<dyn TicketLog>,
    ) -> BotRuntime {
        let channel = ChannelClient::new(ChannelOutboundConfig {
            api_base: telegram_base.to_string(),
            bot_token: "bot-token".to_string(),
            http_timeout_ms: 2_000,
        })
        .expect("channel client");
        let tracker = TrackerClient::new(TrackerConfig {
            base_url: tracker_base.to_string(),
            email: "bot@example.com".to_string(),
            api_token: "token".to_string(),
            project_key: "SUP".to_string(),
            issue_type: "tgtask".to_string(),
            reporter_account_id: None,
            request_timeout_ms: 2_000,
        })
        .expect("tracker client");
        BotRuntime::new(channel, tracker, directory, ticket_log)
    }

    fn chat_event(kind: ChannelEventKind, text: &str) -> InboundSignal {
        InboundSignal::Chat(ChannelInboundEvent {
            kind,
            update_id: 1,
            chat_id: "100".to_string(),
            user_id: "100".to_string(),
            username: "ops".to_string(),
            timestamp_ms: 1_760_100_000_000,
            text: text.to_string(),
            media: None,
            contact: None,
        })
    }

    fn text_signal(text: &str) -> InboundSignal {
        chat_event(ChannelEventKind::Text, text)
    }

    #[tokio::test]
    async fn integration_full_form_flow_creates_ticket_and_enters_comment_mode() {
        let telegram = MockServer::start();
        let send_mock = telegram.mock(|when, then| {
            when.method(POST).path("/botbot-token/sendMessage");
            then.status(200).body(r#"{"ok":true,"result":{}}"#);
        });
        let tracker = MockServer::start();
        let create_mock = tracker.mock(|when, then| {
            when.method(POST).path("/rest/api/3/issue").json_body_includes(
                serde_json::json!({ "fields": { "summary": "Принтер не працює" } }).to_string(),
            );
            then.status(201).body(r#"{"id":"10001","key":"SUP-17"}"#);
        });

        let log = Arc::new(InMemoryTicketLog::new());
        let runtime = build_runtime(
            &telegram.base_url(),
            &tracker.base_url(),
            None,
            log.clone(),
        );

        runtime
            .handle_signal(chat_event(ChannelEventKind::Command, "/start"))
            .await;
        for input in [
            "Київ",
            "ІТ департамент",
            "E-mix 2.x",
            "Іван Франко",
            "Принтер не працює",
        ] {
            runtime.handle_signal(text_signal(input)).await;
        }
        runtime.handle_signal(text_signal(CONFIRM_LABEL)).await;

        create_mock.assert();
        let session = runtime.sessions().load("100").await.expect("session");
        assert_eq!(
            session.state,
            SessionState::CommentMode {
                target: "SUP-17".to_string()
            }
        );
        assert_eq!(session.ticket_id, Some("SUP-17".to_string()));
        let rows = log.snapshot();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ticket_id, "SUP-17");
        assert_eq!(rows[0].user_id, "100");
        // One prompt per step plus the confirmation + menu pair.
        assert!(send_mock.calls() >= 8);
    }

    #[tokio::test]
    async fn integration_comment_mode_forwards_text_as_tracker_comment() {
        let telegram = MockServer::start();
        telegram.mock(|when, then| {
            when.method(POST).path("/botbot-token/sendMessage");
            then.status(200).body(r#"{"ok":true,"result":{}}"#);
        });
        let tracker = MockServer::start();
        tracker.mock(|when, then| {
            when.method(POST).path("/rest/api/3/issue");
            then.status(201).body(r#"{"key":"SUP-17"}"#);
        });
        let comment_mock = tracker.mock(|when, then| {
            when.method(POST).path("/rest/api/3/issue/SUP-17/comment");
            then.status(201).body("{}");
        });

        let runtime = build_runtime(
            &telegram.base_url(),
            &tracker.base_url(),
            None,
            Arc::new(InMemoryTicketLog::new()),
        );
        runtime
            .handle_signal(chat_event(ChannelEventKind::Command, "/start"))
            .await;
        for input in ["Київ", "ІТ департамент", "E-mix 2.x", "Іван Франко", "Зламалось"] {
            runtime.handle_signal(text_signal(input)).await;
        }
        runtime.handle_signal(text_signal(CONFIRM_LABEL)).await;
        runtime.handle_signal(text_signal("hello")).await;

        comment_mock.assert();
    }

    #[tokio::test]
    async fn regression_create_failure_keeps_session_awaiting_confirmation() {
        let telegram = MockServer::start();
        let send_mock = telegram.mock(|when, then| {
            when.method(POST).path("/botbot-token/sendMessage");
            then.status(200).body(r#"{"ok":true,"result":{}}"#);
        });
        let tracker = MockServer::start();
        tracker.mock(|when, then| {
            when.method(POST).path("/rest/api/3/issue");
            then.status(400)
                .body(r#"{"errorMessages":["issuetype is required"]}"#);
        });

        let runtime = build_runtime(
            &telegram.base_url(),
            &tracker.base_url(),
            None,
            Arc::new(InMemoryTicketLog::new()),
        );
        runtime
            .handle_signal(chat_event(ChannelEventKind::Command, "/start"))
            .await;
        for input in ["Київ", "ІТ департамент", "E-mix 2.x", "Іван Франко", "Зламалось"] {
            runtime.handle_signal(text_signal(input)).await;
        }
        runtime.handle_signal(text_signal(CONFIRM_LABEL)).await;

        let session = runtime.sessions().load("100").await.expect("session");
        assert!(matches!(session.state, SessionState::InForm { .. }));
        assert_eq!(session.ticket_id, None);
        assert!(send_mock.calls() >= 7);
    }

    #[tokio::test]
    async fn integration_status_check_relays_label_and_updates_log() {
        let telegram = MockServer::start();
        telegram.mock(|when, then| {
            when.method(POST).path("/botbot-token/sendMessage");
            then.status(200).body(r#"{"ok":true,"result":{}}"#);
        });
        let tracker = MockServer::start();
        tracker.mock(|when, then| {
            when.method(POST).path("/rest/api/3/issue");
            then.status(201).body(r#"{"key":"SUP-17"}"#);
        });
        let status_mock = tracker.mock(|when, then| {
            when.method(GET).path("/rest/api/3/issue/SUP-17");
            then.status(200)
                .body(r#"{"fields":{"status":{"name":"В роботі"}}}"#);
        });

        let log = Arc::new(InMemoryTicketLog::new());
        let runtime = build_runtime(
            &telegram.base_url(),
            &tracker.base_url(),
            None,
            log.clone(),
        );
        runtime
            .handle_signal(chat_event(ChannelEventKind::Command, "/start"))
            .await;
        for input in ["Київ", "ІТ департамент", "E-mix 2.x", "Іван Франко", "Зламалось"] {
            runtime.handle_signal(text_signal(input)).await;
        }
        runtime.handle_signal(text_signal(CONFIRM_LABEL)).await;
        runtime.handle_signal(text_signal(STATUS_LABEL)).await;

        status_mock.assert();
        assert_eq!(log.snapshot()[0].status, "В роботі");
    }

    #[tokio::test]
    async fn integration_tracker_comment_webhook_notifies_linked_chat() {
        let telegram = MockServer::start();
        let notify_mock = telegram.mock(|when, then| {
            when.method(POST).path("/botbot-token/sendMessage").json_body_includes(
                serde_json::json!({
                    "chat_id": "100",
                    "text": "🆕 Новий коментар у SUP-17:\nall good"
                })
                .to_string(),
            );
            then.status(200).body(r#"{"ok":true,"result":{}}"#);
        });
        let tracker = MockServer::start();

        let runtime = build_runtime(
            &telegram.base_url(),
            &tracker.base_url(),
            None,
            Arc::new(InMemoryTicketLog::new()),
        );
        let mut session = desk_dialog::Session::default();
        session.chat_id = "100".to_string();
        session.ticket_id = Some("SUP-17".to_string());
        runtime.sessions().store("100", session).await;

        runtime
            .handle_signal(InboundSignal::TrackerComment(TrackerCommentEvent {
                ticket_id: "SUP-17".to_string(),
                comment_body: "all good".to_string(),
            }))
            .await;

        notify_mock.assert();
    }

    #[tokio::test]
    async fn integration_contact_share_resolves_profile_and_prefills_next_form() {
        let telegram = MockServer::start();
        telegram.mock(|when, then| {
            when.method(POST).path("/botbot-token/sendMessage");
            then.status(200).body(r#"{"ok":true,"result":{}}"#);
        });
        let tracker = MockServer::start();

        let directory = Arc::new(desk_directory::InMemoryDirectory::new(vec![
            desk_directory::DirectoryRow {
                chat_id: String::new(),
                username: String::new(),
                phone: "380501234567".to_string(),
                full_name: "Іван Франко".to_string(),
                division: "Київ".to_string(),
                department: "ІТ департамент".to_string(),
            },
        ]));
        let runtime = build_runtime(
            &telegram.base_url(),
            &tracker.base_url(),
            Some(directory.clone()),
            Arc::new(InMemoryTicketLog::new()),
        );

        let mut contact = ChannelInboundEvent {
            kind: ChannelEventKind::Contact,
            update_id: 1,
            chat_id: "100".to_string(),
            user_id: "100".to_string(),
            username: "ops".to_string(),
            timestamp_ms: 1_760_100_000_000,
            text: String::new(),
            media: None,
            contact: None,
        };
        contact.contact = Some(desk_channel::ChannelContact {
            phone_number: "+380501234567".to_string(),
            user_id: "100".to_string(),
            full_name: "Іван Франко".to_string(),
        });
        runtime.handle_signal(InboundSignal::Chat(contact)).await;

        let session = runtime.sessions().load("100").await.expect("session");
        let profile = session.profile.expect("profile");
        assert_eq!(profile.division, "Київ");
        assert_eq!(directory.snapshot()[0].chat_id, "100");

        runtime
            .handle_signal(chat_event(ChannelEventKind::Command, "/start"))
            .await;
        let session = runtime.sessions().load("100").await.expect("session");
        assert!(matches!(
            session.state,
            SessionState::InForm { step } if step.as_str() == "service"
        ));
    }

    #[tokio::test]
    async fn regression_oversize_media_never_reaches_download_or_attach() {
        let telegram = MockServer::start();
        telegram.mock(|when, then| {
            when.method(POST).path("/botbot-token/sendMessage");
            then.status(200).body(r#"{"ok":true,"result":{}}"#);
        });
        let get_file_mock = telegram.mock(|when, then| {
            when.method(POST).path("/botbot-token/getFile");
            then.status(200).body("{}");
        });
        let tracker = MockServer::start();
        let attach_mock = tracker.mock(|when, then| {
            when.method(POST).path("/rest/api/3/issue/SUP-17/attachments");
            then.status(200).body("[]");
        });
        tracker.mock(|when, then| {
            when.method(POST).path("/rest/api/3/issue");
            then.status(201).body(r#"{"key":"SUP-17"}"#);
        });

        let runtime = build_runtime(
            &telegram.base_url(),
            &tracker.base_url(),
            None,
            Arc::new(InMemoryTicketLog::new()),
        );
        runtime
            .handle_signal(chat_event(ChannelEventKind::Command, "/start"))
            .await;
        for input in ["Київ", "ІТ департамент", "E-mix 2.x", "Іван Франко", "Зламалось"] {
            runtime.handle_signal(text_signal(input)).await;
        }
        runtime.handle_signal(text_signal(CONFIRM_LABEL)).await;

        let mut media_event = ChannelInboundEvent {
            kind: ChannelEventKind::Media,
            update_id: 2,
            chat_id: "100".to_string(),
            user_id: "100".to_string(),
            username: "ops".to_string(),
            timestamp_ms: 1_760_100_000_000,
            text: String::new(),
            media: None,
            contact: None,
        };
        media_event.media = Some(ChannelMedia {
            kind: ChannelMediaKind::Video,
            file_id: "huge".to_string(),
            file_name: "video.mp4".to_string(),
            size_bytes: 10_500_000,
        });
        runtime.handle_signal(InboundSignal::Chat(media_event)).await;

        get_file_mock.assert_calls(0);
        attach_mock.assert_calls(0);
    }
}
