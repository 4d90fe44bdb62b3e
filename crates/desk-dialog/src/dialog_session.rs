//! Per-user session model and the session repository.
//!
//! The session state is one tagged union, so comment mode without a target
//! ticket is unrepresentable. Sessions live for the process lifetime; the
//! repository is the single write seam the runtime goes through.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::dialog_steps::FormStep;
use desk_directory::DirectoryProfile;
use desk_tracker::TicketFields;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
/// Enumerates supported `SessionState` values.
pub enum SessionState {
    #[default]
    Idle,
    InForm {
        step: FormStep,
    },
    CommentMode {
        target: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// One chat user's dialogue record.
pub struct Session {
    #[serde(default)]
    pub state: SessionState,
    #[serde(default)]
    pub chat_id: String,
    #[serde(default)]
    pub fields: TicketFields,
    #[serde(default)]
    pub ticket_id: Option<String>,
    #[serde(default)]
    pub profile: Option<DirectoryProfile>,
    #[serde(default)]
    pub offered_tickets: Vec<String>,
}

impl Session {
    /// The ticket that status checks, media, and comments should target:
    /// the comment-mode target when one is active, else the last created
    /// ticket.
    pub fn active_ticket(&self) -> Option<String> {
        match &self.state {
            SessionState::CommentMode { target } => Some(target.clone()),
            _ => self.ticket_id.clone(),
        }
    }
}

/// Reads the collected value for a step; the confirmation step has none.
pub fn step_value(fields: &TicketFields, step: FormStep) -> &str {
    match step {
        FormStep::Division => &fields.division,
        FormStep::Department => &fields.department,
        FormStep::Service => &fields.service,
        FormStep::FullName => &fields.full_name,
        FormStep::Description => &fields.description,
        FormStep::Confirm => "",
    }
}

/// Stores a value under the step's field; the description accumulates
/// newline-terminated fragments instead of overwriting.
pub fn set_step_value(fields: &mut TicketFields, step: FormStep, value: &str) {
    match step {
        FormStep::Division => fields.division = value.to_string(),
        FormStep::Department => fields.department = value.to_string(),
        FormStep::Service => fields.service = value.to_string(),
        FormStep::FullName => fields.full_name = value.to_string(),
        FormStep::Description | FormStep::Confirm => {
            fields.description.push_str(value);
            fields.description.push('\n');
        }
    }
}

pub fn clear_step_value(fields: &mut TicketFields, step: FormStep) {
    match step {
        FormStep::Division => fields.division.clear(),
        FormStep::Department => fields.department.clear(),
        FormStep::Service => fields.service.clear(),
        FormStep::FullName => fields.full_name.clear(),
        FormStep::Description => fields.description.clear(),
        FormStep::Confirm => {}
    }
}

#[derive(Debug, Default)]
/// Process-lifetime session store keyed by chat user id.
pub struct SessionRepository {
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&self, user_id: &str) -> Option<Session> {
        self.sessions.lock().await.get(user_id).cloned()
    }

    pub async fn load_or_default(&self, user_id: &str) -> Session {
        self.sessions
            .lock()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn store(&self, user_id: &str, session: Session) {
        self.sessions
            .lock()
            .await
            .insert(user_id.to_string(), session);
    }

    pub async fn remove(&self, user_id: &str) {
        self.sessions.lock().await.remove(user_id);
    }

    /// Chat ids of every session linked to `ticket_id`, either as the last
    /// created ticket or as the active comment target.
    pub async fn chats_linked_to_ticket(&self, ticket_id: &str) -> Vec<String> {
        let sessions = self.sessions.lock().await;
        let mut chats: Vec<String> = sessions
            .values()
            .filter(|session| {
                session.ticket_id.as_deref() == Some(ticket_id)
                    || matches!(
                        &session.state,
                        SessionState::CommentMode { target } if target == ticket_id
                    )
            })
            .map(|session| session.chat_id.clone())
            .filter(|chat_id| !chat_id.trim().is_empty())
            .collect();
        chats.sort();
        chats.dedup();
        chats
    }
}
