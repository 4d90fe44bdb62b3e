//! The step router: inbound chat events become state transitions plus
//! side-effect plans.
//!
//! Interception order is load-bearing: status and media routing run before
//! comment-mode forwarding, which runs before form input, so a button label
//! is never mistaken for free-form comment content. The router itself never
//! talks to the network; the runtime executes the returned command and feeds
//! results back through the `apply_*` functions.

use serde::Serialize;

use desk_channel::{ChannelEventKind, ChannelInboundEvent, ChannelMedia, ReplyKeyboard};
use desk_tracker::{is_done_status, TicketFields, ATTACHMENT_MAX_BYTES};

use crate::dialog_session::{
    clear_step_value, set_step_value, step_value, Session, SessionState,
};
use crate::dialog_steps::{
    comment_mode_keyboard, main_menu_keyboard, render_step_prompt, FormStep, BACK_LABEL,
    CONFIRM_LABEL, EXIT_COMMENTS_LABEL, MY_TICKETS_LABEL, START_COMMAND, STATUS_LABEL,
};
use crate::dialog_texts as texts;

#[derive(Debug, Clone, PartialEq)]
/// One outbound message the runtime must deliver.
pub struct OutboundReply {
    pub text: String,
    pub keyboard: ReplyKeyboard,
}

impl OutboundReply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: ReplyKeyboard::None,
        }
    }

    pub fn with_rows(text: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            text: text.into(),
            keyboard: ReplyKeyboard::Rows(rows),
        }
    }

    pub fn with_removal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: ReplyKeyboard::Remove,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
/// Enumerates supported `RouterCommand` values.
pub enum RouterCommand {
    CreateTicket { fields: TicketFields },
    AddComment { ticket_id: String, text: String },
    AttachFile { ticket_id: String, media: ChannelMedia },
    CheckStatus { ticket_id: String },
    ListTickets { user_id: String },
    IdentifyContact { phone: String },
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Routing outcome: replies to send now plus at most one remote side effect.
pub struct RoutePlan {
    pub replies: Vec<OutboundReply>,
    pub command: Option<RouterCommand>,
}

impl RoutePlan {
    fn with_reply(reply: OutboundReply) -> Self {
        Self {
            replies: vec![reply],
            command: None,
        }
    }

    fn with_command(command: RouterCommand) -> Self {
        Self {
            replies: Vec::new(),
            command: Some(command),
        }
    }
}

pub fn route_event(session: &mut Session, event: &ChannelInboundEvent) -> RoutePlan {
    session.chat_id = event.chat_id.clone();
    let text = event.text.trim();

    if event.kind == ChannelEventKind::Media {
        return route_media(session, event);
    }
    if event.kind == ChannelEventKind::Contact {
        return route_contact(event);
    }
    if text == STATUS_LABEL {
        return match session.active_ticket() {
            Some(ticket_id) => RoutePlan::with_command(RouterCommand::CheckStatus { ticket_id }),
            None => RoutePlan::with_reply(OutboundReply::plain(texts::NO_ACTIVE_TICKET_TEXT)),
        };
    }
    if event.kind == ChannelEventKind::Command {
        if text == START_COMMAND {
            return begin_form(session);
        }
        return RoutePlan::with_reply(OutboundReply::plain(texts::NO_SESSION_TEXT));
    }
    if text == MY_TICKETS_LABEL {
        return RoutePlan::with_command(RouterCommand::ListTickets {
            user_id: event.user_id.clone(),
        });
    }
    if !session.offered_tickets.is_empty()
        && session.offered_tickets.iter().any(|ticket| ticket == text)
    {
        let target = text.to_string();
        session.offered_tickets.clear();
        session.state = SessionState::CommentMode {
            target: target.clone(),
        };
        return RoutePlan::with_reply(OutboundReply::with_rows(
            texts::comment_mode_text(&target),
            comment_mode_keyboard(),
        ));
    }

    match session.state.clone() {
        SessionState::CommentMode { target } => {
            if text == EXIT_COMMENTS_LABEL {
                session.state = SessionState::Idle;
                session.offered_tickets.clear();
                return RoutePlan::with_reply(OutboundReply::with_rows(
                    texts::COMMENTS_CLOSED_TEXT,
                    main_menu_keyboard(),
                ));
            }
            RoutePlan::with_command(RouterCommand::AddComment {
                ticket_id: target,
                text: text.to_string(),
            })
        }
        SessionState::InForm { step } => route_form_input(session, step, text),
        SessionState::Idle => RoutePlan::with_reply(OutboundReply::plain(texts::NO_SESSION_TEXT)),
    }
}

/// Starts a fresh form, pre-filling steps the resolved profile supplies and
/// skipping straight to the first one still empty.
pub fn begin_form(session: &mut Session) -> RoutePlan {
    session.fields = TicketFields::default();
    session.offered_tickets.clear();
    if let Some(profile) = session.profile.clone() {
        if !profile.division.trim().is_empty() {
            session.fields.division = profile.division;
        }
        if !profile.department.trim().is_empty() {
            session.fields.department = profile.department;
        }
        if !profile.full_name.trim().is_empty() {
            session.fields.full_name = profile.full_name;
        }
    }
    let step = first_unfilled_step(&session.fields);
    session.state = SessionState::InForm { step };
    RoutePlan::with_reply(prompt_reply(step, &session.fields.description))
}

fn prompt_reply(step: FormStep, description: &str) -> OutboundReply {
    let prompt = render_step_prompt(step, description);
    OutboundReply::with_rows(prompt.text, prompt.keyboard)
}

fn first_unfilled_step(fields: &TicketFields) -> FormStep {
    for step in FormStep::SEQUENCE {
        if step == FormStep::Confirm {
            break;
        }
        if step_value(fields, step).trim().is_empty() {
            return step;
        }
    }
    FormStep::Confirm
}

fn route_form_input(session: &mut Session, step: FormStep, text: &str) -> RoutePlan {
    if text == BACK_LABEL {
        // Back clears the field of the step being returned to; at the first
        // step this is a no-op re-prompt.
        let previous = step.previous();
        clear_step_value(&mut session.fields, previous);
        session.state = SessionState::InForm { step: previous };
        return RoutePlan::with_reply(prompt_reply(previous, &session.fields.description));
    }
    if step == FormStep::Confirm {
        if text == CONFIRM_LABEL {
            return RoutePlan::with_command(RouterCommand::CreateTicket {
                fields: session.fields.clone(),
            });
        }
        // Extra text while awaiting confirmation extends the description.
        set_step_value(&mut session.fields, FormStep::Confirm, text);
        return RoutePlan::with_reply(prompt_reply(
            FormStep::Confirm,
            &session.fields.description,
        ));
    }
    set_step_value(&mut session.fields, step, text);
    let next = step.next().unwrap_or(FormStep::Confirm);
    session.state = SessionState::InForm { step: next };
    RoutePlan::with_reply(prompt_reply(next, &session.fields.description))
}

fn route_media(session: &mut Session, event: &ChannelInboundEvent) -> RoutePlan {
    let Some(media) = event.media.as_ref() else {
        return RoutePlan::with_reply(OutboundReply::plain(texts::MEDIA_GUIDANCE_TEXT));
    };
    let Some(ticket_id) = session.active_ticket() else {
        return RoutePlan::with_reply(OutboundReply::plain(texts::MEDIA_GUIDANCE_TEXT));
    };
    if media.size_bytes > ATTACHMENT_MAX_BYTES {
        return RoutePlan::with_reply(OutboundReply::plain(texts::OVERSIZE_FILE_TEXT));
    }
    RoutePlan::with_command(RouterCommand::AttachFile {
        ticket_id,
        media: media.clone(),
    })
}

fn route_contact(event: &ChannelInboundEvent) -> RoutePlan {
    let Some(contact) = event.contact.as_ref() else {
        return RoutePlan::with_reply(OutboundReply::plain(texts::NO_SESSION_TEXT));
    };
    RoutePlan::with_command(RouterCommand::IdentifyContact {
        phone: contact.phone_number.clone(),
    })
}

/// Applies a successful create: the session enters comment mode on the new
/// ticket and the user receives the confirmation + menu pair.
pub fn apply_ticket_created(session: &mut Session, ticket_id: &str) -> Vec<OutboundReply> {
    session.ticket_id = Some(ticket_id.to_string());
    session.state = SessionState::CommentMode {
        target: ticket_id.to_string(),
    };
    vec![
        OutboundReply::with_removal(texts::ticket_created_text(ticket_id)),
        OutboundReply::with_rows(texts::MENU_PROMPT_TEXT, main_menu_keyboard()),
    ]
}

/// Applies a status lookup result; a done label clears the ticket linkage.
pub fn apply_status_result(
    session: &mut Session,
    ticket_id: &str,
    label: &str,
) -> Vec<OutboundReply> {
    let mut replies = vec![OutboundReply::plain(texts::status_text(ticket_id, label))];
    if is_done_status(label) {
        if session.ticket_id.as_deref() == Some(ticket_id) {
            session.ticket_id = None;
        }
        if matches!(&session.state, SessionState::CommentMode { target } if target == ticket_id) {
            session.state = SessionState::Idle;
        }
        replies.push(OutboundReply::with_removal(texts::DONE_CLEARED_TEXT));
    }
    replies
}

/// Applies a ticket-log scan: offers the user's tickets as pick buttons.
pub fn apply_ticket_list(session: &mut Session, ticket_ids: Vec<String>) -> Vec<OutboundReply> {
    if ticket_ids.is_empty() {
        return vec![OutboundReply::plain(texts::NO_TICKETS_TEXT)];
    }
    let mut keyboard: Vec<Vec<String>> = ticket_ids.iter().map(|id| vec![id.clone()]).collect();
    keyboard.push(vec![EXIT_COMMENTS_LABEL.to_string()]);
    session.offered_tickets = ticket_ids;
    vec![OutboundReply::with_rows(
        texts::TICKET_LIST_PROMPT_TEXT,
        keyboard,
    )]
}
