//! Conversation state machine for deskbot.
//!
//! Holds the fixed step sequence and prompt/keyboard builder, the per-user
//! session model (one explicit tagged state, no overlapping flags), and the
//! step router that turns inbound chat events into state transitions plus
//! side-effect plans for the runtime to execute.

pub mod dialog_router;
pub mod dialog_session;
pub mod dialog_steps;
pub mod dialog_texts;

pub use dialog_router::*;
pub use dialog_session::*;
pub use dialog_steps::*;
