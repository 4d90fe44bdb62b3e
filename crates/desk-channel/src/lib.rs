//! Telegram transport building blocks for deskbot.
//!
//! Provides the inbound event contract, Bot API update normalization, the
//! long-poll/webhook connector entrypoints, and outbound message delivery
//! with reply keyboards.
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use desk_channel::parse_channel_update;
//!
//! let raw = r#"{
//!   "update_id": 42,
//!   "message": {
//!     "message_id": 7,
//!     "date": 1700000000,
//!     "text": "hello",
//!     "chat": { "id": 100, "type": "private" },
//!     "from": { "id": 100, "username": "operator" }
//!   }
//! }"#;
//!
//! let event = parse_channel_update(raw)?;
//! assert_eq!(event.chat_id, "100");
//! assert_eq!(event.text, "hello");
//! # Ok(())
//! # }
//! ```

pub mod channel_connectors;
pub mod channel_contract;
pub mod channel_ingress;
pub mod channel_outbound;

pub use channel_connectors::*;
pub use channel_contract::*;
pub use channel_ingress::*;
pub use channel_outbound::*;
