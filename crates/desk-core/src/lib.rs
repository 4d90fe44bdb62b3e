//! Foundational low-level utilities shared across deskbot crates.
//!
//! Provides time helpers used by event normalization and the ticket log, and
//! text normalization used across routing and lookup code.

pub mod text_utils;
pub mod time_utils;

pub use text_utils::normalize_optional_text;
pub use time_utils::{
    current_unix_timestamp, current_unix_timestamp_ms, format_unix_time_compact,
    format_unix_timestamp,
};
