//! Issue-tracker gateway for deskbot.
//!
//! Wraps the tracker's REST surface (create, attach, comment, status) behind
//! one client with basic auth, a bounded timeout, and a unified error type.
//! Callers never see the tracker's ad hoc response shapes.

pub mod tracker_client;
pub mod tracker_payloads;

pub use tracker_client::*;
pub use tracker_payloads::*;
