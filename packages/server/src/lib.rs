//! HTTP long-poll message broadcaster.
//!
//! Clients join under an id, send messages that are fanned out to every joined
//! client's bounded mailbox, and long-poll for their next message. Messages and
//! membership are recorded to a durable log for history.

pub mod broadcast;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
