//! Shared utilities for the Kairan broadcaster.
//!
//! Used by both `kairan-server` and `kairan-client`:
//! - `logger`: tracing subscriber setup
//! - `time`: clock abstraction and timestamp formatting
//! - `dto`: JSON bodies exchanged over HTTP

pub mod dto;
pub mod logger;
pub mod time;
