//! CLI client for the Kairan long-poll broadcaster.

pub mod api;
pub mod domain;
pub mod error;
pub mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
