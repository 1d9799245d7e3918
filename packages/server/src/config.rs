//! Server configuration (command line flags).

use std::{path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::broadcast::{CoordinatorConfig, Durability, MIN_MAILBOX_CAPACITY, OverflowPolicy};

/// `--database` に指定するとインメモリの Durable Log を使う
pub const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("mailbox capacity must be at least {min} (got {got})")]
    MailboxCapacityTooSmall { got: usize, min: usize },

    #[error("poll timeout must be greater than zero")]
    ZeroPollTimeout,

    #[error("block timeout must be greater than zero when --overflow=block")]
    ZeroBlockTimeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OverflowArg {
    DropOldest,
    DropNewest,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DurabilityArg {
    Deferred,
    Inline,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "kairan-server")]
#[command(about = "HTTP long-poll message broadcaster", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    pub port: u16,

    /// SQLite database path (":memory:" keeps the log in process memory)
    #[arg(short = 'd', long, default_value = "./chat.db")]
    pub database: String,

    /// Per-client mailbox capacity
    #[arg(long, default_value_t = MIN_MAILBOX_CAPACITY)]
    pub mailbox_capacity: usize,

    /// What to do when a mailbox is full
    #[arg(long, value_enum, default_value = "drop-oldest")]
    pub overflow: OverflowArg,

    /// How long a broadcast waits for mailbox space with --overflow=block
    #[arg(long, default_value = "500")]
    pub block_timeout_ms: u64,

    /// Long-poll window for /messages
    #[arg(long, default_value = "10")]
    pub poll_timeout_secs: u64,

    /// Whether durable log writes are acknowledged before replying
    #[arg(long, value_enum, default_value = "deferred")]
    pub durability: DurabilityArg,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "debug")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mailbox_capacity < MIN_MAILBOX_CAPACITY {
            return Err(ConfigError::MailboxCapacityTooSmall {
                got: self.mailbox_capacity,
                min: MIN_MAILBOX_CAPACITY,
            });
        }
        if self.poll_timeout_secs == 0 {
            return Err(ConfigError::ZeroPollTimeout);
        }
        if self.overflow == OverflowArg::Block && self.block_timeout_ms == 0 {
            return Err(ConfigError::ZeroBlockTimeout);
        }
        Ok(())
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        match self.overflow {
            OverflowArg::DropOldest => OverflowPolicy::DropOldest,
            OverflowArg::DropNewest => OverflowPolicy::DropNewest,
            OverflowArg::Block => {
                OverflowPolicy::BlockWithTimeout(Duration::from_millis(self.block_timeout_ms))
            }
        }
    }

    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            mailbox_capacity: self.mailbox_capacity,
            overflow_policy: self.overflow_policy(),
            durability: match self.durability {
                DurabilityArg::Deferred => Durability::Deferred,
                DurabilityArg::Inline => Durability::Inline,
            },
        }
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    /// SQLite のパス（インメモリ指定なら `None`）
    pub fn database_path(&self) -> Option<PathBuf> {
        (self.database != IN_MEMORY_DATABASE).then(|| PathBuf::from(&self.database))
    }
}
