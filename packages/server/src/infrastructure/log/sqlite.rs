//! SQLite による Durable Log 実装
//!
//! rusqlite の `Connection` は `Sync` ではないため `parking_lot::Mutex` で包み、
//! 各操作は `spawn_blocking` 上で実行して非同期ランタイムを塞がないようにします。

use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use kairan_shared::time::Clock;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};

use crate::domain::{ClientId, DurableLog, HistoryEntry, LogError, MessageText};

use super::schema;

impl From<rusqlite::Error> for LogError {
    fn from(e: rusqlite::Error) -> Self {
        LogError::Database(e.to_string())
    }
}

pub struct SqliteLog {
    conn: Arc<Mutex<Connection>>,
    clock: Arc<dyn Clock>,
}

impl SqliteLog {
    /// データベースファイルを開く（無ければ親ディレクトリごと作成）
    pub fn open(path: &Path, clock: Arc<dyn Clock>) -> Result<Self, LogError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| LogError::Io(format!("create dir: {e}")))?;
        }

        let conn = Connection::open(path)?;
        let log = Self::init(conn, clock)?;
        tracing::info!(path = %path.display(), "Durable log opened");
        Ok(log)
    }

    /// インメモリのデータベースを開く
    pub fn in_memory(clock: Arc<dyn Clock>) -> Result<Self, LogError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, clock)
    }

    fn init(conn: Connection, clock: Arc<dyn Clock>) -> Result<Self, LogError> {
        conn.execute_batch(schema::PRAGMAS)
            .map_err(|e| LogError::Database(format!("pragmas: {e}")))?;
        conn.execute_batch(schema::CREATE_TABLES)
            .map_err(|e| LogError::Database(format!("schema: {e}")))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            clock,
        })
    }

    /// クライアントの active フラグ（未登録なら `None`）
    pub async fn is_active(&self, client_id: &ClientId) -> Result<Option<bool>, LogError> {
        let id = client_id.as_str().to_string();
        self.with_conn(move |conn| {
            let active = conn
                .query_row(
                    "SELECT active FROM clients WHERE id = ?1",
                    params![id],
                    |row| row.get::<_, bool>(0),
                )
                .optional()?;
            Ok(active)
        })
        .await
    }

    async fn with_conn<F, T>(&self, f: F) -> Result<T, LogError>
    where
        F: FnOnce(&Connection) -> Result<T, LogError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            f(&conn)
        })
        .await
        .map_err(|e| LogError::Unavailable(format!("blocking task failed: {e}")))?
    }
}

#[async_trait]
impl DurableLog for SqliteLog {
    async fn record_client(&self, client_id: &ClientId) -> Result<(), LogError> {
        let id = client_id.as_str().to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO clients (id, active) VALUES (?1, 1)
                 ON CONFLICT(id) DO UPDATE SET active = 1",
                params![id],
            )?;
            Ok(())
        })
        .await
    }

    async fn mark_inactive(&self, client_id: &ClientId) -> Result<(), LogError> {
        let id = client_id.as_str().to_string();
        self.with_conn(move |conn| {
            conn.execute("UPDATE clients SET active = 0 WHERE id = ?1", params![id])?;
            Ok(())
        })
        .await
    }

    async fn append_message(
        &self,
        sender: &ClientId,
        text: &MessageText,
    ) -> Result<(), LogError> {
        let sender = sender.as_str().to_string();
        let text = text.as_str().to_string();
        let created_at = self.clock.now_rfc3339();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO messages (sender_id, message, created_at) VALUES (?1, ?2, ?3)",
                params![sender, text, created_at],
            )?;
            Ok(())
        })
        .await
    }

    async fn list_all_messages(&self) -> Result<Vec<HistoryEntry>, LogError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT sender_id, message, created_at FROM messages
                 ORDER BY created_at ASC, id ASC",
            )?;
            let entries = stmt
                .query_map([], |row| {
                    Ok(HistoryEntry {
                        sender: row.get(0)?,
                        message: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(entries)
        })
        .await
    }
}
