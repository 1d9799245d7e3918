//! Durable Log への書き込み担当
//!
//! 制御ループから呼ばれ、メンバーシップ変更とメッセージを Durable Log に記録します。
//! 書き込みは助言的（advisory）な永続化であり、失敗はログに残すだけで呼び出し元には返しません。
//!
//! - `Durability::Deferred`: 専用タスクがキューを順番に処理する。制御ループは I/O を待たない
//! - `Durability::Inline`: 制御ループが書き込み完了を待ってから呼び出し元に応答する

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::domain::{ClientId, DurableLog, MessageEvent};

/// 永続化の実行方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Durability {
    #[default]
    Deferred,
    Inline,
}

/// 記録する操作
#[derive(Debug, Clone)]
pub enum LogWrite {
    RecordClient(ClientId),
    MarkInactive(ClientId),
    AppendMessage(MessageEvent),
}

impl LogWrite {
    fn name(&self) -> &'static str {
        match self {
            LogWrite::RecordClient(_) => "record_client",
            LogWrite::MarkInactive(_) => "mark_inactive",
            LogWrite::AppendMessage(_) => "append_message",
        }
    }

    fn client_id(&self) -> &ClientId {
        match self {
            LogWrite::RecordClient(id) | LogWrite::MarkInactive(id) => id,
            LogWrite::AppendMessage(event) => &event.sender,
        }
    }
}

enum LogOp {
    Write(LogWrite),
    Flush(oneshot::Sender<()>),
}

enum Mode {
    Deferred(mpsc::UnboundedSender<LogOp>),
    Inline(Arc<dyn DurableLog>),
}

pub struct LogWriter {
    mode: Mode,
}

impl LogWriter {
    /// 新しい LogWriter を作成
    ///
    /// `Deferred` の場合はワーカータスクを起動する（tokio ランタイム内で呼ぶこと）。
    pub fn new(log: Arc<dyn DurableLog>, durability: Durability) -> Self {
        let mode = match durability {
            Durability::Deferred => {
                let (tx, rx) = mpsc::unbounded_channel();
                tokio::spawn(run_worker(log, rx));
                Mode::Deferred(tx)
            }
            Durability::Inline => Mode::Inline(log),
        };
        Self { mode }
    }

    pub fn durability(&self) -> Durability {
        match self.mode {
            Mode::Deferred(_) => Durability::Deferred,
            Mode::Inline(_) => Durability::Inline,
        }
    }

    /// 書き込みを投入する
    ///
    /// `Deferred` ではキューに積むだけで即座に戻る。`Inline` では書き込み完了まで待つ。
    pub async fn submit(&self, write: LogWrite) {
        match &self.mode {
            Mode::Deferred(tx) => {
                if let Err(mpsc::error::SendError(LogOp::Write(write))) = tx.send(LogOp::Write(write))
                {
                    tracing::warn!(
                        operation = write.name(),
                        client_id = %write.client_id(),
                        "Durable log worker has stopped, dropping write"
                    );
                }
            }
            Mode::Inline(log) => apply(log.as_ref(), &write).await,
        }
    }

    /// それまでに投入した書き込みがすべて反映されたら `done` に通知する
    ///
    /// 呼び出し自体は待たない。
    pub fn flush_then_notify(&self, done: oneshot::Sender<()>) {
        match &self.mode {
            Mode::Deferred(tx) => {
                if let Err(mpsc::error::SendError(LogOp::Flush(done))) = tx.send(LogOp::Flush(done))
                {
                    let _ = done.send(());
                }
            }
            Mode::Inline(_) => {
                let _ = done.send(());
            }
        }
    }

    /// それまでに投入した書き込みがすべて反映されるまで待つ
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        self.flush_then_notify(tx);
        let _ = rx.await;
    }
}

async fn run_worker(log: Arc<dyn DurableLog>, mut rx: mpsc::UnboundedReceiver<LogOp>) {
    while let Some(op) = rx.recv().await {
        match op {
            LogOp::Write(write) => apply(log.as_ref(), &write).await,
            LogOp::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("Durable log worker stopped");
}

async fn apply(log: &dyn DurableLog, write: &LogWrite) {
    let result = match write {
        LogWrite::RecordClient(id) => log.record_client(id).await,
        LogWrite::MarkInactive(id) => log.mark_inactive(id).await,
        LogWrite::AppendMessage(event) => log.append_message(&event.sender, &event.text).await,
    };

    if let Err(e) = result {
        tracing::warn!(
            operation = write.name(),
            client_id = %write.client_id(),
            "Durable log write failed: {}",
            e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{LogError, MessageText, MockDurableLog},
        infrastructure::log::InMemoryLog,
    };

    fn client(id: &str) -> ClientId {
        ClientId::new(id.to_string()).unwrap()
    }

    fn event(sender: &str, text: &str) -> MessageEvent {
        MessageEvent::new(client(sender), MessageText::new(text.to_string()).unwrap())
    }

    #[tokio::test]
    async fn test_deferred_writes_are_applied_in_order() {
        // テスト項目: Deferred では flush 後に全書き込みが投入順で反映されている
        // given (前提条件):
        let log = Arc::new(InMemoryLog::new());
        let writer = LogWriter::new(log.clone(), Durability::Deferred);

        // when (操作):
        writer.submit(LogWrite::RecordClient(client("alice"))).await;
        for i in 0..20 {
            writer
                .submit(LogWrite::AppendMessage(event("alice", &format!("m{}", i))))
                .await;
        }
        writer.flush().await;

        // then (期待する結果):
        let history = log.list_all_messages().await.unwrap();
        let texts: Vec<String> = history.into_iter().map(|e| e.message).collect();
        let expected: Vec<String> = (0..20).map(|i| format!("m{}", i)).collect();
        assert_eq!(texts, expected);
        assert_eq!(log.is_active(&client("alice")).await, Some(true));
    }

    #[tokio::test]
    async fn test_inline_writes_are_visible_immediately() {
        // テスト項目: Inline では submit から戻った時点で書き込みが反映されている
        // given (前提条件):
        let log = Arc::new(InMemoryLog::new());
        let writer = LogWriter::new(log.clone(), Durability::Inline);

        // when (操作):
        writer.submit(LogWrite::RecordClient(client("bob"))).await;
        writer.submit(LogWrite::MarkInactive(client("bob"))).await;

        // then (期待する結果):
        assert_eq!(writer.durability(), Durability::Inline);
        assert_eq!(log.is_active(&client("bob")).await, Some(false));
    }

    #[tokio::test]
    async fn test_write_failure_is_swallowed() {
        // テスト項目: 書き込み失敗はログに残るだけで、後続の書き込みは続行される
        // given (前提条件):
        let mut mock = MockDurableLog::new();
        mock.expect_record_client()
            .times(1)
            .returning(|_| Err(LogError::Database("disk full".to_string())));
        mock.expect_append_message().times(1).returning(|_, _| Ok(()));
        let writer = LogWriter::new(Arc::new(mock), Durability::Inline);

        // when (操作):
        writer.submit(LogWrite::RecordClient(client("alice"))).await;
        writer
            .submit(LogWrite::AppendMessage(event("alice", "hi")))
            .await;

        // then (期待する結果):
        // writer と共に mock が drop され、times(1) の制約がここで検証される
        drop(writer);
    }
}
