//! Broadcast Coordinator
//!
//! クライアントのメンバーシップとメッセージのファンアウトを一手に引き受けます。
//!
//! ## 構成
//!
//! - `Coordinator`: 呼び出し側が持つハンドル（Clone 可能）。コマンドを送って応答を待つ
//! - `ControlLoop`: レジストリを排他的に所有する単一タスク。コマンドを 1 件ずつ処理する
//!
//! レジストリを書き換えるのは制御ループだけなので、レジストリ自体のロックは不要です。
//! ループは register / unregister のたびにレジストリのスナップショットを `watch` で公開し、
//! 受信（retrieve）はコマンドを送らずにそのスナップショットからメールボックスを引きます。
//! そのため、満杯のメールボックスで配信がブロックしていても受信は待たされません。
//!
//! ```text
//! register ─┐
//! unregister┼─> [mpsc: Command] ──> ControlLoop ──> Mailbox (per client)
//! broadcast ┘                           │
//!                                       ├──> [watch: Directory] <── retrieve
//!                                       └──> LogWriter ──> DurableLog
//! ```

use std::{collections::HashMap, sync::Arc, time::Duration};

use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};

use crate::domain::{ClientId, DurableLog, MessageEvent, MessageText};

use super::{
    log_writer::{Durability, LogWrite, LogWriter},
    mailbox::{DepositOutcome, MIN_MAILBOX_CAPACITY, Mailbox, OverflowPolicy},
};

/// コマンドチャンネルのバッファサイズ
const COMMAND_BUFFER: usize = 256;

/// 制御ループが公開するレジストリのスナップショット
type Directory = Arc<HashMap<ClientId, Arc<Mailbox>>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    #[error("client '{0}' is not registered")]
    ClientNotFound(String),

    #[error("broadcast coordinator has stopped")]
    Stopped,
}

/// Coordinator の設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    pub mailbox_capacity: usize,
    pub overflow_policy: OverflowPolicy,
    pub durability: Durability,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: MIN_MAILBOX_CAPACITY,
            overflow_policy: OverflowPolicy::default(),
            durability: Durability::default(),
        }
    }
}

enum Command {
    Register {
        client_id: ClientId,
        ack: oneshot::Sender<()>,
    },
    Unregister {
        client_id: ClientId,
        ack: oneshot::Sender<bool>,
    },
    Broadcast {
        event: MessageEvent,
        ack: oneshot::Sender<usize>,
    },
    Snapshot {
        reply: oneshot::Sender<Vec<ClientId>>,
    },
    FlushLog {
        done: oneshot::Sender<()>,
    },
    Shutdown {
        ack: oneshot::Sender<()>,
    },
}

/// 制御ループへのハンドル
#[derive(Clone)]
pub struct Coordinator {
    commands: mpsc::Sender<Command>,
    directory: watch::Receiver<Directory>,
}

impl Coordinator {
    /// 制御ループを起動し、そのハンドルを返す
    pub fn spawn(log: Arc<dyn DurableLog>, config: CoordinatorConfig) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let (directory_tx, directory_rx) = watch::channel(Directory::default());
        let control_loop = ControlLoop {
            registry: HashMap::new(),
            commands: rx,
            directory: directory_tx,
            log: LogWriter::new(log, config.durability),
            config,
        };
        tokio::spawn(control_loop.run());
        Self {
            commands: tx,
            directory: directory_rx,
        }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, CoordinatorError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(make(tx))
            .await
            .map_err(|_| CoordinatorError::Stopped)?;
        rx.await.map_err(|_| CoordinatorError::Stopped)
    }

    /// クライアントを登録する
    ///
    /// 同じ ID が登録済みなら新しい空のメールボックスで置き換える（後勝ち）。
    pub async fn register_client(&self, client_id: ClientId) -> Result<(), CoordinatorError> {
        self.request(|ack| Command::Register { client_id, ack }).await
    }

    /// クライアントの登録を解除する
    ///
    /// 未登録の ID は何もしない。実際に解除した場合は `true`。
    pub async fn unregister_client(&self, client_id: ClientId) -> Result<bool, CoordinatorError> {
        self.request(|ack| Command::Unregister { client_id, ack })
            .await
    }

    /// 登録中の全クライアントにメッセージを配信する
    ///
    /// 配信先（制御ループが処理した時点のレジストリ）の件数を返す。
    pub async fn broadcast_message(
        &self,
        sender: ClientId,
        text: MessageText,
    ) -> Result<usize, CoordinatorError> {
        let event = MessageEvent::new(sender, text);
        self.request(|ack| Command::Broadcast { event, ack }).await
    }

    /// `client_id` 宛ての次のメッセージを最大 `timeout` 待って取り出す
    ///
    /// - `Ok(Some(text))`: メッセージを受信
    /// - `Ok(None)`: タイムアウト、または待機中に登録解除された
    /// - `Err(ClientNotFound)`: 未登録（待たずに即座に返る）
    ///
    /// 制御ループには問い合わせず、ループが公開した最新のスナップショットを参照する。
    pub async fn retrieve_message(
        &self,
        client_id: &ClientId,
        timeout: Duration,
    ) -> Result<Option<String>, CoordinatorError> {
        if self.commands.is_closed() {
            return Err(CoordinatorError::Stopped);
        }

        // borrow のガードは await をまたがない
        let mailbox = self.directory.borrow().get(client_id).cloned();
        let mailbox =
            mailbox.ok_or_else(|| CoordinatorError::ClientNotFound(client_id.to_string()))?;

        Ok(mailbox.receive_with_timeout(timeout).await)
    }

    /// 登録中のクライアント ID 一覧（ソート済み）
    pub async fn registered_clients(&self) -> Result<Vec<ClientId>, CoordinatorError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// それまでに受け付けた操作の永続化が完了するまで待つ
    pub async fn flush_log(&self) -> Result<(), CoordinatorError> {
        self.request(|done| Command::FlushLog { done }).await
    }

    /// 制御ループを停止する
    ///
    /// 全メールボックスを閉じ、保留中の永続化を書き切ってから戻る。
    pub async fn shutdown(&self) -> Result<(), CoordinatorError> {
        self.request(|ack| Command::Shutdown { ack }).await
    }
}

struct ControlLoop {
    registry: HashMap<ClientId, Arc<Mailbox>>,
    commands: mpsc::Receiver<Command>,
    directory: watch::Sender<Directory>,
    log: LogWriter,
    config: CoordinatorConfig,
}

impl ControlLoop {
    async fn run(mut self) {
        tracing::debug!(
            capacity = self.config.mailbox_capacity,
            policy = ?self.config.overflow_policy,
            durability = ?self.log.durability(),
            "Broadcast control loop started"
        );

        while let Some(command) = self.commands.recv().await {
            match command {
                Command::Register { client_id, ack } => {
                    self.register(client_id).await;
                    let _ = ack.send(());
                }
                Command::Unregister { client_id, ack } => {
                    let removed = self.unregister(client_id).await;
                    let _ = ack.send(removed);
                }
                Command::Broadcast { event, ack } => {
                    let recipients = self.broadcast(event).await;
                    let _ = ack.send(recipients);
                }
                Command::Snapshot { reply } => {
                    let mut client_ids: Vec<ClientId> = self.registry.keys().cloned().collect();
                    client_ids.sort();
                    let _ = reply.send(client_ids);
                }
                Command::FlushLog { done } => {
                    self.log.flush_then_notify(done);
                }
                Command::Shutdown { ack } => {
                    self.stop().await;
                    let _ = ack.send(());
                    return;
                }
            }
        }

        // 全ハンドルが drop された
        self.stop().await;
    }

    async fn register(&mut self, client_id: ClientId) {
        let mailbox = Arc::new(Mailbox::new(
            self.config.mailbox_capacity,
            self.config.overflow_policy,
        ));

        let previous = self.registry.insert(client_id.clone(), mailbox);
        self.publish();

        if let Some(previous) = previous {
            previous.close();
            tracing::info!("Client '{}' re-registered, mailbox reset", client_id);
        } else {
            tracing::info!("Client '{}' joined", client_id);
        }

        self.log.submit(LogWrite::RecordClient(client_id)).await;
    }

    async fn unregister(&mut self, client_id: ClientId) -> bool {
        let Some(mailbox) = self.registry.remove(&client_id) else {
            tracing::debug!("Client '{}' is not registered, nothing to do", client_id);
            return false;
        };
        self.publish();

        mailbox.close();
        tracing::info!("Client '{}' left", client_id);

        self.log.submit(LogWrite::MarkInactive(client_id)).await;
        true
    }

    async fn broadcast(&mut self, event: MessageEvent) -> usize {
        let formatted = event.formatted();
        let mut recipients = 0;

        for (client_id, mailbox) in &self.registry {
            match mailbox.deposit(formatted.clone()).await {
                DepositOutcome::Delivered => recipients += 1,
                DepositOutcome::DroppedOldest => {
                    recipients += 1;
                    tracing::warn!(
                        "Mailbox of '{}' is full ({}/{}), dropped its oldest message",
                        client_id,
                        mailbox.len(),
                        mailbox.capacity()
                    );
                }
                DepositOutcome::DroppedNewest => {
                    tracing::warn!(
                        "Mailbox of '{}' is full ({}/{}), message from '{}' not delivered",
                        client_id,
                        mailbox.len(),
                        mailbox.capacity(),
                        event.sender
                    );
                }
                DepositOutcome::Closed => {
                    tracing::debug!("Mailbox of '{}' is closed, skipping", client_id);
                }
            }
        }

        tracing::debug!(
            "Broadcasted message from '{}' to {} client(s)",
            event.sender,
            recipients
        );

        self.log.submit(LogWrite::AppendMessage(event)).await;
        recipients
    }

    /// 受信側が参照するスナップショットを現在のレジストリで置き換える
    fn publish(&self) {
        self.directory.send_replace(Arc::new(self.registry.clone()));
    }

    async fn stop(&mut self) {
        self.commands.close();
        let registry = std::mem::take(&mut self.registry);
        self.publish();
        for (client_id, mailbox) in registry {
            if !mailbox.is_empty() {
                tracing::debug!(
                    "Discarding {} pending message(s) of '{}'",
                    mailbox.len(),
                    client_id
                );
            }
            mailbox.close();
            tracing::debug!("Closed mailbox of '{}' on shutdown", client_id);
        }
        self.log.flush().await;
        tracing::info!("Broadcast control loop stopped");
    }
}
