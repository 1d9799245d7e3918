//! クライアントごとのメールボックス
//!
//! 容量付きの FIFO バッファと、冪等な close を提供します。
//!
//! ## 設計ノート
//!
//! - キューと closed フラグは 1 つの `parking_lot::Mutex` で守る（await をまたいで保持しない）
//! - 受信待ちの起床には `tokio::sync::Notify` を使う
//! - close 後は保留中のメッセージを破棄する。close 済みのメールボックスからは何も取り出せない

use std::{collections::VecDeque, time::Duration};

use parking_lot::Mutex;
use tokio::{
    sync::Notify,
    time::{Instant, timeout_at},
};

/// メールボックス容量の下限（通常負荷のバーストを送信側をブロックせずに吸収する）
pub const MIN_MAILBOX_CAPACITY: usize = 100;

/// 満杯のメールボックスへ投入したときの方針
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// 先頭（最も古いメッセージ）を捨てて末尾に追加
    #[default]
    DropOldest,
    /// 投入しようとしたメッセージを捨てる
    DropNewest,
    /// 空きが出るまで最大 `Duration` 待ち、それでも満杯なら投入メッセージを捨てる
    BlockWithTimeout(Duration),
}

/// `deposit` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositOutcome {
    Delivered,
    /// 追加はしたが、最も古いメッセージを 1 件捨てた
    DroppedOldest,
    /// 満杯のため投入メッセージを捨てた
    DroppedNewest,
    /// close 済みのため破棄した
    Closed,
}

#[derive(Debug, Default)]
struct MailboxState {
    queue: VecDeque<String>,
    closed: bool,
}

#[derive(Debug)]
pub struct Mailbox {
    capacity: usize,
    policy: OverflowPolicy,
    state: Mutex<MailboxState>,
    message_arrived: Notify,
    space_freed: Notify,
}

impl Mailbox {
    /// 新しいメールボックスを作成
    ///
    /// `capacity` が `MIN_MAILBOX_CAPACITY` 未満の場合は下限に切り上げる。
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            capacity: capacity.max(MIN_MAILBOX_CAPACITY),
            policy,
            state: Mutex::new(MailboxState::default()),
            message_arrived: Notify::new(),
            space_freed: Notify::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// メッセージを末尾に追加
    ///
    /// close 済みなら黙って破棄する（エラーにはしない）。
    pub async fn deposit(&self, text: String) -> DepositOutcome {
        match self.policy {
            OverflowPolicy::BlockWithTimeout(limit) => self.deposit_or_wait(text, limit).await,
            OverflowPolicy::DropOldest | OverflowPolicy::DropNewest => self.try_deposit(text),
        }
    }

    fn try_deposit(&self, text: String) -> DepositOutcome {
        let mut state = self.state.lock();
        if state.closed {
            return DepositOutcome::Closed;
        }

        let outcome = if state.queue.len() < self.capacity {
            DepositOutcome::Delivered
        } else if self.policy == OverflowPolicy::DropOldest {
            state.queue.pop_front();
            DepositOutcome::DroppedOldest
        } else {
            return DepositOutcome::DroppedNewest;
        };

        state.queue.push_back(text);
        drop(state);
        self.message_arrived.notify_one();
        outcome
    }

    async fn deposit_or_wait(&self, text: String, limit: Duration) -> DepositOutcome {
        let deadline = Instant::now() + limit;
        loop {
            let space = self.space_freed.notified();
            tokio::pin!(space);
            // 状態確認の前に登録しておき、close / 取り出しの通知を取りこぼさない
            space.as_mut().enable();

            {
                let mut state = self.state.lock();
                if state.closed {
                    return DepositOutcome::Closed;
                }
                if state.queue.len() < self.capacity {
                    state.queue.push_back(text);
                    drop(state);
                    self.message_arrived.notify_one();
                    return DepositOutcome::Delivered;
                }
            }

            if timeout_at(deadline, space).await.is_err() {
                return DepositOutcome::DroppedNewest;
            }
        }
    }

    /// 先頭のメッセージを最大 `timeout` 待って取り出す
    ///
    /// タイムアウト、または待機中に close された場合は `None`。
    pub async fn receive_with_timeout(&self, timeout: Duration) -> Option<String> {
        let deadline = Instant::now() + timeout;
        loop {
            let arrived = self.message_arrived.notified();
            tokio::pin!(arrived);
            arrived.as_mut().enable();

            {
                let mut state = self.state.lock();
                if let Some(text) = state.queue.pop_front() {
                    drop(state);
                    self.space_freed.notify_one();
                    return Some(text);
                }
                if state.closed {
                    return None;
                }
            }

            if timeout_at(deadline, arrived).await.is_err() {
                return None;
            }
        }
    }

    /// メールボックスを閉じる
    ///
    /// 何度呼んでもよい。実際に閉じたのがこの呼び出しなら `true`。
    /// 待機中の受信側・投入側はすべて起こされる。
    pub fn close(&self) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            return false;
        }
        state.closed = true;
        state.queue.clear();
        drop(state);

        self.message_arrived.notify_waiters();
        self.space_freed.notify_waiters();
        true
    }
}
