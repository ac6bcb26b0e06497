//! WebSocket を使った DeliveryChannel 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信キュー（`mpsc::Sender`）を管理
//! - クライアントへのペイロード配送と、配送結果（Delivered / Gone / Failed）の判定
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! UI 層は接続受付時に送信キューを作って `register` し、切断時に `unregister` します。
//! この実装は登録されたキューを使って配送するだけです。
//!
//! 送信キューは有界です。キューが詰まっている間 `send` は待機し、
//! 待機の打ち切り（タイムアウト）は呼び出し側（Broadcaster）が決めます。
//! キューが未登録、または受信側が閉じている場合はチャンネル消滅（Gone）とみなします。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use crate::domain::{ConnectionId, DeliveryChannel, DeliveryOutcome};

/// 接続ごとの送信キュー
pub type OutboundSender = mpsc::Sender<String>;

/// WebSocket を使った DeliveryChannel 実装
#[derive(Clone, Default)]
pub struct WebSocketDeliveryChannel {
    /// Key: connection_id, Value: 送信キュー
    clients: Arc<Mutex<HashMap<ConnectionId, OutboundSender>>>,
}

impl WebSocketDeliveryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// 接続の送信キューを登録（同じ ID は上書き）
    pub async fn register(&self, connection_id: ConnectionId, sender: OutboundSender) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Connection '{}' registered to delivery channel", connection_id);
        clients.insert(connection_id, sender);
    }

    /// 接続の送信キューを登録解除
    pub async fn unregister(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from delivery channel",
            connection_id
        );
    }

    /// 登録中の送信キュー数
    #[cfg(test)]
    pub(crate) async fn registered_count(&self) -> usize {
        self.clients.lock().await.len()
    }
}

#[async_trait]
impl DeliveryChannel for WebSocketDeliveryChannel {
    async fn send(&self, connection_id: &ConnectionId, payload: &str) -> DeliveryOutcome {
        // キューの送信待ちの間ロックを保持しないよう、sender を複製してから解放する
        let sender = {
            let clients = self.clients.lock().await;
            clients.get(connection_id).cloned()
        };

        let Some(sender) = sender else {
            tracing::debug!("Connection '{}' has no outbound queue", connection_id);
            return DeliveryOutcome::Gone;
        };

        match sender.send(payload.to_string()).await {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(_) => {
                tracing::debug!("Outbound queue of connection '{}' is closed", connection_id);
                DeliveryOutcome::Gone
            }
        }
    }
}
