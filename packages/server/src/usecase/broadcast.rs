//! Fan-out Broadcaster
//!
//! 1 件の送信イベントを、Connection Directory が返す宛先すべてに配送します。
//!
//! - 宛先一覧は呼び出しごとに新しいスナップショットを取る
//! - 宛先ごとに 1 回だけ、並行に配送を試みる（順序保証なし）
//! - 全宛先の結果が出揃うまで待つ（settle-all）。1 件の失敗が他の配送を止めることはない
//! - `Gone` の宛先は接続レジストリから削除する（自己修復）
//! - `Failed` の宛先は記録するだけでレジストリは変更しない
//! - 配送ごとにタイムアウトを設け、超過は `Failed` として扱う（`Gone` にはしない）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - Broadcaster::broadcast() と Broadcaster::send_to()
//!
//! ### なぜこのテストが必要か
//! - 死んだ接続・遅い接続が他の宛先への配送を妨げないことを保証する
//! - Gone のみがレジストリ削除の根拠になることを保証する

use std::{sync::Arc, time::Duration};

use futures_util::future::join_all;

use crate::domain::{
    ConnectionDirectory, ConnectionId, ConnectionRepository, DeliveryChannel, DeliveryOutcome,
    EncodeError, OutboundEncoder, OutboundEvent,
};

use super::error::BroadcastError;

/// ブロードキャスト 1 回分の集計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: Vec<ConnectionId>,
    /// レジストリから削除した宛先
    pub gone: Vec<ConnectionId>,
    pub failed: Vec<(ConnectionId, String)>,
}

impl BroadcastReport {
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.gone.len() + self.failed.len()
    }
}

/// Fan-out Broadcaster
pub struct Broadcaster {
    directory: Arc<dyn ConnectionDirectory>,
    connections: Arc<dyn ConnectionRepository>,
    channel: Arc<dyn DeliveryChannel>,
    encoder: Arc<dyn OutboundEncoder>,
    delivery_timeout: Duration,
}

impl Broadcaster {
    pub fn new(
        directory: Arc<dyn ConnectionDirectory>,
        connections: Arc<dyn ConnectionRepository>,
        channel: Arc<dyn DeliveryChannel>,
        encoder: Arc<dyn OutboundEncoder>,
        delivery_timeout: Duration,
    ) -> Self {
        Self {
            directory,
            connections,
            channel,
            encoder,
            delivery_timeout,
        }
    }

    /// 現在の全宛先（`exclude` を除く）にイベントを配送する
    ///
    /// # Returns
    ///
    /// * `Ok(BroadcastReport)` - 全宛先の配送結果が出揃った
    /// * `Err(BroadcastError)` - 宛先一覧の取得、またはエンコードに失敗した（配送は行われない）
    pub async fn broadcast(
        &self,
        event: &OutboundEvent,
        exclude: Option<&ConnectionId>,
    ) -> Result<BroadcastReport, BroadcastError> {
        let payload = self.encoder.encode(event)?;

        let recipients: Vec<ConnectionId> = self
            .directory
            .snapshot()
            .await?
            .into_iter()
            .map(|record| record.connection_id)
            .filter(|id| exclude != Some(id))
            .collect();

        let outcomes = join_all(recipients.iter().map(|id| self.deliver(id, &payload))).await;

        let mut report = BroadcastReport::default();
        for (id, outcome) in recipients.into_iter().zip(outcomes) {
            match outcome {
                DeliveryOutcome::Delivered => report.delivered.push(id),
                DeliveryOutcome::Gone => report.gone.push(id),
                DeliveryOutcome::Failed(reason) => report.failed.push((id, reason)),
            }
        }

        tracing::info!(
            "Broadcast settled: {} delivered, {} gone, {} failed",
            report.delivered.len(),
            report.gone.len(),
            report.failed.len()
        );

        Ok(report)
    }

    /// 1 つの接続にだけイベントを配送する
    pub async fn send_to(
        &self,
        connection_id: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<DeliveryOutcome, EncodeError> {
        let payload = self.encoder.encode(event)?;
        Ok(self.deliver(connection_id, &payload).await)
    }

    async fn deliver(&self, connection_id: &ConnectionId, payload: &str) -> DeliveryOutcome {
        let outcome = match tokio::time::timeout(
            self.delivery_timeout,
            self.channel.send(connection_id, payload),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => DeliveryOutcome::Failed(format!(
                "delivery timed out after {}ms",
                self.delivery_timeout.as_millis()
            )),
        };

        match &outcome {
            DeliveryOutcome::Delivered => {
                tracing::debug!("Delivered to connection '{}'", connection_id);
            }
            DeliveryOutcome::Gone => {
                tracing::warn!(
                    "Connection '{}' is gone, removing from registry",
                    connection_id
                );
                if let Err(e) = self.connections.delete_connection(connection_id).await {
                    tracing::warn!(
                        "Failed to remove gone connection '{}': {}",
                        connection_id,
                        e
                    );
                }
            }
            DeliveryOutcome::Failed(reason) => {
                tracing::warn!(
                    "Failed to deliver to connection '{}': {}",
                    connection_id,
                    reason
                );
            }
        }

        outcome
    }
}
