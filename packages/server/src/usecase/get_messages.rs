//! UseCase: 履歴取得処理
//!
//! WebSocket の `getMessages` では、取得した履歴を `messageHistory` として
//! 要求元の接続にだけ返します（他の接続には配送しない）。
//! HTTP API 向けに、ルーム別・ユーザー別の履歴をそのまま返す操作も提供します。
//!
//! 件数は `HistoryLimit` で丸めます（未指定・0 以下は 50 件、上限 100 件）。
//! 結果は常に古い順で、範囲内で最も新しいメッセージが選ばれます。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - GetMessagesUseCase::execute()、history_by_room()、history_by_user()
//!
//! ### どのような状況を想定しているか
//! - 正常系：件数指定、件数の既定値と上限、ルーム未指定
//! - 異常系：要求元への配送失敗、ストア障害

use std::sync::Arc;

use crate::domain::{
    ChatMessage, ConnectionId, DeliveryOutcome, HistoryLimit, MessageRepository, OutboundEvent,
    RoomId, UserId,
};

use super::{Broadcaster, error::GetMessagesError};

/// 履歴取得のユースケース
pub struct GetMessagesUseCase {
    /// メッセージログ
    messages: Arc<dyn MessageRepository>,
    /// 要求元への配送に使う
    broadcaster: Arc<Broadcaster>,
}

impl GetMessagesUseCase {
    /// 新しい GetMessagesUseCase を作成
    pub fn new(messages: Arc<dyn MessageRepository>, broadcaster: Arc<Broadcaster>) -> Self {
        Self {
            messages,
            broadcaster,
        }
    }

    /// 履歴を取得し、要求元の接続に `messageHistory` として配送する
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 要求元の接続 ID
    /// * `room_id` - 対象ルーム（未指定なら `"global"`）
    /// * `limit` - 取得件数（丸め前の値）
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ChatMessage>)` - 配送した履歴（古い順）
    /// * `Err(GetMessagesError)` - ストア障害、または要求元への配送失敗
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: Option<String>,
        limit: Option<f64>,
    ) -> Result<Vec<ChatMessage>, GetMessagesError> {
        let history = self.history_by_room(room_id, limit).await?;

        let event = OutboundEvent::MessageHistory(history.clone());
        match self.broadcaster.send_to(connection_id, &event).await? {
            DeliveryOutcome::Delivered => {
                tracing::info!(
                    "Sent {} history messages to '{}'",
                    history.len(),
                    connection_id
                );
                Ok(history)
            }
            DeliveryOutcome::Gone => Err(GetMessagesError::DeliveryFailed(format!(
                "connection '{}' is gone",
                connection_id
            ))),
            DeliveryOutcome::Failed(reason) => Err(GetMessagesError::DeliveryFailed(reason)),
        }
    }

    /// ルームの履歴を取得する（古い順）
    pub async fn history_by_room(
        &self,
        room_id: Option<String>,
        limit: Option<f64>,
    ) -> Result<Vec<ChatMessage>, GetMessagesError> {
        let room_id = RoomId::or_default(room_id);
        let limit = HistoryLimit::clamp(limit);

        let history = self
            .messages
            .query_messages_by_room(&room_id, limit.value())
            .await
            .inspect_err(|e| {
                tracing::error!("Failed to query room '{}': {}", room_id.as_str(), e)
            })?;
        Ok(history)
    }

    /// ユーザーの投稿履歴をルーム横断で取得する（古い順）
    pub async fn history_by_user(
        &self,
        user_id: String,
        limit: Option<f64>,
    ) -> Result<Vec<ChatMessage>, GetMessagesError> {
        let user_id = UserId::from(user_id);
        let limit = HistoryLimit::clamp(limit);

        let history = self
            .messages
            .query_messages_by_user(&user_id, limit.value())
            .await
            .inspect_err(|e| {
                tracing::error!("Failed to query user '{}': {}", user_id.as_str(), e)
            })?;
        Ok(history)
    }
}
