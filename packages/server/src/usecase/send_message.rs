//! UseCase: メッセージ送信処理
//!
//! 1. 本文を検証する（空・空白のみ・文字列以外は拒否）
//! 2. Connection Directory のスナップショットから送信者を探す
//! 3. 送信者の userId / username でメッセージログに保存する
//!    （ペイロードに含まれる値は使わない。身元はレジストリ、本文はペイロードから取る）
//! 4. 現在の全接続に `newMessage` をブロードキャストする（送信者自身を含む）
//!
//! 保存の成功は保証するが、配送の成功は保証しない。宛先ごとの配送失敗や
//! 宛先一覧の取得失敗は送信者への応答に影響しない。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//!
//! ### どのような状況を想定しているか
//! - 正常系：保存とブロードキャスト
//! - 異常系：本文なし、未登録の接続、ストア障害
//! - エッジケース：一部の宛先が Gone / Failed

use std::sync::Arc;

use crate::domain::{
    ChatMessage, ConnectionDirectory, ConnectionId, MessageContent, MessageRepository,
    OutboundEvent, RoomId,
};

use super::{Broadcaster, error::SendMessageError};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// メッセージログ
    messages: Arc<dyn MessageRepository>,
    /// 送信者の解決に使う Connection Directory
    directory: Arc<dyn ConnectionDirectory>,
    broadcaster: Arc<Broadcaster>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        directory: Arc<dyn ConnectionDirectory>,
        broadcaster: Arc<Broadcaster>,
    ) -> Self {
        Self {
            messages,
            directory,
            broadcaster,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 送信元の接続 ID
    /// * `content` - 本文（文字列でない場合は `None`）
    /// * `room_id` - 宛先ルーム（未指定なら `"global"`）
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 保存したメッセージ
    /// * `Err(SendMessageError)` - 検証エラー、またはストア障害
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        content: Option<String>,
        room_id: Option<String>,
    ) -> Result<ChatMessage, SendMessageError> {
        // 1. 本文の検証
        let content = content
            .and_then(|c| MessageContent::new(c).ok())
            .ok_or(SendMessageError::EmptyContent)?;

        // 2. 送信者の解決
        let sender = self
            .directory
            .find(connection_id)
            .await?
            .ok_or_else(|| SendMessageError::ConnectionNotFound(connection_id.to_string()))?;

        // 3. 保存
        let message = self
            .messages
            .put_message(
                RoomId::or_default(room_id),
                sender.user_id,
                sender.username,
                content,
            )
            .await
            .inspect_err(|e| tracing::error!("Failed to persist message: {}", e))?;

        tracing::info!(
            "Message '{}' persisted in room '{}' from '{}'",
            message.message_id.as_str(),
            message.room_id.as_str(),
            connection_id
        );

        // 4. ブロードキャスト
        let event = OutboundEvent::NewMessage(message.clone());
        if let Err(e) = self.broadcaster.broadcast(&event, None).await {
            tracing::error!(
                "Broadcast of message '{}' failed: {}",
                message.message_id.as_str(),
                e
            );
        }

        Ok(message)
    }
}
