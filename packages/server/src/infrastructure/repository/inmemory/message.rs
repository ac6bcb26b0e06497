//! InMemory メッセージログ実装
//!
//! ルームごとに `ordering_key` 昇順のベクタを保持します。
//! メッセージは書き込み後に変更・削除されません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use hiroba_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, MessageContent, MessageIdFactory, MessageRepository, OrderingKey,
    RepositoryError, RoomId, Timestamp, UserId, Username,
};

#[derive(Default)]
struct MessageLog {
    /// Key: room_id, Value: ordering_key 昇順
    rooms: HashMap<RoomId, Vec<ChatMessage>>,
    /// 同一ミリ秒内のタイブレーク用の書き込み連番
    next_sequence: u64,
}

/// インメモリメッセージログ
pub struct InMemoryMessageRepository {
    log: Mutex<MessageLog>,
    clock: Arc<dyn Clock>,
}

impl InMemoryMessageRepository {
    /// 新しい InMemoryMessageRepository を作成
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            log: Mutex::new(MessageLog::default()),
            clock,
        }
    }
}

/// 新しい方から `limit` 件を古い順のまま切り出す
fn most_recent(sorted: &[ChatMessage], limit: usize) -> Vec<ChatMessage> {
    let start = sorted.len().saturating_sub(limit);
    sorted[start..].to_vec()
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn put_message(
        &self,
        room_id: RoomId,
        user_id: UserId,
        username: Username,
        content: MessageContent,
    ) -> Result<ChatMessage, RepositoryError> {
        let created_at = Timestamp::new(self.clock.now_millis());
        let message_id = MessageIdFactory::generate();

        let mut log = self.log.lock().await;
        log.next_sequence += 1;
        let ordering_key = OrderingKey::new(created_at, log.next_sequence, &message_id);

        let message = ChatMessage {
            room_id: room_id.clone(),
            ordering_key,
            message_id,
            user_id,
            username,
            content,
            created_at,
        };

        let room = log.rooms.entry(room_id).or_default();
        // 時計が巻き戻っても ordering_key の昇順を保つ
        let position = room.partition_point(|m| m.ordering_key <= message.ordering_key);
        room.insert(position, message.clone());

        Ok(message)
    }

    async fn query_messages_by_room(
        &self,
        room_id: &RoomId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let log = self.log.lock().await;
        Ok(log
            .rooms
            .get(room_id)
            .map(|messages| most_recent(messages, limit))
            .unwrap_or_default())
    }

    async fn query_messages_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let log = self.log.lock().await;
        let mut messages: Vec<ChatMessage> = log
            .rooms
            .values()
            .flatten()
            .filter(|m| &m.user_id == user_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.ordering_key.cmp(&b.ordering_key));
        Ok(most_recent(&messages, limit))
    }
}
