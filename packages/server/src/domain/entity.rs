//! エンティティ
//!
//! どちらも保存後は不変。更新は「削除して作り直す」以外に存在しない。

use super::value_object::{
    ConnectionId, MessageContent, MessageId, OrderingKey, RoomId, Timestamp, UserId, Username,
};

/// 1 本の生きている接続を表すレコード
///
/// 接続レジストリは `connection_id` ごとに高々 1 件のレコードを保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRecord {
    pub connection_id: ConnectionId,
    pub user_id: UserId,
    pub username: Username,
    pub connected_at: Timestamp,
    /// これを過ぎたレコードは失効扱い（回収対象）
    pub expires_at: Timestamp,
}

impl ConnectionRecord {
    pub fn new(
        connection_id: ConnectionId,
        user_id: UserId,
        username: Username,
        connected_at: Timestamp,
        ttl_millis: i64,
    ) -> Self {
        Self {
            connection_id,
            user_id,
            username,
            connected_at,
            expires_at: connected_at.plus_millis(ttl_millis),
        }
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }
}

/// 永続化されたチャットメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub room_id: RoomId,
    pub ordering_key: OrderingKey,
    pub message_id: MessageId,
    pub user_id: UserId,
    pub username: Username,
    pub content: MessageContent,
    pub created_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_record_expiry() {
        // テスト項目: expires_at 以降はレコードが失効扱いになる
        // given (前提条件):
        let record = ConnectionRecord::new(
            ConnectionId::new("c1".to_string()).unwrap(),
            UserId::or_anonymous(Some("u1".to_string())),
            Username::or_anonymous(Some("Alice".to_string())),
            Timestamp::new(1_000),
            500,
        );

        // when (操作) / then (期待する結果):
        assert_eq!(record.expires_at, Timestamp::new(1_500));
        assert!(!record.is_expired(Timestamp::new(1_499)));
        assert!(record.is_expired(Timestamp::new(1_500)));
    }
}
