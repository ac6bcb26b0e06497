//! Repository trait 定義
//!
//! ドメイン層が必要とする永続化ストアのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ストアは独立したキーを持つ 2 つのテーブルから成ります。
//!
//! - 接続レジストリ: `connection_id` がキー（ルームでは分割されない）
//! - メッセージログ: `room_id` がパーティションキー、`ordering_key` がソートキー
//!
//! テーブルをまたぐトランザクションはありません。どの操作も単一アイテムに対して
//! アトミックで、失敗はすべて `RepositoryError::Unavailable` として呼び出し元に返ります。

use async_trait::async_trait;

use super::{
    ChatMessage, ConnectionId, ConnectionRecord, MessageContent, RepositoryError, RoomId,
    Timestamp, UserId, Username,
};

/// 接続レジストリ
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// `connection_id` をキーに保存（既存なら上書き）。冪等。
    async fn put_connection(&self, record: ConnectionRecord) -> Result<(), RepositoryError>;

    /// 存在すれば削除。存在しなくてもエラーにしない。
    async fn delete_connection(&self, connection_id: &ConnectionId)
    -> Result<(), RepositoryError>;

    /// 失効していない全レコードを返す（順不同、全件スキャン）
    async fn list_connections(&self) -> Result<Vec<ConnectionRecord>, RepositoryError>;

    /// `now` 時点で失効しているレコードを回収し、回収件数を返す
    async fn purge_expired(&self, now: Timestamp) -> Result<usize, RepositoryError>;
}

/// メッセージログ
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// `message_id` と `ordering_key` を払い出して保存し、保存したメッセージを返す
    async fn put_message(
        &self,
        room_id: RoomId,
        user_id: UserId,
        username: Username,
        content: MessageContent,
    ) -> Result<ChatMessage, RepositoryError>;

    /// ルームの新しい方から最大 `limit` 件を、古い順に並べて返す
    async fn query_messages_by_room(
        &self,
        room_id: &RoomId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError>;

    /// ユーザーの投稿をルーム横断で、新しい方から最大 `limit` 件を古い順に並べて返す
    async fn query_messages_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError>;
}
