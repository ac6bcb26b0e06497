//! UseCase: 接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - userId / username 未指定時の既定値を保証する
//! - 同じ connection_id での再接続が重複ではなく上書きになることを保証する
//! - ストア障害が接続確立の失敗として報告されることを保証する

use std::{sync::Arc, time::Duration};

use hiroba_shared::time::Clock;

use crate::domain::{
    ConnectionId, ConnectionRecord, ConnectionRepository, Timestamp, UserId, Username,
};

use super::error::ConnectError;

/// 接続のユースケース
pub struct ConnectUseCase {
    /// 接続レジストリ
    connections: Arc<dyn ConnectionRepository>,
    clock: Arc<dyn Clock>,
    /// レコードの有効期間（既定 24 時間）
    ttl: Duration,
}

impl ConnectUseCase {
    /// 新しい ConnectUseCase を作成
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            connections,
            clock,
            ttl,
        }
    }

    /// 接続を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - トランスポート層が払い出した接続 ID
    /// * `user_id` - 認証基盤が解決済みのユーザー ID（未指定なら `"anonymous"`）
    /// * `username` - 表示名（未指定なら `"Anonymous"`）
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectionRecord)` - 登録したレコード
    /// * `Err(ConnectError)` - 登録失敗（チャンネルは確立しない。リトライもしない）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        user_id: Option<String>,
        username: Option<String>,
    ) -> Result<ConnectionRecord, ConnectError> {
        let connected_at = Timestamp::new(self.clock.now_millis());
        let ttl_millis = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        let record = ConnectionRecord::new(
            connection_id,
            UserId::or_anonymous(user_id),
            Username::or_anonymous(username),
            connected_at,
            ttl_millis,
        );

        self.connections
            .put_connection(record.clone())
            .await
            .inspect_err(|e| {
                tracing::error!(
                    "Failed to register connection '{}': {}",
                    record.connection_id,
                    e
                )
            })?;

        tracing::info!(
            "Connection '{}' registered (user: '{}')",
            record.connection_id,
            record.user_id.as_str()
        );

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{RepositoryError, repository::MockConnectionRepository},
        usecase::testing::{TEST_START_MILLIS, TEST_TTL_MILLIS, TestContext, connection_id},
    };

    const TTL: Duration = Duration::from_secs(24 * 60 * 60);

    fn create_usecase(ctx: &TestContext) -> ConnectUseCase {
        ConnectUseCase::new(ctx.connections.clone(), ctx.clock.clone(), TTL)
    }

    #[tokio::test]
    async fn test_connect_registers_record() {
        // テスト項目: 接続するとレジストリにレコードが 1 件登録される
        // given (前提条件):
        let ctx = TestContext::new();
        let usecase = create_usecase(&ctx);

        // when (操作):
        let record = usecase
            .execute(
                connection_id("c1"),
                Some("u1".to_string()),
                Some("Alice".to_string()),
            )
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(record.user_id.as_str(), "u1");
        assert_eq!(record.username.as_str(), "Alice");
        assert_eq!(record.connected_at, Timestamp::new(TEST_START_MILLIS));
        assert_eq!(
            record.expires_at,
            Timestamp::new(TEST_START_MILLIS + TEST_TTL_MILLIS)
        );
        let records = ctx.connections.list_connections().await.unwrap();
        assert_eq!(records, vec![record]);
    }

    #[tokio::test]
    async fn test_connect_defaults_to_anonymous() {
        // テスト項目: userId / username 未指定時は匿名の既定値で登録される
        // given (前提条件):
        let ctx = TestContext::new();
        let usecase = create_usecase(&ctx);

        // when (操作):
        let record = usecase
            .execute(connection_id("c1"), None, None)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(record.user_id.as_str(), "anonymous");
        assert_eq!(record.username.as_str(), "Anonymous");
    }

    #[tokio::test]
    async fn test_reconnect_same_id_overwrites() {
        // テスト項目: 同じ connection_id の再接続は上書きになり、重複しない
        // given (前提条件):
        let ctx = TestContext::new();
        let usecase = create_usecase(&ctx);
        usecase
            .execute(connection_id("c1"), Some("u1".to_string()), None)
            .await
            .unwrap();

        // when (操作):
        usecase
            .execute(connection_id("c1"), Some("u2".to_string()), None)
            .await
            .unwrap();

        // then (期待する結果):
        let records = ctx.connections.list_connections().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id.as_str(), "u2");
    }

    #[tokio::test]
    async fn test_connect_reports_store_failure() {
        // テスト項目: ストア障害は ConnectError::StoreUnavailable になる
        // given (前提条件):
        let ctx = TestContext::new();
        let mut connections = MockConnectionRepository::new();
        connections
            .expect_put_connection()
            .times(1)
            .returning(|_| Err(RepositoryError::Unavailable("down".to_string())));
        let usecase = ConnectUseCase::new(Arc::new(connections), ctx.clock.clone(), TTL);

        // when (操作):
        let result = usecase.execute(connection_id("c1"), None, None).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ConnectError::StoreUnavailable(RepositoryError::Unavailable(
                "down".to_string()
            )))
        );
    }
}
