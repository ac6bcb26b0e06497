//! InMemory 接続レジストリ実装
//!
//! ドメイン層が定義する `ConnectionRepository` trait の具体的な実装。
//! HashMap をインメモリ DB として使用し、`connection_id` をキーにします。
//!
//! 失効（TTL）はマネージドストアと同様に「いずれ消える」扱いです。
//! `list_connections` は読み出し時に失効済みレコードを除外し、
//! 物理的な回収は `purge_expired` が行います。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use hiroba_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, ConnectionRecord, ConnectionRepository, RepositoryError, Timestamp,
};

/// インメモリ接続レジストリ
pub struct InMemoryConnectionRepository {
    /// Key: connection_id
    records: Mutex<HashMap<ConnectionId, ConnectionRecord>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryConnectionRepository {
    /// 新しい InMemoryConnectionRepository を作成
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryConnectionRepository {
    async fn put_connection(&self, record: ConnectionRecord) -> Result<(), RepositoryError> {
        let mut records = self.records.lock().await;
        records.insert(record.connection_id.clone(), record);
        Ok(())
    }

    async fn delete_connection(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<(), RepositoryError> {
        let mut records = self.records.lock().await;
        records.remove(connection_id);
        Ok(())
    }

    async fn list_connections(&self) -> Result<Vec<ConnectionRecord>, RepositoryError> {
        let now = Timestamp::new(self.clock.now_millis());
        let records = self.records.lock().await;
        Ok(records
            .values()
            .filter(|record| !record.is_expired(now))
            .cloned()
            .collect())
    }

    async fn purge_expired(&self, now: Timestamp) -> Result<usize, RepositoryError> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, record| !record.is_expired(now));
        Ok(before - records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{UserId, Username};
    use hiroba_shared::time::ManualClock;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - put / delete / list / purge_expired の基本動作
    // - connection_id ごとに高々 1 件しか保持しないこと
    // - 失効レコードが list から除外され、purge で回収されること
    //
    // 【なぜこのテストが必要か】
    // - ブロードキャストの宛先はこのレジストリの全件スキャンで決まる
    // - 重複や失効レコードの混入はそのまま誤配送につながる
    // ========================================

    const TTL: i64 = 24 * 60 * 60 * 1000;

    fn record(connection_id: &str, user_id: &str, connected_at: i64) -> ConnectionRecord {
        ConnectionRecord::new(
            ConnectionId::new(connection_id.to_string()).unwrap(),
            UserId::or_anonymous(Some(user_id.to_string())),
            Username::or_anonymous(Some(user_id.to_uppercase())),
            Timestamp::new(connected_at),
            TTL,
        )
    }

    fn create_test_repository() -> (InMemoryConnectionRepository, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000));
        (InMemoryConnectionRepository::new(clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_put_connection_overwrites_same_id() {
        // テスト項目: 同じ connection_id で put すると上書きされ、重複しない
        // given (前提条件):
        let (repo, _clock) = create_test_repository();
        repo.put_connection(record("c1", "u1", 1_000)).await.unwrap();

        // when (操作):
        repo.put_connection(record("c1", "u2", 1_000)).await.unwrap();

        // then (期待する結果):
        let records = repo.list_connections().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id.as_str(), "u2");
    }

    #[tokio::test]
    async fn test_delete_connection_is_idempotent() {
        // テスト項目: 存在しない接続を削除してもエラーにならない
        // given (前提条件):
        let (repo, _clock) = create_test_repository();
        repo.put_connection(record("c1", "u1", 1_000)).await.unwrap();
        let c1 = ConnectionId::new("c1".to_string()).unwrap();

        // when (操作):
        let first = repo.delete_connection(&c1).await;
        let second = repo.delete_connection(&c1).await;

        // then (期待する結果):
        assert!(first.is_ok());
        assert!(second.is_ok());
        assert!(repo.list_connections().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_connections_excludes_expired() {
        // テスト項目: 失効したレコードは list に含まれない
        // given (前提条件):
        let (repo, clock) = create_test_repository();
        repo.put_connection(record("old", "u1", 1_000)).await.unwrap();
        repo.put_connection(record("new", "u2", 1_000 + TTL / 2))
            .await
            .unwrap();

        // when (操作):
        clock.advance(TTL);
        let records = repo.list_connections().await.unwrap();

        // then (期待する結果):
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].connection_id.as_str(), "new");
    }

    #[tokio::test]
    async fn test_purge_expired_removes_only_expired() {
        // テスト項目: purge_expired は失効したレコードだけを回収する
        // given (前提条件):
        let (repo, clock) = create_test_repository();
        repo.put_connection(record("old", "u1", 1_000)).await.unwrap();
        repo.put_connection(record("new", "u2", 1_000 + TTL)).await.unwrap();
        clock.advance(TTL);

        // when (操作):
        let purged = repo
            .purge_expired(Timestamp::new(clock.now_millis()))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(purged, 1);
        let records = repo.list_connections().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].connection_id.as_str(), "new");
    }
}
