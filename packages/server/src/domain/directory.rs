//! Connection Directory
//!
//! 「いま配送可能な宛先は誰か」に答える読み取り専用のビュー。
//! 自身は状態を持たず、毎回ストアを読み直します。
//!
//! 既定実装（`infrastructure::directory::ScanConnectionDirectory`）は接続レジストリの全件スキャンで、
//! 1 メッセージあたりのブロードキャストコストは接続数に比例します。
//! 接続数がおよそ 1,000 を超えるとここが支配的なコストになるため、
//! ルーム単位のインデックスなどに差し替える場合はこの trait の実装を置き換えます。
//! Router / Broadcaster 側の変更は不要です。

use async_trait::async_trait;

use super::{ConnectionId, ConnectionRecord, RepositoryError};

#[async_trait]
pub trait ConnectionDirectory: Send + Sync {
    /// 現在の宛先一覧（呼び出しごとに新しいスナップショット）
    async fn snapshot(&self) -> Result<Vec<ConnectionRecord>, RepositoryError>;

    /// スナップショットから接続を線形探索する
    async fn find(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<ConnectionRecord>, RepositoryError> {
        let records = self.snapshot().await?;
        Ok(records
            .into_iter()
            .find(|record| &record.connection_id == connection_id))
    }
}
