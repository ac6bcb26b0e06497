//! UseCase: 失効した接続レコードの回収
//!
//! 閉じ損ねた接続のレコードは `expires_at` を過ぎると宛先一覧から外れますが、
//! ストアには残り続けます。定期タスクからこのユースケースを呼び出して物理的に回収します。

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{ConnectionRepository, RepositoryError, Timestamp};

/// 失効レコード回収のユースケース
pub struct PurgeExpiredConnectionsUseCase {
    connections: Arc<dyn ConnectionRepository>,
    clock: Arc<dyn Clock>,
}

impl PurgeExpiredConnectionsUseCase {
    pub fn new(connections: Arc<dyn ConnectionRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { connections, clock }
    }

    /// 現在時刻の時点で失効しているレコードを回収し、件数を返す
    pub async fn execute(&self) -> Result<usize, RepositoryError> {
        let now = Timestamp::new(self.clock.now_millis());
        let purged = self.connections.purge_expired(now).await?;
        if purged > 0 {
            tracing::info!("Purged {} expired connection records", purged);
        } else {
            tracing::debug!("No expired connection records");
        }
        Ok(purged)
    }
}
