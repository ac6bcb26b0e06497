//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 切断が冪等であること（2 回目以降もエラーにならない）を保証する
//! - ストア障害が呼び出し元に報告されることを保証する
//!   （チャンネルの破棄自体は UI 層が障害に関わらず進める）

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRepository};

use super::error::DisconnectError;

/// 切断のユースケース
pub struct DisconnectUseCase {
    /// 接続レジストリ
    connections: Arc<dyn ConnectionRepository>,
}

impl DisconnectUseCase {
    /// 新しい DisconnectUseCase を作成
    pub fn new(connections: Arc<dyn ConnectionRepository>) -> Self {
        Self { connections }
    }

    /// 切断を実行
    ///
    /// レコードが存在しなかった場合も成功として扱う。
    pub async fn execute(&self, connection_id: &ConnectionId) -> Result<(), DisconnectError> {
        self.connections
            .delete_connection(connection_id)
            .await
            .inspect_err(|e| {
                tracing::error!("Failed to remove connection '{}': {}", connection_id, e)
            })?;

        tracing::info!("Connection '{}' removed from registry", connection_id);
        Ok(())
    }
}
