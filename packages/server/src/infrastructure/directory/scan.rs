//! 全件スキャンによる Connection Directory
//!
//! キャッシュも増分インデックスも持たず、呼び出しごとに接続レジストリを全件読み直します。

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    ConnectionDirectory, ConnectionRecord, ConnectionRepository, RepositoryError,
};

pub struct ScanConnectionDirectory {
    connections: Arc<dyn ConnectionRepository>,
}

impl ScanConnectionDirectory {
    pub fn new(connections: Arc<dyn ConnectionRepository>) -> Self {
        Self { connections }
    }
}

#[async_trait]
impl ConnectionDirectory for ScanConnectionDirectory {
    async fn snapshot(&self) -> Result<Vec<ConnectionRecord>, RepositoryError> {
        let records = self.connections.list_connections().await?;
        tracing::debug!("Directory scan returned {} connection(s)", records.len());
        Ok(records)
    }
}
