//! UseCase 層のエラー型
//!
//! 入力の検証エラー（呼び出し元の責任）と、ストア障害などのインフラエラー（一時的な障害）を
//! 呼び出し元が区別できるようにしています。

use thiserror::Error;

use crate::domain::{EncodeError, RepositoryError};

/// 接続処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("failed to register connection: {0}")]
    StoreUnavailable(#[from] RepositoryError),
}

/// 切断処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisconnectError {
    #[error("failed to remove connection: {0}")]
    StoreUnavailable(#[from] RepositoryError),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("message content is required")]
    EmptyContent,

    #[error("connection not found: {0}")]
    ConnectionNotFound(String),

    #[error("failed to send message: {0}")]
    StoreUnavailable(#[from] RepositoryError),
}

impl SendMessageError {
    /// 入力起因の拒否かどうか（false ならインフラ障害）
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SendMessageError::EmptyContent | SendMessageError::ConnectionNotFound(_)
        )
    }
}

/// 履歴取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetMessagesError {
    #[error("failed to query messages: {0}")]
    StoreUnavailable(#[from] RepositoryError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("failed to deliver message history: {0}")]
    DeliveryFailed(String),
}

/// ブロードキャストのエラー
///
/// 宛先ごとの配送失敗はここに含まれません（`BroadcastReport` に集計されます）。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    #[error("failed to list recipients: {0}")]
    Directory(#[from] RepositoryError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}
