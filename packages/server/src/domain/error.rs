//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクトの生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    EmptyConnectionId,

    #[error("message id must not be empty")]
    EmptyMessageId,

    #[error("message content must not be empty")]
    EmptyContent,
}

/// ストア（接続レジストリ / メッセージログ）のエラー
///
/// 一時的なインフラ障害を表します。ストア内部ではリトライせず、常に呼び出し元へ返します。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// 送信ペイロードのエンコードエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to encode outbound payload: {0}")]
pub struct EncodeError(pub String);
