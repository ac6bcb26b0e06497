//! 配送チャンネル
//!
//! ## 概要
//!
//! 接続ごとのクライアントへペイロードを届けるインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（`infrastructure::delivery`）。
//!
//! 1 回の `send` の結果は次のいずれか:
//!
//! - `Delivered`: 配送済み
//! - `Gone`: トランスポートがチャンネルの消滅を確認した（レジストリ掃除のシグナル）
//! - `Failed`: それ以外の失敗（一時的な可能性があるためレジストリは変更しない）

use async_trait::async_trait;

use super::{ChatMessage, ConnectionId, EncodeError};

/// 1 回の配送試行の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Gone,
    Failed(String),
}

/// 接続単位の配送チャンネル
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    async fn send(&self, connection_id: &ConnectionId, payload: &str) -> DeliveryOutcome;
}

/// クライアントへ送るイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    /// 新着メッセージ（ブロードキャスト）
    NewMessage(ChatMessage),
    /// 履歴（要求した接続にのみ送る）
    MessageHistory(Vec<ChatMessage>),
}

/// `OutboundEvent` をワイヤ形式に変換する
///
/// ブロードキャストでは宛先数に関わらず 1 回だけ呼ばれます。
pub trait OutboundEncoder: Send + Sync {
    fn encode(&self, event: &OutboundEvent) -> Result<String, EncodeError>;
}
