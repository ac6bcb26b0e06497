//! Server state shared by the handlers.

use std::{sync::Arc, time::Duration};

use crate::{
    domain::ConnectionDirectory,
    infrastructure::delivery::WebSocketDeliveryChannel,
    usecase::GetMessagesUseCase,
};

use super::router::MessageRouter;

/// Shared application state
pub struct AppState {
    /// MessageRouter（4 種類のリクエストの振り分け）
    pub router: Arc<MessageRouter>,
    /// 接続ごとの送信キューを保持する配送チャンネル
    pub delivery_channel: WebSocketDeliveryChannel,
    /// HTTP の履歴 API 用
    pub get_messages_usecase: Arc<GetMessagesUseCase>,
    /// HTTP のデバッグ用接続数 API 用
    pub directory: Arc<dyn ConnectionDirectory>,
    /// 接続ごとの送信キューの容量
    pub outbound_buffer: usize,
    /// 応答フレームを送信キューに積む際の待ち時間の上限
    pub delivery_timeout: Duration,
}
