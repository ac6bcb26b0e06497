//! UseCase 層
//!
//! 接続・切断・メッセージ送信・履歴取得と、それらが共有する Fan-out Broadcaster を提供します。

pub mod broadcast;
pub mod connect;
pub mod disconnect;
pub mod error;
pub mod get_messages;
pub mod purge_expired;
pub mod send_message;

#[cfg(test)]
pub(crate) mod testing;

pub use broadcast::{BroadcastReport, Broadcaster};
pub use connect::ConnectUseCase;
pub use disconnect::DisconnectUseCase;
pub use error::{
    BroadcastError, ConnectError, DisconnectError, GetMessagesError, SendMessageError,
};
pub use get_messages::GetMessagesUseCase;
pub use purge_expired::PurgeExpiredConnectionsUseCase;
pub use send_message::SendMessageUseCase;
