//! ドメイン層
//!
//! チャットリレーの中核となる型とインターフェースを定義します。
//!
//! - `value_object`: ID や本文などの値オブジェクト
//! - `entity`: `ConnectionRecord`, `ChatMessage`
//! - `repository`: 永続化ストアの trait（接続レジストリとメッセージログ）
//! - `directory`: 「現在接続中の宛先」を答える trait
//! - `delivery`: 接続単位の配送チャンネル trait と配送結果

pub mod delivery;
pub mod directory;
pub mod entity;
pub mod error;
pub mod repository;
pub mod value_object;

pub use delivery::{DeliveryChannel, DeliveryOutcome, OutboundEncoder, OutboundEvent};
pub use directory::ConnectionDirectory;
pub use entity::{ChatMessage, ConnectionRecord};
pub use error::{EncodeError, RepositoryError, ValueObjectError};
pub use repository::{ConnectionRepository, MessageRepository};
pub use value_object::{
    ConnectionId, ConnectionIdFactory, HistoryLimit, MessageContent, MessageId,
    MessageIdFactory, OrderingKey, RoomId, Timestamp, UserId, Username,
};
