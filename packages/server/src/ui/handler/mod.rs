//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{connection_count, health_check, messages_by_room, messages_by_user};
pub use websocket::websocket_handler;
