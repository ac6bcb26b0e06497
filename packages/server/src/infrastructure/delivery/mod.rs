//! 配送チャンネルの実装
//!
//! ## 概要
//!
//! このモジュールは `DeliveryChannel` trait の具体的な実装を提供します。
//!
//! ## 実装
//!
//! - `websocket`: WebSocket を使った実装
//! - 将来的に: API Gateway の Management API など

pub mod websocket;

pub use websocket::{OutboundSender, WebSocketDeliveryChannel};
