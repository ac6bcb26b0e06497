//! Data Transfer Objects (DTOs) for the chat relay.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket frame DTOs (inbound envelope, outbound envelope, acks)
//! - `http`: HTTP API response DTOs
//! - `conversion`: domain entity → DTO conversions
//! - `encoder`: JSON implementation of the domain `OutboundEncoder`

pub mod conversion;
pub mod encoder;
pub mod http;
pub mod websocket;

pub use encoder::JsonOutboundEncoder;
