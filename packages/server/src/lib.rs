//! Hiroba: a real-time chat relay.
//!
//! Clients hold a WebSocket channel open, send chat messages into named rooms and
//! fetch room history. Every accepted message is persisted first and then fanned out
//! to every live connection on a best-effort basis.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
