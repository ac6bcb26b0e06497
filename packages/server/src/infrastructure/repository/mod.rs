//! Repository 実装
//!
//! - `inmemory`: プロセス内の HashMap を使った実装
//! - 将来的に: DynamoDB などのマネージドストア

pub mod inmemory;

pub use inmemory::{InMemoryConnectionRepository, InMemoryMessageRepository};
