//! インメモリ実装

mod connection;
mod message;

pub use connection::InMemoryConnectionRepository;
pub use message::InMemoryMessageRepository;
