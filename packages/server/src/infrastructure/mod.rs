//! Infrastructure 層
//!
//! ドメイン層の trait に対する具体的な実装を提供します。

pub mod delivery;
pub mod directory;
pub mod dto;
pub mod repository;
