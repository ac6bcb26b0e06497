//! Connection Directory 実装
//!
//! - `scan`: 接続レジストリの全件スキャン（既定）

pub mod scan;

pub use scan::ScanConnectionDirectory;
