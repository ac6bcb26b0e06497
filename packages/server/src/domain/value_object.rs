//! 値オブジェクト
//!
//! 文字列や数値をそのまま受け渡さず、生成時に不変条件を検証した型で表現します。

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// 匿名ユーザーの既定 ID
pub const ANONYMOUS_USER_ID: &str = "anonymous";
/// 匿名ユーザーの既定表示名
pub const ANONYMOUS_USERNAME: &str = "Anonymous";
/// 既定のルーム
pub const DEFAULT_ROOM_ID: &str = "global";
/// 履歴取得件数の既定値
pub const DEFAULT_HISTORY_LIMIT: usize = 50;
/// 履歴取得件数の上限
pub const MAX_HISTORY_LIMIT: usize = 100;

// ========================================
// ConnectionId
// ========================================

/// 接続 ID（トランスポート層が接続時に払い出す不透明な文字列）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyConnectionId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ConnectionId の生成器（UUID v4）
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> ConnectionId {
        ConnectionId(Uuid::new_v4().to_string())
    }
}

// ========================================
// UserId / Username
// ========================================

/// ユーザー ID（接続時に呼び出し元が与える。コアでは検証しない）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// 未指定または空文字列なら `"anonymous"` になる
    pub fn or_anonymous(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Self(v),
            _ => Self(ANONYMOUS_USER_ID.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self::or_anonymous(Some(value))
    }
}

/// 表示名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// 未指定または空文字列なら `"Anonymous"` になる
    pub fn or_anonymous(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Self(v),
            _ => Self(ANONYMOUS_USERNAME.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

// ========================================
// RoomId
// ========================================

/// ルーム ID（管理対象のエンティティではなく、メッセージのパーティションキー）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    /// 未指定または空文字列なら `"global"` になる
    pub fn or_default(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Self(v),
            _ => Self::global(),
        }
    }

    pub fn global() -> Self {
        Self(DEFAULT_ROOM_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for RoomId {
    fn from(value: String) -> Self {
        Self::or_default(Some(value))
    }
}

// ========================================
// MessageId / MessageContent
// ========================================

/// メッセージ ID（書き込み時に生成される一意な文字列）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyMessageId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// MessageId の生成器（UUID v4）
pub struct MessageIdFactory;

impl MessageIdFactory {
    pub fn generate() -> MessageId {
        MessageId(Uuid::new_v4().to_string())
    }
}

/// メッセージ本文
///
/// 前後の空白を取り除いた、空でないテキスト。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyContent);
        }
        if trimmed.len() == value.len() {
            Ok(Self(value))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

// ========================================
// Timestamp / OrderingKey
// ========================================

/// Unix エポックからのミリ秒
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn plus_millis(&self, millis: i64) -> Self {
        Self(self.0.saturating_add(millis))
    }
}

/// ルーム内の並び順キー
///
/// `<createdAt:19桁ゼロ埋め>#<sequence:20桁ゼロ埋め>#<messageId>` の形式。
/// 固定幅のため、文字列の昇順が `createdAt` の昇順と一致する。
/// 同一ミリ秒内はメッセージログへの書き込み順（sequence）で決まる。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderingKey(String);

impl OrderingKey {
    pub fn new(created_at: Timestamp, sequence: u64, message_id: &MessageId) -> Self {
        // 負の値は 0 として扱う（エポック以前のメッセージは存在しない）
        let millis = created_at.value().max(0);
        Self(format!(
            "{:019}#{:020}#{}",
            millis,
            sequence,
            message_id.as_str()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

// ========================================
// HistoryLimit
// ========================================

/// 履歴取得件数
///
/// 未指定・0 以下・有限でない値は既定値 50、100 を超える要求は 100 に切り詰める（拒否はしない）。
/// 小数は切り捨てる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimit(usize);

impl HistoryLimit {
    pub fn clamp(requested: Option<f64>) -> Self {
        let Some(n) = requested.map(f64::floor).filter(|n| n.is_finite() && *n > 0.0) else {
            return Self(DEFAULT_HISTORY_LIMIT);
        };
        if n >= MAX_HISTORY_LIMIT as f64 {
            Self(MAX_HISTORY_LIMIT)
        } else {
            Self(n as usize)
        }
    }

    pub fn value(&self) -> usize {
        self.0
    }
}
