//! WebSocket message DTOs.
//!
//! Inbound frames carry an `action` tag and a `data` payload:
//!
//! ```json
//! {"action": "sendMessage", "data": {"content": "hello", "roomId": "global"}}
//! {"action": "getMessages", "data": {"roomId": "global", "limit": 50}}
//! ```
//!
//! Outbound pushes carry a `type` tag and a `data` payload:
//!
//! ```json
//! {"type": "newMessage", "data": {...}}
//! {"type": "messageHistory", "data": [{...}, ...]}
//! ```
//!
//! Every inbound request is answered with a separate acknowledgment frame
//! (`{"success": true, ...}` or `{"error": "..."}`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ERR_CONTENT_REQUIRED: &str = "Message content is required";
pub const ERR_CONNECTION_NOT_FOUND: &str = "Connection not found";
pub const ERR_SEND_FAILED: &str = "Failed to send message";
pub const ERR_GET_FAILED: &str = "Failed to get messages";
pub const ERR_UNKNOWN_ACTION: &str = "Unknown action";
pub const ERR_INVALID_REQUEST: &str = "Invalid request";

const KNOWN_ACTIONS: [&str; 2] = ["sendMessage", "getMessages"];

// ========================================
// Inbound
// ========================================

/// Inbound request envelope
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "camelCase")]
pub enum InboundEnvelope {
    SendMessage(SendMessagePayload),
    GetMessages(GetMessagesPayload),
}

/// `sendMessage` payload
///
/// `content` is kept loosely typed so that a non-string value is reported as
/// missing content rather than as an undecodable frame.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    #[serde(default)]
    pub room_id: Option<String>,
}

impl SendMessagePayload {
    /// Content as text, `None` when absent or not a string
    pub fn content_text(&self) -> Option<String> {
        self.content
            .as_ref()
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }
}

/// `getMessages` payload
///
/// `limit` is any JSON number. Out-of-range or non-numeric values are clamped
/// downstream instead of failing the frame.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMessagesPayload {
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub limit: Option<serde_json::Value>,
}

impl GetMessagesPayload {
    /// Limit as a number, `None` when absent or not a number
    pub fn limit_number(&self) -> Option<f64> {
        self.limit.as_ref().and_then(|v| v.as_f64())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("malformed frame: {0}")]
    Malformed(String),
}

impl DecodeError {
    /// Acknowledgment text sent back to the client
    pub fn reason(&self) -> &'static str {
        match self {
            DecodeError::UnknownAction(_) => ERR_UNKNOWN_ACTION,
            DecodeError::Malformed(_) => ERR_INVALID_REQUEST,
        }
    }
}

/// Decode an inbound text frame, failing closed on anything unrecognised.
///
/// A missing `data` object is treated as an empty payload.
pub fn decode_inbound(text: &str) -> Result<InboundEnvelope, DecodeError> {
    let mut value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let object = value
        .as_object_mut()
        .ok_or_else(|| DecodeError::Malformed("frame is not a JSON object".to_string()))?;

    let action = match object.get("action") {
        Some(serde_json::Value::String(action)) => action.clone(),
        Some(other) => return Err(DecodeError::UnknownAction(other.to_string())),
        None => return Err(DecodeError::UnknownAction(String::new())),
    };
    if !KNOWN_ACTIONS.contains(&action.as_str()) {
        return Err(DecodeError::UnknownAction(action));
    }

    if object.get("data").is_none_or(|data| data.is_null()) {
        object.insert(
            "data".to_string(),
            serde_json::Value::Object(serde_json::Map::new()),
        );
    }

    serde_json::from_value(value).map_err(|e| DecodeError::Malformed(e.to_string()))
}

// ========================================
// Outbound
// ========================================

/// Chat message as seen on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub room_id: String,
    pub ordering_key: String,
    pub message_id: String,
    pub user_id: String,
    pub username: String,
    pub content: String,
    /// Unix timestamp (milliseconds)
    pub created_at: i64,
}

/// Outbound push envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum OutboundEnvelope {
    NewMessage(ChatMessageDto),
    MessageHistory(Vec<ChatMessageDto>),
}

/// Acknowledgment for a single inbound request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AckDto {
    Success {
        success: bool,
        #[serde(
            rename = "messageId",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        message_id: Option<String>,
    },
    Error {
        error: String,
    },
}

impl AckDto {
    pub fn ok() -> Self {
        AckDto::Success {
            success: true,
            message_id: None,
        }
    }

    pub fn sent(message_id: String) -> Self {
        AckDto::Success {
            success: true,
            message_id: Some(message_id),
        }
    }

    pub fn error(reason: &str) -> Self {
        AckDto::Error {
            error: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_send_message() {
        // テスト項目: sendMessage フレームがデコードされる
        // given (前提条件):
        let text = r#"{"action":"sendMessage","data":{"content":"hi","roomId":"rust"}}"#;

        // when (操作):
        let envelope = decode_inbound(text).unwrap();

        // then (期待する結果):
        match envelope {
            InboundEnvelope::SendMessage(payload) => {
                assert_eq!(payload.content_text(), Some("hi".to_string()));
                assert_eq!(payload.room_id, Some("rust".to_string()));
            }
            other => panic!("unexpected envelope: {:?}", other),
        }
    }

    #[test]
    fn test_decode_non_string_content_as_missing() {
        // テスト項目: 文字列以外の content は「本文なし」として扱われる
        // given (前提条件):
        let texts = [
            r#"{"action":"sendMessage","data":{"content":42}}"#,
            r#"{"action":"sendMessage","data":{"content":null}}"#,
            r#"{"action":"sendMessage"}"#,
        ];

        // when (操作) / then (期待する結果):
        for text in texts {
            match decode_inbound(text).unwrap() {
                InboundEnvelope::SendMessage(payload) => assert_eq!(payload.content_text(), None),
                other => panic!("unexpected envelope: {:?}", other),
            }
        }
    }

    #[test]
    fn test_decode_get_messages_defaults() {
        // テスト項目: getMessages の省略可能な項目は None になる
        // given (前提条件):
        let text = r#"{"action":"getMessages","data":{}}"#;

        // when (操作):
        let envelope = decode_inbound(text).unwrap();

        // then (期待する結果):
        assert_eq!(
            envelope,
            InboundEnvelope::GetMessages(GetMessagesPayload::default())
        );
    }

    #[test]
    fn test_decode_any_json_number_as_limit() {
        // テスト項目: limit は整数以外の数値でもデコードでき、数値でなければ未指定扱い
        // given (前提条件):
        let cases = [
            (r#"{"action":"getMessages","data":{"limit":25}}"#, Some(25.0)),
            (r#"{"action":"getMessages","data":{"limit":500.0}}"#, Some(500.0)),
            (r#"{"action":"getMessages","data":{"limit":1e3}}"#, Some(1000.0)),
            (
                r#"{"action":"getMessages","data":{"limit":99999999999999999999}}"#,
                Some(1e20),
            ),
            (r#"{"action":"getMessages","data":{"limit":"many"}}"#, None),
        ];

        // when (操作) / then (期待する結果):
        for (text, expected) in cases {
            match decode_inbound(text).unwrap() {
                InboundEnvelope::GetMessages(payload) => {
                    assert_eq!(payload.limit_number(), expected)
                }
                other => panic!("unexpected envelope: {:?}", other),
            }
        }
    }

    #[test]
    fn test_decode_unknown_action_fails_closed() {
        // テスト項目: 未知の action は UnknownAction として拒否される
        // given (前提条件):
        let texts = [
            r#"{"action":"deleteMessage","data":{}}"#,
            r#"{"data":{"content":"hi"}}"#,
            r#"{"action":7}"#,
        ];

        // when (操作) / then (期待する結果):
        for text in texts {
            let err = decode_inbound(text).unwrap_err();
            assert!(matches!(err, DecodeError::UnknownAction(_)));
            assert_eq!(err.reason(), ERR_UNKNOWN_ACTION);
        }
    }

    #[test]
    fn test_decode_malformed_frame() {
        // テスト項目: JSON でないフレームや型違いは Malformed になる
        // given (前提条件):
        let texts = [
            "hello",
            "[1,2,3]",
            r#"{"action":"getMessages","data":{"roomId":7}}"#,
        ];

        // when (操作) / then (期待する結果):
        for text in texts {
            let err = decode_inbound(text).unwrap_err();
            assert!(matches!(err, DecodeError::Malformed(_)));
            assert_eq!(err.reason(), ERR_INVALID_REQUEST);
        }
    }

    #[test]
    fn test_outbound_envelope_shape() {
        // テスト項目: 送信エンベロープが {type, data} 形式で出力される
        // given (前提条件):
        let envelope = OutboundEnvelope::MessageHistory(vec![]);

        // when (操作):
        let json = serde_json::to_value(&envelope).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({"type": "messageHistory", "data": []})
        );
    }

    #[test]
    fn test_ack_shapes() {
        // テスト項目: 応答が仕様どおりの JSON になる
        // given (前提条件):

        // when (操作):
        let ok = serde_json::to_value(AckDto::ok()).unwrap();
        let sent = serde_json::to_value(AckDto::sent("m1".to_string())).unwrap();
        let error = serde_json::to_value(AckDto::error(ERR_CONTENT_REQUIRED)).unwrap();

        // then (期待する結果):
        assert_eq!(ok, serde_json::json!({"success": true}));
        assert_eq!(sent, serde_json::json!({"success": true, "messageId": "m1"}));
        assert_eq!(
            error,
            serde_json::json!({"error": "Message content is required"})
        );
    }
}
