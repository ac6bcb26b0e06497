//! Conversion logic from domain entities to DTOs.

use hiroba_shared::time::timestamp_to_rfc3339;

use crate::domain::{OutboundEvent, entity};
use crate::infrastructure::dto::{http, websocket as dto};

impl From<entity::ChatMessage> for dto::ChatMessageDto {
    fn from(model: entity::ChatMessage) -> Self {
        Self {
            room_id: model.room_id.into_string(),
            ordering_key: model.ordering_key.into_string(),
            message_id: model.message_id.into_string(),
            user_id: model.user_id.into_string(),
            username: model.username.into_string(),
            content: model.content.into_string(),
            created_at: model.created_at.value(),
        }
    }
}

impl From<entity::ChatMessage> for http::MessageDetailDto {
    fn from(model: entity::ChatMessage) -> Self {
        let millis = model.created_at.value();
        Self {
            message_id: model.message_id.into_string(),
            room_id: model.room_id.into_string(),
            user_id: model.user_id.into_string(),
            username: model.username.into_string(),
            content: model.content.into_string(),
            created_at: timestamp_to_rfc3339(millis).unwrap_or_else(|| millis.to_string()),
        }
    }
}

impl From<&OutboundEvent> for dto::OutboundEnvelope {
    fn from(event: &OutboundEvent) -> Self {
        match event {
            OutboundEvent::NewMessage(message) => {
                dto::OutboundEnvelope::NewMessage(message.clone().into())
            }
            OutboundEvent::MessageHistory(messages) => dto::OutboundEnvelope::MessageHistory(
                messages.iter().cloned().map(Into::into).collect(),
            ),
        }
    }
}
