//! JSON encoder for outbound pushes.

use crate::{
    domain::{EncodeError, OutboundEncoder, OutboundEvent},
    infrastructure::dto::websocket::OutboundEnvelope,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOutboundEncoder;

impl OutboundEncoder for JsonOutboundEncoder {
    fn encode(&self, event: &OutboundEvent) -> Result<String, EncodeError> {
        let envelope = OutboundEnvelope::from(event);
        serde_json::to_string(&envelope).map_err(|e| EncodeError(e.to_string()))
    }
}
