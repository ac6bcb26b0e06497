//! Message Router
//!
//! Dispatches the four request kinds (connect, disconnect, sendMessage, getMessages)
//! to their use cases and turns the results into acknowledgments.
//!
//! The router holds no per-connection state. Each call is a one-shot transaction
//! against the stores, so calls for different connections may run concurrently.

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, ConnectionRecord},
    infrastructure::dto::websocket::{
        AckDto, ERR_CONNECTION_NOT_FOUND, ERR_CONTENT_REQUIRED, ERR_GET_FAILED, ERR_SEND_FAILED,
        GetMessagesPayload, InboundEnvelope, SendMessagePayload, decode_inbound,
    },
    usecase::{
        ConnectError, ConnectUseCase, DisconnectError, DisconnectUseCase, GetMessagesUseCase,
        SendMessageError, SendMessageUseCase,
    },
};

pub struct MessageRouter {
    connect_usecase: Arc<ConnectUseCase>,
    disconnect_usecase: Arc<DisconnectUseCase>,
    send_message_usecase: Arc<SendMessageUseCase>,
    get_messages_usecase: Arc<GetMessagesUseCase>,
}

impl MessageRouter {
    pub fn new(
        connect_usecase: Arc<ConnectUseCase>,
        disconnect_usecase: Arc<DisconnectUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        get_messages_usecase: Arc<GetMessagesUseCase>,
    ) -> Self {
        Self {
            connect_usecase,
            disconnect_usecase,
            send_message_usecase,
            get_messages_usecase,
        }
    }

    /// Register a newly opened channel.
    ///
    /// An error means the channel must not be established.
    pub async fn connect(
        &self,
        connection_id: ConnectionId,
        user_id: Option<String>,
        username: Option<String>,
    ) -> Result<ConnectionRecord, ConnectError> {
        self.connect_usecase
            .execute(connection_id, user_id, username)
            .await
    }

    /// Remove a closed channel from the registry.
    ///
    /// Succeeds whether or not a record existed. A store failure is returned for
    /// reporting only; the caller tears the channel down regardless.
    pub async fn disconnect(&self, connection_id: &ConnectionId) -> Result<(), DisconnectError> {
        self.disconnect_usecase.execute(connection_id).await
    }

    /// Decode one inbound text frame and handle it.
    pub async fn handle_frame(&self, connection_id: &ConnectionId, text: &str) -> AckDto {
        match decode_inbound(text) {
            Ok(InboundEnvelope::SendMessage(payload)) => {
                self.send_message(connection_id, payload).await
            }
            Ok(InboundEnvelope::GetMessages(payload)) => {
                self.get_messages(connection_id, payload).await
            }
            Err(e) => {
                tracing::warn!("Rejected frame from '{}': {}", connection_id, e);
                AckDto::error(e.reason())
            }
        }
    }

    pub async fn send_message(
        &self,
        connection_id: &ConnectionId,
        payload: SendMessagePayload,
    ) -> AckDto {
        let content = payload.content_text();
        match self
            .send_message_usecase
            .execute(connection_id, content, payload.room_id)
            .await
        {
            Ok(message) => AckDto::sent(message.message_id.into_string()),
            Err(e) => {
                if e.is_validation() {
                    tracing::warn!("Rejected message from '{}': {}", connection_id, e);
                } else {
                    tracing::error!("Failed to send message from '{}': {}", connection_id, e);
                }
                match e {
                    SendMessageError::EmptyContent => AckDto::error(ERR_CONTENT_REQUIRED),
                    SendMessageError::ConnectionNotFound(_) => {
                        AckDto::error(ERR_CONNECTION_NOT_FOUND)
                    }
                    SendMessageError::StoreUnavailable(_) => AckDto::error(ERR_SEND_FAILED),
                }
            }
        }
    }

    pub async fn get_messages(
        &self,
        connection_id: &ConnectionId,
        payload: GetMessagesPayload,
    ) -> AckDto {
        let limit = payload.limit_number();
        match self
            .get_messages_usecase
            .execute(connection_id, payload.room_id, limit)
            .await
        {
            Ok(_) => AckDto::ok(),
            Err(e) => {
                tracing::error!("Failed to get messages for '{}': {}", connection_id, e);
                AckDto::error(ERR_GET_FAILED)
            }
        }
    }
}
