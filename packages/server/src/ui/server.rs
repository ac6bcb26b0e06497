//! Server execution logic.

use std::{future::Future, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use hiroba_shared::time::Clock;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    domain::{ConnectionDirectory, ConnectionRepository, MessageRepository},
    infrastructure::{
        delivery::WebSocketDeliveryChannel, directory::ScanConnectionDirectory,
        dto::JsonOutboundEncoder,
    },
    usecase::{
        Broadcaster, ConnectUseCase, DisconnectUseCase, GetMessagesUseCase,
        PurgeExpiredConnectionsUseCase, SendMessageUseCase,
    },
};

use super::{
    handler::{
        connection_count, health_check, messages_by_room, messages_by_user, websocket_handler,
    },
    router::MessageRouter,
    signal::shutdown_signal,
    state::AppState,
};

/// Chat relay server
///
/// Owns the wiring between the stores handed in by the entry point and the use cases,
/// the WebSocket delivery channel and the HTTP routes.
///
/// # Example
///
/// ```ignore
/// let clock: Arc<dyn Clock> = Arc::new(SystemClock);
/// let server = Server::new(
///     ServerConfig::default(),
///     Arc::new(InMemoryConnectionRepository::new(clock.clone())),
///     Arc::new(InMemoryMessageRepository::new(clock.clone())),
///     clock,
/// );
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
    /// 失効レコード回収のユースケース（定期タスクから呼び出す）
    purge_expired_usecase: Arc<PurgeExpiredConnectionsUseCase>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `connections` - Connection registry store
    /// * `messages` - Message log store
    /// * `clock` - Time source for record expiry
    pub fn new(
        config: ServerConfig,
        connections: Arc<dyn ConnectionRepository>,
        messages: Arc<dyn MessageRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        // Initialize dependencies in order:
        // 1. Connection Directory / DeliveryChannel
        // 2. Broadcaster
        // 3. UseCases
        // 4. MessageRouter / AppState
        let directory: Arc<dyn ConnectionDirectory> =
            Arc::new(ScanConnectionDirectory::new(connections.clone()));
        let delivery_channel = WebSocketDeliveryChannel::new();

        let broadcaster = Arc::new(Broadcaster::new(
            directory.clone(),
            connections.clone(),
            Arc::new(delivery_channel.clone()),
            Arc::new(JsonOutboundEncoder),
            config.delivery_timeout,
        ));

        let connect_usecase = Arc::new(ConnectUseCase::new(
            connections.clone(),
            clock.clone(),
            config.connection_ttl,
        ));
        let disconnect_usecase = Arc::new(DisconnectUseCase::new(connections.clone()));
        let send_message_usecase = Arc::new(SendMessageUseCase::new(
            messages.clone(),
            directory.clone(),
            broadcaster.clone(),
        ));
        let get_messages_usecase = Arc::new(GetMessagesUseCase::new(messages, broadcaster));
        let purge_expired_usecase =
            Arc::new(PurgeExpiredConnectionsUseCase::new(connections, clock));

        let router = Arc::new(MessageRouter::new(
            connect_usecase,
            disconnect_usecase,
            send_message_usecase,
            get_messages_usecase.clone(),
        ));

        let state = Arc::new(AppState {
            router,
            delivery_channel,
            get_messages_usecase,
            directory,
            outbound_buffer: config.outbound_buffer.max(1),
            delivery_timeout: config.delivery_timeout,
        });

        Self {
            config,
            state,
            purge_expired_usecase,
        }
    }

    /// Build the axum router with all endpoints
    pub fn app(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms/{room_id}/messages", get(messages_by_room))
            .route("/api/users/{user_id}/messages", get(messages_by_user))
            .route("/api/connections", get(connection_count))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the chat relay server until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address or
    /// if there's an error during server execution.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        // Bind the server to the host and port
        let bind_addr = self.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat relay listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    ///
    /// Also runs the expired-record sweeper for the lifetime of the server.
    pub async fn serve<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.app();
        let sweeper = spawn_sweeper(
            self.purge_expired_usecase.clone(),
            self.config.sweep_interval,
        );

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;
        sweeper.abort();
        result?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Spawns the periodic sweeper that purges expired connection records.
fn spawn_sweeper(
    usecase: Arc<PurgeExpiredConnectionsUseCase>,
    period: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(e) = usecase.execute().await {
                tracing::warn!("Failed to purge expired connections: {}", e);
            }
        }
    })
}
