//! UseCase テスト用のフェイクと組み立てヘルパー

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use hiroba_shared::time::ManualClock;

use crate::{
    domain::{
        ConnectionDirectory, ConnectionId, ConnectionRecord, ConnectionRepository,
        DeliveryChannel, DeliveryOutcome, Timestamp, UserId, Username,
    },
    infrastructure::{
        directory::ScanConnectionDirectory,
        dto::JsonOutboundEncoder,
        repository::{InMemoryConnectionRepository, InMemoryMessageRepository},
    },
};

use super::Broadcaster;

pub const TEST_TTL_MILLIS: i64 = 24 * 60 * 60 * 1000;
pub const TEST_START_MILLIS: i64 = 1_700_000_000_000;

pub fn connection_id(value: &str) -> ConnectionId {
    ConnectionId::new(value.to_string()).unwrap()
}

/// 宛先ごとの結果を台本どおりに返す DeliveryChannel
///
/// 台本のない宛先には `Delivered` を返し、ペイロードを記録する。
#[derive(Default)]
pub struct FakeDeliveryChannel {
    outcomes: Mutex<HashMap<ConnectionId, DeliveryOutcome>>,
    hanging: Mutex<HashSet<ConnectionId>>,
    sent: Mutex<Vec<(ConnectionId, String)>>,
}

impl FakeDeliveryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_outcome(&self, id: &str, outcome: DeliveryOutcome) {
        self.outcomes
            .lock()
            .unwrap()
            .insert(connection_id(id), outcome);
    }

    /// 指定した宛先への send を完了させない
    pub fn hang(&self, id: &str) {
        self.hanging.lock().unwrap().insert(connection_id(id));
    }

    pub fn sent_to(&self, id: &str) -> Vec<String> {
        let target = connection_id(id);
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| to == &target)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    pub fn total_sent(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl DeliveryChannel for FakeDeliveryChannel {
    async fn send(&self, connection_id: &ConnectionId, payload: &str) -> DeliveryOutcome {
        let hanging = self.hanging.lock().unwrap().contains(connection_id);
        if hanging {
            std::future::pending::<()>().await;
        }

        let scripted = self.outcomes.lock().unwrap().get(connection_id).cloned();
        match scripted {
            Some(outcome) => outcome,
            None => {
                self.sent
                    .lock()
                    .unwrap()
                    .push((connection_id.clone(), payload.to_string()));
                DeliveryOutcome::Delivered
            }
        }
    }
}

/// インメモリストアとフェイク配送チャンネルで組み立てた一式
pub struct TestContext {
    pub clock: Arc<ManualClock>,
    pub connections: Arc<InMemoryConnectionRepository>,
    pub messages: Arc<InMemoryMessageRepository>,
    pub directory: Arc<ScanConnectionDirectory>,
    pub channel: Arc<FakeDeliveryChannel>,
    pub broadcaster: Arc<Broadcaster>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_delivery_timeout(Duration::from_secs(5))
    }

    pub fn with_delivery_timeout(delivery_timeout: Duration) -> Self {
        let clock = Arc::new(ManualClock::new(TEST_START_MILLIS));
        let connections = Arc::new(InMemoryConnectionRepository::new(clock.clone()));
        let messages = Arc::new(InMemoryMessageRepository::new(clock.clone()));
        let directory = Arc::new(ScanConnectionDirectory::new(connections.clone()));
        let channel = Arc::new(FakeDeliveryChannel::new());
        let broadcaster = Arc::new(Broadcaster::new(
            directory.clone(),
            connections.clone(),
            channel.clone(),
            Arc::new(JsonOutboundEncoder),
            delivery_timeout,
        ));
        Self {
            clock,
            connections,
            messages,
            directory,
            channel,
            broadcaster,
        }
    }

    /// レジストリに直接接続レコードを登録する
    pub async fn connect(&self, id: &str, user_id: &str, username: &str) {
        let record = ConnectionRecord::new(
            connection_id(id),
            UserId::or_anonymous(Some(user_id.to_string())),
            Username::or_anonymous(Some(username.to_string())),
            Timestamp::new(TEST_START_MILLIS),
            TEST_TTL_MILLIS,
        );
        self.connections.put_connection(record).await.unwrap();
    }

    pub async fn is_registered(&self, id: &str) -> bool {
        self.directory
            .find(&connection_id(id))
            .await
            .unwrap()
            .is_some()
    }
}
