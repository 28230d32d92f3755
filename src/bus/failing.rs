use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use discovery_error::BusError;

use super::{Broker, BusResult, EventHandler, ListenerHandle, MessageBus};

/// Шина для тестов: регистрация работает как у [`Broker`], а `send_event`
/// можно заставить падать с `BusError::Transport`.
#[derive(Default)]
pub(crate) struct FailingSendBus {
    pub(crate) broker: Broker,
    fail_sends: AtomicBool,
}

impl FailingSendBus {
    pub(crate) fn failing() -> Self {
        let bus = Self::default();
        bus.set_failing(true);
        bus
    }

    pub(crate) fn set_failing(
        &self,
        failing: bool,
    ) {
        self.fail_sends.store(failing, Ordering::Release);
    }
}

#[async_trait]
impl MessageBus for FailingSendBus {
    async fn add_event_listener(
        &self,
        event: &str,
        metadata: Option<Bytes>,
        handler: EventHandler,
    ) -> BusResult<ListenerHandle> {
        self.broker.add_event_listener(event, metadata, handler).await
    }

    async fn remove_event_listener(
        &self,
        event: &str,
        handle: ListenerHandle,
    ) -> BusResult<()> {
        self.broker.remove_event_listener(event, handle).await
    }

    async fn send_event(
        &self,
        event: &str,
        metadata: Option<Bytes>,
        payload: Bytes,
    ) -> BusResult<()> {
        if self.fail_sends.load(Ordering::Acquire) {
            return Err(BusError::Transport {
                reason: "link down".into(),
            });
        }
        self.broker.send_event(event, metadata, payload).await
    }
}
