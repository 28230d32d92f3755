use std::sync::{Arc, Weak};

use discovery_error::ResourceError;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::protocol::{self, PingPayload, PongPayload, RemovePayload, EVENT_PING, EVENT_PONG, EVENT_REMOVE};
use crate::{
    bus::{event_handler, ListenerHandle, Message, MessageBus},
    error::DiscoveryResult,
};

/// Опубликованный ресурс (сторона издателя).
///
/// Жизненный цикл:
/// - `load`: регистрирует слушатель Ping и сразу анонсирует себя;
/// - `set_value`: при подключении к шине анонсирует новое значение;
/// - `unload`: рассылает Remove и снимает слушатель.
///
/// Вызовы `load`/`unload` для одного экземпляра должны идти
/// последовательно.
#[derive(Clone)]
pub struct LocalResource {
    inner: Arc<LocalInner>,
}

struct LocalInner {
    topic: String,
    uuid: String,
    state: Mutex<LocalState>,
}

struct LocalState {
    value: Value,
    bus: Option<Arc<dyn MessageBus>>,
    ping_listener: Option<ListenerHandle>,
}

/// Builder для [`LocalResource`].
#[derive(Debug, Clone)]
pub struct LocalResourceBuilder {
    topic: String,
    uuid: Option<String>,
    value: Value,
}

impl LocalResourceBuilder {
    /// Явный идентификатор экземпляра. Без него генерируется UUID v4.
    pub fn uuid(
        mut self,
        uuid: impl Into<String>,
    ) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    pub fn value(
        mut self,
        value: impl Into<Value>,
    ) -> Self {
        self.value = value.into();
        self
    }

    pub fn build(self) -> Result<LocalResource, ResourceError> {
        if self.topic.is_empty() {
            return Err(ResourceError::invalid_argument(
                "topic",
                "must be a non-empty string",
            ));
        }
        let uuid = match self.uuid {
            Some(uuid) if uuid.is_empty() => {
                return Err(ResourceError::invalid_argument(
                    "uuid",
                    "must be a non-empty string",
                ));
            }
            Some(uuid) => uuid,
            None => Uuid::new_v4().to_string(),
        };

        Ok(LocalResource {
            inner: Arc::new(LocalInner {
                topic: self.topic,
                uuid,
                state: Mutex::new(LocalState {
                    value: self.value,
                    bus: None,
                    ping_listener: None,
                }),
            }),
        })
    }
}

impl LocalResource {
    pub fn builder(topic: impl Into<String>) -> LocalResourceBuilder {
        LocalResourceBuilder {
            topic: topic.into(),
            uuid: None,
            value: Value::Null,
        }
    }

    /// Ресурс со сгенерированным uuid и значением `null`.
    pub fn new(topic: impl Into<String>) -> Result<Self, ResourceError> {
        Self::builder(topic).build()
    }

    pub fn topic(&self) -> &str {
        &self.inner.topic
    }

    pub fn uuid(&self) -> &str {
        &self.inner.uuid
    }

    pub fn value(&self) -> Value {
        self.inner.state.lock().value.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.state.lock().bus.is_some()
    }

    /// Подключается к шине: регистрирует слушатель Ping, затем анонсирует
    /// текущее значение.
    pub async fn load(
        &self,
        bus: Arc<dyn MessageBus>,
    ) -> DiscoveryResult<()> {
        {
            let mut state = self.inner.state.lock();
            if state.bus.is_some() {
                return Err(ResourceError::AlreadyLoaded.into());
            }
            state.bus = Some(bus.clone());
        }

        let weak = Arc::downgrade(&self.inner);
        let handler = event_handler(move |msg: Message| {
            let weak = weak.clone();
            async move { on_ping(weak, msg).await }
        });

        let handle = match bus.add_event_listener(EVENT_PING, None, handler).await {
            Ok(handle) => handle,
            Err(err) => {
                self.inner.state.lock().bus = None;
                return Err(err.into());
            }
        };
        self.inner.state.lock().ping_listener = Some(handle);

        if let Err(err) = self.inner.announce().await {
            self.rollback(&bus).await;
            return Err(err);
        }
        info!(topic = %self.inner.topic, uuid = %self.inner.uuid, "local resource loaded");
        Ok(())
    }

    /// Возвращает ресурс в отключённое состояние после неудачного `load`.
    async fn rollback(
        &self,
        bus: &Arc<dyn MessageBus>,
    ) {
        let handle = {
            let mut state = self.inner.state.lock();
            state.bus = None;
            state.ping_listener.take()
        };
        if let Some(handle) = handle {
            if let Err(err) = bus.remove_event_listener(EVENT_PING, handle).await {
                warn!(topic = %self.inner.topic, error = %err, "failed to roll back ping listener");
            }
        }
    }

    /// Рассылает Remove и снимает слушатель Ping.
    ///
    /// Слушатель снимается даже если отправка Remove не удалась; возвращается
    /// первая ошибка.
    pub async fn unload(&self) -> DiscoveryResult<()> {
        // Шина отвязывается до отправки Remove: Ping, пришедший в этом окне,
        // не должен воскресить ресурс у подписчиков.
        let (bus, handle) = {
            let mut state = self.inner.state.lock();
            let bus = state.bus.take().ok_or(ResourceError::NotLoaded)?;
            (bus, state.ping_listener.take())
        };

        let remove = RemovePayload {
            topic: self.inner.topic.clone(),
            uuid: self.inner.uuid.clone(),
        };
        let sent: DiscoveryResult<()> = match protocol::encode(&remove) {
            Ok(payload) => bus
                .send_event(EVENT_REMOVE, None, payload)
                .await
                .map_err(Into::into),
            Err(err) => Err(err.into()),
        };

        let removed: DiscoveryResult<()> = match handle {
            Some(handle) => bus
                .remove_event_listener(EVENT_PING, handle)
                .await
                .map_err(Into::into),
            None => Ok(()),
        };

        info!(topic = %self.inner.topic, uuid = %self.inner.uuid, "local resource unloaded");
        sent.and(removed)
    }

    /// Сохраняет новое значение и, если ресурс подключён, анонсирует его.
    ///
    /// Возвращает `false`, если значение совпало с текущим (ничего не
    /// отправляется).
    pub async fn set_value(
        &self,
        value: impl Into<Value>,
    ) -> DiscoveryResult<bool> {
        let value = value.into();
        {
            let mut state = self.inner.state.lock();
            if state.value == value {
                return Ok(false);
            }
            state.value = value;
        }
        self.inner.announce().await?;
        Ok(true)
    }
}

impl LocalInner {
    /// Шлёт Pong с текущим снимком. Без шины ничего не делает.
    async fn announce(&self) -> DiscoveryResult<()> {
        let (bus, value) = {
            let state = self.state.lock();
            match &state.bus {
                Some(bus) => (bus.clone(), state.value.clone()),
                None => return Ok(()),
            }
        };

        let pong = PongPayload {
            topic: self.topic.clone(),
            uuid: self.uuid.clone(),
            value,
        };
        let payload = protocol::encode(&pong)?;
        bus.send_event(EVENT_PONG, None, payload).await?;

        debug!(topic = %self.topic, uuid = %self.uuid, "announced");
        Ok(())
    }
}

async fn on_ping(
    weak: Weak<LocalInner>,
    msg: Message,
) {
    let Some(inner) = weak.upgrade() else {
        return;
    };

    let ping: PingPayload = match protocol::decode(&msg.payload) {
        Ok(ping) => ping,
        Err(err) => {
            debug!(topic = %inner.topic, error = %err, "dropping malformed ping");
            return;
        }
    };

    if !ping.topic.is_match(&inner.topic) {
        return;
    }

    if let Err(err) = inner.announce().await {
        warn!(
            topic = %inner.topic,
            uuid = %inner.uuid,
            error = %err,
            "failed to answer ping"
        );
    }
}
