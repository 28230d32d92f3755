use std::{
    collections::HashMap,
    sync::{Arc, Weak},
};

use discovery_error::{BusError, ResourceError};
use parking_lot::Mutex;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tracing::{debug, info, trace, warn};

use super::{
    protocol::{self, PingPayload, PongPayload, RemovePayload, EVENT_PING, EVENT_PONG, EVENT_REMOVE},
    RemoteResource, TopicFilter,
};
use crate::{
    bus::{event_handler, EventHandler, ListenerHandle, Message, MessageBus},
    config::Settings,
    error::DiscoveryResult,
};

/// Ёмкость канала событий по умолчанию.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Событие жизненного цикла обнаруженного ресурса.
#[derive(Debug, Clone)]
pub enum ResourceEvent {
    /// Первый анонс ресурса с новым uuid.
    Added(RemoteResource),
    /// Издатель ушёл; handle больше не обновляется.
    Removed(RemoteResource),
}

impl ResourceEvent {
    pub fn resource(&self) -> &RemoteResource {
        match self {
            Self::Added(res) | Self::Removed(res) => res,
        }
    }

    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added(_))
    }
}

/// Подписка на события менеджера.
///
/// Видит только события, отправленные после `subscribe()`. Медленный
/// получатель теряет самые старые события и получает `RecvError::Lagged`.
pub struct ResourceEvents {
    inner: broadcast::Receiver<ResourceEvent>,
}

impl ResourceEvents {
    /// Ждёт следующее событие.
    pub async fn recv(&mut self) -> Result<ResourceEvent, RecvError> {
        self.inner.recv().await
    }

    /// Забирает событие без ожидания.
    pub fn try_recv(&mut self) -> Result<ResourceEvent, TryRecvError> {
        self.inner.try_recv()
    }

    /// Количество событий, ожидающих чтения.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Builder для [`ResourceManager`].
#[derive(Debug, Clone)]
pub struct ResourceManagerBuilder {
    filter: TopicFilter,
    ping_on_load: bool,
    event_capacity: usize,
}

impl ResourceManagerBuilder {
    /// Слать ли Ping сразу после `load` (по умолчанию `true`).
    pub fn ping_on_load(
        mut self,
        enabled: bool,
    ) -> Self {
        self.ping_on_load = enabled;
        self
    }

    /// Размер буфера событий на одного подписчика.
    pub fn event_capacity(
        mut self,
        capacity: usize,
    ) -> Self {
        self.event_capacity = capacity;
        self
    }

    pub fn build(self) -> Result<ResourceManager, ResourceError> {
        if self.event_capacity == 0 {
            return Err(ResourceError::invalid_argument(
                "event_capacity",
                "must be greater than zero",
            ));
        }
        Ok(ResourceManager::assemble(
            self.filter,
            self.ping_on_load,
            self.event_capacity,
        ))
    }
}

/// Менеджер ресурсов (сторона подписчика).
///
/// Отслеживает все ресурсы, чей топик проходит фильтр: по Pong создаёт или
/// обновляет зеркало [`RemoteResource`], по Remove забывает его. О появлении
/// и уходе ресурсов сообщает через [`ResourceManager::subscribe`].
#[derive(Clone)]
pub struct ResourceManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    filter: TopicFilter,
    ping_on_load: bool,
    events: broadcast::Sender<ResourceEvent>,
    state: Mutex<ManagerState>,
}

#[derive(Default)]
struct ManagerState {
    bus: Option<Arc<dyn MessageBus>>,
    listeners: Vec<(&'static str, ListenerHandle)>,
    /// uuid → зеркало
    resources: HashMap<String, RemoteResource>,
}

impl ResourceManager {
    pub fn builder(filter: TopicFilter) -> ResourceManagerBuilder {
        ResourceManagerBuilder {
            filter,
            ping_on_load: true,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Менеджер с настройками по умолчанию.
    pub fn new(filter: TopicFilter) -> Self {
        Self::assemble(filter, true, DEFAULT_EVENT_CAPACITY)
    }

    pub fn from_settings(
        filter: TopicFilter,
        settings: &Settings,
    ) -> Result<Self, ResourceError> {
        Self::builder(filter)
            .ping_on_load(settings.ping_on_load)
            .event_capacity(settings.event_capacity)
            .build()
    }

    fn assemble(
        filter: TopicFilter,
        ping_on_load: bool,
        event_capacity: usize,
    ) -> Self {
        let (events, _) = broadcast::channel(event_capacity);
        Self {
            inner: Arc::new(ManagerInner {
                filter,
                ping_on_load,
                events,
                state: Mutex::new(ManagerState::default()),
            }),
        }
    }

    pub fn filter(&self) -> &TopicFilter {
        &self.inner.filter
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.state.lock().bus.is_some()
    }

    pub fn subscribe(&self) -> ResourceEvents {
        ResourceEvents {
            inner: self.inner.events.subscribe(),
        }
    }

    /// Снимок отслеживаемых ресурсов (порядок не определён).
    pub fn resources(&self) -> Vec<RemoteResource> {
        self.inner.state.lock().resources.values().cloned().collect()
    }

    pub fn get(
        &self,
        uuid: &str,
    ) -> Option<RemoteResource> {
        self.inner.state.lock().resources.get(uuid).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state.lock().resources.is_empty()
    }

    /// Подключается к шине: регистрирует слушатели Pong и Remove, затем
    /// (если включено) шлёт Ping.
    ///
    /// При ошибке любого шага уже зарегистрированные слушатели снимаются.
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
        let handlers: [(&'static str, EventHandler); 2] = [
            (EVENT_PONG, handler_for(weak.clone(), ManagerInner::on_pong)),
            (EVENT_REMOVE, handler_for(weak, ManagerInner::on_remove)),
        ];

        let mut registered = Vec::with_capacity(handlers.len());
        for (event, handler) in handlers {
            match bus.add_event_listener(event, None, handler).await {
                Ok(handle) => registered.push((event, handle)),
                Err(err) => {
                    self.rollback(&bus, registered).await;
                    return Err(err.into());
                }
            }
        }
        self.inner.state.lock().listeners = registered;
        info!(filter = %self.inner.filter, "resource manager loaded");

        if self.inner.ping_on_load {
            if let Err(err) = self.ping().await {
                let listeners = std::mem::take(&mut self.inner.state.lock().listeners);
                self.rollback(&bus, listeners).await;
                return Err(err);
            }
        }
        Ok(())
    }

    /// Рассылает Ping со своим фильтром. Каждый подходящий локальный ресурс
    /// ответит Pong.
    pub async fn ping(&self) -> DiscoveryResult<()> {
        let bus = self
            .inner
            .state
            .lock()
            .bus
            .clone()
            .ok_or(ResourceError::NotLoaded)?;

        let payload = protocol::encode(&PingPayload {
            topic: self.inner.filter.clone(),
        })?;
        bus.send_event(EVENT_PING, None, payload).await?;

        debug!(filter = %self.inner.filter, "ping sent");
        Ok(())
    }

    /// Снимает слушатели и забывает отслеживаемые ресурсы.
    ///
    /// Событий `Removed` для забытых ресурсов не будет.
    pub async fn unload(&self) -> DiscoveryResult<()> {
        let (bus, listeners) = {
            let mut state = self.inner.state.lock();
            let bus = state.bus.take().ok_or(ResourceError::NotLoaded)?;
            state.resources.clear();
            (bus, std::mem::take(&mut state.listeners))
        };

        let mut first_err: Option<BusError> = None;
        for (event, handle) in listeners {
            if let Err(err) = bus.remove_event_listener(event, handle).await {
                first_err.get_or_insert(err);
            }
        }

        info!(filter = %self.inner.filter, "resource manager unloaded");
        match first_err {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    async fn rollback(
        &self,
        bus: &Arc<dyn MessageBus>,
        registered: Vec<(&'static str, ListenerHandle)>,
    ) {
        for (event, handle) in registered {
            if let Err(err) = bus.remove_event_listener(event, handle).await {
                warn!(event, error = %err, "failed to roll back listener");
            }
        }
        let mut state = self.inner.state.lock();
        state.bus = None;
        state.resources.clear();
    }
}

fn handler_for(
    weak: Weak<ManagerInner>,
    on_message: fn(&ManagerInner, Message),
) -> EventHandler {
    event_handler(move |msg: Message| {
        let weak = weak.clone();
        async move {
            if let Some(inner) = weak.upgrade() {
                on_message(&inner, msg);
            }
        }
    })
}

impl ManagerInner {
    fn on_pong(
        &self,
        msg: Message,
    ) {
        let pong: PongPayload = match protocol::decode(&msg.payload) {
            Ok(pong) => pong,
            Err(err) => {
                debug!(error = %err, "dropping malformed pong");
                return;
            }
        };
        if !pong.is_well_formed() {
            debug!("dropping pong with empty topic or uuid");
            return;
        }
        if !self.filter.is_match(&pong.topic) {
            trace!(topic = %pong.topic, filter = %self.filter, "pong filtered out");
            return;
        }

        let mut state = self.state.lock();
        // поздняя доставка после unload
        if state.bus.is_none() {
            return;
        }

        // Обновление и события идут под guard-ом: для одного uuid подписчики
        // видят Added раньше Removed при любой многопоточной шине.
        if let Some(known) = state.resources.get(&pong.uuid) {
            if known.apply_value(pong.value) {
                debug!(topic = %known.topic(), uuid = %known.uuid(), "value updated");
            }
            return;
        }

        let resource = RemoteResource::new(pong.topic, pong.uuid, pong.value);
        state
            .resources
            .insert(resource.uuid().to_string(), resource.clone());

        debug!(topic = %resource.topic(), uuid = %resource.uuid(), "resource added");
        self.emit(ResourceEvent::Added(resource));
    }

    fn on_remove(
        &self,
        msg: Message,
    ) {
        let remove: RemovePayload = match protocol::decode(&msg.payload) {
            Ok(remove) => remove,
            Err(err) => {
                debug!(error = %err, "dropping malformed remove");
                return;
            }
        };
        if !remove.is_well_formed() {
            debug!("dropping remove with empty topic or uuid");
            return;
        }
        if !self.filter.is_match(&remove.topic) {
            trace!(topic = %remove.topic, filter = %self.filter, "remove filtered out");
            return;
        }

        let mut state = self.state.lock();
        let Some(resource) = state.resources.remove(&remove.uuid) else {
            trace!(uuid = %remove.uuid, "remove for untracked resource");
            return;
        };

        debug!(topic = %resource.topic(), uuid = %resource.uuid(), "resource removed");
        self.emit(ResourceEvent::Removed(resource));
    }

    fn emit(
        &self,
        event: ResourceEvent,
    ) {
        // Err означает, что подписчиков нет
        if self.events.send(event).is_err() {
            trace!("no event subscribers");
        }
    }
}
