use std::sync::{
    atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use discovery_error::BusError;
use tracing::{debug, trace};

use super::{intern_event, BusResult, EventHandler, ListenerHandle, Message, MessageBus};

type EventKey = Arc<str>;

#[derive(Clone)]
struct Listener {
    handle: ListenerHandle,
    handler: EventHandler,
}

/// Внутрипроцессная шина сообщений.
///
/// Поддерживает:
/// - слушателей по точному имени события, в порядке регистрации
/// - последовательную доставку: `send_event` ждёт каждого обработчика
/// - повторный вход: обработчик может слать события и (де)регистрировать
///   слушателей прямо во время доставки
/// - статистику публикаций и недоставленных событий
///
/// Список слушателей снимается (snapshot) до начала доставки, поэтому
/// изменения, сделанные во время доставки, видны только следующим отправкам.
pub struct Broker {
    /// Имя события → слушатели в порядке регистрации
    listeners: DashMap<EventKey, Vec<Listener>>,
    next_id: AtomicU64,
    closed: AtomicBool,
    /// Общее количество вызовов `send_event`
    pub publish_count: AtomicUsize,
    /// Количество событий, для которых не нашлось ни одного слушателя
    pub undelivered_count: AtomicUsize,
}

impl Broker {
    pub fn new() -> Self {
        Self {
            listeners: DashMap::new(),
            next_id: AtomicU64::new(1),
            closed: AtomicBool::new(false),
            publish_count: AtomicUsize::new(0),
            undelivered_count: AtomicUsize::new(0),
        }
    }

    /// Закрывает шину: все последующие операции вернут [`BusError::Closed`].
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.listeners.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Количество слушателей события.
    pub fn listener_count(
        &self,
        event: &str,
    ) -> usize {
        self.listeners
            .get(event)
            .map(|entry| entry.value().len())
            .unwrap_or(0)
    }

    fn ensure_open(&self) -> BusResult<()> {
        if self.is_closed() {
            return Err(BusError::Closed);
        }
        Ok(())
    }

    /// Ключ события из карты и копия его обработчиков.
    fn snapshot(
        &self,
        event: &str,
    ) -> Option<(EventKey, Vec<EventHandler>)> {
        let entry = self.listeners.get(event)?;
        let handlers: Vec<EventHandler> = entry
            .value()
            .iter()
            .map(|listener| listener.handler.clone())
            .collect();
        if handlers.is_empty() {
            return None;
        }
        Some((entry.key().clone(), handlers))
    }
}

impl Default for Broker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBus for Broker {
    async fn add_event_listener(
        &self,
        event: &str,
        _metadata: Option<Bytes>,
        handler: EventHandler,
    ) -> BusResult<ListenerHandle> {
        self.ensure_open()?;

        let handle = ListenerHandle::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .entry(intern_event(event))
            .or_default()
            .push(Listener { handle, handler });

        debug!(event, listener = handle.id(), "listener registered");
        Ok(handle)
    }

    async fn remove_event_listener(
        &self,
        event: &str,
        handle: ListenerHandle,
    ) -> BusResult<()> {
        self.ensure_open()?;

        let not_found = || BusError::ListenerNotFound {
            event: event.to_string(),
        };

        {
            let mut entry = self.listeners.get_mut(event).ok_or_else(not_found)?;
            let listeners = entry.value_mut();
            let pos = listeners
                .iter()
                .position(|listener| listener.handle == handle)
                .ok_or_else(not_found)?;
            listeners.remove(pos);
        }

        // пустые события не держим
        self.listeners
            .remove_if(event, |_, listeners| listeners.is_empty());

        debug!(event, listener = handle.id(), "listener removed");
        Ok(())
    }

    async fn send_event(
        &self,
        event: &str,
        metadata: Option<Bytes>,
        payload: Bytes,
    ) -> BusResult<()> {
        self.ensure_open()?;
        self.publish_count.fetch_add(1, Ordering::Relaxed);

        // имя берётся из карты слушателей: пул не растёт от чужих имён
        let Some((key, handlers)) = self.snapshot(event) else {
            self.undelivered_count.fetch_add(1, Ordering::Relaxed);
            trace!(event, "no listeners for event");
            return Ok(());
        };

        let msg = Message::new(key, payload).with_metadata(metadata);
        for handler in handlers {
            handler(msg.clone()).await;
        }
        Ok(())
    }
}
