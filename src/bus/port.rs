//! Интерфейс (порт) шины сообщений.
//!
//! Трейт описывает ровно те операции, которые нужны протоколу обнаружения:
//! - `add_event_listener`: зарегистрировать обработчик события;
//! - `remove_event_listener`: снять обработчик по выданному handle;
//! - `send_event`: разослать событие всем слушателям.
//!
//! Семантика доставки (адресация, гарантии) определяется реализацией.

use std::{future::Future, pin::Pin, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use discovery_error::BusError;

use super::Message;

pub type BusResult<T> = Result<T, BusError>;

/// Future, возвращаемый обработчиком события.
pub type HandlerFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Обработчик события шины.
pub type EventHandler = Arc<dyn Fn(Message) -> HandlerFuture + Send + Sync>;

/// Handle зарегистрированного слушателя.
///
/// Выдаётся `add_event_listener` и возвращается в `remove_event_listener`:
/// снятие слушателя не зависит от идентичности замыкания.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

impl ListenerHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Оборачивает async-замыкание в [`EventHandler`].
pub fn event_handler<F, Fut>(f: F) -> EventHandler
where
    F: Fn(Message) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |msg| Box::pin(f(msg)))
}

#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Зарегистрировать обработчик события `event`.
    async fn add_event_listener(
        &self,
        event: &str,
        metadata: Option<Bytes>,
        handler: EventHandler,
    ) -> BusResult<ListenerHandle>;

    /// Снять обработчик, ранее зарегистрированный на `event`.
    async fn remove_event_listener(
        &self,
        event: &str,
        handle: ListenerHandle,
    ) -> BusResult<()>;

    /// Разослать событие всем слушателям `event`.
    async fn send_event(
        &self,
        event: &str,
        metadata: Option<Bytes>,
        payload: Bytes,
    ) -> BusResult<()>;
}
