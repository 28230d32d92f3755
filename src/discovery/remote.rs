use std::{fmt, sync::Arc};

use serde_json::Value;
use tokio::sync::watch;

/// Зеркало обнаруженного ресурса на стороне подписчика.
///
/// Принадлежит [`ResourceManager`](super::ResourceManager), который его
/// обнаружил; только менеджер меняет значение. `Clone` даёт ещё один handle
/// на то же самое зеркало.
#[derive(Clone)]
pub struct RemoteResource {
    inner: Arc<RemoteInner>,
}

struct RemoteInner {
    topic: String,
    uuid: String,
    value: watch::Sender<Value>,
}

impl RemoteResource {
    pub(crate) fn new(
        topic: String,
        uuid: String,
        value: Value,
    ) -> Self {
        let (tx, _rx) = watch::channel(value);
        Self {
            inner: Arc::new(RemoteInner {
                topic,
                uuid,
                value: tx,
            }),
        }
    }

    pub fn topic(&self) -> &str {
        &self.inner.topic
    }

    pub fn uuid(&self) -> &str {
        &self.inner.uuid
    }

    /// Текущее значение (копия).
    pub fn value(&self) -> Value {
        self.inner.value.borrow().clone()
    }

    /// Подписка на изменения значения.
    ///
    /// Получатель видит последнее значение: при медленном чтении несколько
    /// изменений подряд сливаются в одно уведомление.
    pub fn subscribe(&self) -> watch::Receiver<Value> {
        self.inner.value.subscribe()
    }

    /// Применяет значение из анонса. Возвращает `true`, если оно изменилось.
    ///
    /// Одинаковое значение не порождает уведомления.
    pub(crate) fn apply_value(
        &self,
        value: Value,
    ) -> bool {
        self.inner.value.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        })
    }

    /// Оба handle указывают на одно и то же зеркало.
    pub fn same_mirror(
        &self,
        other: &RemoteResource,
    ) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for RemoteResource {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("RemoteResource")
            .field("topic", &self.inner.topic)
            .field("uuid", &self.inner.uuid)
            .field("value", &*self.inner.value.borrow())
            .finish()
    }
}
