use std::sync::Arc;

use bytes::Bytes;

/// Одно событие, доставленное слушателю шины.
///
/// `metadata` передаётся непрозрачно: протокол обнаружения всегда шлёт `None`.
#[derive(Debug, Clone)]
pub struct Message {
    pub event: Arc<str>,
    pub metadata: Option<Bytes>,
    pub payload: Bytes,
}

impl Message {
    pub fn new(
        event: impl Into<Arc<str>>,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self {
            event: event.into(),
            metadata: None,
            payload: payload.into(),
        }
    }

    pub fn with_metadata(
        mut self,
        metadata: Option<Bytes>,
    ) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Тест проверяет создание сообщения с &str и статическими байтами.
    #[test]
    fn test_message_creation_with_str_and_bytes() {
        let msg = Message::new("Discovery#Ping", Bytes::from_static(b"{}"));

        assert_eq!(&*msg.event, "Discovery#Ping");
        assert_eq!(msg.payload, Bytes::from_static(b"{}"));
        assert!(msg.metadata.is_none());
    }

    /// Тест проверяет, что переданный Arc<str> используется без копирования.
    #[test]
    fn test_message_keeps_shared_event_name() {
        let name: Arc<str> = Arc::from("Discovery#Pong");
        let a = Message::new(name.clone(), Vec::<u8>::new());
        let b = Message::new(String::from("Discovery#Pong"), Vec::<u8>::new());

        assert!(Arc::ptr_eq(&a.event, &name));
        assert_eq!(a.event, b.event);
    }

    /// Тест проверяет, что metadata переносится как есть.
    #[test]
    fn test_message_with_metadata() {
        let msg = Message::new("evt", Vec::<u8>::new())
            .with_metadata(Some(Bytes::from_static(b"meta")));

        assert_eq!(msg.metadata, Some(Bytes::from_static(b"meta")));
        assert!(msg.payload.is_empty());
    }
}
