use std::any::Any;

use crate::{ErrorExt, StatusCode};

/// Ошибки шины сообщений.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    /// Шина закрыта, дальнейшие операции невозможны.
    Closed,
    /// Слушатель с таким handle не зарегистрирован на событии.
    ListenerNotFound { event: String },
    /// Ошибка нижележащего транспорта.
    Transport { reason: String },
}

impl std::fmt::Display for BusError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "Bus is closed"),
            Self::ListenerNotFound { event } => {
                write!(f, "Listener not registered for event {event}")
            }
            Self::Transport { reason } => write!(f, "Bus transport error: {reason}"),
        }
    }
}

impl std::error::Error for BusError {}

impl ErrorExt for BusError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Closed => StatusCode::ConnectionClosed,
            Self::ListenerNotFound { .. } => StatusCode::NotFound,
            Self::Transport { .. } => StatusCode::ConnectionFailed,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn client_message(&self) -> String {
        match self {
            Self::Closed => "Bus closed".to_string(),
            Self::ListenerNotFound { event } => format!("Listener not found: {event}"),
            Self::Transport { .. } => "Bus transport failure".to_string(),
        }
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "discovery_bus".to_string()),
            ("status_code", self.status_code().to_string()),
        ];

        if let Self::ListenerNotFound { event } = self {
            tags.push(("event", event.clone()));
        }

        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_error_codes() {
        assert_eq!(BusError::Closed.status_code(), StatusCode::ConnectionClosed);
        assert!(BusError::Transport {
            reason: "reset".into()
        }
        .status_code()
        .is_retryable());
    }

    #[test]
    fn test_listener_not_found_tags() {
        let err = BusError::ListenerNotFound {
            event: "Discovery#Ping".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::NotFound);
        let tags = err.metrics_tags();
        assert!(tags
            .iter()
            .any(|(k, v)| k == &"event" && v == "Discovery#Ping"));
    }
}
