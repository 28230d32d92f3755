//! Сводная ошибка протокола обнаружения.

pub use discovery_error::{BusError, ErrorExt, FilterError, ResourceError, StatusCode};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Bus(#[from] BusError),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

impl DiscoveryError {
    pub fn status_code(&self) -> StatusCode {
        self.as_ext().status_code()
    }

    /// Доступ к исходной ошибке через [`ErrorExt`].
    pub fn as_ext(&self) -> &dyn ErrorExt {
        match self {
            Self::Filter(e) => e,
            Self::Bus(e) => e,
            Self::Resource(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_conversions() {
        let err: DiscoveryError = BusError::Closed.into();
        assert_eq!(err, DiscoveryError::Bus(BusError::Closed));
        assert_eq!(err.status_code(), StatusCode::ConnectionClosed);

        let err: DiscoveryError = ResourceError::NotLoaded.into();
        assert_eq!(err.status_code(), StatusCode::InvalidOperation);
    }

    #[test]
    fn test_display_is_transparent() {
        let err: DiscoveryError = FilterError::invalid("empty").into();
        assert_eq!(err.to_string(), "Invalid topic filter: empty");
        assert_eq!(err.as_ext().client_message(), "Invalid topic filter");
    }
}
