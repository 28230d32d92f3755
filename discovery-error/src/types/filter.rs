use std::any::Any;

use crate::{ErrorExt, StatusCode};

/// Ошибки фильтра топиков и разбора wire-формата.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Фильтр нельзя построить: пустая строка или некорректное регулярное
    /// выражение.
    InvalidFilter { reason: String },
    /// Payload не разбирается: неизвестный тег, отсутствующие поля, битый
    /// JSON.
    Decoding { reason: String },
}

impl FilterError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidFilter {
            reason: reason.into(),
        }
    }

    pub fn decoding(reason: impl Into<String>) -> Self {
        Self::Decoding {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for FilterError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::InvalidFilter { reason } => write!(f, "Invalid topic filter: {reason}"),
            Self::Decoding { reason } => write!(f, "Decoding error: {reason}"),
        }
    }
}

impl std::error::Error for FilterError {}

impl ErrorExt for FilterError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidFilter { .. } => StatusCode::InvalidArgs,
            Self::Decoding { .. } => StatusCode::DecodingError,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn client_message(&self) -> String {
        match self {
            Self::InvalidFilter { .. } => "Invalid topic filter".to_string(),
            Self::Decoding { .. } => "Malformed discovery payload".to_string(),
        }
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        vec![
            ("error_type", "discovery_filter".to_string()),
            ("status_code", self.status_code().to_string()),
        ]
    }
}
