use std::any::Any;

use crate::{ErrorExt, StatusCode};

/// Ошибки создания и жизненного цикла ресурсов и менеджеров.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// Неверный аргумент конструктора (пустой topic или uuid).
    InvalidArgument { field: &'static str, reason: String },
    /// `load` вызван повторно без `unload`.
    AlreadyLoaded,
    /// Операция требует подключения к шине, но `load` не вызывался.
    NotLoaded,
}

impl ResourceError {
    pub fn invalid_argument(
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ResourceError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::InvalidArgument { field, reason } => {
                write!(f, "Invalid argument '{field}': {reason}")
            }
            Self::AlreadyLoaded => write!(f, "Already attached to a bus"),
            Self::NotLoaded => write!(f, "Not attached to a bus"),
        }
    }
}

impl std::error::Error for ResourceError {}

impl ErrorExt for ResourceError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidArgument { .. } => StatusCode::InvalidArgs,
            Self::AlreadyLoaded => StatusCode::AlreadyExists,
            Self::NotLoaded => StatusCode::InvalidOperation,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "discovery_resource".to_string()),
            ("status_code", self.status_code().to_string()),
        ];

        if let Self::InvalidArgument { field, .. } = self {
            tags.push(("field", field.to_string()));
        }

        tags
    }
}
