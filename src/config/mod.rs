//! Настройки из переменных окружения.

pub mod settings;

pub use settings::{Settings, ENV_PREFIX};
