use std::time::Duration;

use serde::{Deserialize, Serialize};

use config::{Config, ConfigBuilder, ConfigError, Environment};

/// Префикс переменных окружения (`DISCOVERY_EVENT_CAPACITY` и т.п.).
pub const ENV_PREFIX: &str = "DISCOVERY";

/// Настройки протокола обнаружения.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Слать Ping сразу после `ResourceManager::load`.
    pub ping_on_load: bool,
    /// Ёмкость канала событий менеджера.
    pub event_capacity: usize,
    /// Окно ожидания для `collect_resources`, мс.
    pub collect_window_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ping_on_load: true,
            event_capacity: 64,
            collect_window_ms: 250,
        }
    }
}

impl Settings {
    /// Значения по умолчанию, поверх них переменные окружения `DISCOVERY_*`.
    pub fn load() -> Result<Self, ConfigError> {
        let cfg = Self::with_defaults()?
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Self::from_config(cfg)
    }

    /// Десериализует и проверяет уже собранную конфигурацию.
    pub fn from_config(cfg: Config) -> Result<Self, ConfigError> {
        let settings: Self = cfg.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Builder с заполненными значениями по умолчанию: к нему можно добавить
    /// свои источники (файл, override-ы).
    pub fn with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let defaults = Self::default();
        Config::builder()
            .set_default("ping_on_load", defaults.ping_on_load)?
            .set_default("event_capacity", defaults.event_capacity as u64)?
            .set_default("collect_window_ms", defaults.collect_window_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_capacity == 0 {
            return Err(ConfigError::Message(
                "event_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn collect_window(&self) -> Duration {
        Duration::from_millis(self.collect_window_ms)
    }
}
