use std::{env, fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

pub const ENV_LOG_LEVEL: &str = "DISCOVERY_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "DISCOVERY_LOG_FORMAT";
pub const ENV_LOG_DIR: &str = "DISCOVERY_LOG_DIR";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    #[error("Invalid log format: {0} (expected compact, pretty or json)")]
    InvalidFormat(String),

    #[error("Log file name must not be empty")]
    EmptyFileName,

    #[error("Log directory error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Global subscriber already set: {0}")]
    AlreadyInitialized(String),
}

/// Формат строк лога.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(LoggingError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}

/// Конфигурация логирования хоста.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Базовый уровень: trace, debug, info, warn, error, off.
    pub level: String,
    pub format: LogFormat,
    /// Дополнительные директивы `EnvFilter`, например `discovery::bus=trace`.
    pub directives: Vec<String>,
    pub console_enabled: bool,
    pub with_ansi: bool,
    pub with_target: bool,
    pub file_enabled: bool,
    pub log_dir: PathBuf,
    /// Префикс имени файла; к нему добавляется дата ротации.
    pub file_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            directives: Vec::new(),
            console_enabled: true,
            with_ansi: true,
            with_target: true,
            file_enabled: false,
            log_dir: PathBuf::from("logs"),
            file_name: "discovery.log".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Применяет `DISCOVERY_LOG_LEVEL`, `DISCOVERY_LOG_FORMAT` и
    /// `DISCOVERY_LOG_DIR`. Непустой `DISCOVERY_LOG_DIR` также включает
    /// запись в файл.
    pub fn apply_env_overrides(&mut self) -> Result<(), LoggingError> {
        if let Ok(level) = env::var(ENV_LOG_LEVEL) {
            self.level = level;
        }
        if let Ok(format) = env::var(ENV_LOG_FORMAT) {
            self.format = format.parse()?;
        }
        if let Ok(dir) = env::var(ENV_LOG_DIR) {
            if !dir.is_empty() {
                self.log_dir = PathBuf::from(dir);
                self.file_enabled = true;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), LoggingError> {
        LevelFilter::from_str(&self.level)
            .map_err(|_| LoggingError::InvalidLevel(self.level.clone()))?;
        if self.file_enabled && self.file_name.trim().is_empty() {
            return Err(LoggingError::EmptyFileName);
        }
        Ok(())
    }

    /// Строка директив для `EnvFilter`: уровень, затем дополнительные
    /// директивы через запятую.
    pub fn build_filter_directive(&self) -> String {
        std::iter::once(self.level.as_str())
            .chain(self.directives.iter().map(String::as_str))
            .filter(|d| !d.is_empty())
            .collect::<Vec<_>>()
            .join(",")
    }
}
