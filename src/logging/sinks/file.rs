use std::fs;

use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::registry::LookupSpan;

use crate::logging::{
    config::{LoggingConfig, LoggingError},
    formatter::{self, BoxedLayer},
};

/// File layer: ежедневная ротация в `log_dir`, запись через фоновый поток.
///
/// Guard нужно держать, пока логирование активно: при drop он дописывает
/// буфер.
pub fn layer<S>(config: &LoggingConfig) -> Result<(BoxedLayer<S>, WorkerGuard), LoggingError>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fs::create_dir_all(&config.log_dir)?;

    let appender = rolling::daily(&config.log_dir, &config.file_name);
    let (writer, guard) = non_blocking(appender);

    // в файле escape-последовательности не нужны
    let layer = formatter::build_layer(config.format, writer, false, config.with_target);
    Ok((layer, guard))
}
