use tracing_subscriber::EnvFilter;

use crate::logging::config::LoggingConfig;

/// Фильтр уровней: `RUST_LOG`, если задана, иначе директива из конфига.
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let directive = config.build_filter_directive();
    match EnvFilter::try_new(&directive) {
        Ok(filter) => filter,
        Err(e) => {
            // подписчика ещё нет, поэтому в stderr
            eprintln!("Invalid log filter directive '{directive}': {e}; falling back to 'info'");
            EnvFilter::new("info")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        sync::{Arc, Mutex},
    };

    use serial_test::serial;
    use tracing_subscriber::{fmt, prelude::*, registry::Registry};

    use super::*;

    // Буферный writer для тестов
    #[derive(Clone)]
    struct VecMakeWriter(Arc<Mutex<Vec<u8>>>);

    impl<'a> fmt::MakeWriter<'a> for VecMakeWriter {
        type Writer = VecWriterGuard;

        fn make_writer(&'a self) -> Self::Writer {
            VecWriterGuard(self.0.clone())
        }
    }

    struct VecWriterGuard(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for VecWriterGuard {
        fn write(
            &mut self,
            buf: &[u8],
        ) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn captured(
        config: &LoggingConfig,
        emit: impl FnOnce(),
    ) -> String {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let layer = fmt::layer()
            .with_ansi(false)
            .with_writer(VecMakeWriter(buffer.clone()))
            .with_filter(build_filter(config));
        tracing::subscriber::with_default(Registry::default().with(layer), emit);

        let out = buffer.lock().unwrap();
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Тест проверяет, что уровень из конфига отсекает более подробные события.
    #[test]
    #[serial]
    fn test_config_level_filters_events() {
        env::remove_var("RUST_LOG");
        let cfg = LoggingConfig {
            level: "warn".into(),
            ..Default::default()
        };

        let out = captured(&cfg, || {
            tracing::info!("filtered info");
            tracing::warn!("visible warn");
        });

        assert!(out.contains("visible warn"));
        assert!(!out.contains("filtered info"));
    }

    /// Тест проверяет, что RUST_LOG важнее конфига.
    #[test]
    #[serial]
    fn test_rust_log_wins() {
        env::set_var("RUST_LOG", "debug");
        let cfg = LoggingConfig {
            level: "error".into(),
            ..Default::default()
        };

        let out = captured(&cfg, || tracing::debug!("debug passes"));
        env::remove_var("RUST_LOG");

        assert!(out.contains("debug passes"));
    }

    /// Тест проверяет откат к info при некорректной директиве.
    #[test]
    #[serial]
    fn test_invalid_directive_falls_back_to_info() {
        env::remove_var("RUST_LOG");
        let cfg = LoggingConfig {
            directives: vec!["discovery=loudest".into()],
            ..Default::default()
        };

        let out = captured(&cfg, || {
            tracing::debug!("hidden debug");
            tracing::info!("shown info");
        });

        assert!(out.contains("shown info"));
        assert!(!out.contains("hidden debug"));
    }
}
