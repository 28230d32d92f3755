use tracing_appender::non_blocking::WorkerGuard;

/// Handle для управления lifecycle логирования.
///
/// Держит guard файлового writer-а: пока handle жив, фоновый поток пишет в
/// файл. Drop или [`LoggingHandle::shutdown`] дописывают буфер.
#[must_use = "dropping the handle stops file logging"]
pub struct LoggingHandle {
    file_guard: Option<WorkerGuard>,
}

impl LoggingHandle {
    pub fn new(file_guard: Option<WorkerGuard>) -> Self {
        Self { file_guard }
    }

    pub fn file_enabled(&self) -> bool {
        self.file_guard.is_some()
    }

    /// Явное завершение: пишет итоговое событие и сбрасывает файловый буфер.
    pub fn shutdown(mut self) {
        tracing::info!(file_enabled = self.file_enabled(), "Logging shutdown");
        drop(self.file_guard.take());
    }
}
