use crate::error::ConfigError;
use crate::settings::{LogFormat, LoggingSettings};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

const LOG_FILE_PREFIX: &str = "roi-estimator.log";

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. When a log directory is configured,
/// a daily rolling file layer is added; the returned guard must be held for the
/// lifetime of the process or buffered lines are lost on exit.
pub fn init_logging(settings: &LoggingSettings) -> Result<Option<WorkerGuard>, ConfigError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| ConfigError::LoggingError(e.to_string()))?;

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    match settings.format {
        LogFormat::Full => layers.push(fmt::layer().boxed()),
        LogFormat::Compact => layers.push(fmt::layer().compact().boxed()),
    }

    let mut guard = None;
    if let Some(directory) = &settings.directory {
        let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
        let (writer, worker_guard) = tracing_appender::non_blocking(appender);
        layers.push(fmt::layer().with_ansi(false).with_writer(writer).boxed());
        guard = Some(worker_guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| ConfigError::LoggingError(e.to_string()))?;

    Ok(guard)
}
