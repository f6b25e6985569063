use std::fmt::Debug;
use thiserror::Error;
use tracing::metadata::LevelFilter;
use tracing::Subscriber;
use tracing_subscriber::fmt::format::PrettyFields;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("init logging error: `{0}`")]
    TryInitError(String),
}

/// Global subscriber for the processes embedding the client.
///
/// The client only emits `debug!` events (construction, discovery and cache changes), so they
/// are visible with `RUST_LOG=k8s_dynamic_reader=debug`.
pub struct Logging;

impl Logging {
    pub fn try_init() -> Result<(), LoggingError> {
        Self::try_init_with_level(LevelFilter::INFO)
    }

    /// Installs the subscriber with `level` as default directive. `RUST_LOG` directives take
    /// precedence over it.
    pub fn try_init_with_level(level: LevelFilter) -> Result<(), LoggingError> {
        Self::subscriber(level).try_init().map_err(|e| {
            LoggingError::TryInitError(format!("unable to set global logging subscriber: {e}"))
        })
    }

    fn subscriber(level: LevelFilter) -> impl Subscriber + Send + Sync + 'static {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::builder()
                    .with_default_directive(level.into())
                    .from_env_lossy(),
            )
            .fmt_fields(PrettyFields::new())
            .finish()
    }
}
