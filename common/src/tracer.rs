use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

/// Installs the stdout tracer, filtered by `RUST_LOG`.
///
/// Should be called once, at the start of each component. Defaults to the
/// `info` level when `RUST_LOG` is unset so progress messages are visible.
pub fn init_tracer() -> Result<(), SetGlobalDefaultError> {
    let stdout_tracer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    let log_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber =
        tracing_subscriber::Registry::default().with(stdout_tracer.with_filter(log_filter));

    tracing::subscriber::set_global_default(subscriber)
}
