use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install a JSON log layer filtered by `RUST_LOG`, defaulting to `info`.
///
/// Timestamps are left out, the Lambda log service stamps every line on ingestion.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .without_time()
        .with_filter(filter);
    tracing_subscriber::registry().with(log_layer).init();
}
