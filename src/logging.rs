use tracing_subscriber::EnvFilter;

/// Initialize tracing and bridge `log` records into it.
///
/// `MIRU_DEBUG=1` forces debug output; otherwise `RUST_LOG` applies with an
/// `info` default. Safe to call more than once (later calls are no-ops).
pub fn init() {
    let _ = tracing_log::LogTracer::init();

    let env_filter = if std::env::var("MIRU_DEBUG").map_or(false, |v| v == "1") {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init()
        .ok();
}
