use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "goldrush=info";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global fmt subscriber. Safe to call more than once; only the
/// first call has an effect.
pub fn init() {
    let _ = tracing_subscriber::fmt().with_env_filter(filter()).try_init();
}
