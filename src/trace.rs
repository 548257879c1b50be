use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn";
const VERBOSE_LOG_FILTER: &str = "chronogrid=debug,chronogrid_core=debug";

/// Install the global subscriber. `RUST_LOG` wins over `--verbose`.
pub fn setup(verbose: bool) {
    let fallback = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    let directives = std::env::var("RUST_LOG").unwrap_or_else(|_| fallback.to_owned());

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::builder().parse_lossy(directives))
        .init();
}
