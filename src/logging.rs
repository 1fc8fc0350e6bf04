use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "revtail=info";

/// Install the global tracing subscriber. Logs go to stderr so that stdout
/// carries only tailed lines.
pub fn init_logging(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(err) = result {
        eprintln!("logging already initialised: {err}");
    }
}
