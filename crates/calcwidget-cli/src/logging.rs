use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Logs go to stderr so stdout stays clean for
/// displays and JSON transcripts; `RUST_LOG` overrides the default filter.
pub fn init(verbose: bool, json: bool) {
    let default_directive = if verbose { "calcwidget=debug" } else { "calcwidget=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
