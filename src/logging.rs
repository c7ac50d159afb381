use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Logs go to stderr so converted records can stream to stdout.
pub fn init(verbose: bool) {
    let default = if verbose {
        "usfs_osm_tags=debug,warn"
    } else {
        "usfs_osm_tags=info,warn"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
