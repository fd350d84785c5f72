use tracing_subscriber::EnvFilter;

pub fn init_logging(verbosity: u8) {
    // 0 = warnings only (unsupported widget types still show)
    // 1 (-v) = info
    // 2+ (-vv) = debug/trace
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .try_init();
}
