/// Installs the global `tracing` subscriber for the `pollsub` binary.
///
/// `level` is the `logging.level` setting. Calling it again after a
/// subscriber is installed does nothing.
pub fn init(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_target(false)
        .try_init();
}

/// Maps a configured level name onto a `tracing::Level`, case-insensitively.
/// Unknown names mean `info`.
pub(crate) fn parse_level(level: &str) -> tracing::Level {
    match level.trim().to_lowercase().as_str() {
        "error" => tracing::Level::ERROR,
        "warn" | "warning" => tracing::Level::WARN,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::INFO,
    }
}
