use log::LevelFilter;

/// Initialize the logger with the specified level.
///
/// `RUST_LOG` can still raise individual modules above it.
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .init();
}
