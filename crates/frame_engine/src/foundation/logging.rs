//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`, defaulting to `info`
pub fn init() {
    init_with_level(log::LevelFilter::Info);
}

/// Initialize the logging system with an explicit default level
///
/// `RUST_LOG` still wins when it is set. Calling this twice is harmless.
pub fn init_with_level(level: log::LevelFilter) {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}
