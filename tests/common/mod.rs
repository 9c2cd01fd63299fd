use std::sync::Once;

use log::LevelFilter;

static INIT: Once = Once::new();

/// Route the crate's `log` output through env_logger once per test binary.
/// `RUST_LOG` still overrides the default level.
pub fn init_logger() {
    INIT.call_once_force(|_| {
        let _ = env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .parse_default_env()
            .try_init();
    });
}
