//! Logging utilities

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// `default_level` applies when `RUST_LOG` is unset. Returns `false` when a
/// logger was already installed.
pub fn init(default_level: &str) -> bool {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_a_no_op() {
        // Another test may have installed the logger already, so only the
        // repeat call has a fixed outcome
        let _ = init("info");
        assert!(!init("debug"));
    }
}
