//! Logging setup
//!
//! Logs go to stderr so stdout only carries the run summary. `RUST_LOG`
//! takes precedence over the verbosity flag when set.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default directive for a `-v` count
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber; later calls are ignored
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "info")]
    #[case(1, "debug")]
    #[case(2, "trace")]
    #[case(9, "trace")]
    fn test_level_for_verbosity(#[case] verbosity: u8, #[case] expected: &str) {
        assert_eq!(level_for_verbosity(verbosity), expected);
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging(0);
        init_logging(2);
    }
}
