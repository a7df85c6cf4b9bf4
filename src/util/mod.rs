use std::sync::Once;

#[inline]
pub fn is_alphabetic(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

#[inline]
pub fn is_numeric(c: char) -> bool {
    c.is_ascii_digit()
}

#[inline]
pub fn is_alphanumeric(c: char) -> bool {
    is_alphabetic(c) || is_numeric(c)
}

static TRACING_INIT: Once = Once::new();

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when it is set; otherwise `verbose` switches this crate to `debug`.
/// Calling it more than once is harmless.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if verbose {
            EnvFilter::new("monkey_interpreter=debug")
        } else {
            EnvFilter::new("warn")
        };

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
            .with(filter)
            .init();
    });
}
