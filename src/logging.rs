// SPDX-License-Identifier: MPL-2.0
//! Tracing subscriber setup.
//!
//! Events go to stderr so command output on stdout stays machine-readable.
//! `RUST_LOG` takes precedence over the verbosity passed by the CLI.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for a `-v` count.
#[must_use]
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "media_deck=warn",
        1 => "media_deck=info",
        2 => "media_deck=debug",
        _ => "media_deck=trace",
    }
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(default_directive(0), "media_deck=warn");
        assert_eq!(default_directive(2), "media_deck=debug");
        assert_eq!(default_directive(9), "media_deck=trace");
    }

    #[test]
    fn init_twice_is_harmless() {
        init(1);
        init(3);
        tracing::info!("still logging");
    }
}
