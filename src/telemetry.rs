// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Logging setup for hosts embedding the engine.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "user_directory=debug,info";

/// Install structured JSON logging.
///
/// `RUST_LOG` overrides the default filter. Calling this more than once,
/// or after the host installed its own subscriber, is a no-op.
pub fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging();
        init_logging();
        tracing::info!(component = "telemetry", "Logging initialized");
    }
}
