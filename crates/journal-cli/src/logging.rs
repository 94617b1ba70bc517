//! tracing subscriber setup for the `journal` binary.

use journal_core::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding a full filter directive, e.g.
/// `journal_client=debug,info`. Wins over `logging.level`.
pub const LOG_ENV: &str = "JOURNAL_LOG";

pub fn filter_directive(config: &LoggingConfig, env_value: Option<String>) -> String {
    match env_value {
        Some(value) if !value.trim().is_empty() => value,
        _ => config.level.trim().to_lowercase(),
    }
}

/// Install the global subscriber. Logs always go to stderr so stdout stays
/// clean for clipboard output.
pub fn init_tracing(config: &LoggingConfig) {
    let directive = filter_directive(config, std::env::var(LOG_ENV).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    let result = if config.format.trim().eq_ignore_ascii_case("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    if let Err(err) = result {
        eprintln!("logging already initialized: {err}");
    }
}
