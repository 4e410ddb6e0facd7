//! Logging setup for quizduel binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default filter directive string for the given targets.
///
/// Crate names are normalised to their module form (`quizduel-server` ->
/// `quizduel_server`) because that is what `tracing` uses as the target.
pub fn default_directives(targets: &[&str], default_log_level: &str) -> String {
    targets
        .iter()
        .map(|target| format!("{}={}", target.replace('-', "_"), default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber.
///
/// `targets` lists the crates (and binary) that should log at
/// `default_log_level`. The filter can be overridden with `RUST_LOG`.
///
/// # Examples
///
/// ```no_run
/// use quizduel_shared::logger::setup_logger;
///
/// setup_logger(&["quizduel-server", "tower_http"], "debug");
/// ```
pub fn setup_logger(targets: &[&str], default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(targets, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
