// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

// HTTP plumbing and the HTML parser are chatty below `warn`.
const QUIET_DEPENDENCIES: &str = "hyper=warn,hyper_util=warn,reqwest=warn,html5ever=warn,selectors=warn";

/// Filter used when `RUST_LOG` is unset.
pub fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("{},{}", level, QUIET_DEPENDENCIES)
}

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `verbose`. Output goes to stderr so
/// `extract` can print its JSON summary on stdout.
pub fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();

    tracing::debug!("Logging ready (verbose: {})", verbose);
}
