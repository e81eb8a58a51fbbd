//! Application execution logic.
//!
//! This module wires the configured facility, resolver and notifier into a
//! [`PollLoop`] and runs it until a shutdown signal arrives.

use thiserror::Error;
use tokio::signal;

use iphook::config::ValidatedConfig;
use iphook::monitor::PollLoop;
use iphook::network::platform::PlatformFacility;
use iphook::network::{FacilityError, LinkId, Resolver, RouteFacility};
use iphook::webhook::{HttpError, Notifier, ReqwestClient};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The configured interface could not be looked up.
    #[error("Failed to find interface '{name}': {source}")]
    InterfaceLookup {
        /// The configured interface name
        name: String,
        /// Underlying facility error
        #[source]
        source: FacilityError,
    },

    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[source] HttpError),

    /// Failed to install a signal handler.
    #[error("Failed to install signal handler: {0}")]
    Signal(#[source] std::io::Error),
}

/// Executes the main application loop.
///
/// This function:
/// 1. Looks up the pinned interface, if one is configured
/// 2. Creates the HTTP client with the configured timeout
/// 3. Runs the poll loop until shutdown signal (Ctrl+C or SIGTERM)
///
/// # Errors
///
/// Returns an error if:
/// - The pinned interface does not exist or cannot be queried
/// - The HTTP client cannot be created
/// - Signal handlers cannot be installed
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires:
/// - Platform-specific network APIs
/// - Real async runtime with signal handling
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let facility = PlatformFacility::default();
    let link = lookup_interface(&facility, config.interface.as_deref())?;

    let intervals = config.intervals();
    let client = ReqwestClient::with_timeout(config.timeout).map_err(RunError::HttpClient)?;
    let notifier = Notifier::new(client, config.template);

    let poll_loop = PollLoop::new(Resolver::new(facility), notifier, intervals).with_link(link);

    match link {
        Some(link) => tracing::info!("Polling addresses on link {link}"),
        None => tracing::info!("Polling addresses on the default-route interface"),
    }

    let shutdown = shutdown_signal()?;
    let submitted = poll_loop.run(shutdown).await;
    tracing::debug!("Last submitted addresses: {submitted}");

    Ok(())
}

/// Resolves the configured interface name to a link, once at startup.
fn lookup_interface<F: RouteFacility>(
    facility: &F,
    name: Option<&str>,
) -> Result<Option<LinkId>, RunError> {
    let Some(name) = name else {
        return Ok(None);
    };

    facility
        .link_by_name(name)
        .map(Some)
        .map_err(|source| RunError::InterfaceLookup {
            name: name.to_string(),
            source,
        })
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Handlers are installed before the future is returned, so a signal that
/// arrives during the first iteration is not missed.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
fn shutdown_signal() -> Result<impl Future<Output = ()>, RunError> {
    #[cfg(unix)]
    let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())
        .map_err(RunError::Signal)?;

    Ok(async move {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("Ctrl+C handler failed: {e}");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            terminate.recv().await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => {}
            () = terminate => {}
        }
    })
}
