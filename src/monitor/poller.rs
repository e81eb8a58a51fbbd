//! The poll loop.
//!
//! Each iteration resolves both address families, compares them with the
//! submitted state and reports a change through the [`Notifier`]. The
//! submitted state is owned by the caller and threaded through
//! [`PollLoop::step`]; nothing is cached between iterations.

use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

use super::state::{AddressPair, should_notify};
use crate::network::{Family, LinkId, Resolver, RouteFacility};
use crate::time::{Sleeper, TokioSleeper};
use crate::webhook::{Delivery, HttpClient, Notifier};

/// Which interval to sleep after an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// The regular poll interval.
    Normal,
    /// The longer backoff after the endpoint rejected an update.
    Error,
}

/// Sleep durations for each [`Cadence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intervals {
    /// Interval between regular iterations.
    pub normal: Duration,
    /// Interval after a rejected update.
    pub error: Duration,
}

impl Intervals {
    /// Creates the interval pair.
    #[must_use]
    pub const fn new(normal: Duration, error: Duration) -> Self {
        Self { normal, error }
    }

    /// Returns the sleep duration for `cadence`.
    #[must_use]
    pub const fn for_cadence(&self, cadence: Cadence) -> Duration {
        match cadence {
            Cadence::Normal => self.normal,
            Cadence::Error => self.error,
        }
    }
}

/// Result of one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Iteration {
    /// Submitted state to carry into the next iteration.
    pub submitted: AddressPair,
    /// How long to wait before the next iteration.
    pub cadence: Cadence,
}

/// Periodically resolves public addresses and reports changes.
///
/// # Type Parameters
///
/// * `F` - The [`RouteFacility`] used for resolution
/// * `H` - The [`HttpClient`] used by the notifier
/// * `S` - The [`Sleeper`] used between iterations (defaults to [`TokioSleeper`])
pub struct PollLoop<F, H, S = TokioSleeper> {
    resolver: Resolver<F>,
    notifier: Notifier<H>,
    link: Option<LinkId>,
    intervals: Intervals,
    sleeper: S,
}

impl<F, H> PollLoop<F, H, TokioSleeper> {
    /// Creates a poll loop that follows the default route.
    #[must_use]
    pub const fn new(resolver: Resolver<F>, notifier: Notifier<H>, intervals: Intervals) -> Self {
        Self {
            resolver,
            notifier,
            link: None,
            intervals,
            sleeper: TokioSleeper,
        }
    }
}

impl<F, H, S> PollLoop<F, H, S> {
    /// Pins resolution to `link` instead of the default-route interface.
    #[must_use]
    pub const fn with_link(mut self, link: Option<LinkId>) -> Self {
        self.link = link;
        self
    }

    /// Sets a custom sleeper.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> PollLoop<F, H, S2> {
        PollLoop {
            resolver: self.resolver,
            notifier: self.notifier,
            link: self.link,
            intervals: self.intervals,
            sleeper,
        }
    }

    /// Returns the pinned link, if any.
    #[must_use]
    pub const fn link(&self) -> Option<LinkId> {
        self.link
    }

    /// Returns the configured intervals.
    #[must_use]
    pub const fn intervals(&self) -> Intervals {
        self.intervals
    }
}

impl<F, H, S> PollLoop<F, H, S>
where
    F: RouteFacility,
    H: HttpClient,
    S: Sleeper,
{
    /// Resolves both families, IPv4 first.
    ///
    /// A failing family is logged and reported as absent.
    pub fn resolve(&self) -> AddressPair {
        let ipv4 = match self.resolve_family(Family::V4) {
            Some(IpAddr::V4(v4)) => Some(v4),
            _ => None,
        };
        let ipv6 = match self.resolve_family(Family::V6) {
            Some(IpAddr::V6(v6)) => Some(v6),
            _ => None,
        };
        AddressPair::new(ipv4, ipv6)
    }

    fn resolve_family(&self, family: Family) -> Option<IpAddr> {
        self.resolver
            .resolve(self.link, family)
            .unwrap_or_else(|e| {
                tracing::warn!("{family}: {e}");
                None
            })
    }

    /// Runs one iteration against `submitted`.
    pub async fn step(&self, submitted: AddressPair) -> Iteration {
        let resolved = self.resolve();

        if !should_notify(&resolved, &submitted) {
            tracing::debug!("addresses unchanged. {resolved}");
            return Iteration {
                submitted,
                cadence: Cadence::Normal,
            };
        }

        tracing::info!("addresses changed. {resolved}");

        match self.notifier.notify(&resolved).await {
            Delivery::Acknowledged(_) => Iteration {
                submitted: resolved,
                cadence: Cadence::Normal,
            },
            Delivery::Rejected(_) => Iteration {
                submitted,
                cadence: Cadence::Error,
            },
            Delivery::TransportFailed(_) | Delivery::NotSent => Iteration {
                submitted,
                cadence: Cadence::Normal,
            },
        }
    }

    /// Runs iterations until `shutdown` completes.
    ///
    /// Shutdown is observed both while sleeping and while an iteration is
    /// in flight. Returns the submitted state at the time of shutdown.
    pub async fn run<D>(&self, shutdown: D) -> AddressPair
    where
        D: Future<Output = ()>,
    {
        let mut submitted = AddressPair::default();
        tokio::pin!(shutdown);

        loop {
            let iteration = tokio::select! {
                biased;

                () = &mut shutdown => break,
                iteration = self.step(submitted) => iteration,
            };
            submitted = iteration.submitted;

            let pause = self.intervals.for_cadence(iteration.cadence);
            tokio::select! {
                biased;

                () = &mut shutdown => break,
                () = self.sleeper.sleep(pause) => {}
            }
        }

        tracing::info!("Shutdown signal received, stopping...");
        submitted
    }
}
