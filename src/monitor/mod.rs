//! Monitor layer for detecting and reporting address changes.
//!
//! This module provides types and functions for:
//! - Representing the resolved and submitted addresses ([`AddressPair`])
//! - Deciding whether a change must be reported ([`should_notify`])
//! - The poll loop state machine ([`PollLoop`], [`Iteration`], [`Cadence`], [`Intervals`])

mod poller;
mod state;

#[cfg(test)]
mod poller_tests;

pub use poller::{Cadence, Intervals, Iteration, PollLoop};
pub use state::{AddressPair, should_notify};
