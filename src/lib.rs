//! iphook: dynamic DNS address reporter
//!
//! A library for resolving the public addresses of a Linux host from its
//! routing table and reporting changes to an HTTP update endpoint.

pub mod config;
pub mod monitor;
pub mod network;
pub mod time;
pub mod webhook;
