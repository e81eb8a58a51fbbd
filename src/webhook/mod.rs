//! Webhook layer for reporting addresses to the update endpoint.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - The update URL template ([`RequestTemplate`], [`Endpoint`], [`Credentials`])
//! - Sending one update and classifying the result ([`Notifier`], [`Delivery`])

mod client;
mod error;
mod http;
mod notifier;
mod template;


pub use client::ReqwestClient;
pub use error::HttpError;
pub use http::{HttpClient, HttpRequest, HttpResponse, redact};
pub use notifier::{Delivery, Notifier};
pub use template::{Credentials, Endpoint, RequestTemplate};
