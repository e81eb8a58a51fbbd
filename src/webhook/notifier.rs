//! Update notification over a single HTTP GET.

use crate::monitor::AddressPair;

use super::{HttpClient, HttpError, HttpRequest, RequestTemplate};

/// Outcome of one notification attempt.
#[derive(Debug)]
pub enum Delivery {
    /// The endpoint answered 200; carries the trimmed response body.
    Acknowledged(String),
    /// The endpoint answered with another status.
    Rejected(http::StatusCode),
    /// The request could not complete.
    TransportFailed(HttpError),
    /// The template has no host, so nothing was sent.
    NotSent,
}

/// Sends address updates to the configured endpoint.
///
/// Exactly one request per call; there is no retry here. The poll loop
/// decides what happens next based on the returned [`Delivery`].
///
/// # Example
///
/// ```
/// use iphook::webhook::{Endpoint, Notifier, ReqwestClient, RequestTemplate};
///
/// let endpoint = Endpoint::parse("https://dyn.example.com/nic/update?hostname=home").unwrap();
/// let notifier = Notifier::new(
///     ReqwestClient::new(),
///     RequestTemplate::new(endpoint, "myip", "myipv6"),
/// );
/// ```
#[derive(Debug)]
pub struct Notifier<H> {
    pub(super) client: H,
    template: RequestTemplate,
}

impl<H> Notifier<H> {
    /// Creates a notifier.
    #[must_use]
    pub const fn new(client: H, template: RequestTemplate) -> Self {
        Self { client, template }
    }

    /// Builds the request for an address pair, or `None` without a host.
    #[must_use]
    pub fn build_request(&self, addresses: &AddressPair) -> Option<HttpRequest> {
        self.template
            .render(addresses.ipv4, addresses.ipv6)
            .map(HttpRequest::get)
    }
}

impl<H: HttpClient> Notifier<H> {
    /// Reports `addresses` to the endpoint.
    pub async fn notify(&self, addresses: &AddressPair) -> Delivery {
        let Some(request) = self.build_request(addresses) else {
            tracing::info!(
                "request: GET {}",
                self.template.describe(addresses.ipv4, addresses.ipv6)
            );
            tracing::warn!("host missing in url, skipping request");
            return Delivery::NotSent;
        };

        tracing::info!("request: GET {}", request.redacted_url());

        let response = match self.client.request(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("request error: {e}");
                return Delivery::TransportFailed(e);
            }
        };

        if !response.is_ok() {
            tracing::error!("response error: {}", response.status);
            return Delivery::Rejected(response.status);
        }

        // The status alone decides; a body cut short still acknowledges
        if let Some(reason) = &response.body_error {
            tracing::warn!("response body incomplete: {reason}");
        }

        let reply = response.body_text().trim().to_string();
        tracing::info!("response: {reply}");
        Delivery::Acknowledged(reply)
    }
}
