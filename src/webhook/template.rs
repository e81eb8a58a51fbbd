//! Update URL template.
//!
//! A [`RequestTemplate`] holds the configured update URL and the query
//! parameter names used for each address family. Rendering appends the
//! address parameters after any query the template already carries.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use url::Url;

/// Where update requests go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// An absolute URL with a host.
    Absolute(Url),
    /// A relative reference, or an absolute URL without a host.
    ///
    /// Requests are never sent; each attempt logs a warning instead.
    MissingHost(String),
}

impl Endpoint {
    /// Classifies a URL string.
    ///
    /// # Errors
    ///
    /// Returns the parse error for strings that are neither absolute URLs
    /// nor relative references.
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        match Url::parse(input) {
            Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(Self::Absolute(url)),
            Ok(_)
            | Err(url::ParseError::RelativeUrlWithoutBase | url::ParseError::EmptyHost) => {
                Ok(Self::MissingHost(input.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}

/// Basic-auth credentials embedded into the update URL.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// User name (never empty).
    pub username: String,
    /// Password (may be empty).
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The configured update request, minus the addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTemplate {
    endpoint: Endpoint,
    ipv4_param: String,
    ipv6_param: String,
}

impl RequestTemplate {
    /// Creates a template.
    ///
    /// An empty parameter name disables reporting that family.
    #[must_use]
    pub fn new(
        endpoint: Endpoint,
        ipv4_param: impl Into<String>,
        ipv6_param: impl Into<String>,
    ) -> Self {
        Self {
            endpoint,
            ipv4_param: ipv4_param.into(),
            ipv6_param: ipv6_param.into(),
        }
    }

    /// Embeds credentials in the URL userinfo.
    ///
    /// Ignored for templates without a host.
    #[must_use]
    pub fn with_credentials(mut self, credentials: &Credentials) -> Self {
        if let Endpoint::Absolute(ref mut url) = self.endpoint {
            // Hosted URLs can always carry userinfo
            let _ = url.set_username(&credentials.username);
            let _ = url.set_password(Some(&credentials.password));
        }
        self
    }

    /// Returns the endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the IPv4 parameter name.
    #[must_use]
    pub fn ipv4_param(&self) -> &str {
        &self.ipv4_param
    }

    /// Returns the IPv6 parameter name.
    #[must_use]
    pub fn ipv6_param(&self) -> &str {
        &self.ipv6_param
    }

    /// Builds the concrete update URL for an address pair.
    ///
    /// Returns `None` when the template has no host.
    #[must_use]
    pub fn render(&self, ipv4: Option<Ipv4Addr>, ipv6: Option<Ipv6Addr>) -> Option<Url> {
        let Endpoint::Absolute(base) = &self.endpoint else {
            return None;
        };

        let pairs = self.address_pairs(ipv4, ipv6);
        let mut url = base.clone();
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (name, value) in &pairs {
                query.append_pair(name, value);
            }
        }
        Some(url)
    }

    /// Describes the request for logging when no URL can be built.
    #[must_use]
    pub fn describe(&self, ipv4: Option<Ipv4Addr>, ipv6: Option<Ipv6Addr>) -> String {
        match &self.endpoint {
            Endpoint::Absolute(_) => self
                .render(ipv4, ipv6)
                .map_or_else(String::new, |url| super::http::redact(&url)),
            Endpoint::MissingHost(raw) => {
                let extra: Vec<String> = self
                    .address_pairs(ipv4, ipv6)
                    .into_iter()
                    .map(|(name, value)| format!("{name}={value}"))
                    .collect();
                if extra.is_empty() {
                    raw.clone()
                } else {
                    let separator = if raw.contains('?') { '&' } else { '?' };
                    format!("{raw}{separator}{}", extra.join("&"))
                }
            }
        }
    }

    fn address_pairs(&self, ipv4: Option<Ipv4Addr>, ipv6: Option<Ipv6Addr>) -> Vec<(&str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(v4) = ipv4.filter(|_| !self.ipv4_param.is_empty()) {
            pairs.push((self.ipv4_param.as_str(), v4.to_string()));
        }
        if let Some(v6) = ipv6.filter(|_| !self.ipv6_param.is_empty()) {
            pairs.push((self.ipv6_param.as_str(), v6.to_string()));
        }
        pairs
    }
}
