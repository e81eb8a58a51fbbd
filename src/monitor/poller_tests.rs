//! Tests for `PollLoop`.

use super::{AddressPair, Cadence, Intervals, Iteration, PollLoop};
use crate::network::{
    FacilityError, Family, InterfaceAddress, LinkId, Resolver, Route, RouteFacility,
};
use crate::time::Sleeper;
use crate::webhook::{
    Endpoint, HttpClient, HttpError, HttpRequest, HttpResponse, Notifier, RequestTemplate,
};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const WAN: LinkId = LinkId::new(2);
const NORMAL: Duration = Duration::from_secs(5);
const BACKOFF: Duration = Duration::from_secs(300);

/// Facility whose routes and addresses can be changed between iterations.
#[derive(Default)]
struct MockFacility {
    routes: Mutex<HashMap<Family, Vec<Route>>>,
    addresses: Mutex<HashMap<Family, Vec<InterfaceAddress>>>,
    failing: Mutex<Option<Family>>,
    route_queries: AtomicUsize,
}

impl MockFacility {
    /// One default route per family on `WAN` and the given addresses.
    fn online(v4: Option<&str>, v6: Option<&str>) -> Arc<Self> {
        let facility = Arc::new(Self::default());
        for family in Family::ALL {
            facility.add_default_route(family);
        }
        facility.set_address(Family::V4, v4);
        facility.set_address(Family::V6, v6);
        facility
    }

    fn add_default_route(&self, family: Family) {
        self.routes
            .lock()
            .unwrap()
            .entry(family)
            .or_default()
            .push(Route::default_via(WAN));
    }

    fn set_address(&self, family: Family, address: Option<&str>) {
        let addresses = address
            .map(|a| vec![InterfaceAddress::global(a.parse().unwrap())])
            .unwrap_or_default();
        self.addresses.lock().unwrap().insert(family, addresses);
    }

    fn fail(&self, family: Family) {
        *self.failing.lock().unwrap() = Some(family);
    }

    fn route_queries(&self) -> usize {
        self.route_queries.load(Ordering::SeqCst)
    }
}

impl RouteFacility for MockFacility {
    fn link_by_name(&self, name: &str) -> Result<LinkId, FacilityError> {
        Err(FacilityError::LinkNotFound {
            name: name.to_string(),
        })
    }

    fn routes(&self, _link: Option<LinkId>, family: Family) -> Result<Vec<Route>, FacilityError> {
        self.route_queries.fetch_add(1, Ordering::SeqCst);
        if *self.failing.lock().unwrap() == Some(family) {
            return Err(FacilityError::Decode("truncated message".to_string()));
        }
        Ok(self
            .routes
            .lock()
            .unwrap()
            .get(&family)
            .cloned()
            .unwrap_or_default())
    }

    fn addresses(
        &self,
        link: LinkId,
        family: Family,
    ) -> Result<Vec<InterfaceAddress>, FacilityError> {
        if *self.failing.lock().unwrap() == Some(family) {
            return Err(FacilityError::Decode("truncated message".to_string()));
        }
        if link != WAN {
            return Ok(Vec::new());
        }
        Ok(self
            .addresses
            .lock()
            .unwrap()
            .get(&family)
            .cloned()
            .unwrap_or_default())
    }
}

/// HTTP client answering every request the same way.
///
/// `None` as status simulates a transport timeout.
struct MockClient {
    status: Mutex<Option<http::StatusCode>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockClient {
    fn answering(status: http::StatusCode) -> Arc<Self> {
        Arc::new(Self {
            status: Mutex::new(Some(status)),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn timing_out() -> Arc<Self> {
        Arc::new(Self {
            status: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn set_status(&self, status: http::StatusCode) {
        *self.status.lock().unwrap() = Some(status);
    }

    fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl HttpClient for Arc<MockClient> {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(req);
        let status = *self.status.lock().unwrap();
        status.map_or(Err(HttpError::Timeout), |status| {
            Ok(HttpResponse::new(
                status,
                http::HeaderMap::new(),
                b"good\n".to_vec(),
            ))
        })
    }
}

/// Sleeper that records requested durations, then waits on the tokio timer.
#[derive(Clone, Default)]
struct RecordingSleeper {
    slept: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    fn recorded(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
        tokio::time::sleep(duration).await;
    }
}

fn poll_loop_with_url(
    facility: &Arc<MockFacility>,
    client: &Arc<MockClient>,
    url: &str,
) -> PollLoop<Arc<MockFacility>, Arc<MockClient>> {
    let template = RequestTemplate::new(Endpoint::parse(url).unwrap(), "myip", "myipv6");
    PollLoop::new(
        Resolver::new(Arc::clone(facility)),
        Notifier::new(Arc::clone(client), template),
        Intervals::new(NORMAL, BACKOFF),
    )
}

fn poll_loop(
    facility: &Arc<MockFacility>,
    client: &Arc<MockClient>,
) -> PollLoop<Arc<MockFacility>, Arc<MockClient>> {
    poll_loop_with_url(
        facility,
        client,
        "https://dyn.example.com/nic/update?hostname=home.example.com",
    )
}

fn pair(v4: Option<&str>, v6: Option<&str>) -> AddressPair {
    AddressPair::new(v4.map(|a| a.parse().unwrap()), v6.map(|a| a.parse().unwrap()))
}

fn query_names(request: &HttpRequest) -> Vec<String> {
    request
        .url
        .query_pairs()
        .map(|(name, _)| name.into_owned())
        .collect()
}

mod intervals {
    use super::*;

    #[test]
    fn cadence_selects_duration() {
        let intervals = Intervals::new(NORMAL, BACKOFF);

        assert_eq!(intervals.for_cadence(Cadence::Normal), NORMAL);
        assert_eq!(intervals.for_cadence(Cadence::Error), BACKOFF);
    }
}

mod resolution {
    use super::*;

    #[test]
    fn resolves_both_families() {
        let facility = MockFacility::online(Some("203.0.113.7"), Some("2001:db8::7"));
        let client = MockClient::answering(http::StatusCode::OK);

        let resolved = poll_loop(&facility, &client).resolve();

        assert_eq!(resolved, pair(Some("203.0.113.7"), Some("2001:db8::7")));
    }

    #[test]
    fn ambiguous_ipv4_route_leaves_ipv6_resolved() {
        let facility = MockFacility::online(Some("203.0.113.7"), Some("2001:db8::7"));
        facility.add_default_route(Family::V4);
        let client = MockClient::answering(http::StatusCode::OK);

        let resolved = poll_loop(&facility, &client).resolve();

        assert_eq!(resolved, pair(None, Some("2001:db8::7")));
    }

    #[test]
    fn facility_failure_leaves_family_unresolved() {
        let facility = MockFacility::online(Some("203.0.113.7"), Some("2001:db8::7"));
        facility.fail(Family::V6);
        let client = MockClient::answering(http::StatusCode::OK);

        let resolved = poll_loop(&facility, &client).resolve();

        assert_eq!(resolved, pair(Some("203.0.113.7"), None));
    }

    #[test]
    fn pinned_link_skips_route_discovery() {
        let facility = MockFacility::online(Some("203.0.113.7"), None);
        let client = MockClient::answering(http::StatusCode::OK);

        let poll_loop = poll_loop(&facility, &client).with_link(Some(WAN));
        let resolved = poll_loop.resolve();

        assert_eq!(resolved, pair(Some("203.0.113.7"), None));
        assert_eq!(facility.route_queries(), 0);
        assert_eq!(poll_loop.link(), Some(WAN));
    }

    #[test]
    fn default_route_is_rediscovered_every_iteration() {
        let facility = MockFacility::online(Some("203.0.113.7"), None);
        let client = MockClient::answering(http::StatusCode::OK);
        let poll_loop = poll_loop(&facility, &client);

        poll_loop.resolve();
        poll_loop.resolve();

        assert_eq!(facility.route_queries(), 4);
    }
}

mod step {
    use super::*;

    #[tokio::test]
    async fn single_ipv4_address_is_reported_alone() {
        let facility = MockFacility::online(Some("203.0.113.7"), None);
        let client = MockClient::answering(http::StatusCode::OK);

        let iteration = poll_loop(&facility, &client)
            .step(AddressPair::default())
            .await;

        assert_eq!(
            iteration,
            Iteration {
                submitted: pair(Some("203.0.113.7"), None),
                cadence: Cadence::Normal,
            }
        );
        let requests = client.captured_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(query_names(&requests[0]), vec!["hostname", "myip"]);
    }

    #[tokio::test]
    async fn unchanged_addresses_send_no_second_request() {
        let facility = MockFacility::online(Some("203.0.113.7"), Some("2001:db8::7"));
        let client = MockClient::answering(http::StatusCode::OK);
        let poll_loop = poll_loop(&facility, &client);

        let first = poll_loop.step(AddressPair::default()).await;
        let second = poll_loop.step(first.submitted).await;

        assert_eq!(client.calls(), 1);
        assert_eq!(second.submitted, first.submitted);
        assert_eq!(second.cadence, Cadence::Normal);
    }

    #[tokio::test]
    async fn nothing_resolved_sends_nothing() {
        let facility = MockFacility::online(None, None);
        let client = MockClient::answering(http::StatusCode::OK);
        let submitted = pair(Some("203.0.113.7"), None);

        let iteration = poll_loop(&facility, &client).step(submitted).await;

        assert_eq!(client.calls(), 0);
        assert_eq!(iteration.submitted, submitted);
        assert_eq!(iteration.cadence, Cadence::Normal);
    }

    #[tokio::test]
    async fn rejection_keeps_state_and_backs_off() {
        let facility = MockFacility::online(Some("203.0.113.7"), None);
        let client = MockClient::answering(http::StatusCode::INTERNAL_SERVER_ERROR);

        let iteration = poll_loop(&facility, &client)
            .step(AddressPair::default())
            .await;

        assert_eq!(iteration.submitted, AddressPair::default());
        assert_eq!(iteration.cadence, Cadence::Error);
    }

    #[tokio::test]
    async fn rejected_update_is_retried_next_iteration() {
        let facility = MockFacility::online(Some("203.0.113.7"), None);
        let client = MockClient::answering(http::StatusCode::SERVICE_UNAVAILABLE);
        let poll_loop = poll_loop(&facility, &client);

        let first = poll_loop.step(AddressPair::default()).await;
        client.set_status(http::StatusCode::OK);
        let second = poll_loop.step(first.submitted).await;

        assert_eq!(client.calls(), 2);
        assert_eq!(second.submitted, pair(Some("203.0.113.7"), None));
        assert_eq!(second.cadence, Cadence::Normal);
    }

    #[tokio::test]
    async fn transport_failure_keeps_state_at_normal_cadence() {
        let facility = MockFacility::online(Some("203.0.113.7"), None);
        let client = MockClient::timing_out();

        let iteration = poll_loop(&facility, &client)
            .step(AddressPair::default())
            .await;

        assert_eq!(iteration.submitted, AddressPair::default());
        assert_eq!(iteration.cadence, Cadence::Normal);
    }

    #[tokio::test]
    async fn missing_host_keeps_state_at_normal_cadence() {
        let facility = MockFacility::online(Some("203.0.113.7"), None);
        let client = MockClient::answering(http::StatusCode::OK);
        let poll_loop =
            poll_loop_with_url(&facility, &client, "/nic/update?hostname=test.example.com");

        let iteration = poll_loop.step(AddressPair::default()).await;

        assert_eq!(client.calls(), 0);
        assert_eq!(iteration.submitted, AddressPair::default());
        assert_eq!(iteration.cadence, Cadence::Normal);
    }

    #[tokio::test]
    async fn ambiguous_ipv4_sends_only_ipv6() {
        let facility = MockFacility::online(Some("203.0.113.7"), Some("2001:db8::7"));
        facility.add_default_route(Family::V4);
        let client = MockClient::answering(http::StatusCode::OK);

        poll_loop(&facility, &client)
            .step(AddressPair::default())
            .await;

        let requests = client.captured_requests();
        assert_eq!(query_names(&requests[0]), vec!["hostname", "myipv6"]);
    }

    #[tokio::test]
    async fn address_change_is_reported() {
        let facility = MockFacility::online(Some("203.0.113.7"), None);
        let client = MockClient::answering(http::StatusCode::OK);
        let poll_loop = poll_loop(&facility, &client);

        let first = poll_loop.step(AddressPair::default()).await;
        facility.set_address(Family::V4, Some("198.51.100.9"));
        let second = poll_loop.step(first.submitted).await;

        assert_eq!(client.calls(), 2);
        assert_eq!(second.submitted, pair(Some("198.51.100.9"), None));
        let requests = client.captured_requests();
        let ip: Vec<IpAddr> = requests[1]
            .url
            .query_pairs()
            .filter(|(name, _)| name == "myip")
            .map(|(_, value)| value.parse().unwrap())
            .collect();
        assert_eq!(ip, vec!["198.51.100.9".parse::<IpAddr>().unwrap()]);
    }
}

mod run {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn stops_on_shutdown_after_normal_sleeps() {
        let facility = MockFacility::online(Some("203.0.113.7"), None);
        let client = MockClient::answering(http::StatusCode::OK);
        let sleeper = RecordingSleeper::default();
        let poll_loop = poll_loop(&facility, &client).with_sleeper(sleeper.clone());

        let submitted = poll_loop
            .run(tokio::time::sleep(Duration::from_secs(12)))
            .await;

        assert_eq!(submitted, pair(Some("203.0.113.7"), None));
        assert_eq!(client.calls(), 1);
        assert_eq!(sleeper.recorded(), vec![NORMAL; 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_during_sleep_keeps_acknowledged_state() {
        let facility = MockFacility::online(Some("203.0.113.7"), None);
        let client = MockClient::answering(http::StatusCode::OK);
        let sleeper = RecordingSleeper::default();
        let poll_loop = poll_loop(&facility, &client).with_sleeper(sleeper.clone());

        let submitted = poll_loop
            .run(tokio::time::sleep(Duration::from_secs(2)))
            .await;

        assert_eq!(submitted, pair(Some("203.0.113.7"), None));
        assert_eq!(client.calls(), 1);
        assert_eq!(sleeper.recorded(), vec![NORMAL]);
    }

    #[tokio::test(start_paused = true)]
    async fn rejection_uses_error_interval() {
        let facility = MockFacility::online(Some("203.0.113.7"), None);
        let client = MockClient::answering(http::StatusCode::INTERNAL_SERVER_ERROR);
        let sleeper = RecordingSleeper::default();
        let poll_loop = poll_loop(&facility, &client).with_sleeper(sleeper.clone());

        let submitted = poll_loop
            .run(tokio::time::sleep(Duration::from_secs(310)))
            .await;

        assert_eq!(submitted, AddressPair::default());
        assert_eq!(client.calls(), 2);
        assert_eq!(sleeper.recorded(), vec![BACKOFF; 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_before_first_iteration_sends_nothing() {
        let facility = MockFacility::online(Some("203.0.113.7"), None);
        let client = MockClient::answering(http::StatusCode::OK);

        let submitted = poll_loop(&facility, &client)
            .with_sleeper(RecordingSleeper::default())
            .run(std::future::ready(()))
            .await;

        assert_eq!(submitted, AddressPair::default());
        assert_eq!(client.calls(), 0);
    }
}
