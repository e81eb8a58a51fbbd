//! Linux implementation of [`RouteFacility`] over rtnetlink.
//!
//! Each query opens a `NETLINK_ROUTE` socket, sends one dump request and
//! collects the multipart reply until `NLMSG_DONE`. Receives are bounded by
//! [`RECEIVE_TIMEOUT`], so a missing reply fails the query instead of
//! blocking the poll loop.

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::os::fd::AsRawFd;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use netlink_packet_core::{
    NLM_F_DUMP, NLM_F_REQUEST, NetlinkHeader, NetlinkMessage, NetlinkPayload,
};
use netlink_packet_route::address::nlas::Nla as AddressNla;
use netlink_packet_route::link::nlas::Nla as LinkNla;
use netlink_packet_route::route::nlas::Nla as RouteNla;
use netlink_packet_route::{
    AddressMessage, IFA_F_TEMPORARY, LinkMessage, RT_SCOPE_HOST, RT_SCOPE_LINK, RT_SCOPE_SITE,
    RT_SCOPE_UNIVERSE, RT_TABLE_MAIN, RouteMessage, RtnlMessage,
};
use netlink_sys::{Socket, SocketAddr, protocols::NETLINK_ROUTE};

use crate::network::{
    AddressScope, FacilityError, Family, InterfaceAddress, LinkId, Prefix, Route, RouteFacility,
};

/// Upper bound on each receive of a dump reply.
pub const RECEIVE_TIMEOUT: Duration = Duration::from_secs(2);

/// Routing facility backed by rtnetlink dumps.
#[derive(Debug, Default)]
pub struct NetlinkFacility {
    sequence: AtomicU32,
}

impl NetlinkFacility {
    /// Creates a new netlink facility.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sequence: AtomicU32::new(0),
        }
    }

    /// Sends a dump request and returns every inner message of the reply.
    fn dump(&self, request: RtnlMessage) -> Result<Vec<RtnlMessage>, FacilityError> {
        let mut socket = Socket::new(NETLINK_ROUTE)?;
        set_receive_timeout(&socket, RECEIVE_TIMEOUT)?;
        socket.bind_auto()?;
        socket.connect(&SocketAddr::new(0, 0))?;

        let mut header = NetlinkHeader::default();
        header.flags = NLM_F_REQUEST | NLM_F_DUMP;
        header.sequence_number = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;

        let mut packet = NetlinkMessage::new(header, NetlinkPayload::InnerMessage(request));
        packet.finalize();
        let mut buf = vec![0; packet.buffer_len()];
        packet.serialize(&mut buf[..]);
        socket.send(&buf[..], 0)?;

        let mut messages = Vec::new();
        loop {
            let (bytes, _) = socket.recv_from_full().map_err(timed_out)?;
            if bytes.is_empty() {
                return Ok(messages);
            }

            let mut offset = 0;
            while offset < bytes.len() {
                let reply = NetlinkMessage::<RtnlMessage>::deserialize(&bytes[offset..])
                    .map_err(|e| FacilityError::Decode(e.to_string()))?;
                let length = reply.header.length as usize;

                match reply.payload {
                    NetlinkPayload::Done(_) => return Ok(messages),
                    NetlinkPayload::Error(err) => return Err(FacilityError::Kernel(err.to_io())),
                    NetlinkPayload::InnerMessage(inner) => messages.push(inner),
                    _ => {}
                }

                if length == 0 {
                    return Err(FacilityError::Decode(
                        "zero-length netlink message".to_string(),
                    ));
                }
                offset += length;
            }
        }
    }
}

/// Sets `SO_RCVTIMEO` on a socket.
fn set_receive_timeout(socket: &impl AsRawFd, timeout: Duration) -> io::Result<()> {
    let value = libc::timeval {
        tv_sec: libc::time_t::try_from(timeout.as_secs()).unwrap_or(libc::time_t::MAX),
        tv_usec: libc::suseconds_t::try_from(timeout.subsec_micros()).unwrap_or(0),
    };

    // SAFETY: the descriptor is open for the lifetime of `socket` and `value`
    // is a valid timeval of the size passed.
    let ret = unsafe {
        libc::setsockopt(
            socket.as_raw_fd(),
            libc::SOL_SOCKET,
            libc::SO_RCVTIMEO,
            std::ptr::from_ref(&value).cast::<libc::c_void>(),
            std::mem::size_of::<libc::timeval>() as libc::socklen_t,
        )
    };
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// An expired `SO_RCVTIMEO` surfaces as `WouldBlock`; report it as a timeout.
fn timed_out(e: io::Error) -> io::Error {
    if e.kind() == io::ErrorKind::WouldBlock {
        io::Error::new(io::ErrorKind::TimedOut, "no netlink reply")
    } else {
        e
    }
}

impl RouteFacility for NetlinkFacility {
    fn link_by_name(&self, name: &str) -> Result<LinkId, FacilityError> {
        let replies = self.dump(RtnlMessage::GetLink(LinkMessage::default()))?;

        replies
            .into_iter()
            .filter_map(|reply| match reply {
                RtnlMessage::NewLink(link) => Some(link),
                _ => None,
            })
            .find(|link| link_name(link) == Some(name))
            .map(|link| LinkId::new(link.header.index))
            .ok_or_else(|| FacilityError::LinkNotFound {
                name: name.to_string(),
            })
    }

    fn routes(&self, link: Option<LinkId>, family: Family) -> Result<Vec<Route>, FacilityError> {
        let mut request = RouteMessage::default();
        request.header.address_family = family_code(family);

        let replies = self.dump(RtnlMessage::GetRoute(request))?;

        Ok(replies
            .into_iter()
            .filter_map(|reply| match reply {
                RtnlMessage::NewRoute(route) => Some(route),
                _ => None,
            })
            .filter(|route| route.header.address_family == family_code(family))
            .filter(|route| route_table(route) == u32::from(RT_TABLE_MAIN))
            .map(|route| route_from_message(&route))
            .filter(|route| link.is_none() || route.link == link)
            .collect())
    }

    fn addresses(
        &self,
        link: LinkId,
        family: Family,
    ) -> Result<Vec<InterfaceAddress>, FacilityError> {
        let mut request = AddressMessage::default();
        request.header.family = family_code(family);
        request.header.index = link.index();

        let replies = self.dump(RtnlMessage::GetAddress(request))?;

        Ok(replies
            .into_iter()
            .filter_map(|reply| match reply {
                RtnlMessage::NewAddress(address) => Some(address),
                _ => None,
            })
            .filter(|address| address.header.family == family_code(family))
            .filter(|address| address.header.index == link.index())
            .filter_map(|address| address_from_message(&address))
            .collect())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn family_code(family: Family) -> u8 {
    match family {
        Family::V4 => libc::AF_INET as u8,
        Family::V6 => libc::AF_INET6 as u8,
    }
}

fn link_name(link: &LinkMessage) -> Option<&str> {
    link.nlas.iter().find_map(|nla| match nla {
        LinkNla::IfName(name) => Some(name.as_str()),
        _ => None,
    })
}

/// Routing table of a route; `RTA_TABLE` wins over the 8-bit header field.
fn route_table(route: &RouteMessage) -> u32 {
    route
        .nlas
        .iter()
        .find_map(|nla| match nla {
            RouteNla::Table(table) => Some(*table),
            _ => None,
        })
        .unwrap_or_else(|| u32::from(route.header.table))
}

/// Converts a route message; a missing `RTA_DST` makes it a default route.
fn route_from_message(route: &RouteMessage) -> Route {
    let mut link = None;
    let mut destination = None;

    for nla in &route.nlas {
        match nla {
            RouteNla::Oif(index) => link = Some(LinkId::new(*index)),
            RouteNla::Destination(bytes) => {
                destination = ip_from_bytes(bytes)
                    .map(|address| Prefix::new(address, route.header.destination_prefix_length));
            }
            _ => {}
        }
    }

    Route { link, destination }
}

/// Converts an address message.
///
/// `IFA_LOCAL` is the interface's own address on point-to-point links, so it
/// takes precedence over `IFA_ADDRESS`. Returns `None` without either.
fn address_from_message(message: &AddressMessage) -> Option<InterfaceAddress> {
    let mut local = None;
    let mut address = None;
    let mut flags = u32::from(message.header.flags);

    for nla in &message.nlas {
        match nla {
            AddressNla::Local(bytes) => local = ip_from_bytes(bytes),
            AddressNla::Address(bytes) => address = ip_from_bytes(bytes),
            AddressNla::Flags(extended) => flags = *extended,
            _ => {}
        }
    }

    Some(InterfaceAddress {
        address: local.or(address)?,
        scope: scope_from_raw(message.header.scope),
        temporary: flags & u32::from(IFA_F_TEMPORARY) != 0,
    })
}

fn scope_from_raw(scope: u8) -> AddressScope {
    match scope {
        s if s == RT_SCOPE_UNIVERSE => AddressScope::Global,
        s if s == RT_SCOPE_SITE => AddressScope::Site,
        s if s == RT_SCOPE_LINK => AddressScope::Link,
        s if s == RT_SCOPE_HOST => AddressScope::Host,
        other => AddressScope::Other(other),
    }
}

fn ip_from_bytes(bytes: &[u8]) -> Option<IpAddr> {
    if let Ok(octets) = <[u8; 4]>::try_from(bytes) {
        return Some(IpAddr::V4(Ipv4Addr::from(octets)));
    }
    if let Ok(octets) = <[u8; 16]>::try_from(bytes) {
        return Some(IpAddr::V6(Ipv6Addr::from(octets)));
    }
    None
}
