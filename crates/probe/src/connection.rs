use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

const ENCODE_32_CHARS: &[u8; 32] = b"0123456789ABCDEFGHIJKLMNOPQRSTUV";

/// Length of an encoded connection id, 13 base32 digits cover all 64 bits.
pub const CONNECTION_ID_LEN: usize = 13;

/// `ConnectionInfo` holds the transport level facts of one accepted
/// connection. Every field is optional since not every transport can expose
/// them (unix sockets, in-memory test harnesses).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub id: Option<String>,
    pub remote_addr: Option<IpAddr>,
    pub remote_port: Option<u16>,
    pub local_addr: Option<IpAddr>,
    pub local_port: Option<u16>,
}

// -- Constructors

impl ConnectionInfo {
    #[must_use]
    pub fn from_socket_addrs(
        id: Option<String>,
        remote: Option<SocketAddr>,
        local: Option<SocketAddr>,
    ) -> Self {
        Self {
            id,
            remote_addr: remote.map(|addr| addr.ip()),
            remote_port: remote.map(|addr| addr.port()),
            local_addr: local.map(|addr| addr.ip()),
            local_port: local.map(|addr| addr.port()),
        }
    }
}

/// `ConnectionIdGenerator` hands out a unique id for every accepted
/// connection. Ids are a counter seeded from the wall clock so that two
/// processes started at different times do not collide, encoded as 13
/// base32 characters.
#[derive(Debug)]
pub struct ConnectionIdGenerator {
    last_id: AtomicU64,
}

impl ConnectionIdGenerator {
    #[must_use]
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or_default();
        Self::starting_at(seed)
    }

    #[must_use]
    pub fn starting_at(seed: u64) -> Self {
        Self {
            last_id: AtomicU64::new(seed),
        }
    }

    pub fn next_id(&self) -> String {
        let id = self.last_id.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        encode_connection_id(id)
    }
}

impl Default for ConnectionIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[must_use]
pub fn encode_connection_id(id: u64) -> String {
    (0..CONNECTION_ID_LEN)
        .rev()
        .map(|position| {
            let index = (id >> (position * 5)) & 31;
            char::from(ENCODE_32_CHARS[usize::try_from(index).unwrap_or_default()])
        })
        .collect()
}

/// `ConnectionContext` is the per connection state handed to every request
/// served on that connection. Cloning shares the request counter.
#[derive(Debug, Clone)]
pub struct ConnectionContext {
    info: Arc<ConnectionInfo>,
    requests: Arc<AtomicU64>,
}

impl ConnectionContext {
    #[must_use]
    pub fn new(info: ConnectionInfo) -> Self {
        Self {
            info: Arc::new(info),
            requests: Arc::new(AtomicU64::new(0)),
        }
    }

    #[must_use]
    pub fn info(&self) -> &ConnectionInfo {
        &self.info
    }

    /// Returns the trace identifier of the next request on this connection:
    /// the connection id followed by the 1-based request number as 8 hex
    /// digits.
    pub fn next_trace_id(&self) -> String {
        let request_number = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
        format!(
            "{}:{:08X}",
            self.info.id.as_deref().unwrap_or_default(),
            request_number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::net::Ipv4Addr;

    #[test]
    fn encodes_ids_as_thirteen_base32_chars() {
        assert_eq!(encode_connection_id(0), "0000000000000");
        assert_eq!(encode_connection_id(1), "0000000000001");
        assert_eq!(encode_connection_id(31), "000000000000V");
        assert_eq!(encode_connection_id(32), "0000000000010");
        assert_eq!(encode_connection_id(u64::MAX), "FVVVVVVVVVVVV");
    }

    #[test]
    fn generator_yields_unique_increasing_ids() {
        let generator = ConnectionIdGenerator::starting_at(41);

        assert_eq!(generator.next_id(), "000000000001A");
        assert_eq!(generator.next_id(), "000000000001B");

        let seen: HashSet<String> = (0..1000).map(|_| generator.next_id()).collect();
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn generator_ids_have_fixed_length() {
        let generator = ConnectionIdGenerator::new();
        let id = generator.next_id();

        assert_eq!(id.len(), CONNECTION_ID_LEN);
        assert!(id.bytes().all(|b| ENCODE_32_CHARS.contains(&b)));
    }

    #[test]
    fn connection_info_splits_socket_addrs() {
        let remote = SocketAddr::from((Ipv4Addr::new(10, 0, 0, 5), 54321));
        let local = SocketAddr::from((Ipv4Addr::new(10, 0, 0, 1), 80));

        let info = ConnectionInfo::from_socket_addrs(
            Some(String::from("conn-1")),
            Some(remote),
            Some(local),
        );

        assert_eq!(info.id.as_deref(), Some("conn-1"));
        assert_eq!(info.remote_addr, Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5))));
        assert_eq!(info.remote_port, Some(54321));
        assert_eq!(info.local_addr, Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))));
        assert_eq!(info.local_port, Some(80));
    }

    #[test]
    fn connection_info_tolerates_missing_addrs() {
        let info = ConnectionInfo::from_socket_addrs(None, None, None);
        assert_eq!(info, ConnectionInfo::default());
    }

    #[test]
    fn trace_ids_count_requests_per_connection() {
        let context = ConnectionContext::new(ConnectionInfo {
            id: Some(String::from("0HN1ABCDEFGHI")),
            ..ConnectionInfo::default()
        });
        let shared = context.clone();

        assert_eq!(context.next_trace_id(), "0HN1ABCDEFGHI:00000001");
        assert_eq!(shared.next_trace_id(), "0HN1ABCDEFGHI:00000002");
        assert_eq!(context.next_trace_id(), "0HN1ABCDEFGHI:00000003");
    }

    #[test]
    fn trace_id_without_connection_id_keeps_request_number() {
        let context = ConnectionContext::new(ConnectionInfo::default());
        assert_eq!(context.next_trace_id(), ":00000001");
    }
}
