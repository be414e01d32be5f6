//! # Client Registry
//!
//! Per-remote-endpoint bookkeeping for the dispatch loop.
//!
//! Each distinct sender address gets one [`ClientSession`] holding the
//! peer id it first announced and a counter of input reports sent to it.
//! Sessions are owned exclusively by the dispatch loop; processing is
//! sequential, so the counters need no locking.
//!
//! Sessions are never evicted. The reference implementation keeps them
//! for the life of the process, so a long-running server exposed to many
//! transient peers grows this table without bound.

use std::collections::HashMap;
use std::net::SocketAddr;

use tracing::info;

/// State for one remote endpoint that has sent a recognized datagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSession {
    /// The peer's address and port, its identity key
    pub remote_addr: SocketAddr,
    /// sender_id from the peer's header at first contact
    pub peer_id: u32,
    /// Count of ControllerData responses sent to this peer
    packet_number: u32,
}

impl ClientSession {
    fn new(remote_addr: SocketAddr, peer_id: u32) -> Self {
        Self {
            remote_addr,
            peer_id,
            packet_number: 0,
        }
    }

    /// Increment and return the outgoing packet counter.
    ///
    /// Called exactly once per ControllerData response actually emitted,
    /// so the first response to a peer carries 1 and the sequence tracks
    /// responses sent, not requests received.
    pub fn next_packet_number(&mut self) -> u32 {
        self.packet_number = self.packet_number.wrapping_add(1);
        self.packet_number
    }

    /// The counter value carried by the last response, 0 before any
    pub fn last_packet_number(&self) -> u32 {
        self.packet_number
    }
}

/// Map of remote endpoint to session state
#[derive(Debug, Default)]
pub struct ClientRegistry {
    sessions: HashMap<SocketAddr, ClientSession>,
}

impl ClientRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the session for `remote_addr`, creating one on first
    /// contact.
    ///
    /// An existing session is returned unmodified; in particular the
    /// packet counter only moves via
    /// [`ClientSession::next_packet_number`].
    pub fn register_or_touch(&mut self, remote_addr: SocketAddr, peer_id: u32) -> &mut ClientSession {
        self.sessions.entry(remote_addr).or_insert_with(|| {
            info!("New client connected from {}", remote_addr);
            ClientSession::new(remote_addr, peer_id)
        })
    }

    /// Look up a session without creating one
    pub fn get(&self, remote_addr: &SocketAddr) -> Option<&ClientSession> {
        self.sessions.get(remote_addr)
    }

    /// Number of known clients
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether any client has been seen
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        format!("127.0.0.1:{}", port).parse().unwrap()
    }

    #[test]
    fn test_first_contact_creates_session() {
        let mut registry = ClientRegistry::new();
        assert!(registry.is_empty());

        let session = registry.register_or_touch(addr(26761), 0x1234);
        assert_eq!(session.peer_id, 0x1234);
        assert_eq!(session.last_packet_number(), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_touch_returns_existing_session_unmodified() {
        let mut registry = ClientRegistry::new();
        registry.register_or_touch(addr(26761), 0x1234).next_packet_number();

        // A later datagram with a different peer_id does not replace the
        // session or move its counter
        let session = registry.register_or_touch(addr(26761), 0x9999);
        assert_eq!(session.peer_id, 0x1234);
        assert_eq!(session.last_packet_number(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_packet_numbers_start_at_one() {
        let mut registry = ClientRegistry::new();
        let session = registry.register_or_touch(addr(26761), 1);

        assert_eq!(session.next_packet_number(), 1);
        assert_eq!(session.next_packet_number(), 2);
        assert_eq!(session.next_packet_number(), 3);
    }

    #[test]
    fn test_sessions_are_isolated_per_address() {
        let mut registry = ClientRegistry::new();

        for _ in 0..5 {
            registry.register_or_touch(addr(26761), 1).next_packet_number();
        }
        registry.register_or_touch(addr(26762), 2).next_packet_number();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(&addr(26761)).unwrap().last_packet_number(), 5);
        assert_eq!(registry.get(&addr(26762)).unwrap().last_packet_number(), 1);
    }

    #[test]
    fn test_same_port_different_host_is_distinct() {
        let mut registry = ClientRegistry::new();
        registry.register_or_touch("10.0.0.1:26760".parse().unwrap(), 1);
        registry.register_or_touch("10.0.0.2:26760".parse().unwrap(), 2);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_counter_wraps_instead_of_panicking() {
        let mut registry = ClientRegistry::new();
        let session = registry.register_or_touch(addr(26761), 1);
        session.packet_number = u32::MAX;
        assert_eq!(session.next_packet_number(), 0);
    }
}
