//! # Server Module
//!
//! The dispatch loop of the DSU engine.
//!
//! [`DsuEngine`] is the per-datagram state machine: decode the header,
//! verify the checksum, touch the client registry, route on message type,
//! and encode the response. It owns the registry and the input source and
//! is independent of any socket, which keeps it directly testable.
//!
//! [`DsuServer`] wraps an engine around a bound UDP socket and drives the
//! receive → dispatch → respond loop until shutdown is signalled or the
//! transport fails. Processing is strictly sequential, so session
//! counters need no locking; responses go only to the observed sender
//! address.

pub mod registry;

use std::net::SocketAddr;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::dsu::crc::verify_frame;
use crate::dsu::cursor::Reader;
use crate::dsu::decoder::{
    decode_controller_data_request, decode_controller_info_request, decode_header,
};
use crate::dsu::encoder::{
    encode_controller_data_response, encode_controller_info_response, encode_version_response,
};
use crate::dsu::packet::ControllerResponseHead;
use crate::dsu::protocol::{MessageType, MAGIC_CLIENT};
use crate::error::{DsuServerError, Result};
use crate::input::{mapping, InputSource};
use self::registry::ClientRegistry;

/// Receive/response buffer size; a DSU frame is at most 100 bytes, so
/// this leaves generous room
pub const DATAGRAM_BUFFER_SIZE: usize = 1024;

/// The protocol engine: codec, registry, and routing for one slot.
///
/// `server_id` is generated once at construction by the caller and
/// stamped into every outgoing header, which keeps it injectable for
/// tests instead of hiding it in global state.
pub struct DsuEngine {
    server_id: u32,
    slot_template: ControllerResponseHead,
    registry: ClientRegistry,
    input: Box<dyn InputSource>,
}

impl std::fmt::Debug for DsuEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DsuEngine")
            .field("server_id", &self.server_id)
            .field("clients", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl DsuEngine {
    /// Create an engine reporting one virtual slot.
    ///
    /// # Arguments
    ///
    /// * `server_id` - Per-process identifier stamped into every response
    /// * `slot_template` - Static identity of the reported slot (index,
    ///   device model, connection type, MAC); dynamic state comes from
    ///   the input source per request
    /// * `input` - Supplier of controller snapshots
    pub fn new(
        server_id: u32,
        slot_template: ControllerResponseHead,
        input: Box<dyn InputSource>,
    ) -> Self {
        Self {
            server_id,
            slot_template,
            registry: ClientRegistry::new(),
            input,
        }
    }

    /// The identifier stamped into outgoing headers
    pub fn server_id(&self) -> u32 {
        self.server_id
    }

    /// Sessions currently known to the registry
    pub fn client_count(&self) -> usize {
        self.registry.len()
    }

    /// Process one received datagram.
    ///
    /// On success returns the response length written into `out`, or
    /// `None` when the protocol calls for silence: malformed, corrupt, or
    /// unrecognized frames, and frames from an unset sender address, are
    /// logged at debug and dropped without a reply.
    ///
    /// # Errors
    ///
    /// Only genuine failures escape: an encode-side cursor overflow means
    /// the response buffer was sized wrong, which is fatal by design.
    pub fn handle_datagram(
        &mut self,
        datagram: &[u8],
        peer: SocketAddr,
        out: &mut [u8],
    ) -> Result<Option<usize>> {
        match self.dispatch(datagram, peer, out) {
            Ok(response) => Ok(response),
            Err(err) if err.is_dropped_frame() => {
                debug!("Dropping datagram from {}: {}", peer, err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// The state machine proper: parse → validate → register → route →
    /// encode
    fn dispatch(
        &mut self,
        datagram: &[u8],
        peer: SocketAddr,
        out: &mut [u8],
    ) -> Result<Option<usize>> {
        let mut reader = Reader::new(datagram);
        let header = decode_header(&mut reader)?;

        // Responses carry the server magic; only client frames are served
        if header.magic != MAGIC_CLIENT {
            return Err(DsuServerError::InvalidMagic(header.magic));
        }

        verify_frame(datagram)?;

        // Guards against malformed OS-level delivery
        if peer.ip().is_unspecified() || peer.port() == 0 {
            debug!("Ignoring datagram with unset sender address {}", peer);
            return Ok(None);
        }

        debug!(
            "Request from {}: type {:?}, peer id 0x{:X}, version {}",
            peer, header.message_type, header.sender_id, header.protocol_version
        );

        self.registry.register_or_touch(peer, header.sender_id);

        let len = match header.message_type {
            MessageType::ProtocolVersion => encode_version_response(out, self.server_id)?,
            MessageType::ControllerInfo => {
                let request = decode_controller_info_request(&mut reader)?;
                debug!("Slot info requested for ports {:?}", request.ports);

                let snapshot = self.input.snapshot();
                let head = mapping::slot_descriptor(&self.slot_template, &snapshot);
                encode_controller_info_response(out, self.server_id, &head)?
            }
            MessageType::ControllerData => {
                let request = decode_controller_data_request(&mut reader)?;
                debug!(
                    "Input report requested: registration {:?}, slot {}",
                    request.registration, request.reporting_slot
                );

                let snapshot = self.input.snapshot();
                let packet_number = self
                    .registry
                    .register_or_touch(peer, header.sender_id)
                    .next_packet_number();
                let report = mapping::input_report(&self.slot_template, &snapshot, packet_number);
                encode_controller_data_response(out, self.server_id, &report)?
            }
        };

        Ok(Some(len))
    }
}

/// The engine bound to a UDP socket, driving the receive loop
pub struct DsuServer {
    socket: UdpSocket,
    engine: DsuEngine,
}

impl DsuServer {
    /// Bind the server socket.
    ///
    /// The socket is created with `SO_REUSEADDR` so a restarted server can
    /// reclaim the well-known port immediately.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the address cannot be bound.
    pub async fn bind(addr: SocketAddr, engine: DsuEngine) -> Result<Self> {
        let socket = Self::bind_socket(addr)?;
        info!(
            "DSU server listening on {} with id 0x{:08X}",
            socket.local_addr()?,
            engine.server_id()
        );
        Ok(Self { socket, engine })
    }

    /// Create the UDP socket, set its options, and hand it to the runtime
    fn bind_socket(addr: SocketAddr) -> Result<UdpSocket> {
        let domain = if addr.is_ipv6() {
            Domain::IPV6
        } else {
            Domain::IPV4
        };
        let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_reuse_address(true)?;
        socket.bind(&addr.into())?;
        socket.set_nonblocking(true)?;
        Ok(UdpSocket::from_std(socket.into())?)
    }

    /// The address the socket actually bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Drive the dispatch loop until shutdown or transport failure.
    ///
    /// The loop selects between the next datagram and the shutdown
    /// signal, so shutdown is observed promptly rather than blocking on a
    /// quiet socket. Any socket-level failure terminates the loop; the
    /// socket itself is released when the server drops, on every exit
    /// path.
    ///
    /// # Errors
    ///
    /// Returns the transport failure that ended the loop, if any.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let mut buf_in = [0u8; DATAGRAM_BUFFER_SIZE];
        let mut buf_out = [0u8; DATAGRAM_BUFFER_SIZE];

        loop {
            tokio::select! {
                received = self.socket.recv_from(&mut buf_in) => {
                    let (len, peer) = match received {
                        Ok(received) => received,
                        Err(err) => {
                            error!("Transport failure: {}", err);
                            return Err(err.into());
                        }
                    };
                    debug!("Received {} bytes from {}", len, peer);

                    match self.engine.handle_datagram(&buf_in[..len], peer, &mut buf_out)? {
                        Some(response_len) => {
                            if let Err(err) = self.socket.send_to(&buf_out[..response_len], peer).await {
                                error!("Transport failure: {}", err);
                                return Err(err.into());
                            }
                            debug!("Sent {} bytes to {}", response_len, peer);
                        }
                        None => {}
                    }
                }

                changed = shutdown.changed() => {
                    // A dropped sender counts as a shutdown request
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Shutdown requested, stopping dispatch loop");
                        return Ok(());
                    }
                }
            }
        }
    }
}
