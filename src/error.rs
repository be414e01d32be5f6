//! # Error Types
//!
//! Custom error types for the DSU server using `thiserror`.
//!
//! The DSU protocol has no error replies: a frame that fails to decode or
//! verify is dropped silently. The variants here therefore split into two
//! groups — dropped-frame conditions (`TruncatedFrame`, `InvalidMagic`,
//! `CorruptFrame`, `UnknownMessageType`) that the dispatch loop logs and
//! swallows, and genuine failures (I/O, configuration, encode-side cursor
//! overflows) that are surfaced to the caller.

use thiserror::Error;

/// Main error type for the DSU server
#[derive(Debug, Error)]
pub enum DsuServerError {
    /// Inbound frame shorter than a field it must contain
    #[error("truncated frame: needed {needed} bytes at offset {offset}, {available} available")]
    TruncatedFrame {
        /// Cursor position where the read was attempted
        offset: usize,
        /// Bytes the field required
        needed: usize,
        /// Bytes remaining in the buffer
        available: usize,
    },

    /// Inbound frame did not start with the client magic string
    #[error("invalid magic bytes: {0:02X?}")]
    InvalidMagic([u8; 4]),

    /// CRC-32 verification failed for an inbound frame
    #[error("corrupt frame: computed CRC 0x{computed:08X}, transmitted 0x{transmitted:08X}")]
    CorruptFrame {
        /// CRC computed over the frame with the crc field zeroed
        computed: u32,
        /// CRC carried in the frame header
        transmitted: u32,
    },

    /// Inbound header carried a message type outside the known set
    #[error("unknown message type: 0x{0:08X}")]
    UnknownMessageType(u32),

    /// Write past the end of a fixed response buffer.
    ///
    /// Response buffers are sized generously at initialization, so hitting
    /// this indicates a programmer error rather than bad input.
    #[error("cursor overflow: write of {needed} bytes at offset {offset} exceeds capacity {capacity}")]
    CursorOverflow {
        /// Cursor position where the write was attempted
        offset: usize,
        /// Bytes the write required
        needed: usize,
        /// Total buffer capacity
        capacity: usize,
    },

    /// Seek target outside the buffer bounds
    #[error("seek to {target} out of bounds (capacity {capacity})")]
    SeekOutOfBounds {
        /// Requested cursor position
        target: usize,
        /// Total buffer capacity
        capacity: usize,
    },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    ConfigValidation(String),

    /// I/O errors (socket bind/send/receive, config file reads)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DsuServerError {
    /// Whether this error means "drop the datagram and keep serving".
    ///
    /// The protocol never reports errors to the sender, so malformed,
    /// corrupt, or unrecognized frames are logged and discarded while the
    /// dispatch loop keeps running. Everything else is a real failure.
    pub fn is_dropped_frame(&self) -> bool {
        matches!(
            self,
            DsuServerError::TruncatedFrame { .. }
                | DsuServerError::InvalidMagic(_)
                | DsuServerError::CorruptFrame { .. }
                | DsuServerError::UnknownMessageType(_)
        )
    }
}

/// Result type alias for the DSU server
pub type Result<T> = std::result::Result<T, DsuServerError>;
