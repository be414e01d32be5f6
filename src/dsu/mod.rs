//! # DSU Protocol Module
//!
//! Wire-format codec for the DSU (cemuhook) protocol.
//!
//! ## Frame Format
//!
//! Every datagram carries exactly one frame. All multi-byte numeric
//! fields are little-endian on the wire; magic and MAC bytes are copied
//! verbatim.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ Magic (4) │ Version (2) │ Payload Len (2) │ CRC-32 (4)           │
//! ├──────────────────────────────────────────────────────────────────┤
//! │ Sender ID (4) │ Message Type (4) │ Payload ...                   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Payload Len counts the bytes following the fixed 20-byte portion.
//! CRC-32 covers the whole frame with its own field zeroed and is
//! stamped last.

pub mod crc;
pub mod cursor;
pub mod decoder;
pub mod encoder;
pub mod packet;
pub mod protocol;
