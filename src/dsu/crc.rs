//! # Frame Integrity
//!
//! CRC-32 computation, stamping, and verification for DSU frames.
//!
//! The protocol computes the standard CRC-32 over the *entire* frame with
//! the 4-byte crc field (header offset 8) zeroed. Senders write the frame
//! with a zero crc field, compute the checksum, and patch it in place;
//! verifiers copy the transmitted value out, zero the field, and compare.

use crate::dsu::protocol::CRC_OFFSET;
use crate::error::{DsuServerError, Result};

/// Calculate the standard CRC-32 over a byte range
pub fn checksum(data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Compute a frame's CRC with its crc field treated as zero.
///
/// Hashes the bytes around the field rather than mutating the frame, so
/// it works on borrowed inbound datagrams.
fn frame_checksum(frame: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&frame[..CRC_OFFSET]);
    hasher.update(&[0u8; 4]);
    hasher.update(&frame[CRC_OFFSET + 4..]);
    hasher.finalize()
}

/// Stamp an outbound frame: compute the CRC with the field zeroed and
/// overwrite the field in place.
///
/// Must be the last step of encoding, after the payload length is final.
///
/// # Errors
///
/// Returns `TruncatedFrame` if the buffer cannot hold a complete crc
/// field; response frames are always longer than the fixed header, so
/// this indicates a programmer error.
pub fn stamp_frame(frame: &mut [u8]) -> Result<()> {
    if frame.len() < CRC_OFFSET + 4 {
        return Err(DsuServerError::TruncatedFrame {
            offset: CRC_OFFSET,
            needed: 4,
            available: frame.len().saturating_sub(CRC_OFFSET),
        });
    }
    frame[CRC_OFFSET..CRC_OFFSET + 4].copy_from_slice(&[0u8; 4]);
    let crc = frame_checksum(frame);
    frame[CRC_OFFSET..CRC_OFFSET + 4].copy_from_slice(&crc.to_le_bytes());
    Ok(())
}

/// Verify an inbound frame's CRC.
///
/// # Errors
///
/// Returns `TruncatedFrame` if the frame cannot hold a crc field, or
/// `CorruptFrame` if the recomputed checksum does not match the
/// transmitted one. Both mean the datagram is dropped without a reply.
pub fn verify_frame(frame: &[u8]) -> Result<()> {
    if frame.len() < CRC_OFFSET + 4 {
        return Err(DsuServerError::TruncatedFrame {
            offset: CRC_OFFSET,
            needed: 4,
            available: frame.len().saturating_sub(CRC_OFFSET),
        });
    }
    let transmitted = u32::from_le_bytes([
        frame[CRC_OFFSET],
        frame[CRC_OFFSET + 1],
        frame[CRC_OFFSET + 2],
        frame[CRC_OFFSET + 3],
    ]);
    let computed = frame_checksum(frame);
    if computed != transmitted {
        return Err(DsuServerError::CorruptFrame {
            computed,
            transmitted,
        });
    }
    Ok(())
}
