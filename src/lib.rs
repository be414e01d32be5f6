//! # DSU Server Library
//!
//! Relay game-controller state to PC clients over the DSU (cemuhook)
//! UDP protocol.
//!
//! This library provides the protocol engine: the wire-format codec with
//! CRC-32 integrity checking, the per-client session registry, and the
//! dispatch loop that answers version, slot-info, and input-report
//! requests. Controller acquisition is supplied by the embedder through
//! the [`input::InputSource`] trait.

pub mod config;
pub mod dsu;
pub mod error;
pub mod input;
pub mod server;
