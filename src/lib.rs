//! hlscast - live HLS distribution service
//!
//! Serves manifest and segment files out of a directory written by an
//! external encoder, and pushes "new segment" events to connected viewers
//! over WebSocket. This library crate exposes the components for
//! integration testing.

pub mod config;
pub mod error;
pub mod hub;
pub mod server;
pub mod store;
pub mod watch;
