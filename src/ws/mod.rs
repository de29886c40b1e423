//! WebSocket layer: device connection admission and lifecycle.
//!
//! Hardware interfaces connect to `/ws/connect-device/{device_id}` and stay
//! connected. The server pushes commands; anything the device sends is
//! echoed back for diagnostics.

pub mod connection;
pub mod handler;
pub mod messages;
