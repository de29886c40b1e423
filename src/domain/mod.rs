//! Domain layer: device identity, commands, and the connection registry.
//!
//! This module contains the server-side model of connected hardware
//! interfaces: who is connected ([`ConnectionRegistry`]), how to reach
//! them ([`DeviceHandle`]), and what can be sent to them ([`Command`]).

pub mod command;
pub mod connection_registry;
pub mod device_handle;
pub mod device_id;

pub use command::Command;
pub use connection_registry::ConnectionRegistry;
pub use device_handle::{DeviceHandle, Outbound};
pub use device_id::DeviceId;
