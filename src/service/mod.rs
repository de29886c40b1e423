//! Service layer: command dispatch to connected devices.
//!
//! Services sit between HTTP handlers and the domain layer, combining
//! mode resolution, registry lookup, and delivery into single operations.

pub mod command_dispatcher;

pub use command_dispatcher::{CommandAck, CommandDispatcher};
