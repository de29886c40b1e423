//! WebSocket message types exchanged with devices outside the command protocol.

use serde::Serialize;

use crate::domain::DeviceId;

/// Diagnostic echo of an inbound device message.
#[derive(Debug, Clone, Serialize)]
pub struct EchoMessage {
    /// Text received from the device, verbatim.
    pub received: String,
    /// Device that sent it.
    pub device_id: DeviceId,
}

/// Close reason sent to a duplicate connection.
pub const DUPLICATE_CLOSE_REASON: &str = "device already connected";

/// Close reason sent to every device on server shutdown.
pub const SHUTDOWN_CLOSE_REASON: &str = "server shutting down";
