//! Command acknowledgement DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::DeviceId;
use crate::service::CommandAck;

/// Literal `result` value of every successful command response.
pub const RESULT_SUCCESS: &str = "success";

/// Response body for `GET /cmd/{device_id}/qsy/{qrg}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct QsyResponse {
    /// Device the command was delivered to.
    pub device_id: DeviceId,
    /// Requested frequency.
    pub qrg: u64,
    /// Always `"success"`.
    pub result: String,
}

/// Response body for `GET /cmd/{device_id}/qsy-with-mode/{table_name}/{qrg}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct QsyWithModeResponse {
    /// Device the command was delivered to.
    pub device_id: DeviceId,
    /// Requested frequency.
    pub qrg: u64,
    /// Resolved mode, `null` if no range of the table matched.
    pub mode: Option<String>,
    /// Always `"success"`.
    pub result: String,
}

impl From<CommandAck> for QsyResponse {
    fn from(ack: CommandAck) -> Self {
        Self {
            qrg: ack.command.frequency(),
            device_id: ack.device_id,
            result: RESULT_SUCCESS.to_string(),
        }
    }
}

impl From<CommandAck> for QsyWithModeResponse {
    fn from(ack: CommandAck) -> Self {
        Self {
            qrg: ack.command.frequency(),
            mode: ack.command.mode().map(str::to_string),
            device_id: ack.device_id,
            result: RESULT_SUCCESS.to_string(),
        }
    }
}
