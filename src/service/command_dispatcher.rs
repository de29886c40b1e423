//! QSY command dispatch.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{Command, ConnectionRegistry, DeviceHandle, DeviceId};
use crate::error::GatewayError;
use crate::tables::ModeResolver;

/// Acknowledgement of a delivered command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandAck {
    /// Device the command was delivered to.
    pub device_id: DeviceId,
    /// The command as sent.
    pub command: Command,
}

/// Routes commands to the live connection of their target device.
///
/// Stateless coordinator: reads [`ConnectionRegistry`] (never writes it)
/// and consults [`ModeResolver`] for mode-carrying commands. Every outcome
/// is logged; there are no retries.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    registry: Arc<ConnectionRegistry>,
    resolver: Arc<ModeResolver>,
    send_timeout: Duration,
}

impl CommandDispatcher {
    /// Creates a dispatcher. `send_timeout` bounds each device write.
    #[must_use]
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        resolver: Arc<ModeResolver>,
        send_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            resolver,
            send_timeout,
        }
    }

    /// Returns the connection registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Returns the mode resolver.
    #[must_use]
    pub fn resolver(&self) -> &Arc<ModeResolver> {
        &self.resolver
    }

    /// Sends a plain frequency change.
    ///
    /// # Errors
    ///
    /// [`GatewayError::DeviceNotConnected`] if the device has no live
    /// connection, [`GatewayError::DeliveryFailed`] if the send fails.
    pub async fn issue_qsy(
        &self,
        device_id: &DeviceId,
        frequency: u64,
    ) -> Result<CommandAck, GatewayError> {
        let result = self.deliver(device_id, Command::Qsy { frequency }).await;
        log_outcome(device_id, &result);
        result
    }

    /// Sends a frequency change with the mode resolved from `table_name`.
    ///
    /// An unconnected device fails fast without consulting the resolver.
    /// A table that cannot be resolved fails before anything is sent.
    /// No matching range is not an error: the command carries no mode.
    ///
    /// # Errors
    ///
    /// [`GatewayError::DeviceNotConnected`], the table errors
    /// ([`GatewayError::TableNotFound`], [`GatewayError::TableInvalid`],
    /// [`GatewayError::FetchFailed`]), or [`GatewayError::DeliveryFailed`].
    pub async fn issue_qsy_with_mode(
        &self,
        device_id: &DeviceId,
        table_name: &str,
        frequency: u64,
    ) -> Result<CommandAck, GatewayError> {
        let result = self
            .resolve_and_deliver(device_id, table_name, frequency)
            .await;
        log_outcome(device_id, &result);
        result
    }

    async fn resolve_and_deliver(
        &self,
        device_id: &DeviceId,
        table_name: &str,
        frequency: u64,
    ) -> Result<CommandAck, GatewayError> {
        self.connection(device_id).await?;
        let mode = self.resolver.resolve(table_name, frequency).await?;
        self.deliver(device_id, Command::QsyWithMode { frequency, mode })
            .await
    }

    async fn deliver(
        &self,
        device_id: &DeviceId,
        command: Command,
    ) -> Result<CommandAck, GatewayError> {
        let handle = self.connection(device_id).await?;
        let payload = serde_json::to_string(&command)
            .map_err(|e| GatewayError::Internal(format!("command serialization: {e}")))?;
        handle.deliver(payload, self.send_timeout).await?;
        Ok(CommandAck {
            device_id: device_id.clone(),
            command,
        })
    }

    async fn connection(&self, device_id: &DeviceId) -> Result<DeviceHandle, GatewayError> {
        self.registry
            .lookup(device_id)
            .await
            .ok_or_else(|| GatewayError::DeviceNotConnected(device_id.clone()))
    }
}

fn log_outcome(device_id: &DeviceId, result: &Result<CommandAck, GatewayError>) {
    match result {
        Ok(ack) => tracing::info!(
            %device_id,
            command = ack.command.name(),
            frequency = ack.command.frequency(),
            mode = ack.command.mode(),
            "command delivered"
        ),
        Err(err @ GatewayError::Internal(_)) => {
            tracing::error!(%device_id, error = %err, "command dispatch failed");
        }
        Err(err) => tracing::warn!(%device_id, error = %err, "command dispatch failed"),
    }
}
