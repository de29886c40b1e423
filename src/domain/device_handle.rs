//! Sending side of a live device connection.
//!
//! The connection task owns the socket. Everyone else talks to it through
//! a [`DeviceHandle`], which queues [`Outbound`] frames on a bounded
//! channel. Frames are written in queue order.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use super::DeviceId;
use crate::error::GatewayError;

/// Frame queued for a connection task.
#[derive(Debug)]
pub enum Outbound {
    /// Write `payload` as a text message and report the outcome on `ack`.
    Deliver {
        /// Serialized JSON message.
        payload: String,
        /// Receives the socket write result.
        ack: oneshot::Sender<Result<(), String>>,
    },
    /// Close the socket and end the connection task.
    Close,
}

/// Cloneable handle to one open device connection.
#[derive(Debug, Clone)]
pub struct DeviceHandle {
    device_id: DeviceId,
    connection_id: Uuid,
    tx: mpsc::Sender<Outbound>,
}

impl DeviceHandle {
    /// Creates a handle and the receiver the connection task drains.
    #[must_use]
    pub fn channel(device_id: DeviceId, capacity: usize) -> (Self, mpsc::Receiver<Outbound>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = Self {
            device_id,
            connection_id: Uuid::new_v4(),
            tx,
        };
        (handle, rx)
    }

    /// Device this connection belongs to.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Unique id of this particular connection.
    #[must_use]
    pub const fn connection_id(&self) -> Uuid {
        self.connection_id
    }

    /// Queues `payload` and waits until the socket write completes.
    ///
    /// Queueing and the write together are bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DeliveryFailed`] if the connection task is
    /// gone, the write fails, or `timeout` elapses.
    pub async fn deliver(&self, payload: String, timeout: Duration) -> Result<(), GatewayError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        let frame = Outbound::Deliver {
            payload,
            ack: ack_tx,
        };

        let outcome = tokio::time::timeout(timeout, async {
            self.tx
                .send(frame)
                .await
                .map_err(|_| "connection closed".to_string())?;
            ack_rx
                .await
                .map_err(|_| "connection dropped the message".to_string())?
        })
        .await;

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(reason)) => Err(self.delivery_failed(reason)),
            Err(_) => Err(self.delivery_failed(format!(
                "send timed out after {} ms",
                timeout.as_millis()
            ))),
        }
    }

    /// Asks the connection task to close the socket.
    ///
    /// Never waits: returns `false` if the request could not be queued
    /// because the queue is full or the connection is already gone.
    pub fn close(&self) -> bool {
        match self.tx.try_send(Outbound::Close) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(device_id = %self.device_id, "outbound queue full, close not queued");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(device_id = %self.device_id, "connection already gone");
                false
            }
        }
    }

    fn delivery_failed(&self, reason: String) -> GatewayError {
        GatewayError::DeliveryFailed {
            device_id: self.device_id.clone(),
            reason,
        }
    }
}
