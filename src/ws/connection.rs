//! Device connection state machine.
//!
//! `Connecting → Open → Closed`, or `Connecting → Closed` when the device
//! already has an open connection. While open, the task multiplexes
//! three sources: frames from the device, outbound frames queued through
//! the device's [`DeviceHandle`], and keep-alive pings. A device that sends
//! nothing for `ping_timeout` after a ping is dropped. Frames whose sender
//! already gave up waiting are discarded unsent. Whatever ends the loop,
//! the device is unregistered before the task returns.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket, close_code};
use futures_util::{SinkExt, StreamExt};
use tokio::time::{Instant, Interval};

use super::messages::{DUPLICATE_CLOSE_REASON, EchoMessage, SHUTDOWN_CLOSE_REASON};
use crate::domain::{ConnectionRegistry, DeviceHandle, DeviceId, Outbound};

/// Per-connection settings shared by all device sockets.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSettings {
    /// Outbound queue depth.
    pub outbound_capacity: usize,
    /// Echo inbound text back to the device.
    pub echo_enabled: bool,
    /// Keep-alive ping interval; `None` disables pings.
    pub ping_interval: Option<Duration>,
    /// How long to wait for any frame after a ping; `None` waits forever.
    pub ping_timeout: Option<Duration>,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            outbound_capacity: 32,
            echo_enabled: true,
            ping_interval: Some(Duration::from_secs(10)),
            ping_timeout: Some(Duration::from_secs(10)),
        }
    }
}

/// Lifecycle state of a device connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Socket accepted, not yet registered.
    Connecting,
    /// Registered and reachable by dispatch.
    Open,
    /// Terminal.
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
        })
    }
}

/// Runs one device connection until it closes.
///
/// The registry entry created here is removed here, on every exit path.
pub async fn run_device_connection(
    socket: WebSocket,
    device_id: DeviceId,
    registry: Arc<ConnectionRegistry>,
    settings: ConnectionSettings,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (handle, mut outbound) = DeviceHandle::channel(device_id.clone(), settings.outbound_capacity);
    let connection_id = handle.connection_id();
    let mut state = ConnectionState::Connecting;

    if registry.register(handle).await.is_err() {
        tracing::info!(%device_id, "device already connected, rejecting duplicate");
        let _ = ws_tx.send(close_message(DUPLICATE_CLOSE_REASON)).await;
        transition(&device_id, &mut state, ConnectionState::Closed);
        return;
    }
    transition(&device_id, &mut state, ConnectionState::Open);
    tracing::info!(%device_id, %connection_id, "device connected");

    let mut ping = settings
        .ping_interval
        .map(|period| tokio::time::interval_at(Instant::now() + period, period));
    let mut pong_deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                if matches!(msg, Some(Ok(_))) {
                    pong_deadline = None;
                }
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!(%device_id, text = text.as_str(), "received from device");
                        if settings.echo_enabled
                            && let Some(json) = echo_json(&device_id, text.as_str())
                            && ws_tx.send(Message::text(json)).await.is_err()
                        {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(%device_id, error = %e, "device socket error");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
            frame = outbound.recv() => {
                match frame {
                    Some(Outbound::Deliver { payload, ack }) => {
                        if ack.is_closed() {
                            tracing::debug!(%device_id, "dropping frame abandoned by its sender");
                        } else {
                            let result = ws_tx
                                .send(Message::text(payload))
                                .await
                                .map_err(|e| e.to_string());
                            let _ = ack.send(result);
                        }
                    }
                    Some(Outbound::Close) => {
                        let _ = ws_tx.send(close_message(SHUTDOWN_CLOSE_REASON)).await;
                        break;
                    }
                    None => break,
                }
            }
            () = next_ping(&mut ping) => {
                if ws_tx.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
                if pong_deadline.is_none() {
                    pong_deadline = settings.ping_timeout.map(|t| Instant::now() + t);
                }
            }
            () = sleep_until(pong_deadline) => {
                tracing::info!(%device_id, "device stopped answering pings");
                break;
            }
        }
    }

    registry.unregister(&device_id).await;
    transition(&device_id, &mut state, ConnectionState::Closed);
    tracing::info!(%device_id, %connection_id, "device disconnected");
}

fn transition(device_id: &DeviceId, state: &mut ConnectionState, next: ConnectionState) {
    tracing::debug!(%device_id, from = %state, to = %next, "connection state");
    *state = next;
}

fn close_message(reason: &'static str) -> Message {
    Message::Close(Some(CloseFrame {
        code: close_code::AWAY,
        reason: Utf8Bytes::from_static(reason),
    }))
}

fn echo_json(device_id: &DeviceId, text: &str) -> Option<String> {
    let echo = EchoMessage {
        received: text.to_string(),
        device_id: device_id.clone(),
    };
    match serde_json::to_string(&echo) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::warn!(%device_id, error = %e, "failed to encode echo");
            None
        }
    }
}

async fn next_ping(ping: &mut Option<Interval>) {
    match ping {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}
