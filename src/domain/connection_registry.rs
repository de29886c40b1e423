//! One live connection per device.
//!
//! [`ConnectionRegistry`] maps [`DeviceId`] to the [`DeviceHandle`] of its
//! open connection. Insertion is check-and-insert under a single write
//! lock, so two concurrent connects for the same device can never both
//! succeed.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::{DeviceHandle, DeviceId};
use crate::error::GatewayError;

/// Registry of open device connections.
///
/// # Concurrency
///
/// - Lookups share a read lock and never block each other.
/// - `register` / `unregister` take the write lock briefly.
/// - Only the connection lifecycle writes; dispatch only reads.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<DeviceId, DeviceHandle>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handle` unless its device already has a connection.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DeviceAlreadyConnected`] if an entry exists.
    /// The existing entry is left untouched.
    pub async fn register(&self, handle: DeviceHandle) -> Result<(), GatewayError> {
        let mut map = self.connections.write().await;
        let device_id = handle.device_id().clone();
        if map.contains_key(&device_id) {
            return Err(GatewayError::DeviceAlreadyConnected(device_id));
        }
        map.insert(device_id, handle);
        Ok(())
    }

    /// Removes the device's entry. No-op if absent.
    ///
    /// Returns `true` if an entry was removed.
    pub async fn unregister(&self, device_id: &DeviceId) -> bool {
        self.connections.write().await.remove(device_id).is_some()
    }

    /// Returns the handle of the device's open connection.
    pub async fn lookup(&self, device_id: &DeviceId) -> Option<DeviceHandle> {
        self.connections.read().await.get(device_id).cloned()
    }

    /// Returns handles of every open connection.
    pub async fn all(&self) -> Vec<DeviceHandle> {
        self.connections.read().await.values().cloned().collect()
    }

    /// Number of open connections.
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Returns `true` if no device is connected.
    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }
}
