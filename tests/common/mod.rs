//! Shared harness: a gateway on an ephemeral port plus a device client.

#![allow(clippy::panic, dead_code, missing_docs, missing_debug_implementations)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use qsy_gateway::app_state::AppState;
use qsy_gateway::domain::ConnectionRegistry;
use qsy_gateway::server::build_app;
use qsy_gateway::tables::{LocalTableSource, LookupTableSource};
use qsy_gateway::ws::connection::ConnectionSettings;

pub const ADMIN_PASSWORD: &str = "s3cret";

pub type DeviceSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct TestGateway {
    pub addr: SocketAddr,
    pub registry: Arc<ConnectionRegistry>,
    pub tables_dir: PathBuf,
}

impl TestGateway {
    pub async fn start() -> Self {
        Self::start_with(
            Duration::from_secs(2),
            ConnectionSettings {
                ping_interval: None,
                ..ConnectionSettings::default()
            },
        )
        .await
    }

    pub async fn start_with(send_timeout: Duration, connection: ConnectionSettings) -> Self {
        let tables_dir = std::env::temp_dir().join(format!("qsy-it-{}", uuid::Uuid::new_v4()));
        if let Err(e) = std::fs::create_dir_all(&tables_dir) {
            panic!("cannot create tables dir: {e}");
        }

        let state = AppState::new(
            LookupTableSource::Local(LocalTableSource::new(&tables_dir)),
            Some(ADMIN_PASSWORD),
            send_timeout,
            connection,
        );
        let registry = Arc::clone(&state.registry);

        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind failed");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("no local addr");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, build_app(state)).await;
        });

        Self {
            addr,
            registry,
            tables_dir,
        }
    }

    pub fn write_table(&self, name: &str, content: &str) {
        write_table(&self.tables_dir, name, content);
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub async fn get(&self, path: &str) -> (u16, serde_json::Value) {
        let Ok(response) = reqwest::get(self.url(path)).await else {
            panic!("request to {path} failed");
        };
        let status = response.status().as_u16();
        let Ok(body) = response.json::<serde_json::Value>().await else {
            panic!("response to {path} is not JSON");
        };
        (status, body)
    }

    /// Opens a raw device socket without waiting for registration.
    pub async fn open_device(&self, device_id: &str) -> DeviceSocket {
        let url = format!("ws://{}/ws/connect-device/{device_id}", self.addr);
        let Ok((socket, _)) = tokio_tungstenite::connect_async(url).await else {
            panic!("websocket handshake failed");
        };
        socket
    }

    /// Opens a device socket and waits until the gateway has registered it.
    ///
    /// The echo only starts after registration, so one round trip proves it.
    pub async fn connect_device(&self, device_id: &str) -> DeviceSocket {
        let mut socket = self.open_device(device_id).await;
        if socket.send(Message::text("hello")).await.is_err() {
            panic!("send failed");
        }
        let echo = next_json(&mut socket).await;
        assert_eq!(echo["received"], "hello");
        assert_eq!(echo["device_id"], device_id);
        socket
    }

    pub async fn wait_until_disconnected(&self, device_id: &str) {
        let id = qsy_gateway::domain::DeviceId::from(device_id);
        let gone = tokio::time::timeout(Duration::from_secs(2), async {
            while self.registry.lookup(&id).await.is_some() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        if gone.is_err() {
            panic!("device {device_id} was never unregistered");
        }
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.tables_dir);
    }
}

pub fn write_table(dir: &Path, name: &str, content: &str) {
    if let Err(e) = std::fs::write(dir.join(format!("{name}.json")), content) {
        panic!("cannot write table {name}: {e}");
    }
}

/// Reads the next text frame and parses it as JSON.
pub async fn next_json(socket: &mut DeviceSocket) -> serde_json::Value {
    let Ok(Some(Ok(Message::Text(text)))) =
        tokio::time::timeout(Duration::from_secs(2), socket.next()).await
    else {
        panic!("expected a text frame");
    };
    let Ok(value) = serde_json::from_str(text.as_str()) else {
        panic!("frame is not JSON: {}", text.as_str());
    };
    value
}
