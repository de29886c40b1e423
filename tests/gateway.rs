//! End-to-end tests: real router, real sockets.

#![allow(clippy::panic, missing_docs)]

mod common;

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

use qsy_gateway::server::close_all_connections;
use qsy_gateway::ws::connection::ConnectionSettings;

use common::{ADMIN_PASSWORD, TestGateway, next_json};

const HF_TABLE: &str = r#"[{"freq_from": 14000, "freq_to": 14350, "mode": "USB"}]"#;

/// 1 MiB frames sent by a device that stops reading.
const FLOOD: usize = 64;

#[tokio::test]
async fn qsy_with_mode_end_to_end() {
    let gw = TestGateway::start().await;
    gw.write_table("hf", HF_TABLE);
    let mut device = gw.connect_device("alpha").await;

    let (status, body) = gw.get("/cmd/alpha/qsy-with-mode/hf/14200").await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        serde_json::json!({
            "device_id": "alpha",
            "qrg": 14200,
            "mode": "USB",
            "result": "success"
        })
    );

    let received = next_json(&mut device).await;
    assert_eq!(
        received,
        serde_json::json!({
            "command": "qsy_with_mode",
            "params": {"frequency": 14200, "mode": "USB"}
        })
    );
}

#[tokio::test]
async fn plain_qsy_end_to_end() {
    let gw = TestGateway::start().await;
    let mut device = gw.connect_device("alpha").await;

    let (status, body) = gw.get("/cmd/alpha/qsy/7074").await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        serde_json::json!({"device_id": "alpha", "qrg": 7074, "result": "success"})
    );

    let received = next_json(&mut device).await;
    assert_eq!(
        received,
        serde_json::json!({"command": "qsy", "params": {"frequency": 7074}})
    );
}

#[tokio::test]
async fn frequency_outside_table_sends_null_mode() {
    let gw = TestGateway::start().await;
    gw.write_table("hf", HF_TABLE);
    let mut device = gw.connect_device("alpha").await;

    let (status, body) = gw.get("/cmd/alpha/qsy-with-mode/hf/7074").await;
    assert_eq!(status, 200);
    assert_eq!(body["mode"], serde_json::Value::Null);

    let received = next_json(&mut device).await;
    assert_eq!(received["params"]["mode"], serde_json::Value::Null);
}

#[tokio::test]
async fn unknown_device_is_404() {
    let gw = TestGateway::start().await;
    gw.write_table("hf", HF_TABLE);

    let (status, body) = gw.get("/cmd/ghost/qsy/14200").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], 2001);

    let (status, _) = gw.get("/cmd/ghost/qsy-with-mode/hf/14200").await;
    assert_eq!(status, 404);

    // An absent device wins over a missing table.
    let (status, body) = gw.get("/cmd/ghost/qsy-with-mode/missing/14200").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], 2001);
}

#[tokio::test]
async fn missing_or_invalid_table_is_404_and_sends_nothing() {
    let gw = TestGateway::start().await;
    gw.write_table(
        "inverted",
        r#"[{"freq_from": 14350, "freq_to": 14000, "mode": "USB"}]"#,
    );
    let mut device = gw.connect_device("alpha").await;

    let (status, body) = gw.get("/cmd/alpha/qsy-with-mode/missing/14200").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], 4001);

    let (status, body) = gw.get("/cmd/alpha/qsy-with-mode/inverted/14200").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], 4002);

    let nothing = tokio::time::timeout(Duration::from_millis(200), device.next()).await;
    assert!(nothing.is_err(), "device must not receive partial commands");
}

#[tokio::test]
async fn malformed_qrg_is_400_with_error_body() {
    let gw = TestGateway::start().await;
    let (status, body) = gw.get("/cmd/alpha/qsy/fourteen").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], 1001);
}

#[tokio::test]
async fn duplicate_connection_is_closed_going_away() {
    let gw = TestGateway::start().await;
    let mut first = gw.connect_device("alpha").await;

    let mut second = gw.open_device("alpha").await;
    let Ok(Some(Ok(Message::Close(Some(frame))))) =
        tokio::time::timeout(Duration::from_secs(2), second.next()).await
    else {
        panic!("duplicate should receive a close frame");
    };
    assert_eq!(frame.code, CloseCode::Away);

    // The original connection keeps receiving commands.
    let (status, _) = gw.get("/cmd/alpha/qsy/3573").await;
    assert_eq!(status, 200);
    let received = next_json(&mut first).await;
    assert_eq!(received["params"]["frequency"], 3573);
    assert_eq!(gw.registry.len().await, 1);
}

#[tokio::test]
async fn concurrent_connects_admit_exactly_one() {
    let gw = TestGateway::start().await;
    let (mut a, mut b) = tokio::join!(gw.open_device("alpha"), gw.open_device("alpha"));

    let wait = Duration::from_millis(500);
    let (next_a, next_b) = tokio::join!(
        tokio::time::timeout(wait, a.next()),
        tokio::time::timeout(wait, b.next())
    );
    let closed = [next_a, next_b]
        .iter()
        .filter(|next| matches!(next, Ok(Some(Ok(Message::Close(_))))))
        .count();
    assert_eq!(closed, 1);
    assert_eq!(gw.registry.len().await, 1);
}

#[tokio::test]
async fn disconnect_unregisters_device() {
    let gw = TestGateway::start().await;
    let mut device = gw.connect_device("alpha").await;
    let _ = device.close(None).await;

    gw.wait_until_disconnected("alpha").await;
    let (status, _) = gw.get("/cmd/alpha/qsy/14200").await;
    assert_eq!(status, 404);

    // The id is free again.
    let _again = gw.connect_device("alpha").await;
    let (status, _) = gw.get("/cmd/alpha/qsy/14200").await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn echo_tags_device_id() {
    let gw = TestGateway::start().await;
    let mut device = gw.connect_device("beta").await;

    if device.send(Message::text("rig status ok")).await.is_err() {
        panic!("send failed");
    }
    let echo = next_json(&mut device).await;
    assert_eq!(
        echo,
        serde_json::json!({"received": "rig status ok", "device_id": "beta"})
    );
}

#[tokio::test]
async fn flush_requires_admin_password() {
    let gw = TestGateway::start().await;
    gw.write_table("hf", HF_TABLE);
    let mut device = gw.connect_device("alpha").await;

    let (status, _) = gw.get("/cmd/alpha/qsy-with-mode/hf/14200").await;
    assert_eq!(status, 200);
    let _ = next_json(&mut device).await;

    // Change the table on disk; the cached copy still answers.
    gw.write_table(
        "hf",
        r#"[{"freq_from": 14000, "freq_to": 14350, "mode": "CW"}]"#,
    );

    let (status, body) = gw
        .get("/cmd/flush_qrg_tables_cache?admin_password=wrong")
        .await;
    assert_eq!(status, 403);
    assert_eq!(body["error"]["code"], 1003);
    let (status, _) = gw.get("/cmd/flush_qrg_tables_cache").await;
    assert_eq!(status, 403);

    let (_, body) = gw.get("/cmd/alpha/qsy-with-mode/hf/14200").await;
    assert_eq!(body["mode"], "USB");
    let _ = next_json(&mut device).await;

    let (status, body) = gw
        .get(&format!(
            "/cmd/flush_qrg_tables_cache?admin_password={ADMIN_PASSWORD}"
        ))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["result"], "success");
    assert_eq!(body["flushed_tables"], 1);

    let (_, body) = gw.get("/cmd/alpha/qsy-with-mode/hf/14200").await;
    assert_eq!(body["mode"], "CW");
}

#[tokio::test]
async fn health_reports_connected_devices() {
    let gw = TestGateway::start().await;
    let _alpha = gw.connect_device("alpha").await;
    let _beta = gw.connect_device("beta").await;

    let (status, body) = gw.get("/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["connected_devices"], 2);
}

#[tokio::test]
async fn timed_out_send_is_500_and_never_delivered() {
    let gw = TestGateway::start_with(
        Duration::from_millis(300),
        ConnectionSettings {
            ping_interval: None,
            ..ConnectionSettings::default()
        },
    )
    .await;
    let device = gw.connect_device("alpha").await;
    let (mut sink, mut stream) = device.split();

    // Flood the gateway without reading: its echo writes back up and the
    // connection task stalls on the socket.
    let flood = tokio::spawn(async move {
        let chunk = "x".repeat(1 << 20);
        for _ in 0..FLOOD {
            if sink.send(Message::text(chunk.clone())).await.is_err() {
                break;
            }
        }
        sink
    });
    tokio::time::sleep(Duration::from_millis(500)).await;

    let (status, body) = gw.get("/cmd/alpha/qsy/7074").await;
    assert_eq!(status, 500);
    assert_eq!(body["error"]["code"], 3001);

    let mut echoes = 0;
    while echoes < FLOOD {
        let Ok(Some(Ok(Message::Text(text)))) =
            tokio::time::timeout(Duration::from_secs(10), stream.next()).await
        else {
            panic!("expected echo {echoes}");
        };
        let Ok(frame) = serde_json::from_str::<serde_json::Value>(text.as_str()) else {
            panic!("frame is not JSON");
        };
        assert!(frame.get("command").is_none(), "failed qsy reached the device");
        echoes += 1;
    }
    let late = tokio::time::timeout(Duration::from_millis(300), stream.next()).await;
    assert!(late.is_err(), "failed qsy reached the device");
    let Ok(_sink) = flood.await else {
        panic!("flood task panicked");
    };

    // The connection survives and later commands go through.
    let (status, _) = gw.get("/cmd/alpha/qsy/7074").await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn closing_all_connections_sends_going_away() {
    let gw = TestGateway::start().await;
    let mut device = gw.connect_device("alpha").await;

    assert!(close_all_connections(&gw.registry, Duration::from_secs(2)).await);

    let Ok(Some(Ok(Message::Close(Some(frame))))) =
        tokio::time::timeout(Duration::from_secs(2), device.next()).await
    else {
        panic!("device should receive a close frame");
    };
    assert_eq!(frame.code, CloseCode::Away);
    assert!(gw.registry.is_empty().await);
}

fn fast_ping() -> ConnectionSettings {
    ConnectionSettings {
        ping_interval: Some(Duration::from_millis(50)),
        ping_timeout: Some(Duration::from_millis(150)),
        ..ConnectionSettings::default()
    }
}

#[tokio::test]
async fn silent_device_is_dropped_after_ping_timeout() {
    let gw = TestGateway::start_with(Duration::from_secs(2), fast_ping()).await;
    // Never polled again, so no pong is ever sent.
    let _device = gw.connect_device("alpha").await;

    gw.wait_until_disconnected("alpha").await;
    let (status, body) = gw.get("/cmd/alpha/qsy/14200").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], 2001);
}

#[tokio::test]
async fn responsive_device_survives_pings() {
    let gw = TestGateway::start_with(Duration::from_secs(2), fast_ping()).await;
    let mut device = gw.connect_device("alpha").await;

    // Reading lets the client answer pings.
    let reader = tokio::spawn(async move {
        let deadline = tokio::time::sleep(Duration::from_millis(600));
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                () = &mut deadline => break,
                frame = device.next() => {
                    if !matches!(frame, Some(Ok(_))) {
                        panic!("device connection ended");
                    }
                }
            }
        }
        device
    });
    let Ok(_device) = reader.await else {
        panic!("reader panicked");
    };

    assert_eq!(gw.registry.len().await, 1);
}
