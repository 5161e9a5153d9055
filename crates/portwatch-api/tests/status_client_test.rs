#![allow(clippy::unwrap_used)]
// Integration tests for `StatusClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use portwatch_api::{Endpoints, Error, StatusClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, StatusClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = StatusClient::with_client(reqwest::Client::new(), base_url, Endpoints::default());
    (server, client)
}

async fn mount_status(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/ports/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ── Status tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_status_success() {
    let (server, client) = setup().await;

    mount_status(
        &server,
        json!({
            "status": "success",
            "timestamp": 1_718_445_000,
            "ports": [{
                "name": "eno1",
                "label": "MGMT",
                "status": "LINUX",
                "link": "up",
                "speed": 1000,
                "driver": "igb",
                "pci": "0000:02:00.0",
                "mac": "aa:bb:cc:dd:ee:01",
                "lldp_neighbor": {
                    "system_name": "switch-1",
                    "capabilities": "Bridge, Router",
                    "management_ip": "10.0.0.2",
                    "port_description": "ge-0/0/1"
                },
                "arp_neighbors": [
                    { "ip": "10.0.0.9", "mac": "11:22:33:44:55:66", "type": "arp" }
                ]
            }]
        }),
    )
    .await;

    let batch = client.fetch_status().await.unwrap();

    assert_eq!(batch.timestamp, Some(1_718_445_000));
    assert_eq!(batch.ports.len(), 1);
    let port = &batch.ports[0];
    assert_eq!(port.name.as_deref(), Some("eno1"));
    assert_eq!(port.link.as_deref(), Some("up"));
    assert_eq!(port.speed, Some(json!(1000)));
    let neighbor = port.lldp_neighbor.as_ref().unwrap();
    assert_eq!(neighbor.system_name.as_deref(), Some("switch-1"));
    assert_eq!(neighbor.port_description.as_deref(), Some("ge-0/0/1"));
    let arp = port.arp_neighbors.as_ref().unwrap();
    assert_eq!(arp[0].ip.as_deref(), Some("10.0.0.9"));
}

#[tokio::test]
async fn test_fetch_status_absorbs_field_aliases() {
    let (server, client) = setup().await;

    mount_status(
        &server,
        json!({
            "status": "success",
            "ports": [{
                "interface": "eno2",
                "link": "dpdk_bound",
                "link_speed": "10000",
                "mac_address": "aa:bb:cc:dd:ee:02",
                "neighbor": { "system_name": "core-sw", "port": "xe-1/0/0" },
                "display_name": "LAN1 → core-sw"
            }]
        }),
    )
    .await;

    let batch = client.fetch_status().await.unwrap();
    let port = &batch.ports[0];

    assert_eq!(port.name.as_deref(), Some("eno2"));
    assert_eq!(port.speed, Some(json!("10000")));
    assert_eq!(port.mac.as_deref(), Some("aa:bb:cc:dd:ee:02"));
    assert_eq!(
        port.lldp_neighbor.as_ref().unwrap().port_description.as_deref(),
        Some("xe-1/0/0")
    );
    assert!(port.extra.contains_key("display_name"));
}

#[tokio::test]
async fn test_fetch_status_drifted_values_stay_in_their_record() {
    let (server, client) = setup().await;

    mount_status(
        &server,
        json!({
            "status": "success",
            "ports": [
                { "name": "eth0", "link": "up", "status": "LINUX" },
                {
                    "name": "eth1",
                    "link": 1,
                    "dpdk_bound": "true",
                    "mac": null,
                    "lldp_neighbor": "none",
                    "arp_neighbors": [
                        { "ip": "10.0.0.1", "mac": null },
                        "garbage",
                        { "ip": "10.0.0.2", "mac": "aa:bb:cc:dd:ee:02" }
                    ]
                },
                42
            ]
        }),
    )
    .await;

    let batch = client.fetch_status().await.unwrap();
    assert_eq!(batch.ports.len(), 2);
    assert_eq!(batch.ports[0].link.as_deref(), Some("up"));

    let eth1 = &batch.ports[1];
    assert_eq!(eth1.link.as_deref(), Some("1"));
    assert_eq!(eth1.dpdk_bound, Some(true));
    assert_eq!(eth1.mac, None);
    assert!(eth1.lldp_neighbor.is_none());

    let arp = eth1.arp_neighbors.as_ref().unwrap();
    assert_eq!(arp.len(), 2);
    assert_eq!(arp[0].ip.as_deref(), Some("10.0.0.1"));
    assert_eq!(arp[0].mac, None);
}

#[tokio::test]
async fn test_fetch_status_non_success_is_rejected() {
    let (server, client) = setup().await;

    mount_status(
        &server,
        json!({ "status": "error", "message": "dpdk-devbind.py missing" }),
    )
    .await;

    let result = client.fetch_status().await;

    match result {
        Err(ref e @ Error::Rejected { ref status, ref message }) => {
            assert_eq!(status, "error");
            assert_eq!(message, "dpdk-devbind.py missing");
            assert!(e.is_soft_failure());
        }
        other => panic!("expected Rejected error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_status_missing_ports_is_malformed() {
    let (server, client) = setup().await;

    mount_status(&server, json!({ "status": "success" })).await;

    let result = client.fetch_status().await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_fetch_status_garbage_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ports/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.fetch_status().await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_fetch_status_http_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ports/status"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let result = client.fetch_status().await;

    match result {
        Err(ref e @ Error::Http { status, .. }) => {
            assert_eq!(status, 500);
            assert!(e.is_transient());
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

// ── Discovery tests ─────────────────────────────────────────────────

#[tokio::test]
async fn test_trigger_discovery() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ports/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "LLDP refreshed, discovering neighbors..."
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.trigger_discovery().await.unwrap();
}

#[tokio::test]
async fn test_trigger_discovery_accepts_plain_text() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ports/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    client.trigger_discovery().await.unwrap();
}

#[tokio::test]
async fn test_trigger_discovery_failure() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ports/refresh"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status": "error",
            "message": "systemctl failed"
        })))
        .mount(&server)
        .await;

    let result = client.trigger_discovery().await;
    assert!(
        matches!(result, Err(Error::Http { status: 500, .. })),
        "expected Http error, got: {result:?}"
    );
}

// ── Topology tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_topology() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ports/topology"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "topology": {
                "devices": [
                    { "id": "host", "name": "host", "type": "tester" },
                    { "id": "device_1", "name": "switch-1", "discovered_via": "lldp" }
                ],
                "links": [
                    { "source": "host", "target": "device_1", "source_port": "eno1", "type": "lldp" }
                ]
            }
        })))
        .mount(&server)
        .await;

    let topology = client.fetch_topology().await.unwrap();
    assert_eq!(topology.device_count(), 2);
    assert_eq!(topology.link_count(), 1);
}

// ── Custom endpoints ────────────────────────────────────────────────

#[tokio::test]
async fn test_custom_endpoint_paths() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let endpoints = Endpoints {
        status: "/api/ports/enhanced_status".into(),
        discovery: "/api/ports/refresh_lldp".into(),
        topology: "/api/ports/topology".into(),
    };
    let client = StatusClient::with_client(reqwest::Client::new(), base_url, endpoints);

    Mock::given(method("GET"))
        .and(path("/api/ports/enhanced_status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "success", "ports": [] })),
        )
        .mount(&server)
        .await;

    let batch = client.fetch_status().await.unwrap();
    assert!(batch.ports.is_empty());
}
