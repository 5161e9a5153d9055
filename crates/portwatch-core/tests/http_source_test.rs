#![allow(clippy::unwrap_used)]

// End-to-end: HTTP status feed -> snapshots, through the real client.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use portwatch_core::{
    CoreError, DeviceKind, LinkState, MemoryBoard, MonitorConfig, OperationalStatus,
    PollingController, StatusSource, fetch_snapshots, status_client,
};

async fn setup() -> (MockServer, MonitorConfig) {
    let server = MockServer::start().await;
    let mut config = MonitorConfig::new(server.uri().parse().unwrap());
    config.timeout = Duration::from_secs(5);
    (server, config)
}

#[tokio::test]
async fn mixed_vocabulary_feed_becomes_canonical_snapshots() {
    let (server, config) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ports/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "timestamp": 1_718_445_000,
            "ports": [
                {
                    "name": "eno1", "label": "MGMT", "link": "up", "status": "LINUX",
                    "speed": 1000, "driver": "igb",
                    "lldp_neighbor": { "system_name": "core-sw", "management_ip": "10.0.0.1" },
                    "arp_neighbors": [{ "ip": "10.0.0.9", "mac": "aa:bb:cc:dd:ee:09" }]
                },
                {
                    "interface": "enp3s0f0", "link": "bound_to_dpdk", "status": "DPDK",
                    "link_speed": "10000"
                },
                {
                    "interface": "enp3s0f1", "link": "unknown", "status": "DPDK",
                    "dpdk_bound": true,
                    "neighbor": { "ip": "192.168.5.20", "mac": "AA-BB-CC-00-00-01", "discovery_method": "arp" }
                },
                { "name": "eno2", "link": "down", "status": "AVAIL", "speed": 1000 }
            ]
        })))
        .mount(&server)
        .await;

    let client = status_client(&config).unwrap();
    let snapshots = fetch_snapshots(&client).await.unwrap();

    assert_eq!(snapshots.len(), 4);

    let eno1 = &snapshots[0];
    assert_eq!(eno1.link, LinkState::Up);
    assert_eq!(eno1.speed_mbps, Some(1000));
    assert_eq!(eno1.device.kind, DeviceKind::Lldp);
    assert_eq!(eno1.device.label.as_deref(), Some("core-sw"));

    let f0 = &snapshots[1];
    assert_eq!(f0.link, LinkState::BoundToOffload);
    assert_eq!(f0.status, OperationalStatus::OffloadBound);
    assert_eq!(f0.speed_mbps, Some(10_000));

    let f1 = &snapshots[2];
    assert_eq!(f1.link, LinkState::BoundToOffload);
    assert_eq!(f1.device.kind, DeviceKind::Arp);
    assert_eq!(f1.device.details, vec!["192.168.5.20 (aa:bb:cc:00:00:01)"]);

    let eno2 = &snapshots[3];
    assert_eq!(eno2.link, LinkState::Down);
    assert_eq!(eno2.status, OperationalStatus::AvailableUnconfigured);
    assert_eq!(eno2.speed_mbps, None);
}

#[tokio::test]
async fn rejected_feed_maps_to_soft_core_error() {
    let (server, config) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ports/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "error", "message": "lldpd not running" })),
        )
        .mount(&server)
        .await;

    let client = status_client(&config).unwrap();
    let err = fetch_snapshots(&client).await.unwrap_err();

    assert!(matches!(err, CoreError::Rejected { ref message, .. } if message == "lldpd not running"));
}

#[tokio::test]
async fn discovery_and_topology_go_through_the_client() {
    let (server, config) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ports/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ports/topology"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "topology": {
                "devices": [{ "id": "host" }, { "id": "core-sw" }, { "id": "10.0.0.9" }],
                "links": [
                    { "source": "host", "target": "core-sw", "type": "lldp" },
                    { "source": "host", "target": "10.0.0.9", "type": "arp" }
                ]
            }
        })))
        .mount(&server)
        .await;

    let client = status_client(&config).unwrap();
    StatusSource::trigger_discovery(&client).await.unwrap();

    let controller = PollingController::new(config, client, MemoryBoard::new()).unwrap();
    let summary = controller.fetch_topology().await.unwrap();

    assert_eq!(summary.devices, 3);
    assert_eq!(summary.links, 2);
    assert_eq!(summary.lldp_links, 1);
    assert_eq!(summary.arp_links, 1);
}
