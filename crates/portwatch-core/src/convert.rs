// ── Raw record -> snapshot conversion ──
//
// Composes the normalizer and the neighbor resolver with pass-through
// metadata. Pure: no I/O, one call per raw record per cycle.

use std::collections::HashSet;

use portwatch_api::{RawArpNeighbor, RawNeighbor, RawPortRecord};
use tracing::warn;

use crate::model::{
    ArpNeighbor, LinkState, LldpNeighbor, MacAddress, PortId, PortMetadata, PortSnapshot,
};
use crate::normalize::normalize;
use crate::resolve::resolve;

/// Discovery-method tags meaning "this neighbor came from the address table".
const ARP_METHODS: &[&str] = &["arp", "dpdk_arp_probe", "arp_probe"];

// ── Snapshot builder ────────────────────────────────────────────────

/// Build the snapshot for one record whose identifier is already known.
pub fn build(port: PortId, raw: &RawPortRecord) -> PortSnapshot {
    let (mut link, status) = normalize(raw.link.as_deref(), raw.status.as_deref());
    if link == LinkState::Unknown && raw.dpdk_bound == Some(true) {
        link = LinkState::BoundToOffload;
    }

    let speed_mbps = if link.carries_speed() {
        raw.speed.as_ref().and_then(parse_speed)
    } else {
        None
    };

    let (lldp, arp) = split_neighbors(raw);
    let device = resolve(lldp.as_ref(), &arp);

    PortSnapshot {
        port,
        label: text(raw.label.as_deref()),
        link,
        status,
        speed_mbps,
        metadata: PortMetadata {
            driver: text(raw.driver.as_deref()),
            pci: text(raw.pci.as_deref()),
            mac: text(raw.mac.as_deref()).map(MacAddress::new),
        },
        device,
    }
}

/// Build snapshots for a whole status batch.
///
/// Records without an identifier are skipped. When an identifier repeats,
/// the first record wins and later ones are dropped with a warning.
pub fn build_batch(records: &[RawPortRecord]) -> Vec<PortSnapshot> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut snapshots = Vec::with_capacity(records.len());

    for (index, raw) in records.iter().enumerate() {
        let Some(name) = text(raw.name.as_deref()) else {
            warn!(index, "skipping port record without an identifier");
            continue;
        };
        let port = PortId::new(name);
        if !seen.insert(port.clone()) {
            warn!(port = %port, "duplicate port record in batch, keeping the first");
            continue;
        }
        snapshots.push(build(port, raw));
    }

    snapshots
}

// ── Field helpers ───────────────────────────────────────────────────

/// Separate the protocol-level neighbor from address-table hits.
///
/// Some feeds report an ARP hit in the neighbor slot, tagged through
/// `discovery_method`; that entry joins the ARP list instead.
fn split_neighbors(raw: &RawPortRecord) -> (Option<LldpNeighbor>, Vec<ArpNeighbor>) {
    let mut arp: Vec<ArpNeighbor> = raw
        .arp_neighbors
        .iter()
        .flatten()
        .filter_map(arp_entry)
        .collect();

    let Some(neighbor) = raw.lldp_neighbor.as_ref() else {
        return (None, arp);
    };

    let method = neighbor
        .discovery_method
        .as_deref()
        .or(raw.discovery_method.as_deref());
    if is_arp_method(method) {
        if let Some(entry) = neighbor_as_arp(neighbor).filter(|e| !arp.contains(e)) {
            arp.insert(0, entry);
        }
        return (None, arp);
    }

    (Some(lldp_entry(neighbor)), arp)
}

fn lldp_entry(neighbor: &RawNeighbor) -> LldpNeighbor {
    LldpNeighbor {
        system_name: text(neighbor.system_name.as_deref()).unwrap_or_default(),
        capabilities: text(neighbor.capabilities.as_deref())
            .or_else(|| text(neighbor.system_description.as_deref())),
        management_address: text(neighbor.management_ip.as_deref()),
        port_description: text(neighbor.port_description.as_deref()),
    }
}

fn neighbor_as_arp(neighbor: &RawNeighbor) -> Option<ArpNeighbor> {
    let ip = text(neighbor.ip.as_deref()).or_else(|| text(neighbor.management_ip.as_deref()))?;
    let mac = text(neighbor.mac.as_deref()).unwrap_or_default();
    Some(ArpNeighbor {
        ip,
        mac: MacAddress::new(mac),
    })
}

fn arp_entry(raw: &RawArpNeighbor) -> Option<ArpNeighbor> {
    let ip = text(raw.ip.as_deref())?;
    Some(ArpNeighbor {
        ip,
        mac: MacAddress::new(raw.mac.as_deref().unwrap_or_default()),
    })
}

fn is_arp_method(method: Option<&str>) -> bool {
    method.is_some_and(|m| ARP_METHODS.iter().any(|a| m.trim().eq_ignore_ascii_case(a)))
}

/// Trimmed, non-empty text; the feed's `N/A` filler counts as absent.
fn text(value: Option<&str>) -> Option<String> {
    let v = value?.trim();
    if v.is_empty() || v.eq_ignore_ascii_case("n/a") {
        None
    } else {
        Some(v.to_owned())
    }
}

/// Speed arrives as a number or a numeric string; anything not a positive
/// whole number of Mbps is treated as absent.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
fn parse_speed(value: &serde_json::Value) -> Option<u32> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| {
                    f.is_finite()
                        && *f > 0.0
                        && f.fract().abs() < f64::EPSILON
                        && *f <= f64::from(u32::MAX)
                })
                .map(|f| f as u64)
        }),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    u32::try_from(parsed).ok().filter(|mbps| *mbps > 0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::{DeviceKind, OperationalStatus};

    fn record(value: serde_json::Value) -> RawPortRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn builds_full_snapshot() {
        let raw = record(json!({
            "name": "eth0",
            "label": "LAN1",
            "link": "up",
            "status": "LINUX",
            "speed": 1000,
            "driver": "igb",
            "pci": "0000:03:00.0",
            "mac": "AA:BB:CC:00:11:22",
            "lldp_neighbor": {"system_name": "switch-1", "port_description": "Gi0/1"}
        }));

        let snap = build(PortId::from("eth0"), &raw);

        assert_eq!(snap.label.as_deref(), Some("LAN1"));
        assert_eq!(snap.link, LinkState::Up);
        assert_eq!(snap.status, OperationalStatus::StandardManaged);
        assert_eq!(snap.speed_mbps, Some(1000));
        assert_eq!(snap.metadata.driver.as_deref(), Some("igb"));
        assert_eq!(snap.metadata.mac.unwrap().as_str(), "aa:bb:cc:00:11:22");
        assert_eq!(snap.device.kind, DeviceKind::Lldp);
        assert_eq!(snap.device.details, vec!["Gi0/1"]);
    }

    #[test]
    fn bound_to_dpdk_is_never_unknown_or_down() {
        let raw = record(json!({"name": "eth1", "link": "bound_to_dpdk", "status": "DPDK"}));
        let snap = build(PortId::from("eth1"), &raw);

        assert_eq!(snap.link, LinkState::BoundToOffload);
        assert_eq!(snap.status, OperationalStatus::OffloadBound);
    }

    #[test]
    fn offload_flag_upgrades_unknown_link() {
        let raw = record(json!({"interface": "eth2", "link": "unknown", "dpdk_bound": true}));
        assert_eq!(build(PortId::from("eth2"), &raw).link, LinkState::BoundToOffload);

        let raw = record(json!({"interface": "eth2", "link": "down", "dpdk_bound": true}));
        assert_eq!(build(PortId::from("eth2"), &raw).link, LinkState::Down);
    }

    #[test]
    fn speed_is_dropped_when_link_is_down() {
        let raw = record(json!({"name": "eth0", "link": "down", "speed": 1000}));
        assert_eq!(build(PortId::from("eth0"), &raw).speed_mbps, None);
    }

    #[test]
    fn speed_accepts_numeric_strings_and_rejects_junk() {
        assert_eq!(parse_speed(&json!("10000")), Some(10_000));
        assert_eq!(parse_speed(&json!(2500.0)), Some(2500));
        assert_eq!(parse_speed(&json!(0)), None);
        assert_eq!(parse_speed(&json!(-1)), None);
        assert_eq!(parse_speed(&json!("Unknown!")), None);
        assert_eq!(parse_speed(&json!(null)), None);
    }

    #[test]
    fn arp_tagged_neighbor_is_not_lldp() {
        let raw = record(json!({
            "name": "eth3",
            "link": "up",
            "neighbor": {"ip": "10.0.0.9", "mac": "aa:aa:aa:aa:aa:aa", "discovery_method": "arp"}
        }));

        let snap = build(PortId::from("eth3"), &raw);

        assert_eq!(snap.device.kind, DeviceKind::Arp);
        assert_eq!(snap.device.details, vec!["10.0.0.9 (aa:aa:aa:aa:aa:aa)"]);
    }

    #[test]
    fn lldp_neighbor_suppresses_arp_list() {
        let raw = record(json!({
            "name": "eth0",
            "link": "up",
            "lldp_neighbor": {"system_name": "core-sw"},
            "arp_neighbors": [{"ip": "10.0.0.1", "mac": "aa:bb:cc:dd:ee:ff"}]
        }));

        let device = build(PortId::from("eth0"), &raw).device;
        assert_eq!(device.kind, DeviceKind::Lldp);
        assert_eq!(device.label.as_deref(), Some("core-sw"));
    }

    #[test]
    fn batch_skips_unnamed_and_keeps_first_duplicate() {
        let records = vec![
            record(json!({"name": "eth0", "link": "up"})),
            record(json!({"link": "up"})),
            record(json!({"name": "  ", "link": "up"})),
            record(json!({"name": "eth0", "link": "down"})),
            record(json!({"interface": "eth1", "link": "down"})),
        ];

        let snaps = build_batch(&records);

        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[0].port.as_str(), "eth0");
        assert_eq!(snaps[0].link, LinkState::Up);
        assert_eq!(snaps[1].port.as_str(), "eth1");
    }

    #[test]
    fn drifted_record_degrades_without_losing_the_batch() {
        let records: Vec<RawPortRecord> = serde_json::from_value(json!([
            {"name": "eth0", "link": "up", "status": "LINUX", "speed": 1000},
            {
                "name": "eth1",
                "link": 7,
                "status": ["DPDK"],
                "dpdk_bound": "true",
                "mac": null,
                "arp_neighbors": [{"ip": "10.0.0.1", "mac": null}, {"mac": "aa:bb:cc:dd:ee:ff"}]
            }
        ]))
        .unwrap();

        let snaps = build_batch(&records);

        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[0].link, LinkState::Up);
        assert_eq!(snaps[0].speed_mbps, Some(1000));

        let eth1 = &snaps[1];
        assert_eq!(eth1.link, LinkState::BoundToOffload);
        assert_eq!(eth1.status, OperationalStatus::Unrecognized);
        assert_eq!(eth1.metadata.mac, None);
        assert_eq!(eth1.device.kind, DeviceKind::Arp);
        assert_eq!(eth1.device.label.as_deref(), Some("1 Device(s)"));
    }
}
