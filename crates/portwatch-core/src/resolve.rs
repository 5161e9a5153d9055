// ── Neighbor resolution ──
//
// LLDP and ARP discovery run independently on the host. This module folds
// both into the single "connected device" fact shown per port. LLDP always
// wins: address-table data never overrides or blends into an LLDP result.

use crate::model::{ArpNeighbor, ConnectedDevice, DeviceKind, LldpNeighbor};

/// Maximum ARP entries listed before collapsing into an overflow marker.
pub const ARP_DISPLAY_CAP: usize = 3;

/// Label used when an LLDP neighbor announces no system name.
pub const UNNAMED_DEVICE: &str = "Unknown Device";

/// Merge the two discovery sources for one port.
pub fn resolve(lldp: Option<&LldpNeighbor>, arp: &[ArpNeighbor]) -> ConnectedDevice {
    if let Some(neighbor) = lldp {
        return from_lldp(neighbor);
    }
    if !arp.is_empty() {
        return from_arp(arp);
    }
    ConnectedDevice::none()
}

fn from_lldp(neighbor: &LldpNeighbor) -> ConnectedDevice {
    let name = neighbor.system_name.trim();
    let label = if name.is_empty() { UNNAMED_DEVICE } else { name };

    let details = [
        &neighbor.capabilities,
        &neighbor.management_address,
        &neighbor.port_description,
    ]
    .into_iter()
    .filter_map(|field| non_blank(field.as_deref()))
    .map(str::to_owned)
    .collect();

    ConnectedDevice {
        kind: DeviceKind::Lldp,
        label: Some(label.to_owned()),
        details,
    }
}

fn from_arp(entries: &[ArpNeighbor]) -> ConnectedDevice {
    let mut details: Vec<String> = entries
        .iter()
        .take(ARP_DISPLAY_CAP)
        .map(|e| format!("{} ({})", e.ip, e.mac))
        .collect();
    if entries.len() > ARP_DISPLAY_CAP {
        details.push(format!("+{} more", entries.len() - ARP_DISPLAY_CAP));
    }

    ConnectedDevice {
        kind: DeviceKind::Arp,
        label: Some(format!("{} Device(s)", entries.len())),
        details,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
