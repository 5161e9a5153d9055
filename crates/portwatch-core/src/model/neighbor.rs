// ── Neighbor domain types ──
//
// Two independent discovery sources feed one "connected device" fact:
// protocol-level LLDP, and address-table ARP as the fallback.

use serde::{Deserialize, Serialize};
use strum::Display;

use super::identity::MacAddress;

/// A neighbor that announced itself over LLDP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LldpNeighbor {
    /// May be empty; the resolver substitutes a placeholder label.
    pub system_name: String,
    pub capabilities: Option<String>,
    pub management_address: Option<String>,
    pub port_description: Option<String>,
}

/// One address-table entry learned on the port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArpNeighbor {
    pub ip: String,
    pub mac: MacAddress,
}

/// Which source produced the resolved device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceKind {
    Lldp,
    Arp,
    None,
}

/// Display-oriented projection of whatever sits on the other end of the cable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedDevice {
    pub kind: DeviceKind,
    /// Absent exactly when `kind` is [`DeviceKind::None`].
    pub label: Option<String>,
    pub details: Vec<String>,
}

impl ConnectedDevice {
    /// The "nothing discovered" value.
    pub fn none() -> Self {
        Self {
            kind: DeviceKind::None,
            label: None,
            details: Vec::new(),
        }
    }

    pub fn is_present(&self) -> bool {
        self.kind != DeviceKind::None
    }
}

impl Default for ConnectedDevice {
    fn default() -> Self {
        Self::none()
    }
}
