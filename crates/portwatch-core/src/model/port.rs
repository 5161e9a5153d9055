// ── Port domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::identity::{MacAddress, PortId};
use super::neighbor::ConnectedDevice;

/// Canonical link state -- normalized from every feed vocabulary.
///
/// `BoundToOffload` is a first-class state: the port is owned by a
/// kernel-bypass driver, so its link cannot be read through the normal path.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LinkState {
    Up,
    Down,
    BoundToOffload,
    Unknown,
}

impl LinkState {
    /// Whether a negotiated speed is meaningful in this state.
    pub fn carries_speed(self) -> bool {
        matches!(self, Self::Up | Self::BoundToOffload)
    }
}

/// Administrative / driver classification. Independent of [`LinkState`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OperationalStatus {
    /// Managed by the regular kernel driver.
    StandardManaged,
    /// Bound to an offload / userspace driver.
    OffloadBound,
    /// Present but not configured for either role.
    AvailableUnconfigured,
    Unrecognized,
}

impl OperationalStatus {
    /// Short badge text, in the vocabulary operators already know.
    pub fn badge(self) -> &'static str {
        match self {
            Self::StandardManaged => "LINUX",
            Self::OffloadBound => "DPDK",
            Self::AvailableUnconfigured => "AVAIL",
            Self::Unrecognized => "UNKNOWN",
        }
    }
}

/// Driver / bus / hardware-address metadata. All optional, passed through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMetadata {
    pub driver: Option<String>,
    pub pci: Option<String>,
    pub mac: Option<MacAddress>,
}

impl PortMetadata {
    pub fn is_empty(&self) -> bool {
        self.driver.is_none() && self.pci.is_none() && self.mac.is_none()
    }
}

/// Immutable per-port result of one normalization + resolution pass.
///
/// Snapshots are never edited; a newer snapshot replaces an older one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSnapshot {
    pub port: PortId,
    /// Human label from the feed (`MGMT`, `LAN1`), if any.
    pub label: Option<String>,
    pub link: LinkState,
    pub status: OperationalStatus,
    /// Only ever populated when `link.carries_speed()`.
    pub speed_mbps: Option<u32>,
    pub metadata: PortMetadata,
    pub device: ConnectedDevice,
}

impl PortSnapshot {
    /// True when the status-indicator projection differs from `other`.
    pub fn indicator_differs(&self, other: &Self) -> bool {
        self.link != other.link || self.status != other.status || self.speed_mbps != other.speed_mbps
    }
}
