// ── Unified domain model ──
//
// Canonical, feed-independent representations of ports and their
// neighbors. Every vocabulary the status feed uses is folded into these.

pub mod identity;
pub mod neighbor;
pub mod port;
pub mod topology;

// ── Re-exports ──────────────────────────────────────────────────────

pub use identity::{MacAddress, PortId};
pub use neighbor::{ArpNeighbor, ConnectedDevice, DeviceKind, LldpNeighbor};
pub use port::{LinkState, OperationalStatus, PortMetadata, PortSnapshot};
pub use topology::TopologySummary;
