//! Port status synchronization engine between `portwatch-api` and whatever
//! renders port state (the CLI's board view, or any other surface).
//!
//! - **[`normalize`]**: folds every raw link/status vocabulary the feed has
//!   used into [`LinkState`] and [`OperationalStatus`]. Total; unknown
//!   tokens degrade to `Unknown`.
//!
//! - **[`resolve`]**: merges LLDP and ARP discovery into one
//!   [`ConnectedDevice`]. LLDP always takes precedence.
//!
//! - **[`convert`]**: builds one immutable [`PortSnapshot`] per raw record.
//!
//! - **[`reconcile`]**: diffs each snapshot against the last one applied
//!   and writes only what changed onto bound visual targets, creating
//!   sub-elements once and never duplicating them.
//!
//! - **[`PollingController`]**: cadence, manual refresh with a discovery
//!   cool-down, start/stop lifecycle and per-cycle error isolation.

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod resolve;
pub mod source;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{MonitorConfig, TlsVerification};
pub use portwatch_api::{Endpoints, StatusClient};
pub use controller::{ControllerState, CycleOutcome, CycleReport, CycleTrigger, PollingController};
pub use error::CoreError;
pub use reconcile::target::{ChildKind, Element, TargetRegistry, TargetRole, Tone, VisualTarget};
pub use reconcile::{
    ApplyOutcome, BatchOutcome, MemoryBoard, MemoryElement, MemoryTarget, ReconciliationState,
    Reconciler,
};
pub use source::{StatusSource, fetch_snapshots, status_client};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    ArpNeighbor, ConnectedDevice, DeviceKind, LinkState, LldpNeighbor, MacAddress,
    OperationalStatus, PortId, PortMetadata, PortSnapshot, TopologySummary,
};
