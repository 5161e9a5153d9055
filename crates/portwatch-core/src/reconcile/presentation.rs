// ── Snapshot presentation ──
//
// Closed mapping from canonical state to display text and tone. One entry
// per LinkState value.

use super::target::{TargetRole, Tone};
use crate::model::{
    ConnectedDevice, DeviceKind, LinkState, MacAddress, PortMetadata, PortSnapshot,
};

const NOT_AVAILABLE: &str = "N/A";

/// What the status indicator shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub text: String,
    pub badge: &'static str,
    pub tone: Tone,
}

pub fn indicator(snapshot: &PortSnapshot) -> Indicator {
    let with_speed = |base: &str| match snapshot.speed_mbps {
        Some(mbps) => format!("{base} ({mbps} Mbps)"),
        None => base.to_owned(),
    };

    let (text, tone) = match snapshot.link {
        LinkState::Up => (with_speed("● Link Up"), Tone::LinkUp),
        LinkState::Down => ("○ Link Down".to_owned(), Tone::LinkDown),
        LinkState::BoundToOffload => (with_speed("◆ Offload Bound"), Tone::Offload),
        LinkState::Unknown => ("? Unknown".to_owned(), Tone::Unknown),
    };

    Indicator {
        text,
        badge: snapshot.status.badge(),
        tone,
    }
}

/// Tone for a present device; `None` when nothing was discovered.
pub fn device_tone(device: &ConnectedDevice) -> Option<Tone> {
    match device.kind {
        DeviceKind::Lldp => Some(Tone::Lldp),
        DeviceKind::Arp => Some(Tone::Arp),
        DeviceKind::None => None,
    }
}

/// What the connected-device child shows on one kind of target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceView {
    pub text: String,
    pub lines: Vec<String>,
    pub tone: Tone,
}

/// Cards get the label plus detail lines; selectors a single `→ label` line.
///
/// `None` when nothing was discovered.
pub fn device_view(device: &ConnectedDevice, role: TargetRole) -> Option<DeviceView> {
    let tone = device_tone(device)?;
    let label = device.label.as_deref().unwrap_or_default();
    let view = match role {
        TargetRole::StatusCard => DeviceView {
            text: label.to_owned(),
            lines: device.details.clone(),
            tone,
        },
        TargetRole::Selector => DeviceView {
            text: format!("→ {label}"),
            lines: Vec::new(),
            tone,
        },
    };
    Some(view)
}

/// `Driver: igb | PCI: 0000:03:00.0 | MAC: ...`, or nothing when no metadata exists.
pub fn tooltip(metadata: &PortMetadata) -> Option<String> {
    if metadata.is_empty() {
        return None;
    }
    Some(format!(
        "Driver: {} | PCI: {} | MAC: {}",
        metadata.driver.as_deref().unwrap_or(NOT_AVAILABLE),
        metadata.pci.as_deref().unwrap_or(NOT_AVAILABLE),
        metadata.mac.as_ref().map_or(NOT_AVAILABLE, MacAddress::as_str),
    ))
}
