// ── Status vocabulary normalization ──
//
// The feed has used several spellings for the same fact across revisions
// (`bound_to_dpdk` vs `dpdk_bound`, `LINUX` vs `linux`). Everything folds
// into one canonical enumeration here. Unrecognized input is a value, not
// an error.

use crate::model::{LinkState, OperationalStatus};

/// Map a raw link token and a raw status token onto the canonical axes.
///
/// Pure and total: absent or empty tokens are `Unknown` / `Unrecognized`.
pub fn normalize(link: Option<&str>, status: Option<&str>) -> (LinkState, OperationalStatus) {
    (link_state(link), operational_status(status))
}

/// Map a raw link token onto [`LinkState`].
pub fn link_state(raw: Option<&str>) -> LinkState {
    let Some(token) = canonical_token(raw) else {
        return LinkState::Unknown;
    };
    match token.as_str() {
        "up" | "yes" | "true" | "link_up" | "connected" => LinkState::Up,
        "down" | "no" | "false" | "link_down" | "disconnected" | "lowerlayerdown"
        | "notpresent" => LinkState::Down,
        "bound_to_dpdk" | "dpdk_bound" | "dpdk" | "bound" | "offload" | "bound_to_offload" => {
            LinkState::BoundToOffload
        }
        _ => LinkState::Unknown,
    }
}

/// Map a raw driver-classification token onto [`OperationalStatus`].
pub fn operational_status(raw: Option<&str>) -> OperationalStatus {
    let Some(token) = canonical_token(raw) else {
        return OperationalStatus::Unrecognized;
    };
    match token.as_str() {
        "linux" | "kernel" | "standard" => OperationalStatus::StandardManaged,
        "dpdk" | "dpdk_bound" | "offload" => OperationalStatus::OffloadBound,
        "avail" | "available" => OperationalStatus::AvailableUnconfigured,
        _ => OperationalStatus::Unrecognized,
    }
}

/// Trim, lowercase and unify separators so `Link-Up` and `link_up` compare equal.
fn canonical_token(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(
        trimmed
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect(),
    )
}
