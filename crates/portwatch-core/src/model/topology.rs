// ── Topology summary ──
//
// The topology feed is rendered elsewhere; the monitor only counts it.

use serde::{Deserialize, Serialize};

use portwatch_api::RawTopology;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologySummary {
    pub devices: usize,
    pub links: usize,
    pub lldp_links: usize,
    pub arp_links: usize,
}

impl From<&RawTopology> for TopologySummary {
    fn from(raw: &RawTopology) -> Self {
        let link_type = |link: &serde_json::Value| {
            link.get("type")
                .and_then(serde_json::Value::as_str)
                .map(str::to_ascii_lowercase)
        };
        let count_type = |wanted: &str| {
            raw.links
                .iter()
                .filter(|l| link_type(l).as_deref() == Some(wanted))
                .count()
        };
        Self {
            devices: raw.device_count(),
            links: raw.link_count(),
            lldp_links: count_type("lldp"),
            arp_links: count_type("arp"),
        }
    }
}
