// Port service response types
//
// Models for the port-status JSON feed. Field names drift between feed
// revisions (`name` vs `interface`, `speed` vs `link_speed`, `neighbor` vs
// `lldp_neighbor`), so fields use aliases and `#[serde(default)]` liberally.
// Values drift too (`"mac": null`, numeric tokens, `"dpdk_bound": "true"`):
// per-record fields go through the `lenient` readers, so a bad field only
// blanks itself and never fails the batch. Anything we don't model
// explicitly lands in `extra`.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Envelope shared by every port-service endpoint.
///
/// ```json
/// { "status": "success", "timestamp": 1718445000, "ports": [...] }
/// ```
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(flatten)]
    pub body: T,
}

#[derive(Debug, Default, Deserialize)]
pub struct PortsBody {
    #[serde(default, deserialize_with = "lenient::list")]
    pub ports: Option<Vec<RawPortRecord>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopologyBody {
    #[serde(default)]
    pub topology: Option<RawTopology>,
}

/// One successful status fetch: the raw records plus the feed's own timestamp.
#[derive(Debug, Clone, Default)]
pub struct PortStatusBatch {
    pub timestamp: Option<i64>,
    pub ports: Vec<RawPortRecord>,
}

// ── Port ─────────────────────────────────────────────────────────────

/// One interface as reported by the status feed.
///
/// Every field is optional at this layer. Absorbing missing or renamed
/// fields is the normalizer's job, not the deserializer's.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPortRecord {
    /// Interface name (`eno1`, `eth0`, ...). The join key for everything else.
    #[serde(default, alias = "interface", deserialize_with = "lenient::text")]
    pub name: Option<String>,
    /// Human label (`MGMT`, `LAN1`, `10G TX`).
    #[serde(default, deserialize_with = "lenient::text")]
    pub label: Option<String>,
    /// Link token: `up`, `down`, `bound_to_dpdk`, `dpdk_bound`, `unknown`, ...
    #[serde(default, deserialize_with = "lenient::text")]
    pub link: Option<String>,
    /// Driver classification token: `LINUX`, `DPDK`, `AVAIL`, `UNKNOWN`, ...
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
    /// Negotiated speed in Mbps. Number or numeric string depending on the feed.
    #[serde(default, alias = "link_speed")]
    pub speed: Option<serde_json::Value>,
    #[serde(default, alias = "neighbor", deserialize_with = "lenient::object")]
    pub lldp_neighbor: Option<RawNeighbor>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub arp_neighbors: Option<Vec<RawArpNeighbor>>,
    /// Port-level discovery method (`lldp`, `dpdk_arp_probe`, `none`).
    #[serde(default, deserialize_with = "lenient::text")]
    pub discovery_method: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub driver: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub pci: Option<String>,
    #[serde(default, alias = "mac_address", deserialize_with = "lenient::text")]
    pub mac: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub dpdk_bound: Option<bool>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Neighbor object attached to a port.
///
/// Usually an LLDP neighbor, but some feeds put an address-table hit here
/// and mark it with `discovery_method: "arp"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawNeighbor {
    #[serde(default, deserialize_with = "lenient::text")]
    pub system_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub capabilities: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub system_description: Option<String>,
    #[serde(default, alias = "mgmt_ip", deserialize_with = "lenient::text")]
    pub management_ip: Option<String>,
    #[serde(default, alias = "port_descr", alias = "port", deserialize_with = "lenient::text")]
    pub port_description: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub ip: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub mac: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub discovery_method: Option<String>,
}

/// One address-table entry seen on the port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawArpNeighbor {
    #[serde(default, deserialize_with = "lenient::text")]
    pub ip: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub mac: Option<String>,
}

// ── Lenient field readers ────────────────────────────────────────────

mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Strings pass through; numbers and booleans are rendered as text.
    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    /// `true`/`false`, `0`/`1` and their string spellings.
    pub fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Bool(b) => Some(b),
            Value::Number(n) => n.as_u64().map(|v| v != 0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        })
    }

    /// A nested object, or nothing when it has the wrong shape.
    pub fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
    }

    /// An array whose unreadable items are dropped. Not an array: nothing.
    pub fn list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .filter_map(|item| serde_json::from_value(item).ok())
                    .collect(),
            ),
            _ => None,
        })
    }
}

// ── Topology ─────────────────────────────────────────────────────────

/// Topology payload. Only counted here; rendering is somebody else's job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTopology {
    #[serde(default)]
    pub devices: Vec<serde_json::Value>,
    #[serde(default)]
    pub links: Vec<serde_json::Value>,
}

impl RawTopology {
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}
