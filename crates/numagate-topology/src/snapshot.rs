//! Per-node topology snapshot schema.
//!
//! Nodes report how their local resource manager is configured and what
//! each NUMA zone currently holds. Two configuration sources coexist: the
//! deprecated single-string legacy policy list and the preferred
//! `{name, value}` attribute list; the filter's config resolution layers
//! them (see `numagate-filter`).

use serde::{Deserialize, Serialize};

use crate::resource::ResourceList;

/// One named configuration attribute reported by a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Per-zone capacity as reported in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSpec {
    /// Zone ID; the mirrored resource manager supports IDs 0-7.
    pub id: u8,
    pub resources: ResourceList,
}

/// A node's topology snapshot, as served by the external cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologySnapshot {
    /// Deprecated combined policy strings; only the first entry is honored.
    #[serde(default)]
    pub legacy_policies: Vec<String>,
    /// Preferred configuration source, scanned in order.
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub zones: Vec<ZoneSpec>,
}
