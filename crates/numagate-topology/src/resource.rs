//! Resource names and kind classification.
//!
//! Native kinds (cpu, memory, ephemeral-storage, hugepages) are built into
//! the resource manager; everything else is a device-plugin/extended
//! resource carrying a `vendor.domain/name` form. The distinction drives
//! two rules in the filter: which resources may be reported only at node
//! level, and which kinds skip strict alignment at lower QoS.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::quantity::Quantity;

pub const RESOURCE_CPU: &str = "cpu";
pub const RESOURCE_MEMORY: &str = "memory";
pub const RESOURCE_EPHEMERAL_STORAGE: &str = "ephemeral-storage";
/// Hugepages resources are reported per page size, e.g. `hugepages-2Mi`.
pub const HUGEPAGES_PREFIX: &str = "hugepages-";

/// Name of a resource as reported by the node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceName(String);

/// Per-resource amounts, keyed by name. BTreeMap keeps iteration order
/// deterministic across calls, which keeps logs and tests stable.
pub type ResourceList = BTreeMap<ResourceName, Quantity>;

impl ResourceName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn cpu() -> Self {
        Self::new(RESOURCE_CPU)
    }

    pub fn memory() -> Self {
        Self::new(RESOURCE_MEMORY)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_cpu(&self) -> bool {
        self.0 == RESOURCE_CPU
    }

    pub fn is_memory(&self) -> bool {
        self.0 == RESOURCE_MEMORY
    }

    pub fn is_ephemeral_storage(&self) -> bool {
        self.0 == RESOURCE_EPHEMERAL_STORAGE
    }

    pub fn is_hugepages(&self) -> bool {
        self.0.starts_with(HUGEPAGES_PREFIX)
    }

    /// Built-in resource kinds have bare names; device-plugin and extended
    /// resources carry a vendor domain (`vendor.domain/name`).
    pub fn is_native(&self) -> bool {
        !self.0.contains('/')
    }

    /// Kinds the local manager does not align strictly for
    /// non-Guaranteed workloads: memory, hugepages, and CPU.
    pub fn is_alignment_relaxed_kind(&self) -> bool {
        self.is_memory() || self.is_hugepages() || self.is_cpu()
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ResourceName {
    fn from(name: String) -> Self {
        Self(name)
    }
}
