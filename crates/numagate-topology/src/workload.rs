//! Workload and container descriptors.
//!
//! A workload is an ordered set of init containers followed by an ordered
//! set of application containers, each with its own resource requests.
//! The QoS class is derived by the host from requests/limits and consumed
//! here as given.

use serde::{Deserialize, Serialize};

use crate::resource::ResourceList;

/// Guarantee tier of a workload, derived externally from its
/// requests/limits. Affects how strictly alignment is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QosClass {
    Guaranteed,
    Burstable,
    BestEffort,
}

/// A single container and its effective resource requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub name: String,
    pub requests: ResourceList,
}

/// The workload under evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadSpec {
    pub namespace: String,
    pub name: String,
    /// Init containers run serially, before any application container.
    pub init_containers: Vec<ContainerSpec>,
    /// Application containers, in declared order.
    pub containers: Vec<ContainerSpec>,
    pub qos: QosClass,
}

impl WorkloadSpec {
    /// `namespace/name` identifier used in log fields.
    pub fn log_id(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    /// The workload's aggregate effective request: per resource, the sum
    /// over application containers or the largest single init container,
    /// whichever is greater. Init containers never run alongside the
    /// application containers, so they only raise the floor.
    pub fn effective_request(&self) -> ResourceList {
        let mut total = ResourceList::new();
        for container in &self.containers {
            for (resource, quantity) in &container.requests {
                let entry = total.entry(resource.clone()).or_default();
                *entry = *entry + *quantity;
            }
        }
        for container in &self.init_containers {
            for (resource, quantity) in &container.requests {
                let entry = total.entry(resource.clone()).or_default();
                if *quantity > *entry {
                    *entry = *quantity;
                }
            }
        }
        total
    }

    /// True when any container requests a device-plugin/extended resource.
    pub fn has_non_native_request(&self) -> bool {
        self.init_containers
            .iter()
            .chain(self.containers.iter())
            .any(|container| container.requests.keys().any(|resource| !resource.is_native()))
    }
}
