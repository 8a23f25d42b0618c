//! Socket-level aggregation for the restricted alignment policy.
//!
//! Restricted alignment is accepted at socket rather than zone
//! granularity: zones are grouped into sockets by a fixed mapping and
//! each requested resource must fit inside some socket's aggregate —
//! not necessarily the same socket across resources.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use numagate_topology::{ResourceList, WorkloadSpec};

use crate::config::ZONES_PER_SOCKET;
use crate::error::RejectReason;
use crate::numa::NumaNodeList;

/// A physical socket: its member zones and their aggregated capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Socket {
    pub id: u8,
    pub numa_ids: Vec<u8>,
    pub resources: ResourceList,
}

/// Group zones into sockets using the fixed mapping
/// `socket = zone / ZONES_PER_SOCKET`, summing per-resource quantities
/// across member zones.
pub fn sockets_from_numa_nodes(nodes: &NumaNodeList) -> Vec<Socket> {
    let mut sockets: BTreeMap<u8, Socket> = BTreeMap::new();
    for node in nodes {
        let id = node.id / ZONES_PER_SOCKET;
        let socket = sockets.entry(id).or_insert_with(|| Socket {
            id,
            numa_ids: Vec::new(),
            resources: ResourceList::new(),
        });
        socket.numa_ids.push(node.id);
        for (resource, quantity) in &node.resources {
            let total = socket.resources.entry(resource.clone()).or_default();
            *total = *total + *quantity;
        }
    }
    sockets.into_values().collect()
}

/// True when every requested resource fits inside at least one socket's
/// aggregate. Memory carries no socket-level figure in zone reports and
/// is skipped.
pub fn available_in_any_socket(
    log_id: &str,
    sockets: &[Socket],
    request: &ResourceList,
    allocatable: &ResourceList,
) -> bool {
    for (resource, quantity) in request {
        if resource.is_memory() {
            debug!(workload = log_id, "skipping memory at socket granularity");
            continue;
        }
        if quantity.is_zero() {
            debug!(workload = log_id, resource = %resource, "ignoring zero-quantity request entry");
            continue;
        }
        if !allocatable.contains_key(resource) {
            debug!(workload = log_id, resource = %resource, "resource missing from node allocatable");
            return false;
        }
        let fits = sockets.iter().any(|socket| {
            socket
                .resources
                .get(resource)
                .is_some_and(|have| *have >= *quantity)
        });
        if !fits {
            debug!(workload = log_id, resource = %resource, "no socket aggregate satisfies request");
            return false;
        }
    }
    true
}

/// Socket-scope check against the workload's aggregate effective request.
pub fn fit_socket_scope(
    workload: &WorkloadSpec,
    sockets: &[Socket],
    allocatable: &ResourceList,
) -> Result<(), RejectReason> {
    let request = workload.effective_request();
    if available_in_any_socket(&workload.log_id(), sockets, &request, allocatable) {
        Ok(())
    } else {
        Err(RejectReason::SocketUnalignable)
    }
}
