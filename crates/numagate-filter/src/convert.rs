//! Snapshot → engine-type conversions.
//!
//! Zone state is cloned per filter call so container-scope subtraction
//! never touches the cached snapshot or a concurrent evaluation.

use tracing::warn;

use numagate_topology::TopologySnapshot;

use crate::config::MAX_NUMA_ZONES;
use crate::numa::{NumaNode, NumaNodeList};
use crate::socket::{Socket, sockets_from_numa_nodes};

/// Build a call-local zone list from a snapshot. Zone IDs beyond the
/// supported range cannot come from the mirrored resource manager and
/// are skipped.
pub fn numa_node_list(snapshot: &TopologySnapshot) -> NumaNodeList {
    let mut nodes = Vec::with_capacity(snapshot.zones.len());
    for zone in &snapshot.zones {
        if (zone.id as usize) >= MAX_NUMA_ZONES {
            warn!(zone = zone.id, "zone ID beyond supported range, skipping");
            continue;
        }
        nodes.push(NumaNode {
            id: zone.id,
            resources: zone.resources.clone(),
        });
    }
    nodes
}

/// Build the call-local socket list for a snapshot.
pub fn socket_list(snapshot: &TopologySnapshot) -> Vec<Socket> {
    sockets_from_numa_nodes(&numa_node_list(snapshot))
}
