//! Single-zone availability — the core alignment check.
//!
//! Mirrors the local resource manager's selection rule: a request aligns
//! only when one zone can satisfy every requested resource on its own,
//! and the manager prefers the narrowest feasible assignment, which for
//! whole-zone requests means the lowest surviving zone ID.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use numagate_topology::{Quantity, QosClass, ResourceList, ResourceName, WorkloadSpec};

use crate::error::RejectReason;
use crate::mask::ZoneMask;

/// Per-zone capacity, cloned from the snapshot for one filter call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumaNode {
    pub id: u8,
    pub resources: ResourceList,
}

/// Call-local zone list; safe to mutate during container-scope evaluation
/// because it never aliases the cached snapshot.
pub type NumaNodeList = Vec<NumaNode>;

/// Decide whether any single zone satisfies the whole request, and return
/// the zone the local manager would pick.
///
/// Feasibility is computed per resource as a zone mask and intersected
/// into a running mask; the prediction is the lowest ID surviving every
/// intersection. The intersection must not be approximated with
/// per-resource independent picks — a zone is feasible only if the *same*
/// zone ID survived for every resource.
pub fn available_in_any_zone(
    log_id: &str,
    nodes: &NumaNodeList,
    request: &ResourceList,
    qos: QosClass,
    allocatable: &ResourceList,
) -> Option<u8> {
    let mut mask = ZoneMask::full();

    for (resource, quantity) in request {
        if quantity.is_zero() {
            debug!(workload = log_id, resource = %resource, "ignoring zero-quantity request entry");
            continue;
        }

        // Every resource must be reported at node level; absence there
        // means the node does not have it at all.
        if !allocatable.contains_key(resource) {
            debug!(workload = log_id, resource = %resource, "resource missing from node allocatable");
            return None;
        }

        let mut zone_affine = false;
        let mut resource_mask = ZoneMask::empty();
        for node in nodes {
            let Some(zone_quantity) = node.resources.get(resource) else {
                continue;
            };
            zone_affine = true;
            if zone_fit(qos, resource, *quantity, *zone_quantity) {
                resource_mask = resource_mask.with(node.id);
                debug!(workload = log_id, zone = node.id, resource = %resource, "zone feasible");
            }
        }

        // Node-scoped kinds (device-plugin resources, ephemeral-storage)
        // may not expose zone affinity; the allocatable check above
        // already covered them.
        if !zone_affine && (!resource.is_native() || resource.is_ephemeral_storage()) {
            debug!(workload = log_id, resource = %resource, "no zone affinity, satisfied at node level");
            continue;
        }

        mask = mask.intersect(resource_mask);
        if mask.is_empty() {
            debug!(workload = log_id, resource = %resource, "no zone survives intersection");
            return None;
        }
    }

    mask.lowest()
}

/// Whether a zone's reported quantity satisfies one resource of the
/// request. Alignment for memory, hugepages, and CPU is not enforced
/// tightly below Guaranteed QoS, so any reporting zone fits there.
fn zone_fit(
    qos: QosClass,
    resource: &ResourceName,
    requested: Quantity,
    zone_quantity: Quantity,
) -> bool {
    if qos != QosClass::Guaranteed && resource.is_alignment_relaxed_kind() {
        return true;
    }
    zone_quantity >= requested
}

/// Pod-scope check: one evaluation against the workload's aggregate
/// effective request.
pub fn fit_pod_scope(
    workload: &WorkloadSpec,
    nodes: &NumaNodeList,
    allocatable: &ResourceList,
) -> Result<(), RejectReason> {
    let log_id = workload.log_id();
    let request = workload.effective_request();
    match available_in_any_zone(&log_id, nodes, &request, workload.qos, allocatable) {
        Some(zone) => {
            debug!(workload = %log_id, zone, "workload aligns");
            Ok(())
        }
        None => Err(RejectReason::WorkloadUnalignable),
    }
}

/// Container-scope check.
///
/// Init containers run serially and are never co-resident, so each is
/// evaluated independently with no accumulation. Application containers
/// are evaluated in declared order, and the chosen zone's capacity is
/// reduced after each admission so later containers see what is actually
/// left.
pub fn fit_container_scope(
    workload: &WorkloadSpec,
    nodes: &mut NumaNodeList,
    allocatable: &ResourceList,
) -> Result<(), RejectReason> {
    for container in &workload.init_containers {
        let log_id = format!("{}/{}", workload.log_id(), container.name);
        if available_in_any_zone(&log_id, nodes, &container.requests, workload.qos, allocatable)
            .is_none()
        {
            debug!(container = %container.name, kind = "init", "cannot align container");
            return Err(RejectReason::InitContainerUnalignable(container.name.clone()));
        }
    }

    for container in &workload.containers {
        let log_id = format!("{}/{}", workload.log_id(), container.name);
        let Some(zone) =
            available_in_any_zone(&log_id, nodes, &container.requests, workload.qos, allocatable)
        else {
            debug!(container = %container.name, kind = "app", "cannot align container");
            return Err(RejectReason::ContainerUnalignable(container.name.clone()));
        };
        subtract_from_zone(nodes, zone, &container.requests);
    }
    Ok(())
}

/// Reduce the chosen zone's capacity by an admitted container's request,
/// so the same capacity is not handed to the next container.
pub fn subtract_from_zone(nodes: &mut NumaNodeList, zone: u8, request: &ResourceList) {
    for node in nodes.iter_mut().filter(|node| node.id == zone) {
        for (resource, quantity) in request {
            let remaining = node.resources.entry(resource.clone()).or_default();
            *remaining = *remaining - *quantity;
            if remaining.is_negative() {
                // The availability check runs first, so this should be
                // unreachable; log it rather than fail the call.
                warn!(zone, resource = %resource, remaining = %remaining, "zone quantity went negative after subtraction");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numagate_topology::ContainerSpec;

    fn resources(entries: &[(&str, &str)]) -> ResourceList {
        entries
            .iter()
            .map(|(name, quantity)| (ResourceName::new(*name), quantity.parse().unwrap()))
            .collect()
    }

    fn zone(id: u8, entries: &[(&str, &str)]) -> NumaNode {
        NumaNode {
            id,
            resources: resources(entries),
        }
    }

    fn container(name: &str, entries: &[(&str, &str)]) -> ContainerSpec {
        ContainerSpec {
            name: name.to_string(),
            requests: resources(entries),
        }
    }

    fn workload(qos: QosClass, init: Vec<ContainerSpec>, app: Vec<ContainerSpec>) -> WorkloadSpec {
        WorkloadSpec {
            namespace: "default".to_string(),
            name: "web".to_string(),
            init_containers: init,
            containers: app,
            qos,
        }
    }

    #[test]
    fn picks_a_zone_with_enough_capacity() {
        let nodes = vec![zone(0, &[("cpu", "2")]), zone(1, &[("cpu", "8")])];
        let request = resources(&[("cpu", "4")]);
        let allocatable = resources(&[("cpu", "10")]);

        let picked =
            available_in_any_zone("t", &nodes, &request, QosClass::Guaranteed, &allocatable);
        assert_eq!(picked, Some(1));
    }

    #[test]
    fn prefers_the_lowest_feasible_zone() {
        let nodes = vec![
            zone(0, &[("cpu", "8")]),
            zone(1, &[("cpu", "8")]),
            zone(2, &[("cpu", "8")]),
        ];
        let request = resources(&[("cpu", "4")]);
        let allocatable = resources(&[("cpu", "24")]);

        let picked =
            available_in_any_zone("t", &nodes, &request, QosClass::Guaranteed, &allocatable);
        assert_eq!(picked, Some(0));

        // Knock zone 0 out; the pick moves to the next lowest survivor.
        let nodes = vec![
            zone(0, &[("cpu", "2")]),
            zone(1, &[("cpu", "8")]),
            zone(2, &[("cpu", "8")]),
        ];
        let picked =
            available_in_any_zone("t", &nodes, &request, QosClass::Guaranteed, &allocatable);
        assert_eq!(picked, Some(1));
    }

    #[test]
    fn rejects_resource_missing_from_allocatable() {
        // Per-zone data reports the GPU, but the node-level totals do not:
        // the node can never satisfy it.
        let nodes = vec![zone(0, &[("vendor.com/gpu", "4")])];
        let request = resources(&[("vendor.com/gpu", "1")]);
        let allocatable = resources(&[("cpu", "8")]);

        let picked =
            available_in_any_zone("t", &nodes, &request, QosClass::Guaranteed, &allocatable);
        assert_eq!(picked, None);
    }

    #[test]
    fn zero_quantity_entries_are_ignored_entirely() {
        // Zero-quantity requests never reject, even for resources the
        // node does not report at all.
        let nodes = vec![zone(0, &[("cpu", "4")])];
        let request = resources(&[("cpu", "2"), ("vendor.com/gpu", "0")]);
        let allocatable = resources(&[("cpu", "8")]);

        let picked =
            available_in_any_zone("t", &nodes, &request, QosClass::Guaranteed, &allocatable);
        assert_eq!(picked, Some(0));
    }

    #[test]
    fn intersection_requires_one_zone_to_fit_everything() {
        // Zone 0 fits the cpu, zone 1 fits the memory, neither fits both.
        let nodes = vec![
            zone(0, &[("cpu", "8"), ("memory", "1Gi")]),
            zone(1, &[("cpu", "1"), ("memory", "16Gi")]),
        ];
        let request = resources(&[("cpu", "4"), ("memory", "8Gi")]);
        let allocatable = resources(&[("cpu", "16"), ("memory", "32Gi")]);

        let picked =
            available_in_any_zone("t", &nodes, &request, QosClass::Guaranteed, &allocatable);
        assert_eq!(picked, None);
    }

    #[test]
    fn burstable_relaxes_cpu_and_memory_alignment() {
        let nodes = vec![zone(0, &[("cpu", "1"), ("memory", "1Gi")])];
        let request = resources(&[("cpu", "4"), ("memory", "8Gi")]);
        let allocatable = resources(&[("cpu", "16"), ("memory", "32Gi")]);

        let guaranteed =
            available_in_any_zone("t", &nodes, &request, QosClass::Guaranteed, &allocatable);
        assert_eq!(guaranteed, None);

        let burstable =
            available_in_any_zone("t", &nodes, &request, QosClass::Burstable, &allocatable);
        assert_eq!(burstable, Some(0));
    }

    #[test]
    fn relaxation_does_not_extend_to_device_resources() {
        let nodes = vec![zone(0, &[("vendor.com/gpu", "1")])];
        let request = resources(&[("vendor.com/gpu", "2")]);
        let allocatable = resources(&[("vendor.com/gpu", "2")]);

        let picked =
            available_in_any_zone("t", &nodes, &request, QosClass::Burstable, &allocatable);
        assert_eq!(picked, None);
    }

    #[test]
    fn node_level_resources_do_not_need_zone_affinity() {
        // No zone reports the device or ephemeral-storage, but the node
        // allocatable covers them; both are acceptable as node-scoped.
        let nodes = vec![zone(0, &[("cpu", "4")])];
        let request = resources(&[
            ("cpu", "2"),
            ("ephemeral-storage", "10Gi"),
            ("vendor.com/gpu", "1"),
        ]);
        let allocatable = resources(&[
            ("cpu", "8"),
            ("ephemeral-storage", "100Gi"),
            ("vendor.com/gpu", "2"),
        ]);

        let picked =
            available_in_any_zone("t", &nodes, &request, QosClass::Guaranteed, &allocatable);
        assert_eq!(picked, Some(0));
    }

    #[test]
    fn native_zone_scoped_resource_without_affinity_rejects() {
        // Memory is a zone-scoped native kind; if no zone reports it, the
        // request cannot align.
        let nodes = vec![zone(0, &[("cpu", "4")])];
        let request = resources(&[("cpu", "2"), ("memory", "1Gi")]);
        let allocatable = resources(&[("cpu", "8"), ("memory", "32Gi")]);

        let picked =
            available_in_any_zone("t", &nodes, &request, QosClass::Guaranteed, &allocatable);
        assert_eq!(picked, None);
    }

    #[test]
    fn subtract_reduces_only_the_chosen_zone() {
        let mut nodes = vec![zone(0, &[("cpu", "4")]), zone(1, &[("cpu", "4")])];
        subtract_from_zone(&mut nodes, 0, &resources(&[("cpu", "3")]));

        assert_eq!(nodes[0].resources[&ResourceName::cpu()], Quantity::from_units(1));
        assert_eq!(nodes[1].resources[&ResourceName::cpu()], Quantity::from_units(4));
    }

    #[test]
    fn subtract_records_unreported_resources_as_negative() {
        let mut nodes = vec![zone(0, &[("cpu", "4")])];
        subtract_from_zone(&mut nodes, 0, &resources(&[("vendor.com/gpu", "1")]));

        let left = nodes[0].resources[&ResourceName::new("vendor.com/gpu")];
        assert!(left.is_negative());
    }

    #[test]
    fn app_containers_accumulate_against_the_zone() {
        // One zone with 4 CPU: 2 + 2 fits, a further 1 does not.
        let allocatable = resources(&[("cpu", "8")]);

        let mut nodes = vec![zone(0, &[("cpu", "4")])];
        let two = workload(
            QosClass::Guaranteed,
            vec![],
            vec![container("a", &[("cpu", "2")]), container("b", &[("cpu", "2")])],
        );
        assert_eq!(fit_container_scope(&two, &mut nodes, &allocatable), Ok(()));
        assert_eq!(nodes[0].resources[&ResourceName::cpu()], Quantity::ZERO);

        let mut nodes = vec![zone(0, &[("cpu", "4")])];
        let three = workload(
            QosClass::Guaranteed,
            vec![],
            vec![
                container("a", &[("cpu", "2")]),
                container("b", &[("cpu", "2")]),
                container("c", &[("cpu", "1")]),
            ],
        );
        assert_eq!(
            fit_container_scope(&three, &mut nodes, &allocatable),
            Err(RejectReason::ContainerUnalignable("c".to_string()))
        );
    }

    #[test]
    fn init_containers_never_accumulate() {
        // Two init containers each need the whole zone; both pass because
        // they run serially, never together.
        let allocatable = resources(&[("cpu", "8")]);
        let mut nodes = vec![zone(0, &[("cpu", "4")])];
        let spec = workload(
            QosClass::Guaranteed,
            vec![container("i1", &[("cpu", "4")]), container("i2", &[("cpu", "4")])],
            vec![],
        );
        assert_eq!(fit_container_scope(&spec, &mut nodes, &allocatable), Ok(()));
        // And nothing was subtracted for them.
        assert_eq!(nodes[0].resources[&ResourceName::cpu()], Quantity::from_units(4));
    }

    #[test]
    fn init_container_failure_is_reported_distinctly() {
        let allocatable = resources(&[("cpu", "8")]);
        let mut nodes = vec![zone(0, &[("cpu", "2")])];
        let spec = workload(
            QosClass::Guaranteed,
            vec![container("setup", &[("cpu", "4")])],
            vec![container("a", &[("cpu", "1")])],
        );
        assert_eq!(
            fit_container_scope(&spec, &mut nodes, &allocatable),
            Err(RejectReason::InitContainerUnalignable("setup".to_string()))
        );
    }

    #[test]
    fn pod_scope_uses_the_aggregate_request() {
        let allocatable = resources(&[("cpu", "8"), ("memory", "32Gi")]);
        let nodes = vec![zone(0, &[("cpu", "4"), ("memory", "8Gi")])];

        let fits = workload(
            QosClass::Guaranteed,
            vec![],
            vec![container("a", &[("cpu", "2"), ("memory", "2Gi")])],
        );
        assert_eq!(fit_pod_scope(&fits, &nodes, &allocatable), Ok(()));

        // Two containers summing past the zone reject at pod scope even
        // though each alone would fit.
        let too_big = workload(
            QosClass::Guaranteed,
            vec![],
            vec![
                container("a", &[("cpu", "3")]),
                container("b", &[("cpu", "3")]),
            ],
        );
        assert_eq!(
            fit_pod_scope(&too_big, &nodes, &allocatable),
            Err(RejectReason::WorkloadUnalignable)
        );
    }

    #[test]
    fn empty_request_aligns_trivially() {
        let nodes = vec![zone(0, &[("cpu", "4")])];
        let picked = available_in_any_zone(
            "t",
            &nodes,
            &ResourceList::new(),
            QosClass::Guaranteed,
            &ResourceList::new(),
        );
        assert_eq!(picked, Some(0));
    }
}
