//! The admission filter entry point.
//!
//! Resolves the node's alignment policy and scope, picks a handler from a
//! static dispatch table, runs it against call-local zone state, and
//! reports the verdict. On rejection the topology cache is told the
//! node's reported capacity may be stale so it can schedule a refresh.

use tracing::{debug, warn};

use numagate_topology::{NodeCandidate, QosClass, TopologySnapshot, WorkloadSpec};

use crate::config::{Policy, Scope, TopologyManagerConfig, resolve_config};
use crate::convert::{numa_node_list, socket_list};
use crate::error::{RejectReason, Verdict};
use crate::numa::{fit_container_scope, fit_pod_scope};
use crate::socket::fit_socket_scope;

/// The external topology-snapshot cache, as seen by the filter.
///
/// `fetch_snapshot` returns a copy the filter may freely consume:
/// `Ok(None)` means the node does not report topology (nothing to
/// enforce); an error means the cached data cannot be trusted for this
/// workload right now. Concurrency and refresh discipline are entirely
/// the cache's responsibility.
pub trait TopologyCache {
    fn fetch_snapshot(
        &self,
        node_name: &str,
        workload: &WorkloadSpec,
    ) -> anyhow::Result<Option<TopologySnapshot>>;

    /// Advisory, fire-and-forget: a rejection suggests the node's
    /// reported capacity may be over-reserved and worth refreshing.
    fn notify_maybe_over_reserved(&self, node_name: &str, workload: &WorkloadSpec);
}

/// Hosts typically share one cache between the filter and the rest of
/// the scheduler.
impl<T: TopologyCache + ?Sized> TopologyCache for std::sync::Arc<T> {
    fn fetch_snapshot(
        &self,
        node_name: &str,
        workload: &WorkloadSpec,
    ) -> anyhow::Result<Option<TopologySnapshot>> {
        (**self).fetch_snapshot(node_name, workload)
    }

    fn notify_maybe_over_reserved(&self, node_name: &str, workload: &WorkloadSpec) {
        (**self).notify_maybe_over_reserved(node_name, workload)
    }
}

/// Which availability check a resolved config selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    SingleNumaPod,
    SingleNumaContainer,
    SocketPod,
}

/// Static dispatch table keyed by resolved `(policy, scope)`.
///
/// `None` means alignment is irrelevant for this node and the workload
/// is admitted without a topology check.
pub fn handler_for(config: &TopologyManagerConfig) -> Option<Handler> {
    match (config.policy, config.scope) {
        (Policy::Restricted, scope) => {
            if scope == Scope::Container {
                debug!("container scope is not modeled for restricted alignment, using pod scope");
            }
            Some(Handler::SocketPod)
        }
        (Policy::SingleNumaNode, Scope::Pod) => Some(Handler::SingleNumaPod),
        (Policy::SingleNumaNode, Scope::Container) => Some(Handler::SingleNumaContainer),
        (Policy::None | Policy::BestEffort, _) => None,
    }
}

/// NUMA-alignment admission filter over a topology cache.
///
/// Stateless between calls; share one instance across scheduler worker
/// threads (`Send + Sync` when the cache is).
pub struct TopologyFilter<C> {
    cache: C,
}

impl<C: TopologyCache> TopologyFilter<C> {
    pub fn new(cache: C) -> Self {
        Self { cache }
    }

    /// Evaluate one candidate node for one workload.
    ///
    /// `node` is `None` when the host failed to resolve the candidate;
    /// that is a caller contract violation, not a rejection.
    pub fn filter(&self, workload: &WorkloadSpec, node: Option<&NodeCandidate>) -> Verdict {
        let Some(node) = node else {
            return Verdict::InternalError("node not found".to_string());
        };

        // Best-effort workloads without device-plugin resources have no
        // alignment constraint to violate.
        if workload.qos == QosClass::BestEffort && !workload.has_non_native_request() {
            return Verdict::Admit;
        }

        let snapshot = match self.cache.fetch_snapshot(&node.name, workload) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                debug!(node = %node.name, "node reports no topology, admitting");
                return Verdict::Admit;
            }
            Err(error) => {
                warn!(node = %node.name, %error, "topology snapshot unavailable");
                return Verdict::Reject(RejectReason::InvalidTopologyData);
            }
        };

        let config = resolve_config(&snapshot);
        let Some(handler) = handler_for(&config) else {
            return Verdict::Admit;
        };
        debug!(
            node = %node.name,
            workload = %workload.log_id(),
            policy = config.policy.as_str(),
            scope = config.scope.as_str(),
            ?handler,
            "running alignment check"
        );

        let outcome = match handler {
            Handler::SingleNumaPod => {
                fit_pod_scope(workload, &numa_node_list(&snapshot), &node.allocatable)
            }
            Handler::SingleNumaContainer => {
                let mut nodes = numa_node_list(&snapshot);
                fit_container_scope(workload, &mut nodes, &node.allocatable)
            }
            Handler::SocketPod => {
                fit_socket_scope(workload, &socket_list(&snapshot), &node.allocatable)
            }
        };

        match outcome {
            Ok(()) => Verdict::Admit,
            Err(reason) => {
                debug!(node = %node.name, workload = %workload.log_id(), %reason, "rejecting node");
                self.cache.notify_maybe_over_reserved(&node.name, workload);
                Verdict::Reject(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(policy: Policy, scope: Scope) -> TopologyManagerConfig {
        TopologyManagerConfig { policy, scope }
    }

    #[test]
    fn none_and_best_effort_have_no_handler() {
        for scope in [Scope::Container, Scope::Pod] {
            assert_eq!(handler_for(&config(Policy::None, scope)), None);
            assert_eq!(handler_for(&config(Policy::BestEffort, scope)), None);
        }
    }

    #[test]
    fn restricted_always_dispatches_to_socket_pod() {
        assert_eq!(
            handler_for(&config(Policy::Restricted, Scope::Pod)),
            Some(Handler::SocketPod)
        );
        // Container scope is not modeled at socket granularity; it
        // downgrades to the pod-scope handler.
        assert_eq!(
            handler_for(&config(Policy::Restricted, Scope::Container)),
            Some(Handler::SocketPod)
        );
    }

    #[test]
    fn single_numa_node_splits_by_scope() {
        assert_eq!(
            handler_for(&config(Policy::SingleNumaNode, Scope::Pod)),
            Some(Handler::SingleNumaPod)
        );
        assert_eq!(
            handler_for(&config(Policy::SingleNumaNode, Scope::Container)),
            Some(Handler::SingleNumaContainer)
        );
    }

    #[test]
    fn default_config_admits_unconditionally() {
        assert_eq!(handler_for(&TopologyManagerConfig::default()), None);
    }
}
