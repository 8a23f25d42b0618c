//! numagate-filter — NUMA-alignment node admission for cluster schedulers.
//!
//! Decides whether a candidate node can host a workload under the node's
//! local topology-manager policy. It does NOT place or score workloads;
//! the verdict is a binary admit/reject plus an advisory refresh signal
//! to the topology cache on rejection.
//!
//! # Components
//!
//! - **`config`** — policy/scope resolution from a node's topology snapshot
//! - **`numa`** — single-zone availability, the core alignment check
//! - **`socket`** — socket-granularity aggregation for restricted alignment
//! - **`filter`** — the dispatcher tying it together over a topology cache
//!
//! All mutable state is call-local: zone lists are cloned per evaluation,
//! so one [`TopologyFilter`] can be shared across scheduler worker threads
//! without locking.

pub mod config;
pub mod convert;
pub mod error;
pub mod filter;
pub mod mask;
pub mod numa;
pub mod socket;

pub use config::{
    ATTR_POLICY, ATTR_SCOPE, MAX_NUMA_ZONES, Policy, Scope, TopologyManagerConfig,
    ZONES_PER_SOCKET, is_valid_policy, is_valid_scope, resolve_config,
};
pub use convert::{numa_node_list, socket_list};
pub use error::{RejectReason, Verdict};
pub use filter::{Handler, TopologyCache, TopologyFilter, handler_for};
pub use mask::ZoneMask;
pub use numa::{NumaNode, NumaNodeList, available_in_any_zone, subtract_from_zone};
pub use socket::{Socket, available_in_any_socket, sockets_from_numa_nodes};
