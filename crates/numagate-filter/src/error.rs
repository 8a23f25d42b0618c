//! Verdicts and the rejection taxonomy.

use thiserror::Error;

/// Why a node was rejected for a workload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The topology cache could not produce a usable snapshot, so
    /// alignment cannot be verified.
    #[error("invalid node topology data")]
    InvalidTopologyData,

    #[error("cannot align init container {0}")]
    InitContainerUnalignable(String),

    #[error("cannot align container {0}")]
    ContainerUnalignable(String),

    #[error("cannot align workload to any NUMA zone")]
    WorkloadUnalignable,

    #[error("cannot align workload resources at socket granularity")]
    SocketUnalignable,
}

/// Outcome of one filter call for one candidate node.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Verdict {
    /// The node may host the workload.
    Admit,
    /// The node cannot host the workload as currently reported.
    Reject(RejectReason),
    /// Caller contract violation; fatal to the call and distinct from
    /// rejection.
    InternalError(String),
}

impl Verdict {
    pub fn is_admit(&self) -> bool {
        matches!(self, Self::Admit)
    }
}
