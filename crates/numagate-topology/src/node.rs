//! Candidate node view.

use serde::{Deserialize, Serialize};

use crate::resource::ResourceList;

/// The scheduler's view of a candidate machine: its identity and the
/// node-level allocatable totals, independent of any per-zone breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeCandidate {
    pub name: String,
    pub allocatable: ResourceList,
}
