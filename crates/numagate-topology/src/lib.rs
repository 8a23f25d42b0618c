//! numagate-topology — data model for the numagate admission filter.
//!
//! Plain, serializable types describing what the filter consumes:
//!
//! - **`quantity`** — fixed-point resource amounts and their string forms
//! - **`resource`** — resource names and kind classification
//! - **`workload`** — container/workload descriptors and QoS class
//! - **`node`** — the candidate node's allocatable view
//! - **`snapshot`** — the per-node topology snapshot schema
//!
//! Nothing here holds cross-call state; snapshots and workload specs are
//! value types the filter clones freely.

pub mod error;
pub mod node;
pub mod quantity;
pub mod resource;
pub mod snapshot;
pub mod workload;

pub use error::{ParseError, ParseResult};
pub use node::NodeCandidate;
pub use quantity::Quantity;
pub use resource::{ResourceList, ResourceName};
pub use snapshot::{Attribute, TopologySnapshot, ZoneSpec};
pub use workload::{ContainerSpec, QosClass, WorkloadSpec};
