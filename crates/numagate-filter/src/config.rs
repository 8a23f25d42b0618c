//! Topology-manager policy and scope resolution.
//!
//! A node reports how its local resource manager enforces alignment in two
//! places: a deprecated single-string legacy policy list and the preferred
//! `{name, value}` attribute list. Resolution starts from defaults,
//! applies the first legacy entry, then lets valid attributes override.
//! The config is recomputed fresh on every filter call from the snapshot
//! copy; it is never cached or mutated in place afterwards.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use numagate_topology::{Attribute, TopologySnapshot};

/// Attribute name carrying the alignment scope.
pub const ATTR_SCOPE: &str = "scope";
/// Attribute name carrying the alignment policy.
pub const ATTR_POLICY: &str = "policy";
/// The mirrored resource manager supports at most 8 NUMA zones (IDs 0-7).
pub const MAX_NUMA_ZONES: usize = 8;
/// Fixed zone grouping: consecutive zone IDs share a socket.
pub const ZONES_PER_SOCKET: u8 = 2;

/// Granularity at which the local manager aligns resources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    #[default]
    Container,
    Pod,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Pod => "pod",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "container" => Some(Self::Container),
            "pod" => Some(Self::Pod),
            _ => None,
        }
    }
}

/// Alignment strictness of the local manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    #[default]
    None,
    BestEffort,
    Restricted,
    SingleNumaNode,
}

impl Policy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::BestEffort => "best-effort",
            Self::Restricted => "restricted",
            Self::SingleNumaNode => "single-numa-node",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::None),
            "best-effort" => Some(Self::BestEffort),
            "restricted" => Some(Self::Restricted),
            "single-numa-node" => Some(Self::SingleNumaNode),
            _ => None,
        }
    }
}

/// Pure membership test against the known scope values.
pub fn is_valid_scope(value: &str) -> bool {
    Scope::parse(value).is_some()
}

/// Pure membership test against the known policy values.
pub fn is_valid_policy(value: &str) -> bool {
    Policy::parse(value).is_some()
}

/// Fully resolved alignment configuration for one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TopologyManagerConfig {
    pub scope: Scope,
    pub policy: Policy,
}

/// Resolve the effective config from a snapshot: defaults, then the legacy
/// policy list, then attribute overrides.
pub fn resolve_config(snapshot: &TopologySnapshot) -> TopologyManagerConfig {
    let mut config = TopologyManagerConfig::default();
    apply_legacy_policies(&mut config, &snapshot.legacy_policies);
    apply_attributes(&mut config, &snapshot.attributes);
    config
}

fn apply_legacy_policies(config: &mut TopologyManagerConfig, policies: &[String]) {
    let Some(first) = policies.first() else {
        debug!("no legacy policy entries, keeping defaults");
        return;
    };
    if policies.len() > 1 {
        debug!(ignored = policies.len() - 1, "ignoring extra legacy policy entries");
    }
    warn!("the legacy policy list is deprecated, prefer the scope/policy attributes");

    let (policy, scope) = match first.as_str() {
        "single-numa-node/pod" => (Policy::SingleNumaNode, Scope::Pod),
        "single-numa-node/container" => (Policy::SingleNumaNode, Scope::Container),
        "best-effort/pod" => (Policy::BestEffort, Scope::Pod),
        "best-effort/container" => (Policy::BestEffort, Scope::Container),
        "restricted/pod" => (Policy::Restricted, Scope::Pod),
        "restricted/container" => (Policy::Restricted, Scope::Container),
        other => {
            debug!(value = other, "unrecognized legacy policy, keeping defaults");
            return;
        }
    };
    config.policy = policy;
    config.scope = scope;
}

fn apply_attributes(config: &mut TopologyManagerConfig, attributes: &[Attribute]) {
    for attribute in attributes {
        match attribute.name.as_str() {
            ATTR_SCOPE => match Scope::parse(&attribute.value) {
                Some(scope) => config.scope = scope,
                None => debug!(value = %attribute.value, "ignoring invalid scope attribute"),
            },
            ATTR_POLICY => match Policy::parse(&attribute.value) {
                Some(policy) => config.policy = policy,
                None => debug!(value = %attribute.value, "ignoring invalid policy attribute"),
            },
            _ => {}
        }
    }
}
