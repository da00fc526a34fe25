//! MachineConfigPool CRD
//!
//! Groups nodes by label selector and records which MachineConfigs were
//! merged into the pool's rendered configuration.

use k8s_openapi::api::core::v1::ObjectReference;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// =============================================================================
// MachineConfigPool CRD
// =============================================================================

/// MachineConfigPool selects a set of nodes and the MachineConfigs applied to them.
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "machineconfiguration.openshift.io",
    version = "v1",
    kind = "MachineConfigPool",
    plural = "machineconfigpools",
    shortname = "mcp",
    namespaced = false
)]
#[serde(rename_all = "camelCase")]
pub struct MachineConfigPoolSpec {
    /// Selects the MachineConfigs merged into this pool
    #[serde(default)]
    pub machine_config_selector: Option<LabelSelector>,

    /// Selects the nodes governed by this pool
    #[serde(default)]
    pub node_selector: Option<LabelSelector>,

    /// Pause updates to the pool's nodes
    #[serde(default)]
    pub paused: bool,

    /// Target rendered configuration
    #[serde(default)]
    pub configuration: MachineConfigPoolConfiguration,
}

// =============================================================================
// Sub-Types
// =============================================================================

/// Rendered configuration of a pool and the MachineConfigs it was built from
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineConfigPoolConfiguration {
    /// Name of the rendered MachineConfig
    #[serde(default)]
    pub name: Option<String>,

    /// MachineConfigs merged into the rendered configuration, in merge order
    #[serde(default)]
    pub source: Vec<ObjectReference>,
}

impl MachineConfigPool {
    /// Names of the MachineConfigs in the pool's configuration source, in order
    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.spec
            .configuration
            .source
            .iter()
            .filter_map(|source| source.name.as_deref())
    }

    /// The pool's `matchLabels`, if it declares any
    pub fn match_labels(&self) -> Option<&std::collections::BTreeMap<String, String>> {
        self.spec
            .node_selector
            .as_ref()
            .and_then(|selector| selector.match_labels.as_ref())
    }
}
