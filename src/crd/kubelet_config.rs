//! KubeletConfig CRD
//!
//! A user-authored kubelet customisation. Applying one makes the
//! machine-config-operator generate a `99-<pool>-generated-kubelet[N]`
//! MachineConfig owned by it.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind recorded in owner references of generated MachineConfigs
pub const KUBELET_CONFIG_KIND: &str = "KubeletConfig";

// =============================================================================
// KubeletConfig CRD
// =============================================================================

/// KubeletConfig customises the kubelet of the pools it selects.
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "machineconfiguration.openshift.io",
    version = "v1",
    kind = "KubeletConfig",
    plural = "kubeletconfigs",
    namespaced = false
)]
#[serde(rename_all = "camelCase")]
pub struct KubeletConfigSpec {
    /// Reserve system resources automatically based on node size
    #[serde(default)]
    pub auto_sizing_reserved: Option<bool>,

    /// Kubelet log verbosity
    #[serde(default)]
    pub log_level: Option<i32>,

    /// Pools this KubeletConfig applies to
    #[serde(default)]
    pub machine_config_pool_selector: Option<LabelSelector>,

    /// Raw kubelet configuration fields
    #[serde(default)]
    pub kubelet_config: Option<serde_json::Value>,
}
