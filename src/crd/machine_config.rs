//! MachineConfig CRD
//!
//! A MachineConfig carries an Ignition document. Generated MachineConfigs
//! (e.g. `99-worker-generated-kubelet`) point back to the resource that
//! caused their creation through an owner reference.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// =============================================================================
// MachineConfig CRD
// =============================================================================

/// MachineConfig describes the configuration written to a node.
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "machineconfiguration.openshift.io",
    version = "v1",
    kind = "MachineConfig",
    plural = "machineconfigs",
    shortname = "mc",
    namespaced = false
)]
#[serde(rename_all = "camelCase")]
pub struct MachineConfigSpec {
    /// Ignition config, kept opaque
    #[serde(default)]
    pub config: Option<serde_json::Value>,

    /// Extra kernel arguments
    #[serde(default)]
    pub kernel_arguments: Vec<String>,

    /// OS image to boot
    #[serde(default, rename = "osImageURL")]
    pub os_image_url: Option<String>,

    /// Enable FIPS mode
    #[serde(default)]
    pub fips: bool,
}

// =============================================================================
// Ignition
// =============================================================================

/// The subset of an Ignition document needed to read back written files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnitionConfig {
    #[serde(default)]
    pub storage: IgnitionStorage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnitionStorage {
    #[serde(default)]
    pub files: Vec<IgnitionFile>,
}

/// A file written by Ignition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnitionFile {
    /// Absolute path on the node
    pub path: String,

    #[serde(default)]
    pub contents: IgnitionFileContents,

    #[serde(default)]
    pub mode: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnitionFileContents {
    /// Data URL holding the file contents
    #[serde(default)]
    pub source: Option<String>,
}

impl MachineConfig {
    /// Parse the embedded Ignition document
    ///
    /// A MachineConfig without a config yields an empty document.
    pub fn ignition(&self) -> Result<IgnitionConfig, serde_json::Error> {
        match &self.spec.config {
            Some(config) => IgnitionConfig::deserialize(config),
            None => Ok(IgnitionConfig::default()),
        }
    }

    /// Look up a file written by this MachineConfig
    pub fn find_file(&self, path: &str) -> Result<Option<IgnitionFile>, serde_json::Error> {
        Ok(self
            .ignition()?
            .storage
            .files
            .into_iter()
            .find(|file| file.path == path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_file() {
        let mc = MachineConfig::new(
            "99-worker-generated-kubelet",
            MachineConfigSpec {
                config: Some(serde_json::json!({
                    "ignition": { "version": "3.2.0" },
                    "storage": {
                        "files": [
                            {
                                "path": "/etc/kubernetes/kubelet.conf",
                                "contents": { "source": "data:text/plain,%7B%7D" },
                                "mode": 420
                            }
                        ]
                    }
                })),
                ..Default::default()
            },
        );

        let file = mc.find_file("/etc/kubernetes/kubelet.conf").unwrap().unwrap();
        assert_eq!(file.contents.source.as_deref(), Some("data:text/plain,%7B%7D"));
        assert_eq!(file.mode, Some(420));

        assert!(mc.find_file("/etc/motd").unwrap().is_none());
    }

    #[test]
    fn test_empty_config() {
        let mc = MachineConfig::new("00-worker", MachineConfigSpec::default());
        assert!(mc.ignition().unwrap().storage.files.is_empty());
    }

    #[test]
    fn test_malformed_ignition() {
        let mc = MachineConfig::new(
            "broken",
            MachineConfigSpec {
                config: Some(serde_json::json!({ "storage": { "files": "nope" } })),
                ..Default::default()
            },
        );
        assert!(mc.ignition().is_err());
    }
}
