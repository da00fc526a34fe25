//! KubeletConfig helpers
//!
//! Every KubeletConfig applied to a pool makes the machine-config-operator
//! generate a MachineConfig named `99-<pool>-generated-kubelet`, then
//! `...-kubelet-1`, `...-kubelet-2` and so on for further KubeletConfigs.
//! The helpers here find the latest of those, walk back to the owning
//! KubeletConfig and check whether its payload made it into the rendered
//! `/etc/kubernetes/kubelet.conf`.

use crate::crd::{KubeletConfig, MachineConfig, MachineConfigPool, KUBELET_CONFIG_KIND};
use crate::domain::ports::ResourceGetter;
use crate::error::{Error, Result};
use crate::nodeutils::payload::decode_data_url;
use kube::{Resource, ResourceExt};
use serde_json::value::RawValue;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Name prefix of MachineConfigs that sort after every built-in one
pub const GENERATED_MACHINE_CONFIG_PREFIX: &str = "99-";

/// Marker contained in the names of KubeletConfig-generated MachineConfigs
pub const GENERATED_KUBELET: &str = "generated-kubelet";

/// Suffix of the first, un-numbered generated MachineConfig
pub const GENERATED_KUBELET_SUFFIX: &str = "kubelet";

/// Path of the kubelet configuration file written by MachineConfigs
pub const KUBELET_CONF_PATH: &str = "/etc/kubernetes/kubelet.conf";

/// KubeletConfig fields that end up in `/etc/node-sizing-enabled.env`
/// rather than in the kubelet configuration file
pub const NODE_SIZING_FIELDS: [&str; 2] = ["autoSizingReserved", "systemReserved"];

// =============================================================================
// Generated MachineConfig Enumeration
// =============================================================================

/// Name of the newest KubeletConfig-generated MachineConfig in the pool
///
/// The un-numbered name counts as ordinal 0 when it is the first candidate;
/// later candidates are ranked by their last character. `Ok(None)` means the
/// pool uses no custom KubeletConfig.
pub fn latest_generated_kubelet_config(pool: &MachineConfigPool) -> Result<Option<String>> {
    let mut latest: Option<(u32, &str)> = None;

    for name in pool.source_names() {
        if !name.starts_with(GENERATED_MACHINE_CONFIG_PREFIX) || !name.contains(GENERATED_KUBELET)
        {
            continue;
        }

        if latest.is_none() && name.ends_with(GENERATED_KUBELET_SUFFIX) {
            latest = Some((0, name));
            continue;
        }

        let ordinal = last_char(name)
            .parse::<u32>()
            .map_err(|source| Error::OrdinalParse {
                name: name.to_string(),
                source,
            })?;

        if latest.map_or(true, |(max, _)| ordinal > max) {
            latest = Some((ordinal, name));
        }
    }

    if let Some((ordinal, name)) = latest {
        debug!(
            "Pool {} uses generated kubelet MachineConfig {} (ordinal {})",
            pool.name_any(),
            name,
            ordinal
        );
    }

    Ok(latest.map(|(_, name)| name.to_string()))
}

fn last_char(name: &str) -> &str {
    match name.char_indices().last() {
        Some((idx, _)) => &name[idx..],
        None => name,
    }
}

// =============================================================================
// Owner Resolution
// =============================================================================

/// Fetch the KubeletConfig a generated MachineConfig was created from
///
/// Generated MachineConfigs have a single owner. Only the first owner
/// reference is consulted and it must be a KubeletConfig.
pub async fn kubelet_config_owner<C>(
    machine_config: Option<&MachineConfig>,
    client: &C,
) -> Result<KubeletConfig>
where
    C: ResourceGetter,
{
    let mc = machine_config
        .ok_or_else(|| Error::InvalidArgument("machine config is nil".into()))?;

    let owner = match mc.owner_references().first() {
        Some(owner) if owner.kind == KUBELET_CONFIG_KIND => owner,
        other => {
            if let Some(owner) = other {
                debug!(
                    "MachineConfig {} is owned by {} {}, not a {}",
                    mc.name_any(),
                    owner.kind,
                    owner.name,
                    KUBELET_CONFIG_KIND
                );
            }
            return Err(Error::OwnerNotFound {
                kind: KUBELET_CONFIG_KIND.to_string(),
                resource: mc.name_any(),
            });
        }
    };

    debug!(
        "Fetching {} {} owning {}",
        KUBELET_CONFIG_KIND,
        owner.name,
        mc.name_any()
    );

    client
        .get::<KubeletConfig>(&owner.name)
        .await
        .map_err(|source| Error::FetchFailed {
            kind: KubeletConfig::kind(&()).into_owned(),
            name: owner.name.clone(),
            source,
        })
}

/// KubeletConfig currently applied to the pool, if any
///
/// Combines [`latest_generated_kubelet_config`] and [`kubelet_config_owner`].
pub async fn current_kubelet_config_for_pool<C>(
    pool: &MachineConfigPool,
    client: &C,
) -> Result<Option<(MachineConfig, KubeletConfig)>>
where
    C: ResourceGetter,
{
    let Some(mc_name) = latest_generated_kubelet_config(pool)? else {
        debug!("Pool {} uses no custom KubeletConfig", pool.name_any());
        return Ok(None);
    };

    let mc = client
        .get::<MachineConfig>(&mc_name)
        .await
        .map_err(|source| Error::FetchFailed {
            kind: MachineConfig::kind(&()).into_owned(),
            name: mc_name.clone(),
            source,
        })?;

    let kc = kubelet_config_owner(Some(&mc), client).await?;
    Ok(Some((mc, kc)))
}

// =============================================================================
// Payload Comparison
// =============================================================================

/// Remove the node sizing parameters from a serialized KubeletConfig payload
///
/// These are KubeletConfig parameters but are written to
/// `/etc/node-sizing-enabled.env`, never to the kubelet configuration file.
/// The remaining values are passed through verbatim.
pub fn strip_node_sizing_fields(payload: &[u8]) -> Result<Vec<u8>> {
    let mut data: BTreeMap<String, Box<RawValue>> =
        serde_json::from_slice(payload).map_err(Error::PayloadDecode)?;

    for key in NODE_SIZING_FIELDS {
        data.remove(key);
    }

    serde_json::to_vec(&data).map_err(Error::PayloadEncode)
}

/// Decoded `/etc/kubernetes/kubelet.conf` written by a MachineConfig
pub fn rendered_kubelet_config(mc: &MachineConfig) -> Result<Option<Vec<u8>>> {
    let file = mc.find_file(KUBELET_CONF_PATH).map_err(|e| {
        Error::InvalidArgument(format!(
            "machine config {} has malformed ignition: {}",
            mc.name_any(),
            e
        ))
    })?;

    match file.and_then(|file| file.contents.source) {
        Some(source) => decode_data_url(&source).map(Some),
        None => Ok(None),
    }
}

/// Whether every kubelet setting of the KubeletConfig is rendered into the MachineConfig
///
/// Node sizing fields are ignored. Top-level values are compared for equality.
pub fn kubelet_config_rendered(kc: &KubeletConfig, mc: &MachineConfig) -> Result<bool> {
    let Some(expected) = &kc.spec.kubelet_config else {
        return Ok(true);
    };
    let Some(rendered) = rendered_kubelet_config(mc)? else {
        debug!("MachineConfig {} does not write {}", mc.name_any(), KUBELET_CONF_PATH);
        return Ok(false);
    };

    let payload = serde_json::to_vec(expected).map_err(Error::PayloadEncode)?;
    let stripped = strip_node_sizing_fields(&payload)?;
    let expected: Map<String, Value> =
        serde_json::from_slice(&stripped).map_err(Error::PayloadDecode)?;

    // kubelet.conf is JSON on current releases, YAML on older ones
    let rendered: Map<String, Value> = match serde_json::from_slice(&rendered) {
        Ok(rendered) => rendered,
        Err(_) => serde_yaml::from_slice(&rendered)?,
    };

    let missing: Vec<&str> = expected
        .iter()
        .filter(|(key, value)| rendered.get(key.as_str()) != Some(*value))
        .map(|(key, _)| key.as_str())
        .collect();

    if !missing.is_empty() {
        debug!(
            "KubeletConfig {} not rendered into {}: differing keys {:?}",
            kc.name_any(),
            mc.name_any(),
            missing
        );
    }

    Ok(missing.is_empty())
}
