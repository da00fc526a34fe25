//! MachineConfigPool matching
//!
//! A scan's node selector matches a pool only when it equals the pool's
//! `matchLabels` exactly. `matchExpressions` are not evaluated.

use crate::crd::MachineConfigPool;
use std::collections::BTreeMap;

/// Whether the node selector equals the pool's `matchLabels`
///
/// An empty selector on either side never matches.
pub fn pool_selector_matches(
    node_selector: &BTreeMap<String, String>,
    pool: &MachineConfigPool,
) -> bool {
    if node_selector.is_empty() {
        return false;
    }

    match pool.match_labels() {
        Some(match_labels) if !match_labels.is_empty() => node_selector == match_labels,
        _ => false,
    }
}

/// First pool, in list order, whose `matchLabels` equal the node selector
pub fn any_pool_matches<'a>(
    node_selector: &BTreeMap<String, String>,
    pools: &'a [MachineConfigPool],
) -> Option<&'a MachineConfigPool> {
    pools.iter().find(|pool| pool_selector_matches(node_selector, pool))
}
