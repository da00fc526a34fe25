//! Node role helpers
//!
//! Derive node roles from a scan's node selector and build per-role scan
//! names.

use crate::crd::ALL_ROLES;
use std::collections::BTreeMap;
use tracing::debug;

/// Prefix a selector key needs to count as a role label.
///
/// Empty, so every key of the selector is a role. Scans used to select on
/// `node-role.kubernetes.io/<role>` only.
pub const NODE_ROLE_PREFIX: &str = "";

fn role_labels(node_selector: &BTreeMap<String, String>) -> impl Iterator<Item = &str> {
    node_selector
        .keys()
        .map(String::as_str)
        .filter(|key| key.starts_with(NODE_ROLE_PREFIX))
}

fn log_if_ambiguous(node_selector: &BTreeMap<String, String>) {
    if role_labels(node_selector).nth(1).is_some() {
        debug!(
            "Node selector has {} role labels, using the first in key order",
            role_labels(node_selector).count()
        );
    }
}

/// First selector key that is a role label
pub fn first_node_role_label(node_selector: &BTreeMap<String, String>) -> Option<&str> {
    log_if_ambiguous(node_selector);
    role_labels(node_selector).next()
}

/// First role of the selector, with the role prefix stripped
pub fn first_node_role(node_selector: &BTreeMap<String, String>) -> Option<&str> {
    first_node_role_label(node_selector).map(|label| &label[NODE_ROLE_PREFIX.len()..])
}

/// All roles of the selector, with the role prefix stripped
pub fn node_roles(node_selector: &BTreeMap<String, String>) -> Vec<String> {
    role_labels(node_selector)
        .map(|label| label[NODE_ROLE_PREFIX.len()..].to_string())
        .collect()
}

/// Name of the scan a profile gets for the selected role
///
/// `<profile>-<role>`, or the bare profile name when no role is selected.
pub fn scan_name_from_profile(
    profile_name: &str,
    node_selector: &BTreeMap<String, String>,
) -> String {
    match first_node_role(node_selector) {
        Some(role) if !role.is_empty() => format!("{}-{}", profile_name, role),
        _ => profile_name.to_string(),
    }
}

/// Node selector targeting one role, or every node for [`ALL_ROLES`]
pub fn node_role_selector(role: &str) -> BTreeMap<String, String> {
    if role == ALL_ROLES {
        return BTreeMap::new();
    }
    BTreeMap::from([(format!("{}{}", NODE_ROLE_PREFIX, role), String::new())])
}
