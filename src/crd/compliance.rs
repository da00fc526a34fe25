//! Compliance scan vocabulary
//!
//! Scan types and the well-known annotation and role values shared with the
//! compliance scan resources.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Annotation on a profile or scan request naming the product type to scan
pub const PRODUCT_TYPE_ANNOTATION: &str = "compliance.openshift.io/product-type";

/// Role value selecting every node regardless of role label
pub const ALL_ROLES: &str = "@all";

/// Kind of compliance scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ScanType {
    /// Scans the cluster's API resources
    #[default]
    Platform,
    /// Scans the file systems of the selected nodes
    Node,
}

impl ScanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanType::Platform => "Platform",
            ScanType::Node => "Node",
        }
    }
}

impl std::fmt::Display for ScanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
