//! Scan type selection from annotations

use crate::crd::{ScanType, PRODUCT_TYPE_ANNOTATION};
use std::collections::BTreeMap;

/// Scan type requested by the product-type annotation
///
/// Missing or unrecognised values fall back to [`ScanType::Platform`].
pub fn scan_type(annotations: &BTreeMap<String, String>) -> ScanType {
    match annotations.get(PRODUCT_TYPE_ANNOTATION) {
        Some(value) if value.eq_ignore_ascii_case(ScanType::Node.as_str()) => ScanType::Node,
        _ => ScanType::Platform,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotated(value: &str) -> BTreeMap<String, String> {
        BTreeMap::from([(PRODUCT_TYPE_ANNOTATION.to_string(), value.to_string())])
    }

    #[test]
    fn test_scan_type() {
        assert_eq!(scan_type(&BTreeMap::new()), ScanType::Platform);
        assert_eq!(scan_type(&annotated("Node")), ScanType::Node);
        assert_eq!(scan_type(&annotated("node")), ScanType::Node);
        assert_eq!(scan_type(&annotated("NODE")), ScanType::Node);
        assert_eq!(scan_type(&annotated("Platform")), ScanType::Platform);
        assert_eq!(scan_type(&annotated("bogus")), ScanType::Platform);
        assert_eq!(scan_type(&annotated("")), ScanType::Platform);
    }

    #[test]
    fn test_scan_type_mixed_and_non_ascii_case() {
        assert_eq!(scan_type(&annotated("nOdE")), ScanType::Node);
        // fullwidth and accented lookalikes are not the Node type
        assert_eq!(scan_type(&annotated("ＮＯＤＥ")), ScanType::Platform);
        assert_eq!(scan_type(&annotated("NODÉ")), ScanType::Platform);
        assert_eq!(scan_type(&annotated(" Node")), ScanType::Platform);
    }

    #[test]
    fn test_other_annotations_ignored() {
        let annotations = BTreeMap::from([("scan-type".to_string(), "Node".to_string())]);
        assert_eq!(scan_type(&annotations), ScanType::Platform);
    }
}
