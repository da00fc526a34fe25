//! Node, pool and KubeletConfig helpers
//!
//! Provides:
//! - Role derivation from scan node selectors
//! - MachineConfigPool matching
//! - Generated kubelet MachineConfig lookup and owner resolution
//! - Kubelet payload stripping and rendered-vs-expected comparison
//! - Scan type selection

pub mod kubelet;
pub mod payload;
pub mod pool;
pub mod roles;
pub mod scan_type;

pub use kubelet::{
    current_kubelet_config_for_pool, kubelet_config_owner, kubelet_config_rendered,
    latest_generated_kubelet_config, rendered_kubelet_config, strip_node_sizing_fields,
};
pub use payload::decode_data_url;
pub use pool::{any_pool_matches, pool_selector_matches};
pub use roles::{
    first_node_role, first_node_role_label, node_role_selector, node_roles, scan_name_from_profile,
};
pub use scan_type::scan_type;
