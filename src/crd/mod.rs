//! Resource shapes read by the compliance node utilities
//!
//! This module contains the externally owned types this crate inspects:
//! - MachineConfigPool: a group of nodes sharing a rendered configuration
//! - MachineConfig: a rendered (possibly generated) machine configuration
//! - KubeletConfig: a user-authored kubelet customisation
//! - ScanType and the annotation/role constants of compliance scans

pub mod compliance;
pub mod kubelet_config;
pub mod machine_config;
pub mod machine_config_pool;

pub use compliance::*;
pub use kubelet_config::*;
pub use machine_config::*;
pub use machine_config_pool::*;
