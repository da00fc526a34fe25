//! Compliance Node Utilities
//!
//! Helpers used by a compliance-scanning controller on clusters managed by
//! the machine-config-operator.
//!
//! # Overview
//!
//! ```text
//!   scan node selector ──► roles ──► scan name / role selector
//!          │
//!          ▼
//!   MachineConfigPool ──► latest 99-*-generated-kubelet[N] MachineConfig
//!                                   │ owner reference
//!                                   ▼
//!                              KubeletConfig ──► strip sizing fields ──► compare
//!                                                                     with kubelet.conf
//! ```
//!
//! # Modules
//!
//! - [`nodeutils`]: Role, pool, KubeletConfig and scan type helpers
//! - [`crd`]: Resource shapes read by the helpers
//! - [`domain`]: Ports to the API server
//! - [`error`]: Error types and handling

pub mod crd;
pub mod domain;
pub mod error;
pub mod nodeutils;

// Re-export commonly used types
pub use crd::{
    KubeletConfig, KubeletConfigSpec, MachineConfig, MachineConfigPool, MachineConfigPoolSpec,
    MachineConfigSpec, ScanType, ALL_ROLES, PRODUCT_TYPE_ANNOTATION,
};

pub use domain::ports::{ClusterResource, ResourceGetter};

pub use error::{Error, ErrorAction, Result};

pub use nodeutils::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
