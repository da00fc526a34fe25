//! Domain layer - port definitions
//!
//! This module defines the traits (ports) through which the node utilities
//! reach the API server, so lookups can run against a real client or an
//! in-memory fake.

pub mod ports;

pub use ports::*;
