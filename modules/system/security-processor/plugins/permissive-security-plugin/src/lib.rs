#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Permissive Security Plugin
//!
//! Security policy for clusters that run without security. Every subject
//! authenticates regardless of credentials and receives unrestricted
//! permissions, every authorization succeeds, and every joining node is
//! admitted. The policy reports itself as disabled so the membership layer
//! skips security-related protocol steps.
//!
//! ```ignore
//! let svc = Service::new(SecurityProcessorConfig::default(), Arc::new(PermissivePolicy::new()));
//! ```

pub mod domain;

pub use domain::Service as PermissivePolicy;
