#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Security Plugin
//!
//! Strict security policy driven by configuration.
//!
//! - **Authentication**: subjects must present a configured login and the
//!   matching password. Cluster nodes additionally need the `join_as_server`
//!   system permission.
//! - **Authorization**: fail-closed; only permissions listed in the user's
//!   permission set are granted.
//! - **Security tiers**: the node's tier travels in the discovery data bag and
//!   peers of a different tier are refused at join time.
//!
//! ## Configuration
//!
//! ```yaml
//! static_security_plugin:
//!   tier: "gold"
//!   global_node_authentication: true
//!   users:
//!     - login: "node"
//!       password: "node-secret"
//!       permissions:
//!         default_allow_all: true
//!     - login: "reader"
//!       password: "reader-secret"
//!       permissions:
//!         cache:
//!           "orders*": ["cache_read"]
//! ```

pub mod config;
pub mod domain;

pub use domain::Service as StaticSecurityPolicy;
