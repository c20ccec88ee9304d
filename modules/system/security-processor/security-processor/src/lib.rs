//! Security Processor
//!
//! Tracks authenticated subjects for one cluster node and delegates every
//! security decision to an injected [`SecurityPolicy`](security_processor_sdk::SecurityPolicy).
//!
//! Provides [`SecurityProcessorLocalClient`](domain::SecurityProcessorLocalClient),
//! the in-process implementation of `SecurityProcessorClient`:
//!
//! ```ignore
//! let svc = Arc::new(Service::new(config, Arc::new(permissive_policy)));
//! let security: Arc<dyn SecurityProcessorClient> =
//!     Arc::new(SecurityProcessorLocalClient::new(svc));
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;

pub use config::SecurityProcessorConfig;
pub use domain::{DomainError, ProcessorState, SecurityProcessorLocalClient, Service, SubjectRegistry};
