//! Security Processor SDK
//!
//! This crate provides the public API for the cluster security processor:
//!
//! - [`SecurityProcessorClient`] - Public API trait called by the membership layer
//! - [`SecurityPolicy`] - Policy trait for permissive and strict implementations
//! - [`DiscoveryDataExchange`] - Discovery hooks every policy implements
//! - [`SecurityContext`] - Capability checks bound to one subject
//! - [`SecuritySubject`], [`PermissionSet`], [`AuthenticationContext`] - Models
//! - [`SecurityProcessorError`] - Error types
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod constants;
pub mod context;
pub mod discovery;
pub mod error;
pub mod models;
pub mod permissions;
pub mod plugin_api;

pub use api::SecurityProcessorClient;
pub use context::SecurityContext;
pub use discovery::{
    DiscoveryDataBag, DiscoveryDataExchange, DiscoveryDataExchangeType, GridDiscoveryData,
    JoiningNodeDiscoveryData,
};
pub use error::SecurityProcessorError;
pub use models::{
    AuthenticationContext, ClusterNode, Credentials, NodeAttribute, NodeAttributes,
    NodeValidationResult, SecuritySubject, SubjectId, SubjectType,
};
pub use permissions::{PermissionScope, PermissionSet, ResourcePermissions, SecurityPermission};
pub use plugin_api::SecurityPolicy;
