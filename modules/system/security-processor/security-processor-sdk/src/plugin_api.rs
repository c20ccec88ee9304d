//! Policy trait for security processor implementations.
//!
//! The processor owns lifecycle and subject bookkeeping; a policy only decides.
//! Policies are injected at construction as `Arc<dyn SecurityPolicy>`, so the
//! same processor serves a permissive setup and a credential-checking one.

use crate::context::SecurityContext;
use crate::discovery::{DiscoveryDataExchange, DiscoveryDataExchangeType, JoiningNodeDiscoveryData};
use crate::error::SecurityProcessorError;
use crate::models::{AuthenticationContext, ClusterNode, NodeValidationResult};
use crate::permissions::{PermissionSet, SecurityPermission};

/// Decision strategy behind the security processor.
///
/// All methods run on the membership layer's threads, some on the topology
/// critical path: implementations must not block on network I/O.
pub trait SecurityPolicy: DiscoveryDataExchange {
    /// Whether the membership layer should run security-related protocol
    /// steps at all. Read once by the processor.
    fn enabled(&self) -> bool;

    /// Whether every node authenticates every joining peer (`true`) or one
    /// node's decision is trusted cluster-wide (`false`). Read once.
    fn is_global_node_authentication(&self) -> bool;

    /// Check the request's credentials and return the subject's permissions.
    ///
    /// # Errors
    ///
    /// - `Authentication` if the credentials are rejected
    fn authenticate(
        &self,
        request: &AuthenticationContext,
    ) -> Result<PermissionSet, SecurityProcessorError>;

    /// Authorize `permission` on `resource` for the context's subject.
    ///
    /// The default consults the subject's permission set, which keeps this
    /// checkpoint consistent with the context's own capability checks.
    ///
    /// # Errors
    ///
    /// - `Authorization` if the permission is not granted
    fn authorize(
        &self,
        resource: Option<&str>,
        permission: SecurityPermission,
        context: &SecurityContext,
    ) -> Result<(), SecurityProcessorError> {
        if context.operation_allowed(resource, permission) {
            Ok(())
        } else {
            Err(SecurityProcessorError::Authorization {
                subject_id: context.subject().id().clone(),
                permission,
                resource: resource.map(str::to_owned),
            })
        }
    }

    /// Gate a peer before it joins the topology. `None` admits it.
    fn validate_node(
        &self,
        node: &ClusterNode,
        joining_data: Option<&JoiningNodeDiscoveryData>,
    ) -> Option<NodeValidationResult>;

    fn discovery_data_type(&self) -> DiscoveryDataExchangeType {
        DiscoveryDataExchangeType::Plugin
    }

    /// The local node lost its connection to the cluster.
    fn on_disconnected(&self) {}

    /// The local node rejoined the cluster.
    ///
    /// # Errors
    ///
    /// Implementations may fail if re-validation after reconnect fails.
    fn on_reconnected(&self, _cluster_restarted: bool) -> Result<(), SecurityProcessorError> {
        Ok(())
    }
}
