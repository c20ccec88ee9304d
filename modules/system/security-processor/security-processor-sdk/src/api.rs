//! Public API trait for the security processor.
//!
//! This is the contract the cluster's membership and authorization code paths
//! call. It does not change with the injected policy.

use std::sync::Arc;

use crate::context::SecurityContext;
use crate::discovery::{
    DiscoveryDataBag, DiscoveryDataExchangeType, GridDiscoveryData, JoiningNodeDiscoveryData,
};
use crate::error::SecurityProcessorError;
use crate::models::{
    AuthenticationContext, ClusterNode, Credentials, NodeAttributes, NodeValidationResult,
    SecuritySubject, SubjectId,
};
use crate::permissions::SecurityPermission;

/// Security processor as seen by its host node.
///
/// ```ignore
/// let security: Arc<dyn SecurityProcessorClient> = Arc::new(local_client);
///
/// security.start(&mut node_attributes)?;
/// let ctx = security.authenticate_node(&peer, None)?;
/// security.authorize(Some("orders"), SecurityPermission::CachePut, &ctx)?;
/// security.on_session_expired(ctx.subject().id());
/// ```
///
/// Every method is synchronous and returns quickly.
pub trait SecurityProcessorClient: Send + Sync {
    /// Start serving and publish security attributes for peers to observe.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the processor is already started
    fn start(&self, attributes: &mut NodeAttributes) -> Result<(), SecurityProcessorError>;

    /// Stop serving and drop every tracked subject.
    ///
    /// # Errors
    ///
    /// - `Internal` for unexpected errors
    fn stop(&self, cancel: bool) -> Result<(), SecurityProcessorError>;

    /// The surrounding node finished starting; `active` tells whether the
    /// cluster is active.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the processor was not started
    fn on_kernal_start(&self, active: bool) -> Result<(), SecurityProcessorError>;

    /// The surrounding node is stopping.
    fn on_kernal_stop(&self, cancel: bool);

    /// Whether security-related protocol steps run at all. Stable.
    fn enabled(&self) -> bool;

    /// Whether every node authenticates every joining peer. Stable.
    fn is_global_node_authentication(&self) -> bool;

    /// Authenticate a peer joining the topology.
    ///
    /// # Errors
    ///
    /// - `Authentication` if the policy rejects the credentials
    /// - `InvalidRequest` if the node is malformed
    fn authenticate_node(
        &self,
        node: &ClusterNode,
        credentials: Option<&Credentials>,
    ) -> Result<SecurityContext, SecurityProcessorError>;

    /// Authenticate a client connection.
    ///
    /// An unset subject type is treated as [`SubjectType::ClusterNode`](crate::SubjectType).
    ///
    /// # Errors
    ///
    /// - `Authentication` if the policy rejects the credentials
    /// - `InvalidRequest` if the request is malformed
    fn authenticate(
        &self,
        auth_context: AuthenticationContext,
    ) -> Result<SecurityContext, SecurityProcessorError>;

    /// Central authorization checkpoint.
    ///
    /// # Errors
    ///
    /// - `Authorization` if the policy denies the operation
    fn authorize(
        &self,
        resource: Option<&str>,
        permission: SecurityPermission,
        context: &SecurityContext,
    ) -> Result<(), SecurityProcessorError>;

    /// Snapshot of every currently authenticated subject.
    fn authenticated_subjects(&self) -> Vec<Arc<SecuritySubject>>;

    /// Subject with the given id, or `None` if it has no session.
    fn authenticated_subject(&self, id: &SubjectId) -> Option<Arc<SecuritySubject>>;

    /// Context for the given subject, or `None` if it has no session.
    fn security_context(&self, id: &SubjectId) -> Option<SecurityContext>;

    /// Drop the subject's session. Idempotent.
    fn on_session_expired(&self, id: &SubjectId);

    fn discovery_data_type(&self) -> DiscoveryDataExchangeType;

    fn collect_joining_node_data(&self, bag: &mut DiscoveryDataBag);

    fn collect_grid_node_data(&self, bag: &mut DiscoveryDataBag);

    fn on_grid_data_received(&self, data: &GridDiscoveryData);

    fn on_joining_node_data_received(&self, data: &JoiningNodeDiscoveryData);

    /// Gate a peer before it joins. `Some` rejects with a diagnostic.
    fn validate_node(&self, node: &ClusterNode) -> Option<NodeValidationResult>;

    /// Gate a peer using the discovery data it sent along.
    fn validate_node_with_data(
        &self,
        node: &ClusterNode,
        joining_data: &JoiningNodeDiscoveryData,
    ) -> Option<NodeValidationResult>;

    fn on_disconnected(&self);

    /// # Errors
    ///
    /// Propagates policy failures while re-establishing security state.
    fn on_reconnected(&self, cluster_restarted: bool) -> Result<(), SecurityProcessorError>;

    /// Log memory usage of the processor's bookkeeping.
    fn print_memory_stats(&self);
}
