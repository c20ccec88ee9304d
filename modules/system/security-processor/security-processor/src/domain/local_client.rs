//! Local (in-process) client for the security processor.

use std::sync::Arc;

use security_processor_sdk::{
    AuthenticationContext, ClusterNode, Credentials, DiscoveryDataBag, DiscoveryDataExchangeType,
    GridDiscoveryData, JoiningNodeDiscoveryData, NodeAttributes, NodeValidationResult,
    SecurityContext, SecurityPermission, SecurityProcessorClient, SecurityProcessorError,
    SecuritySubject, SubjectId,
};

use super::{DomainError, Service};

/// Local client wrapping the service.
///
/// Handed to the membership layer as `Arc<dyn SecurityProcessorClient>`.
pub struct SecurityProcessorLocalClient {
    svc: Arc<Service>,
}

impl SecurityProcessorLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }

    #[must_use]
    pub fn service(&self) -> &Arc<Service> {
        &self.svc
    }
}

fn log_and_convert(op: &str, e: DomainError) -> SecurityProcessorError {
    tracing::error!(operation = op, error = ?e, "security_processor call failed");
    e.into()
}

impl SecurityProcessorClient for SecurityProcessorLocalClient {
    fn start(&self, attributes: &mut NodeAttributes) -> Result<(), SecurityProcessorError> {
        self.svc
            .start(attributes)
            .map_err(|e| log_and_convert("start", e))
    }

    fn stop(&self, cancel: bool) -> Result<(), SecurityProcessorError> {
        self.svc.stop(cancel);
        Ok(())
    }

    fn on_kernal_start(&self, active: bool) -> Result<(), SecurityProcessorError> {
        self.svc
            .on_kernal_start(active)
            .map_err(|e| log_and_convert("on_kernal_start", e))
    }

    fn on_kernal_stop(&self, cancel: bool) {
        self.svc.on_kernal_stop(cancel);
    }

    fn enabled(&self) -> bool {
        self.svc.enabled()
    }

    fn is_global_node_authentication(&self) -> bool {
        self.svc.is_global_node_authentication()
    }

    fn authenticate_node(
        &self,
        node: &ClusterNode,
        credentials: Option<&Credentials>,
    ) -> Result<SecurityContext, SecurityProcessorError> {
        self.svc
            .authenticate_node(node, credentials)
            .map_err(|e| log_and_convert("authenticate_node", e))
    }

    fn authenticate(
        &self,
        auth_context: AuthenticationContext,
    ) -> Result<SecurityContext, SecurityProcessorError> {
        self.svc
            .authenticate(auth_context)
            .map_err(|e| log_and_convert("authenticate", e))
    }

    fn authorize(
        &self,
        resource: Option<&str>,
        permission: SecurityPermission,
        context: &SecurityContext,
    ) -> Result<(), SecurityProcessorError> {
        // Denials are routine; keep them out of the error log.
        self.svc
            .authorize(resource, permission, context)
            .map_err(|e| {
                tracing::debug!(
                    subject_id = %context.subject().id(),
                    %permission,
                    resource = resource.unwrap_or("<system>"),
                    "Operation denied"
                );
                e.into()
            })
    }

    fn authenticated_subjects(&self) -> Vec<Arc<SecuritySubject>> {
        self.svc.authenticated_subjects()
    }

    fn authenticated_subject(&self, id: &SubjectId) -> Option<Arc<SecuritySubject>> {
        self.svc.authenticated_subject(id)
    }

    fn security_context(&self, id: &SubjectId) -> Option<SecurityContext> {
        self.svc.security_context(id)
    }

    fn on_session_expired(&self, id: &SubjectId) {
        self.svc.on_session_expired(id);
    }

    fn discovery_data_type(&self) -> DiscoveryDataExchangeType {
        self.svc.discovery_data_type()
    }

    fn collect_joining_node_data(&self, bag: &mut DiscoveryDataBag) {
        self.svc.collect_joining_node_data(bag);
    }

    fn collect_grid_node_data(&self, bag: &mut DiscoveryDataBag) {
        self.svc.collect_grid_node_data(bag);
    }

    fn on_grid_data_received(&self, data: &GridDiscoveryData) {
        self.svc.on_grid_data_received(data);
    }

    fn on_joining_node_data_received(&self, data: &JoiningNodeDiscoveryData) {
        self.svc.on_joining_node_data_received(data);
    }

    fn validate_node(&self, node: &ClusterNode) -> Option<NodeValidationResult> {
        self.svc.validate_node(node, None)
    }

    fn validate_node_with_data(
        &self,
        node: &ClusterNode,
        joining_data: &JoiningNodeDiscoveryData,
    ) -> Option<NodeValidationResult> {
        self.svc.validate_node(node, Some(joining_data))
    }

    fn on_disconnected(&self) {
        self.svc.on_disconnected();
    }

    fn on_reconnected(&self, cluster_restarted: bool) -> Result<(), SecurityProcessorError> {
        self.svc
            .on_reconnected(cluster_restarted)
            .map_err(|e| log_and_convert("on_reconnected", e))
    }

    fn print_memory_stats(&self) {
        self.svc.print_memory_stats();
    }
}
