//! `SecurityPolicy` implementation for the permissive plugin.

use security_processor_sdk::{
    AuthenticationContext, ClusterNode, DiscoveryDataBag, DiscoveryDataExchange,
    GridDiscoveryData, JoiningNodeDiscoveryData, NodeValidationResult, PermissionSet,
    SecurityContext, SecurityPermission, SecurityPolicy, SecurityProcessorError,
};

use super::service::Service;

// Nothing to exchange.
impl DiscoveryDataExchange for Service {
    fn collect(&self, _outgoing: &mut DiscoveryDataBag) {}

    fn collect_own(&self, _outgoing: &mut DiscoveryDataBag) {}

    fn on_received(&self, _all: &GridDiscoveryData) {}

    fn on_joiner_received(&self, _joiner: &JoiningNodeDiscoveryData) {}
}

impl SecurityPolicy for Service {
    fn enabled(&self) -> bool {
        false
    }

    fn is_global_node_authentication(&self) -> bool {
        false
    }

    fn authenticate(
        &self,
        request: &AuthenticationContext,
    ) -> Result<PermissionSet, SecurityProcessorError> {
        Ok(Service::authenticate(self, request))
    }

    fn authorize(
        &self,
        _resource: Option<&str>,
        _permission: SecurityPermission,
        _context: &SecurityContext,
    ) -> Result<(), SecurityProcessorError> {
        Ok(())
    }

    fn validate_node(
        &self,
        _node: &ClusterNode,
        _joining_data: Option<&JoiningNodeDiscoveryData>,
    ) -> Option<NodeValidationResult> {
        None
    }
}
