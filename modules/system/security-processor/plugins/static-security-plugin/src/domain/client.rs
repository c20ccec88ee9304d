//! `SecurityPolicy` implementation for the static security plugin.
//!
//! Authorization uses the trait's default, which checks the subject's
//! permission set.

use security_processor_sdk::{
    AuthenticationContext, ClusterNode, DiscoveryDataBag, DiscoveryDataExchange,
    GridDiscoveryData, JoiningNodeDiscoveryData, NodeValidationResult, PermissionSet,
    SecurityPolicy, SecurityProcessorError,
};

use super::service::Service;

impl DiscoveryDataExchange for Service {
    fn collect(&self, outgoing: &mut DiscoveryDataBag) {
        Service::collect(self, outgoing);
    }

    fn collect_own(&self, outgoing: &mut DiscoveryDataBag) {
        Service::collect_own(self, outgoing);
    }

    fn on_received(&self, all: &GridDiscoveryData) {
        Service::on_received(self, all);
    }

    fn on_joiner_received(&self, joiner: &JoiningNodeDiscoveryData) {
        Service::on_joiner_received(self, joiner);
    }
}

impl SecurityPolicy for Service {
    fn enabled(&self) -> bool {
        true
    }

    fn is_global_node_authentication(&self) -> bool {
        self.global_node_authentication()
    }

    fn authenticate(
        &self,
        request: &AuthenticationContext,
    ) -> Result<PermissionSet, SecurityProcessorError> {
        Service::authenticate(self, request)
    }

    fn validate_node(
        &self,
        node: &ClusterNode,
        joining_data: Option<&JoiningNodeDiscoveryData>,
    ) -> Option<NodeValidationResult> {
        Service::validate_node(self, node, joining_data)
    }

    fn on_disconnected(&self) {
        self.reset_cluster_tier();
    }

    fn on_reconnected(&self, cluster_restarted: bool) -> Result<(), SecurityProcessorError> {
        if cluster_restarted {
            self.reset_cluster_tier();
        }
        Ok(())
    }
}
