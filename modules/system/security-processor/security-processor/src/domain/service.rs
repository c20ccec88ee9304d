//! Domain service for the security processor.

use std::sync::Arc;

use parking_lot::Mutex;
use security_processor_sdk::constants::{ATTR_SECURITY_CREDENTIALS, ATTR_SECURITY_TIER};
use security_processor_sdk::{
    AuthenticationContext, ClusterNode, Credentials, DiscoveryDataBag, DiscoveryDataExchangeType,
    GridDiscoveryData, JoiningNodeDiscoveryData, NodeAttribute, NodeAttributes,
    NodeValidationResult, SecurityContext, SecurityPermission, SecurityPolicy, SecuritySubject,
    SubjectId, SubjectType,
};
use tracing::{debug, info, warn};

use super::error::DomainError;
use super::lifecycle::ProcessorState;
use super::registry::SubjectRegistry;
use crate::config::SecurityProcessorConfig;

/// Security processor service.
///
/// Owns the lifecycle state and the subject registry; every decision goes to
/// the injected policy. The policy's `enabled` and
/// `is_global_node_authentication` answers are read once here and never
/// re-queried.
pub struct Service {
    config: SecurityProcessorConfig,
    policy: Arc<dyn SecurityPolicy>,
    enabled: bool,
    global_node_authentication: bool,
    state: Mutex<ProcessorState>,
    registry: SubjectRegistry,
}

impl Service {
    #[must_use]
    pub fn new(config: SecurityProcessorConfig, policy: Arc<dyn SecurityPolicy>) -> Self {
        let enabled = policy.enabled();
        let global_node_authentication = policy.is_global_node_authentication();
        info!(
            enabled,
            global_node_authentication,
            tier = config.tier_attribute_value.as_deref().unwrap_or("<none>"),
            "Security processor created"
        );
        if !enabled {
            info!("Security is disabled: credentials are not checked and every operation is allowed");
        }

        Self {
            config,
            policy,
            enabled,
            global_node_authentication,
            state: Mutex::new(ProcessorState::Stopped),
            registry: SubjectRegistry::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> ProcessorState {
        *self.state.lock()
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn is_global_node_authentication(&self) -> bool {
        self.global_node_authentication
    }

    /// Start serving and publish this node's credentials and tier.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if already started
    pub fn start(&self, attributes: &mut NodeAttributes) -> Result<(), DomainError> {
        let mut state = self.state.lock();
        if *state != ProcessorState::Stopped {
            return Err(DomainError::InvalidTransition {
                operation: "start",
                state: *state,
            });
        }

        if let Some(credentials) = &self.config.credentials {
            attributes.insert(
                ATTR_SECURITY_CREDENTIALS.to_owned(),
                NodeAttribute::Credentials(credentials.clone()),
            );
        }
        if let Some(tier) = &self.config.tier_attribute_value {
            attributes.insert(
                ATTR_SECURITY_TIER.to_owned(),
                NodeAttribute::Text(tier.clone()),
            );
        }

        *state = ProcessorState::Started;
        info!(
            credentials_published = self.config.credentials.is_some(),
            tier_published = self.config.tier_attribute_value.is_some(),
            "Security processor started"
        );
        Ok(())
    }

    /// Stop serving and drop every session.
    pub fn stop(&self, cancel: bool) {
        let mut state = self.state.lock();
        let dropped = self.registry.clear();
        *state = ProcessorState::Stopped;
        info!(cancel, dropped_subjects = dropped, "Security processor stopped");
    }

    /// # Errors
    ///
    /// - `InvalidTransition` if the processor was never started
    pub fn on_kernal_start(&self, active: bool) -> Result<(), DomainError> {
        let mut state = self.state.lock();
        match *state {
            ProcessorState::Stopped => Err(DomainError::InvalidTransition {
                operation: "complete node start",
                state: *state,
            }),
            ProcessorState::Started if active => {
                *state = ProcessorState::Active;
                info!("Security processor active");
                Ok(())
            }
            ProcessorState::Started => {
                info!("Node started with an inactive cluster; security processor stays started");
                Ok(())
            }
            ProcessorState::Active => Ok(()),
        }
    }

    pub fn on_kernal_stop(&self, cancel: bool) {
        let mut state = self.state.lock();
        if *state == ProcessorState::Active {
            *state = ProcessorState::Started;
        }
        let current = *state;
        debug!(cancel, state = %current, "Node stopping");
    }

    /// Authenticate a peer joining the topology.
    ///
    /// Credentials default to the ones the peer published in its attributes.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the node id is empty
    /// - `Policy` if the policy rejects the credentials
    #[tracing::instrument(skip_all, fields(subject_id = %node.id, client = node.client))]
    pub fn authenticate_node(
        &self,
        node: &ClusterNode,
        credentials: Option<&Credentials>,
    ) -> Result<SecurityContext, DomainError> {
        let subject_type = if node.client {
            SubjectType::RemoteClient
        } else {
            SubjectType::ClusterNode
        };

        let request = AuthenticationContext {
            subject_type: Some(subject_type),
            subject_id: node.id.clone(),
            credentials: credentials.or_else(|| node.published_credentials()).cloned(),
            node_attributes: node.attributes.clone(),
            address: node.socket_address(),
        };

        self.register_subject(&request)
    }

    /// Authenticate a client connection.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the subject id is empty
    /// - `Policy` if the policy rejects the credentials
    #[tracing::instrument(skip_all, fields(subject_id = %request.subject_id))]
    pub fn authenticate(
        &self,
        mut request: AuthenticationContext,
    ) -> Result<SecurityContext, DomainError> {
        if request.subject_type.is_none() {
            debug!("Subject type not set, assuming cluster node");
            request.subject_type = Some(SubjectType::ClusterNode);
        }

        self.register_subject(&request)
    }

    fn register_subject(
        &self,
        request: &AuthenticationContext,
    ) -> Result<SecurityContext, DomainError> {
        if request.subject_id.is_empty() {
            return Err(DomainError::InvalidRequest(
                "subject id must not be empty".to_owned(),
            ));
        }
        self.warn_if_not_serving("authenticate");

        let permissions = self.policy.authenticate(request)?;

        let subject_type = request.subject_type.unwrap_or(SubjectType::ClusterNode);
        let login = request
            .credentials
            .as_ref()
            .and_then(Credentials::login)
            .map(str::to_owned);
        let subject = Arc::new(SecuritySubject::new(
            request.subject_id.clone(),
            subject_type,
            login,
            request.address,
            permissions,
        ));

        let replaced = self.registry.insert(Arc::clone(&subject));
        debug!(
            subject_type = ?subject_type,
            address = ?request.address,
            login = subject.login().unwrap_or("<none>"),
            reauthenticated = replaced.is_some(),
            "Subject authenticated"
        );

        Ok(SecurityContext::new(subject))
    }

    /// # Errors
    ///
    /// - `Policy` with an `Authorization` error if the policy denies
    pub fn authorize(
        &self,
        resource: Option<&str>,
        permission: SecurityPermission,
        context: &SecurityContext,
    ) -> Result<(), DomainError> {
        self.warn_if_not_serving("authorize");
        self.policy
            .authorize(resource, permission, context)
            .map_err(DomainError::from)
    }

    #[must_use]
    pub fn authenticated_subjects(&self) -> Vec<Arc<SecuritySubject>> {
        self.registry.snapshot()
    }

    #[must_use]
    pub fn authenticated_subject(&self, id: &SubjectId) -> Option<Arc<SecuritySubject>> {
        self.registry.get(id)
    }

    #[must_use]
    pub fn security_context(&self, id: &SubjectId) -> Option<SecurityContext> {
        self.registry.get(id).map(SecurityContext::new)
    }

    pub fn on_session_expired(&self, id: &SubjectId) {
        if self.registry.remove(id).is_some() {
            debug!(subject_id = %id, "Session expired");
        }
    }

    #[must_use]
    pub fn discovery_data_type(&self) -> DiscoveryDataExchangeType {
        self.policy.discovery_data_type()
    }

    pub fn collect_joining_node_data(&self, bag: &mut DiscoveryDataBag) {
        self.policy.collect_own(bag);
    }

    pub fn collect_grid_node_data(&self, bag: &mut DiscoveryDataBag) {
        self.policy.collect(bag);
    }

    pub fn on_grid_data_received(&self, data: &GridDiscoveryData) {
        self.policy.on_received(data);
    }

    pub fn on_joining_node_data_received(&self, data: &JoiningNodeDiscoveryData) {
        self.policy.on_joiner_received(data);
    }

    #[must_use]
    pub fn validate_node(
        &self,
        node: &ClusterNode,
        joining_data: Option<&JoiningNodeDiscoveryData>,
    ) -> Option<NodeValidationResult> {
        let rejection = self.policy.validate_node(node, joining_data);
        if let Some(result) = &rejection {
            warn!(node_id = %node.id, reason = %result.message, "Joining node rejected");
        }
        rejection
    }

    pub fn on_disconnected(&self) {
        info!("Node disconnected from cluster");
        self.policy.on_disconnected();
    }

    /// # Errors
    ///
    /// - `Policy` if the policy fails to re-establish its state
    pub fn on_reconnected(&self, cluster_restarted: bool) -> Result<(), DomainError> {
        info!(cluster_restarted, "Node reconnected to cluster");
        self.policy
            .on_reconnected(cluster_restarted)
            .map_err(DomainError::from)
    }

    pub fn print_memory_stats(&self) {
        info!(
            authenticated_subjects = self.registry.len(),
            state = %self.state(),
            "Security processor memory stats"
        );
    }

    fn warn_if_not_serving(&self, operation: &'static str) {
        let state = self.state();
        if !state.is_serving() {
            warn!(operation, %state, "Security processor called outside its started window");
        }
    }
}
