//! Service implementation for the static security plugin.

use std::collections::HashMap;

use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};
use security_processor_sdk::constants::SECURITY_COMPONENT_ID;
use security_processor_sdk::{
    AuthenticationContext, ClusterNode, DiscoveryDataBag, GridDiscoveryData,
    JoiningNodeDiscoveryData, NodeValidationResult, PermissionSet, SecurityPermission,
    SecurityProcessorError, SubjectType,
};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::config::StaticSecurityPluginConfig;

/// Security payload exchanged through the discovery data bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPayload {
    pub tier: String,
}

struct UserEntry {
    password: SecretString,
    permissions: PermissionSet,
}

/// Static security service.
///
/// Users and the local tier are fixed at construction. The only mutable
/// state is the tier learned from the cluster while joining.
pub struct Service {
    users: HashMap<String, UserEntry>,
    tier: Option<String>,
    global_node_authentication: bool,
    cluster_tier: RwLock<Option<String>>,
}

impl Service {
    /// Create a service from plugin configuration.
    #[must_use]
    pub fn from_config(cfg: &StaticSecurityPluginConfig) -> Self {
        let users: HashMap<String, UserEntry> = cfg
            .users
            .iter()
            .map(|u| {
                (
                    u.login.clone(),
                    UserEntry {
                        password: u.password.clone(),
                        permissions: u.permissions.clone(),
                    },
                )
            })
            .collect();

        tracing::info!(
            user_count = users.len(),
            tier = cfg.tier.as_deref().unwrap_or("<none>"),
            global_node_authentication = cfg.global_node_authentication,
            "Static security policy configured"
        );

        Self {
            users,
            tier: cfg.tier.clone(),
            global_node_authentication: cfg.global_node_authentication,
            cluster_tier: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn global_node_authentication(&self) -> bool {
        self.global_node_authentication
    }

    /// Tier this node was configured with.
    #[must_use]
    pub fn local_tier(&self) -> Option<&str> {
        self.tier.as_deref()
    }

    /// Tier learned from the cluster while joining, if any.
    #[must_use]
    pub fn cluster_tier(&self) -> Option<String> {
        self.cluster_tier.read().clone()
    }

    /// Tier joining peers must match: the cluster's once learned, else ours.
    #[must_use]
    pub fn effective_tier(&self) -> Option<String> {
        self.cluster_tier().or_else(|| self.tier.clone())
    }

    /// Check credentials and return the user's permissions.
    ///
    /// # Errors
    ///
    /// - `Authentication` if credentials are missing or do not match a user,
    ///   or a cluster node lacks `join_as_server`
    pub fn authenticate(
        &self,
        request: &AuthenticationContext,
    ) -> Result<PermissionSet, SecurityProcessorError> {
        let credentials = request.credentials.as_ref().ok_or_else(|| {
            SecurityProcessorError::Authentication(format!(
                "subject '{}' presented no credentials",
                request.subject_id
            ))
        })?;

        let (Some(login), Some(password)) = (credentials.login(), credentials.password()) else {
            return Err(SecurityProcessorError::Authentication(format!(
                "subject '{}' presented incomplete credentials",
                request.subject_id
            )));
        };

        let user = self
            .users
            .get(login)
            .filter(|user| passwords_match(&user.password, password))
            .ok_or_else(|| {
                SecurityProcessorError::Authentication("invalid login or password".to_owned())
            })?;

        if request.subject_type == Some(SubjectType::ClusterNode)
            && !user
                .permissions
                .allows(None, SecurityPermission::JoinAsServer)
        {
            return Err(SecurityProcessorError::Authentication(format!(
                "user '{login}' is not permitted to join as a server node"
            )));
        }

        tracing::debug!(subject_id = %request.subject_id, login, "Credentials accepted");
        Ok(user.permissions.clone())
    }

    /// Joining side: publish our tier.
    pub fn collect_own(&self, bag: &mut DiscoveryDataBag) {
        if let Some(tier) = &self.tier {
            bag.add_joining_node_data(SECURITY_COMPONENT_ID, tier_value(tier));
        }
    }

    /// Cluster side: publish the cluster's tier for the joining node.
    pub fn collect(&self, bag: &mut DiscoveryDataBag) {
        if let Some(tier) = self.effective_tier() {
            bag.add_grid_common_data(SECURITY_COMPONENT_ID, tier_value(&tier));
        }
    }

    /// Joining side: remember the cluster's tier.
    pub fn on_received(&self, data: &GridDiscoveryData) {
        match data.decode::<TierPayload>() {
            Ok(Some(payload)) => {
                if self.tier.as_deref().is_some_and(|own| own != payload.tier) {
                    tracing::warn!(
                        local_tier = self.tier.as_deref().unwrap_or("<none>"),
                        cluster_tier = %payload.tier,
                        "Cluster security tier differs from the configured one"
                    );
                }
                *self.cluster_tier.write() = Some(payload.tier);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed cluster security data");
            }
        }
    }

    /// Cluster side: note what the joiner claims; the decision is made in
    /// [`Self::validate_node`].
    pub fn on_joiner_received(&self, data: &JoiningNodeDiscoveryData) {
        tracing::debug!(
            node_id = %data.joining_node_id(),
            has_security_data = data.has_joining_node_data(),
            "Received joining node security data"
        );
    }

    /// Refuse peers whose tier differs from ours.
    ///
    /// The tier is read from the joiner's discovery data, falling back to the
    /// tier it published as a node attribute.
    #[must_use]
    pub fn validate_node(
        &self,
        node: &ClusterNode,
        joining_data: Option<&JoiningNodeDiscoveryData>,
    ) -> Option<NodeValidationResult> {
        let expected = self.effective_tier()?;

        let announced = match joining_data.map(JoiningNodeDiscoveryData::decode::<TierPayload>) {
            Some(Ok(Some(payload))) => Some(payload.tier),
            Some(Err(e)) => {
                return Some(
                    NodeValidationResult::new(
                        node.id.clone(),
                        format!("malformed security data from node '{}': {e}", node.id),
                    )
                    .with_remote_message("Joining node sent malformed security data"),
                );
            }
            Some(Ok(None)) | None => node.security_tier().map(str::to_owned),
        };

        if announced.as_deref() == Some(expected.as_str()) {
            return None;
        }

        let announced = announced.unwrap_or_else(|| "<none>".to_owned());
        Some(
            NodeValidationResult::new(
                node.id.clone(),
                format!(
                    "security tier mismatch: node '{}' has '{announced}', cluster requires '{expected}'",
                    node.id
                ),
            )
            .with_remote_message(format!(
                "Local node's security tier '{announced}' does not match cluster tier '{expected}'"
            )),
        )
    }

    /// Forget the learned cluster tier.
    pub fn reset_cluster_tier(&self) {
        *self.cluster_tier.write() = None;
    }
}

/// Compares without short-circuiting on the first differing byte.
fn passwords_match(expected: &SecretString, presented: &SecretString) -> bool {
    expected
        .expose_secret()
        .as_bytes()
        .ct_eq(presented.expose_secret().as_bytes())
        .into()
}

fn tier_value(tier: &str) -> serde_json::Value {
    serde_json::json!({ "tier": tier })
}
