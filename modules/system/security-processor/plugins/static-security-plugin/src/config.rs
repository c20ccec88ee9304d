//! Configuration for the static security plugin.

use secrecy::SecretString;
use security_processor_sdk::PermissionSet;
use serde::Deserialize;

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticSecurityPluginConfig {
    /// Users allowed to authenticate.
    pub users: Vec<UserConfig>,

    /// Security tier of this node. Peers with another tier are refused.
    pub tier: Option<String>,

    /// Whether every node authenticates every joining peer.
    pub global_node_authentication: bool,
}

impl Default for StaticSecurityPluginConfig {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            tier: None,
            global_node_authentication: true,
        }
    }
}

/// One configured user.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    pub login: String,

    pub password: SecretString,

    /// Granted permissions; nothing by default.
    #[serde(default)]
    pub permissions: PermissionSet,
}
