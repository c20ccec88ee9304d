//! Configuration for the security processor.

use security_processor_sdk::Credentials;
use serde::Deserialize;

/// Configuration.
///
/// Both values are optional; when present they are published as node
/// attributes at start so peers can see them while this node joins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecurityProcessorConfig {
    /// Credentials this node presents to its peers.
    pub credentials: Option<Credentials>,

    /// Security tier label of this node.
    pub tier_attribute_value: Option<String>,
}
