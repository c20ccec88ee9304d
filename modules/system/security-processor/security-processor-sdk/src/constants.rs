//! Well-known attribute names and discovery component keys.

/// Namespace shared by every attribute this processor publishes.
pub const ATTR_PREFIX: &str = "cluster.security";

/// Node attribute carrying the credentials a node presents to its peers.
pub const ATTR_SECURITY_CREDENTIALS: &str = "cluster.security.cred";

/// Node attribute carrying the node's security tier label.
pub const ATTR_SECURITY_TIER: &str = "cluster.security.tier";

/// Key under which security payloads travel in a discovery data bag.
pub const SECURITY_COMPONENT_ID: &str = "security";
