//! Domain models shared by the security processor, its policies and its host.

use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{ATTR_SECURITY_CREDENTIALS, ATTR_SECURITY_TIER};
use crate::permissions::PermissionSet;

/// Cluster-unique identifier of a security subject.
///
/// Cluster nodes use their stable node id (usually a UUID); clients may be
/// identified by any opaque string assigned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self::from(Uuid::new_v4())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Uuid> for SubjectId {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for SubjectId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for SubjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Kind of principal behind a security subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    /// A server node taking part in the cluster topology.
    ClusterNode,
    /// A thin or thick client connecting to the cluster.
    RemoteClient,
}

/// Credentials presented by a node or client.
///
/// Both parts are optional: the permissive policy accepts subjects that
/// present nothing at all. The password is redacted in `Debug` output.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Credentials {
    login: Option<String>,
    password: Option<SecretString>,
}

impl Credentials {
    #[must_use]
    pub fn new(login: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            login: Some(login.into()),
            password: Some(password.into()),
        }
    }

    /// Credentials carrying only a login, e.g. for trusted internal callers.
    #[must_use]
    pub fn with_login(login: impl Into<String>) -> Self {
        Self {
            login: Some(login.into()),
            password: None,
        }
    }

    #[must_use]
    pub fn login(&self) -> Option<&str> {
        self.login.as_deref()
    }

    #[must_use]
    pub fn password(&self) -> Option<&SecretString> {
        self.password.as_ref()
    }
}

/// A value published in a node's attribute map.
#[derive(Debug, Clone)]
pub enum NodeAttribute {
    Text(String),
    Credentials(Credentials),
}

impl NodeAttribute {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Credentials(_) => None,
        }
    }

    #[must_use]
    pub fn as_credentials(&self) -> Option<&Credentials> {
        match self {
            Self::Credentials(credentials) => Some(credentials),
            Self::Text(_) => None,
        }
    }
}

/// String-keyed node attributes, observable by peers during join.
pub type NodeAttributes = HashMap<String, NodeAttribute>;

/// An authenticated principal.
///
/// Immutable once built; equality and hashing are by [`SubjectId`] only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecuritySubject {
    id: SubjectId,
    subject_type: SubjectType,
    login: Option<String>,
    address: Option<SocketAddr>,
    permissions: PermissionSet,
}

impl SecuritySubject {
    #[must_use]
    pub fn new(
        id: SubjectId,
        subject_type: SubjectType,
        login: Option<String>,
        address: Option<SocketAddr>,
        permissions: PermissionSet,
    ) -> Self {
        Self {
            id,
            subject_type,
            login,
            address,
            permissions,
        }
    }

    #[must_use]
    pub fn id(&self) -> &SubjectId {
        &self.id
    }

    #[must_use]
    pub fn subject_type(&self) -> SubjectType {
        self.subject_type
    }

    #[must_use]
    pub fn login(&self) -> Option<&str> {
        self.login.as_deref()
    }

    #[must_use]
    pub fn address(&self) -> Option<SocketAddr> {
        self.address
    }

    #[must_use]
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }
}

impl PartialEq for SecuritySubject {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SecuritySubject {}

impl std::hash::Hash for SecuritySubject {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Input of an authentication attempt.
///
/// Consumed by the processor; nothing here outlives subject construction.
#[derive(Debug, Clone)]
pub struct AuthenticationContext {
    /// `None` means the caller did not say; the processor then assumes
    /// [`SubjectType::ClusterNode`].
    pub subject_type: Option<SubjectType>,
    pub subject_id: SubjectId,
    pub credentials: Option<Credentials>,
    pub node_attributes: NodeAttributes,
    pub address: Option<SocketAddr>,
}

impl AuthenticationContext {
    #[must_use]
    pub fn new(subject_id: impl Into<SubjectId>) -> Self {
        Self {
            subject_type: None,
            subject_id: subject_id.into(),
            credentials: None,
            node_attributes: NodeAttributes::new(),
            address: None,
        }
    }

    #[must_use]
    pub fn with_subject_type(mut self, subject_type: SubjectType) -> Self {
        self.subject_type = Some(subject_type);
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    #[must_use]
    pub fn with_address(mut self, address: SocketAddr) -> Self {
        self.address = Some(address);
        self
    }

    #[must_use]
    pub fn with_node_attributes(mut self, attributes: NodeAttributes) -> Self {
        self.node_attributes = attributes;
        self
    }
}

/// A peer as seen by the membership layer.
#[derive(Debug, Clone)]
pub struct ClusterNode {
    pub id: SubjectId,
    pub client: bool,
    pub addresses: Vec<IpAddr>,
    pub discovery_port: Option<u16>,
    pub attributes: NodeAttributes,
}

impl ClusterNode {
    #[must_use]
    pub fn new(id: impl Into<SubjectId>, client: bool) -> Self {
        Self {
            id: id.into(),
            client,
            addresses: Vec::new(),
            discovery_port: None,
            attributes: NodeAttributes::new(),
        }
    }

    #[must_use]
    pub fn with_address(mut self, address: IpAddr) -> Self {
        self.addresses.push(address);
        self
    }

    #[must_use]
    pub fn with_discovery_port(mut self, port: u16) -> Self {
        self.discovery_port = Some(port);
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: NodeAttribute) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Origin address of the peer: its first declared address combined with
    /// its discovery port (`0` when the port is unknown).
    #[must_use]
    pub fn socket_address(&self) -> Option<SocketAddr> {
        self.addresses
            .first()
            .map(|ip| SocketAddr::new(*ip, self.discovery_port.unwrap_or(0)))
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&NodeAttribute> {
        self.attributes.get(key)
    }

    /// Security tier label the peer published, if any.
    #[must_use]
    pub fn security_tier(&self) -> Option<&str> {
        self.attribute(ATTR_SECURITY_TIER)
            .and_then(NodeAttribute::as_text)
    }

    /// Credentials the peer published in its attributes, if any.
    #[must_use]
    pub fn published_credentials(&self) -> Option<&Credentials> {
        self.attribute(ATTR_SECURITY_CREDENTIALS)
            .and_then(NodeAttribute::as_credentials)
    }
}

/// Rejection of a joining peer, returned by node validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeValidationResult {
    pub node_id: SubjectId,
    /// Diagnostic logged on the validating node.
    pub message: String,
    /// Diagnostic sent back to the rejected peer.
    pub remote_message: String,
}

impl NodeValidationResult {
    #[must_use]
    pub fn new(node_id: SubjectId, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            node_id,
            remote_message: message.clone(),
            message,
        }
    }

    #[must_use]
    pub fn with_remote_message(mut self, remote_message: impl Into<String>) -> Self {
        self.remote_message = remote_message.into();
        self
    }
}
