//! Discovery-data exchange: the side channel that piggybacks plugin payloads
//! onto topology gossip when a node joins.
//!
//! Flow for one join:
//! 1. The joining node calls [`DiscoveryDataExchange::collect_own`] and ships
//!    the bag with its join request.
//! 2. Each cluster node receives its component's share through
//!    [`DiscoveryDataExchange::on_joiner_received`], then adds cluster-wide
//!    data with [`DiscoveryDataExchange::collect`].
//! 3. The joining node receives the cluster's data through
//!    [`DiscoveryDataExchange::on_received`].
//!
//! Payloads are opaque JSON values keyed by component id; wire encoding is the
//! transport's business.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::SubjectId;

/// Exchange category a component participates in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiscoveryDataExchangeType {
    Continuous,
    CacheProcessor,
    StateProcessor,
    Plugin,
}

/// Component-keyed payloads travelling with a join.
#[derive(Debug, Clone)]
pub struct DiscoveryDataBag {
    joining_node_id: SubjectId,
    joining_node_data: HashMap<String, Value>,
    common_data: HashMap<String, Value>,
}

impl DiscoveryDataBag {
    #[must_use]
    pub fn new(joining_node_id: SubjectId) -> Self {
        Self {
            joining_node_id,
            joining_node_data: HashMap::new(),
            common_data: HashMap::new(),
        }
    }

    #[must_use]
    pub fn joining_node_id(&self) -> &SubjectId {
        &self.joining_node_id
    }

    /// Attach data the joining node publishes about itself.
    pub fn add_joining_node_data(&mut self, component: &str, data: Value) {
        self.joining_node_data.insert(component.to_owned(), data);
    }

    /// Attach cluster-wide data for the joining node.
    ///
    /// The first collecting node wins; later calls for the same component are
    /// ignored so every node sees one consistent value.
    pub fn add_grid_common_data(&mut self, component: &str, data: Value) {
        self.common_data.entry(component.to_owned()).or_insert(data);
    }

    #[must_use]
    pub fn common_data_collected_for(&self, component: &str) -> bool {
        self.common_data.contains_key(component)
    }

    /// The joining node's share for `component`.
    #[must_use]
    pub fn joining_node_data_for(&self, component: &str) -> JoiningNodeDiscoveryData {
        JoiningNodeDiscoveryData {
            joining_node_id: self.joining_node_id.clone(),
            data: self.joining_node_data.get(component).cloned(),
        }
    }

    /// The cluster's share for `component`.
    #[must_use]
    pub fn grid_data_for(&self, component: &str) -> GridDiscoveryData {
        GridDiscoveryData {
            joining_node_id: self.joining_node_id.clone(),
            common_data: self.common_data.get(component).cloned(),
        }
    }
}

/// What a cluster node receives from a joining node for one component.
#[derive(Debug, Clone)]
pub struct JoiningNodeDiscoveryData {
    joining_node_id: SubjectId,
    data: Option<Value>,
}

impl JoiningNodeDiscoveryData {
    #[must_use]
    pub fn new(joining_node_id: SubjectId, data: Option<Value>) -> Self {
        Self {
            joining_node_id,
            data,
        }
    }

    #[must_use]
    pub fn joining_node_id(&self) -> &SubjectId {
        &self.joining_node_id
    }

    #[must_use]
    pub fn has_joining_node_data(&self) -> bool {
        self.data.is_some()
    }

    #[must_use]
    pub fn joining_node_data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Decode the payload into a typed value.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        self.data.clone().map(serde_json::from_value).transpose()
    }
}

/// What a joining node receives from the cluster for one component.
#[derive(Debug, Clone)]
pub struct GridDiscoveryData {
    joining_node_id: SubjectId,
    common_data: Option<Value>,
}

impl GridDiscoveryData {
    #[must_use]
    pub fn new(joining_node_id: SubjectId, common_data: Option<Value>) -> Self {
        Self {
            joining_node_id,
            common_data,
        }
    }

    #[must_use]
    pub fn joining_node_id(&self) -> &SubjectId {
        &self.joining_node_id
    }

    #[must_use]
    pub fn common_data(&self) -> Option<&Value> {
        self.common_data.as_ref()
    }

    /// Decode the common payload into a typed value.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        self.common_data.clone().map(serde_json::from_value).transpose()
    }
}

/// The four discovery hooks a security policy implements.
///
/// A policy with nothing to exchange implements all four as empty bodies.
pub trait DiscoveryDataExchange: Send + Sync {
    /// Cluster-node side: add data for a joining node.
    fn collect(&self, outgoing: &mut DiscoveryDataBag);

    /// Joining-node side: add data about this node.
    fn collect_own(&self, outgoing: &mut DiscoveryDataBag);

    /// Joining-node side: consume the cluster's data.
    fn on_received(&self, all: &GridDiscoveryData);

    /// Cluster-node side: consume a joining node's data.
    fn on_joiner_received(&self, joiner: &JoiningNodeDiscoveryData);
}
