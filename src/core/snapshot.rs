//! Snapshot data model and the single-slot snapshot store
//!
//! A snapshot is a full replacement of the whole network state: no merging,
//! no history. Node iteration order is significant (it drives lane and hue
//! assignment), so the snapshot carries an explicit ordered id list built in
//! wire document order rather than leaning on map iteration.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::{trace, warn};

use super::sample::Amplitude;

/// State of one simulated node, as delivered by the server.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodeState {
    /// Ordered samples; index is the x-axis of the rendered trace.
    pub waveform: Vec<Amplitude>,
    pub collapsed: bool,
    /// Realized position after collapse. Opaque: the producer's contract for
    /// whether this is a sample index or a continuous quantity is unconfirmed.
    pub value: Option<f64>,
    #[serde(rename = "collapseChance")]
    pub collapse_chance: Option<f64>,
    #[serde(rename = "interferenceGain")]
    pub interference_gain: Option<f64>,
    pub phase: Option<f64>,
    /// Neighbor node ids; carried for display, never interpreted.
    pub connections: Vec<String>,
}

/// One full view of the network at a point in time.
///
/// Immutable once built; consumers only read derived views.
#[derive(Debug, Clone, Default)]
pub struct NetworkSnapshot {
    order: Vec<String>,
    nodes: HashMap<String, NodeState>,
}

impl NetworkSnapshot {
    /// Build a snapshot from the `data` payload of a `state` message.
    ///
    /// Nodes whose state does not deserialize are skipped with a warning;
    /// one malformed node never poisons the rest. Non-object payloads yield
    /// an empty snapshot.
    pub fn from_value(value: &Value) -> Self {
        let mut snapshot = Self::default();

        let Some(map) = value.as_object() else {
            warn!("snapshot payload is not an object, treating as empty");
            return snapshot;
        };

        for (node_id, raw) in map {
            match NodeState::deserialize(raw) {
                Ok(state) => {
                    trace!(%node_id, samples = state.waveform.len(), "node parsed");
                    snapshot.order.push(node_id.clone());
                    snapshot.nodes.insert(node_id.clone(), state);
                }
                Err(e) => {
                    warn!(%node_id, error = %e, "skipping malformed node state");
                }
            }
        }

        snapshot
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, node_id: &str) -> Option<&NodeState> {
        self.nodes.get(node_id)
    }

    /// Node ids in wire document order.
    pub fn node_ids(&self) -> &[String] {
        &self.order
    }

    /// Iterate nodes in wire document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeState)> {
        self.order
            .iter()
            .filter_map(|id| self.nodes.get(id).map(|n| (id.as_str(), n)))
    }

    /// First node in iteration order, if any.
    pub fn first(&self) -> Option<&NodeState> {
        self.order.first().and_then(|id| self.nodes.get(id))
    }
}

/// Holds exactly one current snapshot, replaced wholesale on each update.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: Option<NetworkSnapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whole-value swap; the prior snapshot is dropped.
    pub fn replace(&mut self, snapshot: NetworkSnapshot) {
        trace!(nodes = snapshot.len(), "snapshot replaced");
        self.current = Some(snapshot);
    }

    pub fn current(&self) -> Option<&NetworkSnapshot> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn iteration_follows_wire_document_order() {
        let payload = json!({
            "n2": { "waveform": [1.0], "collapsed": false },
            "n0": { "waveform": [1.0], "collapsed": false },
            "n1": { "waveform": [1.0], "collapsed": false },
        });
        let snapshot = NetworkSnapshot::from_value(&payload);
        let ids: Vec<&str> = snapshot.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["n2", "n0", "n1"]);
        assert_eq!(snapshot.node_ids(), &["n2", "n0", "n1"]);
    }

    #[test]
    fn malformed_node_is_skipped_not_fatal() {
        let payload = json!({
            "good": { "waveform": [{"magnitude": 0.5}], "collapsed": true, "value": 3 },
            "bad": "not an object",
        });
        let snapshot = NetworkSnapshot::from_value(&payload);
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.get("good").is_some());
        assert!(snapshot.get("bad").is_none());
    }

    #[test]
    fn optional_fields_deserialize_when_present() {
        let payload = json!({
            "n0": {
                "waveform": [0.1, 0.2],
                "collapsed": true,
                "value": 42,
                "collapseChance": 0.1,
                "interferenceGain": 0.7,
                "phase": 1.5,
                "connections": ["n1", "n2"],
            }
        });
        let snapshot = NetworkSnapshot::from_value(&payload);
        let node = snapshot.get("n0").unwrap();
        assert!(node.collapsed);
        assert_eq!(node.value, Some(42.0));
        assert_eq!(node.collapse_chance, Some(0.1));
        assert_eq!(node.interference_gain, Some(0.7));
        assert_eq!(node.phase, Some(1.5));
        assert_eq!(node.connections, vec!["n1", "n2"]);
    }

    #[test]
    fn non_object_payload_is_empty_snapshot() {
        let snapshot = NetworkSnapshot::from_value(&json!([1, 2, 3]));
        assert!(snapshot.is_empty());
    }

    #[test]
    fn store_replace_supersedes_prior_value() {
        let mut store = SnapshotStore::new();
        assert!(store.current().is_none());

        store.replace(NetworkSnapshot::from_value(&json!({
            "a": { "waveform": [1.0] },
            "b": { "waveform": [1.0] },
        })));
        assert_eq!(store.current().unwrap().len(), 2);

        store.replace(NetworkSnapshot::from_value(&json!({
            "c": { "waveform": [1.0] },
        })));
        let current = store.current().unwrap();
        assert_eq!(current.len(), 1);
        assert!(current.get("a").is_none());
    }
}
