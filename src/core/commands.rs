//! Outbound control commands
//!
//! Pass-through to the simulation server: the client serializes whatever the
//! operator entered and does not validate simulation semantics.

use serde::Serialize;

/// A control command, serialized as `{"type": ..., "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Command {
    Step { count: u32 },
    SetNodeCount { count: u32 },
    Reconnect { connect_prob: f64 },
    AddNode,
    RemoveNode,
    RotatePhaseAll { angle: f64 },
    SetParams {
        #[serde(skip_serializing_if = "Option::is_none")]
        interference_gain: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        collapse_chance: Option<f64>,
    },
}

impl Command {
    /// Wire text frame for this command.
    pub fn to_frame(&self) -> String {
        // Serialization of a plain enum over plain fields cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}
