//! Inbound message parsing
//!
//! The server pushes text frames of the form
//! `{"type": "state", "data": { "<node-id>": { ... }, ... }}`.
//! Anything that is not a well-formed state frame is dropped with a log line.

use serde_json::Value;
use tracing::{trace, warn};

use super::snapshot::NetworkSnapshot;

/// Parse one websocket text frame into a snapshot.
///
/// Returns `None` for malformed JSON or non-`state` frames.
pub fn parse_message(msg: &str) -> Option<NetworkSnapshot> {
    trace!(len = msg.len(), "parsing message");

    let json: Value = serde_json::from_str(msg)
        .map_err(|e| {
            warn!(error = %e, "failed to parse JSON frame");
        })
        .ok()?;

    let msg_type = json["type"].as_str()?;
    if msg_type != "state" {
        // Could be a greeting or an ack; not ours.
        trace!(msg_type, "ignoring non-state frame");
        return None;
    }

    Some(NetworkSnapshot::from_value(&json["data"]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_state_frame() {
        let msg = r#"{
            "type": "state",
            "data": {
                "n0": {
                    "waveform": [
                        {"real": 1.0, "imag": 0.0, "magnitude": 1.0, "phase": 0.0},
                        0.5
                    ],
                    "collapsed": false,
                    "value": null,
                    "connections": ["n1"]
                },
                "n1": {
                    "waveform": [{"magnitude": 0.2, "phase": 1.0}],
                    "collapsed": true,
                    "value": 0
                }
            }
        }"#;

        let snapshot = parse_message(msg).expect("state frame should parse");
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.node_ids(), &["n0", "n1"]);
        assert_eq!(snapshot.get("n0").unwrap().waveform.len(), 2);
        assert!(snapshot.get("n1").unwrap().collapsed);
        assert_eq!(snapshot.get("n1").unwrap().value, Some(0.0));
    }

    #[test]
    fn ignores_non_state_frame() {
        assert!(parse_message(r#"{"type": "hello", "data": {}}"#).is_none());
        assert!(parse_message(r#"{"data": {}}"#).is_none());
    }

    #[test]
    fn malformed_json_is_none() {
        assert!(parse_message("{not json").is_none());
    }

    #[test]
    fn empty_state_payload_is_empty_snapshot() {
        let snapshot = parse_message(r#"{"type": "state", "data": {}}"#).unwrap();
        assert!(snapshot.is_empty());
    }
}
