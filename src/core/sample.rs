//! Canonical waveform sample type and the wire-shape normalizer
//!
//! The simulation server is loose about sample encoding: a waveform entry may
//! be a bare number (magnitude only) or an object carrying `magnitude` and an
//! optional `phase` (plus `real`/`imag`, which we ignore). All of that is
//! resolved here, once, so the rest of the crate only ever sees `Amplitude`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One canonical waveform sample: non-negative magnitude plus phase in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amplitude {
    pub magnitude: f32,
    pub phase: f32,
}

impl Amplitude {
    pub fn new(magnitude: f32, phase: f32) -> Self {
        Self { magnitude, phase }
    }

    /// Normalize a wire-form sample into canonical shape.
    ///
    /// - bare number `n` → `{ |n|, 0 }`
    /// - object with numeric `magnitude` → `{ |magnitude|, phase or 0 }`
    /// - anything else → `{ 0, 0 }`
    ///
    /// Never fails; unrecognized shapes degrade to a silent zero sample.
    pub fn from_wire(value: &Value) -> Self {
        if let Some(n) = value.as_f64() {
            return Self::new(n.abs() as f32, 0.0);
        }

        if let Some(obj) = value.as_object() {
            if let Some(mag) = obj.get("magnitude").and_then(Value::as_f64) {
                let phase = obj.get("phase").and_then(Value::as_f64).unwrap_or(0.0);
                return Self::new(mag.abs() as f32, phase as f32);
            }
        }

        Self::new(0.0, 0.0)
    }
}

impl<'de> Deserialize<'de> for Amplitude {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Polymorphic wire form; normalization is infallible by design.
        let value = Value::deserialize(deserializer)?;
        Ok(Amplitude::from_wire(&value))
    }
}
