//! Aggregate statistics over a snapshot, plus the status-line formatters
//!
//! Runs on its own cadence, independent of rendering. All math guards its
//! denominators; no input observed on the wire can make this panic.

use tracing::trace;

use super::snapshot::{NetworkSnapshot, NodeState};

/// Rolling aggregate over one snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkStats {
    pub total: usize,
    pub collapsed: usize,
    /// Collapsed share in percent; 0.0 for an empty snapshot.
    pub collapsed_percent: f64,
    /// Mean of per-node mean magnitudes, over nodes with a non-empty
    /// waveform; 0.0 when no node contributes.
    pub average_magnitude: f64,
}

/// Compute counts, collapse percentage and mean magnitude for a snapshot.
pub fn aggregate(snapshot: &NetworkSnapshot) -> NetworkStats {
    let total = snapshot.len();
    let collapsed = snapshot.iter().filter(|(_, n)| n.collapsed).count();

    let collapsed_percent = if total > 0 {
        collapsed as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    // Empty-waveform nodes are skipped entirely, not counted as zero.
    let mut contributing = 0usize;
    let mut mean_sum = 0.0f64;
    for (_, node) in snapshot.iter() {
        if node.waveform.is_empty() {
            continue;
        }
        let sum: f64 = node.waveform.iter().map(|s| s.magnitude as f64).sum();
        mean_sum += sum / node.waveform.len() as f64;
        contributing += 1;
    }
    let average_magnitude = if contributing > 0 {
        mean_sum / contributing as f64
    } else {
        0.0
    };

    trace!(total, collapsed, average_magnitude, "stats aggregated");

    NetworkStats {
        total,
        collapsed,
        collapsed_percent,
        average_magnitude,
    }
}

/// Display-only proxy for "global" simulation parameters.
///
/// Reads only the first node in iteration order, substituting fixed defaults
/// when a field is absent. This is a single node's view, not a true
/// aggregate; a known limitation preserved as observed.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSummary {
    pub collapse_chance: f64,
    pub interference_gain: f64,
    pub phase: Option<f64>,
}

pub const DEFAULT_COLLAPSE_CHANCE: f64 = 0.05;
pub const DEFAULT_INTERFERENCE_GAIN: f64 = 0.5;

impl Default for ConfigSummary {
    fn default() -> Self {
        Self {
            collapse_chance: DEFAULT_COLLAPSE_CHANCE,
            interference_gain: DEFAULT_INTERFERENCE_GAIN,
            phase: None,
        }
    }
}

impl ConfigSummary {
    fn from_node(node: &NodeState) -> Self {
        Self {
            collapse_chance: node.collapse_chance.unwrap_or(DEFAULT_COLLAPSE_CHANCE),
            interference_gain: node.interference_gain.unwrap_or(DEFAULT_INTERFERENCE_GAIN),
            phase: node.phase,
        }
    }
}

pub fn config_summary(snapshot: &NetworkSnapshot) -> ConfigSummary {
    snapshot.first().map(ConfigSummary::from_node).unwrap_or_default()
}

/// Status-box text, refreshed on the status ticker.
pub fn format_status(stats: &NetworkStats, paused: bool) -> String {
    format!(
        "Running: {}. Collapsed {}/{} ({:.1}%). Avg magnitude {:.3}.",
        !paused, stats.collapsed, stats.total, stats.collapsed_percent, stats.average_magnitude
    )
}

/// Sidebar calculations text, refreshed on the calculation ticker.
pub fn format_calculations(stats: &NetworkStats, config: &ConfigSummary) -> String {
    let phase = config
        .phase
        .map(|p| p.to_string())
        .unwrap_or_else(|| "variable".to_string());
    format!(
        "Nodes: {}\nCollapsed: {}\nAvg Magnitude: {:.3}\nCollapse Chance: {}\nInterference Gain: {}\nPhase Angle: {}",
        stats.total,
        stats.collapsed,
        stats.average_magnitude,
        config.collapse_chance,
        config.interference_gain,
        phase,
    )
}
