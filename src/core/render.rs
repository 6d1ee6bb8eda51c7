//! Waveform renderer
//!
//! Draws every node's trace into its lane: per-node normalized magnitudes as
//! a connected polyline, hue keyed to node index, lightness to mean phase,
//! plus a red marker for collapsed nodes. Failure isolation is per node; a
//! node with no waveform is logged and skipped without disturbing siblings.

use tracing::{debug, trace};

use super::layout::{lane_layout, MAX_ROWS};
use super::snapshot::NetworkSnapshot;
use super::surface::{DrawSurface, Rgb};

/// Vertical inset of the trace inside its lane.
const TRACE_MARGIN: f32 = 5.0;
/// Radius of the collapse marker.
const MARKER_RADIUS: f32 = 5.0;
/// Stroke saturation, percent.
const TRACE_SATURATION: f32 = 80.0;
/// Collapse marker fill.
const MARKER_COLOR: Rgb = Rgb::new(255, 0, 0);

/// Convert HSL (hue in degrees, saturation/lightness in percent) to RGB.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Rgb {
    let h = hue.rem_euclid(360.0);
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let l = (lightness / 100.0).clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h as u32 / 60 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Rgb::new(
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}

/// Stroke color for the node at `idx` of `total`, given its mean phase.
///
/// Hue walks the wheel by index; lightness swings with the mean phase and is
/// naturally bounded to [20, 80] by the sine range.
pub fn trace_color(idx: usize, total: usize, avg_phase: f32) -> Rgb {
    let hue = idx as f32 * 360.0 / total.max(1) as f32;
    let lightness = 50.0 + 30.0 * avg_phase.sin();
    hsl_to_rgb(hue, TRACE_SATURATION, lightness)
}

/// Draw the whole snapshot onto `surface`.
///
/// Clears the full surface first; no accumulation across frames. An empty
/// snapshot clears and draws nothing.
pub fn render(snapshot: &NetworkSnapshot, surface: &mut dyn DrawSurface, width: f32, height: f32) {
    surface.clear_rect(0.0, 0.0, width, height);

    let total = snapshot.len();
    let lanes = lane_layout(total, width, height, MAX_ROWS);

    for (idx, (node_id, node)) in snapshot.iter().enumerate() {
        let waveform = &node.waveform;
        if waveform.is_empty() {
            debug!(node_id, "skipping node with empty waveform");
            continue;
        }

        let lane = &lanes[idx];
        let n = waveform.len();

        let max_mag = waveform
            .iter()
            .map(|s| s.magnitude)
            .fold(f32::MIN, f32::max);
        // Guard: an all-zero waveform normalizes against 1 instead of dividing by 0.
        let max_mag = if max_mag > 0.0 { max_mag } else { 1.0 };

        let avg_phase = waveform.iter().map(|s| s.phase).sum::<f32>() / n as f32;

        surface.set_stroke_color(trace_color(idx, total, avg_phase));
        surface.begin_path();

        let x_step = lane.width / n as f32;
        for (i, sample) in waveform.iter().enumerate() {
            let normalized = sample.magnitude / max_mag;
            let x = i as f32 * x_step;
            let y = lane.top + (1.0 - normalized) * (lane.height - 2.0 * TRACE_MARGIN) + TRACE_MARGIN;
            if i == 0 {
                surface.move_to(x, y);
            } else {
                surface.line_to(x, y);
            }
        }
        surface.stroke();

        if node.collapsed {
            // Raw `value` scaled by lane width over sample count, as observed.
            let value = node.value.unwrap_or(0.0) as f32;
            surface.set_fill_color(MARKER_COLOR);
            surface.fill_circle(
                value * (lane.width / n as f32),
                lane.top + lane.height / 2.0,
                MARKER_RADIUS,
            );
        }

        trace!(node_id, idx, samples = n, collapsed = node.collapsed, "trace drawn");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::surface::{DrawOp, RecordingSurface};
    use serde_json::json;

    fn snapshot(payload: serde_json::Value) -> NetworkSnapshot {
        NetworkSnapshot::from_value(&payload)
    }

    fn rendered(payload: serde_json::Value, width: f32, height: f32) -> RecordingSurface {
        let mut surface = RecordingSurface::new();
        render(&snapshot(payload), &mut surface, width, height);
        surface
    }

    #[test]
    fn empty_snapshot_only_clears() {
        let surface = rendered(json!({}), 800.0, 400.0);
        assert_eq!(
            surface.ops,
            vec![DrawOp::ClearRect { x: 0.0, y: 0.0, width: 800.0, height: 400.0 }]
        );
    }

    #[test]
    fn surface_is_cleared_before_any_draw() {
        let surface = rendered(json!({ "n0": { "waveform": [1.0, 2.0] } }), 100.0, 100.0);
        assert!(matches!(surface.ops[0], DrawOp::ClearRect { .. }));
        assert_eq!(surface.stroke_count(), 1);
    }

    #[test]
    fn uniform_waveform_peaks_at_lane_top_margin() {
        // All samples share the max, so every y sits at top + margin.
        let surface = rendered(
            json!({ "n0": { "waveform": [0.4, 0.4, 0.4, 0.4] } }),
            400.0,
            400.0,
        );
        let lane_height = 400.0 / MAX_ROWS as f32;
        for op in &surface.ops {
            if let DrawOp::MoveTo { y, .. } | DrawOp::LineTo { y, .. } = op {
                assert_eq!(*y, TRACE_MARGIN);
                assert!(*y < lane_height);
            }
        }
    }

    #[test]
    fn zero_sample_sits_at_lane_bottom_margin() {
        let surface = rendered(json!({ "n0": { "waveform": [1.0, 0.0] } }), 400.0, 400.0);
        let lane_height = 400.0 / MAX_ROWS as f32;
        let ys: Vec<f32> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::MoveTo { y, .. } | DrawOp::LineTo { y, .. } => Some(*y),
                _ => None,
            })
            .collect();
        assert_eq!(ys, vec![TRACE_MARGIN, lane_height - TRACE_MARGIN]);
    }

    #[test]
    fn x_positions_step_by_lane_width_over_sample_count() {
        let surface = rendered(json!({ "n0": { "waveform": [1.0, 1.0, 1.0, 1.0] } }), 400.0, 400.0);
        let xs: Vec<f32> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::MoveTo { x, .. } | DrawOp::LineTo { x, .. } => Some(*x),
                _ => None,
            })
            .collect();
        assert_eq!(xs, vec![0.0, 100.0, 200.0, 300.0]);
    }

    #[test]
    fn empty_waveform_node_does_not_block_siblings() {
        let surface = rendered(
            json!({
                "dead": { "waveform": [] },
                "alive": { "waveform": [1.0, 2.0] },
                "alive2": { "waveform": [3.0] },
            }),
            400.0,
            400.0,
        );
        assert_eq!(surface.stroke_count(), 2);
    }

    #[test]
    fn collapsed_node_gets_red_marker_at_value_position() {
        let surface = rendered(
            json!({ "n0": { "waveform": [1.0, 1.0, 1.0, 1.0], "collapsed": true, "value": 2 } }),
            400.0,
            400.0,
        );
        let lane_height = 400.0 / MAX_ROWS as f32;
        assert!(surface.ops.contains(&DrawOp::SetFillColor(MARKER_COLOR)));
        assert!(surface.ops.contains(&DrawOp::FillCircle {
            x: 2.0 * 100.0,
            y: lane_height / 2.0,
            radius: MARKER_RADIUS,
        }));
    }

    #[test]
    fn collapsed_node_without_value_marks_origin() {
        let surface = rendered(
            json!({ "n0": { "waveform": [1.0], "collapsed": true } }),
            400.0,
            400.0,
        );
        assert_eq!(surface.circle_count(), 1);
        assert!(matches!(
            surface.ops.last(),
            Some(DrawOp::FillCircle { x, .. }) if *x == 0.0
        ));
    }

    #[test]
    fn uncollapsed_node_has_no_marker() {
        let surface = rendered(json!({ "n0": { "waveform": [1.0, 2.0] } }), 400.0, 400.0);
        assert_eq!(surface.circle_count(), 0);
    }

    #[test]
    fn all_zero_waveform_renders_without_division_error() {
        let surface = rendered(json!({ "n0": { "waveform": [0.0, 0.0] } }), 400.0, 400.0);
        // Normalizes against 1: both samples sit at the lane bottom margin.
        let lane_height = 400.0 / MAX_ROWS as f32;
        for op in &surface.ops {
            if let DrawOp::MoveTo { y, .. } | DrawOp::LineTo { y, .. } = op {
                assert_eq!(*y, lane_height - TRACE_MARGIN);
            }
        }
    }

    #[test]
    fn hue_walks_the_wheel_by_index() {
        // 4 nodes: hues 0, 90, 180, 270 with fixed lightness (phase 0 → 50%).
        assert_eq!(trace_color(0, 4, 0.0), hsl_to_rgb(0.0, 80.0, 50.0));
        assert_eq!(trace_color(1, 4, 0.0), hsl_to_rgb(90.0, 80.0, 50.0));
        assert_eq!(trace_color(3, 4, 0.0), hsl_to_rgb(270.0, 80.0, 50.0));
    }

    #[test]
    fn hsl_primaries_round_trip() {
        assert_eq!(hsl_to_rgb(0.0, 100.0, 50.0), Rgb::new(255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 100.0, 50.0), Rgb::new(0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 100.0, 50.0), Rgb::new(0, 0, 255));
        assert_eq!(hsl_to_rgb(0.0, 0.0, 100.0), Rgb::new(255, 255, 255));
        assert_eq!(hsl_to_rgb(0.0, 0.0, 0.0), Rgb::new(0, 0, 0));
    }
}
