//! Lane layout: deterministic node-to-row assignment
//!
//! The canvas is split into `max_rows` horizontal lanes of equal height.
//! Nodes fill rows top to bottom in iteration order; every lane spans the
//! full canvas width, so nodes sharing a row overdraw the same horizontal
//! span. That is the accepted trade-off: rows are the only spatial partition.

/// Screen region assigned to one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lane {
    pub row: usize,
    pub top: f32,
    pub height: f32,
    pub width: f32,
}

/// Default row count for the waveform canvas.
pub const MAX_ROWS: usize = 4;

/// Assign each of `count` nodes (by position in iteration order) a lane.
///
/// `per_row = ceil(count / max_rows)`, row index clamped to `max_rows - 1`.
/// Zero nodes produce no lanes.
pub fn lane_layout(count: usize, width: f32, height: f32, max_rows: usize) -> Vec<Lane> {
    if count == 0 || max_rows == 0 {
        return Vec::new();
    }

    let per_row = count.div_ceil(max_rows);
    let lane_height = height / max_rows as f32;

    (0..count)
        .map(|idx| {
            let row = (idx / per_row).min(max_rows - 1);
            Lane {
                row,
                top: row as f32 * lane_height,
                height: lane_height,
                width,
            }
        })
        .collect()
}
