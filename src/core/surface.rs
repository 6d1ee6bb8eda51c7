//! Abstract 2D drawing target
//!
//! The renderer draws through this trait so the egui dashboard, the CLI and
//! the tests can each supply their own surface. The op set is the minimum the
//! waveform view needs: clear, stroked polyline paths, filled circles.

/// Plain RGB color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Minimal 2D drawing surface.
pub trait DrawSurface {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn set_stroke_color(&mut self, color: Rgb);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn stroke(&mut self);
    fn set_fill_color(&mut self, color: Rgb);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32);
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    ClearRect { x: f32, y: f32, width: f32, height: f32 },
    SetStrokeColor(Rgb),
    BeginPath,
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    Stroke,
    SetFillColor(Rgb),
    FillCircle { x: f32, y: f32, radius: f32 },
}

/// Surface that records every op instead of drawing.
///
/// The injection point for driving the renderer without a live canvas.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Count of stroked paths (one per rendered trace).
    pub fn stroke_count(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Stroke)).count()
    }

    /// Count of filled circles (one per collapse marker).
    pub fn circle_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::FillCircle { .. }))
            .count()
    }
}

impl DrawSurface for RecordingSurface {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(DrawOp::ClearRect { x, y, width, height });
    }

    fn set_stroke_color(&mut self, color: Rgb) {
        self.ops.push(DrawOp::SetStrokeColor(color));
    }

    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.ops.push(DrawOp::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ops.push(DrawOp::LineTo { x, y });
    }

    fn stroke(&mut self) {
        self.ops.push(DrawOp::Stroke);
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.ops.push(DrawOp::SetFillColor(color));
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.ops.push(DrawOp::FillCircle { x, y, radius });
    }
}
