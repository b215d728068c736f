use crate::foundation::core::{Point, Rgba, Viewport};
use crate::foundation::error::FxResult;
use crate::render::surface::Surface;

/// A single recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    RadialGradient {
        center: Point,
        radius: f64,
        inner: Rgba,
        outer: Rgba,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Rgba,
    },
    GradientLine {
        from: Point,
        to: Point,
        width: f64,
        from_color: Rgba,
        to_color: Rgba,
    },
}

/// Surface that logs draw calls instead of rasterizing them.
///
/// `clear` drops the log, so after a frame the log holds exactly that frame's draws.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    viewport: Viewport,
    ops: Vec<DrawOp>,
    clears: u64,
}

impl RecordingSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ops: Vec::new(),
            clears: 0,
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn clears(&self) -> u64 {
        self.clears
    }

    pub fn circles(&self) -> impl Iterator<Item = (Point, f64, Rgba)> + '_ {
        self.ops.iter().filter_map(|op| match *op {
            DrawOp::Circle {
                center,
                radius,
                color,
            } => Some((center, radius, color)),
            _ => None,
        })
    }

    pub fn gradient_lines(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::GradientLine { .. }))
            .count()
    }

    pub fn radial_gradients(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::RadialGradient { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, viewport: Viewport) -> FxResult<()> {
        self.viewport = viewport;
        Ok(())
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.clears += 1;
    }

    fn fill_radial_gradient(&mut self, center: Point, radius: f64, inner: Rgba, outer: Rgba) {
        self.ops.push(DrawOp::RadialGradient {
            center,
            radius,
            inner,
            outer,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_gradient_line(
        &mut self,
        from: Point,
        to: Point,
        width: f64,
        from_color: Rgba,
        to_color: Rgba,
    ) {
        self.ops.push(DrawOp::GradientLine {
            from,
            to,
            width,
            from_color,
            to_color,
        });
    }
}
