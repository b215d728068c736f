use crate::foundation::core::{Millis, Point, Rgba, Viewport};
use crate::foundation::error::FxResult;

/// 2D drawing context bound to a full-viewport canvas.
///
/// The starfield only needs four primitives, mirroring what it asks of a browser canvas: clear,
/// a full-surface radial gradient, filled circles and a gradient-stroked line.
pub trait Surface {
    fn viewport(&self) -> Viewport;

    /// Resize the backing canvas (the browser's `canvas.width = innerWidth`).
    fn resize(&mut self, viewport: Viewport) -> FxResult<()>;

    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Cover the whole surface with a radial gradient from `inner` at `center` to `outer` at
    /// `radius` and beyond.
    fn fill_radial_gradient(&mut self, center: Point, radius: f64, inner: Rgba, outer: Rgba);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba);

    /// Stroke `from -> to` with `width`, interpolating `from_color -> to_color` along the line.
    fn stroke_gradient_line(
        &mut self,
        from: Point,
        to: Point,
        width: f64,
        from_color: Rgba,
        to_color: Rgba,
    );

    /// Called once after a frame's draw calls; lets buffered backends flush. `now` is the frame
    /// time.
    fn present(&mut self, _now: Millis) {}
}

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Convert to straight alpha in place (PNG encoders expect straight RGBA).
    pub fn unpremultiply(&mut self) {
        if !self.premultiplied {
            return;
        }
        for px in self.data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        self.premultiplied = false;
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}
