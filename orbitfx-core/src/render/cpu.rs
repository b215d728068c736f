use crate::foundation::core::{Millis, Point, Rgba, Viewport};
use crate::foundation::error::{FxError, FxResult};
use crate::render::surface::{FrameRGBA, Surface};
use std::collections::HashMap;
use std::sync::Arc;
use vello_cpu::kurbo::Shape as _;

/// Segments used to approximate a gradient stroke with solid quads.
const LINE_GRADIENT_STEPS: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    cx: u64,
    cy: u64,
    radius: u64,
    inner: [u8; 4],
    outer: [u8; 4],
}

impl GradientKey {
    fn new(center: Point, radius: f64, inner: Rgba, outer: Rgba) -> Self {
        Self {
            cx: center.x.to_bits(),
            cy: center.y.to_bits(),
            radius: radius.to_bits(),
            inner: inner.to_premul_rgba8(),
            outer: outer.to_premul_rgba8(),
        }
    }
}

/// CPU raster surface powered by `vello_cpu`.
///
/// Draw calls are recorded into a `RenderContext`; [`Surface::present`] rasterizes them into the
/// backing pixmap, which [`CpuSurface::frame`] reads back.
pub struct CpuSurface {
    viewport: Viewport,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    gradient_cache: HashMap<GradientKey, vello_cpu::Image>,
    presented: u64,
}

impl CpuSurface {
    pub fn new(viewport: Viewport) -> FxResult<Self> {
        let (w, h) = surface_dims(viewport)?;
        Ok(Self {
            viewport,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            gradient_cache: HashMap::new(),
            presented: 0,
        })
    }

    /// Number of frames rasterized so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Premultiplied RGBA8 readback of the last presented frame.
    pub fn frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.viewport.width,
            height: self.viewport.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn gradient_paint(
        &mut self,
        center: Point,
        radius: f64,
        inner: Rgba,
        outer: Rgba,
    ) -> FxResult<vello_cpu::Image> {
        let key = GradientKey::new(center, radius, inner, outer);
        if let Some(img) = self.gradient_cache.get(&key).cloned() {
            return Ok(img);
        }
        let (w, h) = (self.viewport.width, self.viewport.height);
        let bytes = radial_gradient_premul(w, h, center, radius, key.inner, key.outer);
        let img = rgba_premul_to_image(&bytes, w, h)?;
        self.gradient_cache.insert(key, img.clone());
        Ok(img)
    }
}

impl Surface for CpuSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Reallocate for a new viewport. Cached gradients are dropped since they are sized to the
    /// old surface.
    fn resize(&mut self, viewport: Viewport) -> FxResult<()> {
        if viewport == self.viewport {
            return Ok(());
        }
        let (w, h) = surface_dims(viewport)?;
        self.viewport = viewport;
        self.ctx = vello_cpu::RenderContext::new(w, h);
        self.pixmap = vello_cpu::Pixmap::new(w, h);
        self.gradient_cache.clear();
        Ok(())
    }

    fn clear(&mut self) {
        self.ctx.reset();
    }

    fn fill_radial_gradient(&mut self, center: Point, radius: f64, inner: Rgba, outer: Rgba) {
        let img = match self.gradient_paint(center, radius, inner, outer) {
            Ok(img) => img,
            Err(e) => {
                tracing::warn!(error = %e, "skipping radial gradient");
                return;
            }
        };
        let (w, h) = (
            f64::from(self.viewport.width),
            f64::from(self.viewport.height),
        );
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(img);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        if radius <= 0.0 || color.alpha_u8() == 0 {
            return;
        }
        let circle = vello_cpu::kurbo::Circle::new(point_to_cpu(center), radius);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_path(&circle.to_path(0.1));
    }

    fn stroke_gradient_line(
        &mut self,
        from: Point,
        to: Point,
        width: f64,
        from_color: Rgba,
        to_color: Rgba,
    ) {
        let d = to - from;
        let len = d.hypot();
        if len <= f64::EPSILON || width <= 0.0 {
            return;
        }
        let n = kurbo::Vec2::new(-d.y, d.x) * (width / 2.0 / len);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        for i in 0..LINE_GRADIENT_STEPS {
            let t0 = i as f64 / LINE_GRADIENT_STEPS as f64;
            let t1 = (i + 1) as f64 / LINE_GRADIENT_STEPS as f64;
            let color = lerp_rgba(from_color, to_color, (t0 + t1) / 2.0);
            if color.alpha_u8() == 0 {
                continue;
            }
            let p0 = from + d * t0;
            let p1 = from + d * t1;
            let mut quad = vello_cpu::kurbo::BezPath::new();
            quad.move_to(point_to_cpu(p0 + n));
            quad.line_to(point_to_cpu(p1 + n));
            quad.line_to(point_to_cpu(p1 - n));
            quad.line_to(point_to_cpu(p0 - n));
            quad.close_path();
            self.ctx.set_paint(color_to_cpu(color));
            self.ctx.fill_path(&quad);
        }
    }

    fn present(&mut self, _now: Millis) {
        clear_pixmap_to_transparent(&mut self.pixmap);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.presented += 1;
    }
}

fn surface_dims(viewport: Viewport) -> FxResult<(u16, u16)> {
    if viewport.is_empty() {
        return Err(FxError::render("surface has zero area"));
    }
    let w: u16 = viewport
        .width
        .try_into()
        .map_err(|_| FxError::render("surface width exceeds u16"))?;
    let h: u16 = viewport
        .height
        .try_into()
        .map_err(|_| FxError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn color_to_cpu(c: Rgba) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.to_rgba8();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn lerp_rgba(a: Rgba, b: Rgba, t: f64) -> Rgba {
    let lerp = |x: u8, y: u8| -> u8 {
        let xf = f64::from(x);
        let yf = f64::from(y);
        (xf + (yf - xf) * t).round().clamp(0.0, 255.0) as u8
    };
    Rgba::new(
        lerp(a.r, b.r),
        lerp(a.g, b.g),
        lerp(a.b, b.b),
        a.a + (b.a - a.a) * t,
    )
}

/// Premultiplied radial gradient covering a `w x h` surface, interpolated in premultiplied space.
pub(crate) fn radial_gradient_premul(
    w: u32,
    h: u32,
    center: Point,
    radius: f64,
    inner: [u8; 4],
    outer: [u8; 4],
) -> Vec<u8> {
    let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
    let inv_r = if radius > 0.0 { 1.0 / radius } else { 0.0 };
    for y in 0..h {
        let py = f64::from(y) + 0.5 - center.y;
        for x in 0..w {
            let px = f64::from(x) + 0.5 - center.x;
            let t = if inv_r == 0.0 {
                1.0
            } else {
                ((px * px + py * py).sqrt() * inv_r).min(1.0)
            };
            let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
            for c in 0..4 {
                let a = f64::from(inner[c]);
                let b = f64::from(outer[c]);
                bytes[idx + c] = (a + (b - a) * t).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    bytes
}

fn clear_pixmap_to_transparent(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn pixmap_from_premul_bytes(bytes: &[u8], width: u32, height: u32) -> FxResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| FxError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| FxError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(FxError::render("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> FxResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
