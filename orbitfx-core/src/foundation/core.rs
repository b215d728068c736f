use crate::foundation::error::{FxError, FxResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Milliseconds on a monotonic clock, measured from the clock's origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Millis(pub f64);

impl Millis {
    pub const ZERO: Self = Self(0.0);

    pub fn from_secs(secs: f64) -> Self {
        Self(secs * 1000.0)
    }

    pub fn as_secs(self) -> f64 {
        self.0 / 1000.0
    }

    pub fn max(self, other: Self) -> Self {
        if other.0 > self.0 { other } else { self }
    }
}

impl std::ops::Add for Millis {
    type Output = Millis;

    fn add(self, rhs: Self) -> Self::Output {
        Millis(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Millis {
    type Output = Millis;

    fn sub(self, rhs: Self) -> Self::Output {
        Millis(self.0 - rhs.0)
    }
}

/// Handle of a host document element.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ElementId(pub u32);

/// Pixel size of the drawing surface / browser viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> FxResult<Self> {
        if width == 0 || height == 0 {
            return Err(FxError::validation("viewport width and height must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    pub fn diagonal(self) -> f64 {
        f64::from(self.width).hypot(f64::from(self.height))
    }

    pub fn min_side(self) -> f64 {
        f64::from(self.width.min(self.height))
    }

    /// Strict containment: points on the edges are outside.
    pub fn contains_strict(self, p: Point) -> bool {
        p.x > 0.0 && p.x < f64::from(self.width) && p.y > 0.0 && p.y < f64::from(self.height)
    }

    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// Straight (non-premultiplied) color with a fractional alpha, CSS `rgba()` style.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64, // 0..=1
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0.0)
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    pub fn alpha_u8(self) -> u8 {
        (self.a.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.alpha_u8()]
    }

    pub fn to_premul_rgba8(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        let a = self.alpha_u8();
        [premul(self.r, a), premul(self.g, a), premul(self.b, a), a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
