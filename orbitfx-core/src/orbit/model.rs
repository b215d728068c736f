use crate::foundation::core::{Millis, Point, Size, Viewport};
use crate::foundation::error::{FxError, FxResult};
use crate::foundation::math::deg_to_rad;

/// Maximum number of markers a single orbit system drives.
pub const MAX_MARKERS: usize = 4;

/// One navigation marker circling the shared center.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OrbitMarker {
    /// Element id of the marker in the host document.
    pub id: String,
    pub radius: f64,
    /// Signed angular speed; negative values orbit counter-clockwise on screen.
    pub speed_deg_per_ms: f64,
    pub base_angle_deg: f64,
}

impl OrbitMarker {
    pub fn new(id: &str, radius: f64, speed_deg_per_ms: f64, base_angle_deg: f64) -> Self {
        Self {
            id: id.to_string(),
            radius,
            speed_deg_per_ms,
            base_angle_deg,
        }
    }

    /// Effective angle at `now`, radians.
    pub fn angle_at(&self, now: Millis) -> f64 {
        deg_to_rad(self.base_angle_deg + now.0 * self.speed_deg_per_ms)
    }

    /// Top-left translation placing a marker of `size` on its orbit around `center`.
    ///
    /// Pure in `(base_angle, radius, speed, now)`.
    pub fn offset(&self, now: Millis, size: Size, center: Point) -> Point {
        let a = self.angle_at(now);
        Point::new(
            center.x + self.radius * a.cos() - size.width / 2.0,
            center.y + self.radius * a.sin() - size.height / 2.0,
        )
    }

    pub fn validate(&self) -> FxResult<()> {
        if self.id.is_empty() {
            return Err(FxError::validation("orbit marker id must not be empty"));
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(FxError::validation(format!(
                "orbit marker '{}': radius must be finite and >= 0",
                self.id
            )));
        }
        if !self.speed_deg_per_ms.is_finite() || !self.base_angle_deg.is_finite() {
            return Err(FxError::validation(format!(
                "orbit marker '{}': speed and angle must be finite",
                self.id
            )));
        }
        Ok(())
    }
}

/// Orbit system parameters. Defaults reproduce the hero's four navigation markers.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub markers: Vec<OrbitMarker>,
    /// Motion runs only while the viewport is strictly wider than this.
    pub breakpoint: u32,
    /// Orbit center in the markers' translation space.
    pub center: Point,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            markers: vec![
                OrbitMarker::new("nav-about", 250.0, 0.0048, 45.0),
                OrbitMarker::new("nav-skills", 350.0, -0.0040, 135.0),
                OrbitMarker::new("nav-web", 450.0, 0.0032, 225.0),
                OrbitMarker::new("nav-contact", 550.0, -0.0024, 315.0),
            ],
            breakpoint: 768,
            center: Point::ORIGIN,
        }
    }
}

impl OrbitConfig {
    pub fn validate(&self) -> FxResult<()> {
        if self.markers.len() > MAX_MARKERS {
            return Err(FxError::validation(format!(
                "at most {MAX_MARKERS} orbit markers are supported, got {}",
                self.markers.len()
            )));
        }
        for (i, m) in self.markers.iter().enumerate() {
            m.validate()?;
            if self.markers[..i].iter().any(|other| other.id == m.id) {
                return Err(FxError::validation(format!(
                    "duplicate orbit marker id '{}'",
                    m.id
                )));
            }
        }
        if !self.center.x.is_finite() || !self.center.y.is_finite() {
            return Err(FxError::validation("orbit center must be finite"));
        }
        Ok(())
    }

    pub fn enabled_for(&self, viewport: Viewport) -> bool {
        viewport.width > self.breakpoint
    }
}

/// CSS `transform` value for a translation, e.g. `translate(12.5px, -3px)`.
pub fn css_translate(p: Point) -> String {
    format!("translate({}px, {}px)", p.x, p.y)
}

#[cfg(test)]
#[path = "../../tests/unit/orbit/model.rs"]
mod tests;
